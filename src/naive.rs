//! Naive rank and select structures that precompute every answer.
//!
//! Both store one 64-bit word per bit of the supported vector, a factor-64
//! space overhead. They are not meant for production use; they serve as
//! correctness oracles for the compact structures in tests and comparison
//! benchmarks.

use crate::bit_vec::{BitAccess, WORD_SIZE};
use crate::buffer::{AllocationError, FixedBuffer};

/// A rank structure that stores the rank of every single bit.
///
/// # Example
/// ```rust
/// use ibits::naive::NaiveRank;
/// use ibits::BitVec;
///
/// let mut bits = BitVec::new(8).unwrap();
/// bits.set(2);
/// bits.set(5);
///
/// let rank = NaiveRank::new(&bits).unwrap();
/// assert_eq!(rank.rank1(3), 1);
/// assert_eq!(rank.rank0(8), 6);
/// ```
#[derive(Debug)]
pub struct NaiveRank {
    ranks: FixedBuffer<u64>,
}

impl NaiveRank {
    /// Builds the per-bit rank table for the given vector.
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the host cannot satisfy the request.
    pub fn new<B: BitAccess>(bitvector: &B) -> Result<Self, AllocationError> {
        // One entry past the end, so the total counts are queryable too.
        let mut ranks = FixedBuffer::new(bitvector.len() + 1)?;

        let mut cur_rank: u64 = 0;
        for pos in 0..bitvector.len() {
            ranks[pos] = cur_rank;
            cur_rank += u64::from(bitvector.is_set(pos));
        }
        ranks[bitvector.len()] = cur_rank;

        Ok(Self { ranks })
    }

    /// Returns the number of zeros up to (excluding) the given position.
    #[must_use]
    pub fn rank0(&self, pos: usize) -> usize {
        pos - self.rank1(pos)
    }

    /// Returns the number of ones up to (excluding) the given position.
    #[must_use]
    pub fn rank1(&self, pos: usize) -> usize {
        self.ranks[pos] as usize
    }

    /// Returns the heap memory used by the rank table in bits.
    #[must_use]
    pub fn memory_space(&self) -> usize {
        self.ranks.len() * WORD_SIZE
    }
}

/// A select structure that stores the position of every one and every zero.
///
/// # Example
/// ```rust
/// use ibits::naive::NaiveSelect;
/// use ibits::BitVec;
///
/// let mut bits = BitVec::new(8).unwrap();
/// bits.set(2);
/// bits.set(5);
///
/// let select = NaiveSelect::new(&bits, 2).unwrap();
/// assert_eq!(select.select1(2), 5);
/// assert_eq!(select.select0(3), 3);
/// ```
#[derive(Debug)]
pub struct NaiveSelect {
    zero_positions: FixedBuffer<u64>,
    one_positions: FixedBuffer<u64>,
}

impl NaiveSelect {
    /// Builds the position lists for the given vector, which contains
    /// `num_ones` ones.
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the host cannot satisfy the request.
    pub fn new<B: BitAccess>(bitvector: &B, num_ones: usize) -> Result<Self, AllocationError> {
        let mut zero_positions = FixedBuffer::new(bitvector.len() - num_ones)?;
        let mut one_positions = FixedBuffer::new(num_ones)?;

        let mut cur_one = 0;
        let mut cur_zero = 0;
        for pos in 0..bitvector.len() {
            if bitvector.is_set(pos) {
                one_positions[cur_one] = pos as u64;
                cur_one += 1;
            } else {
                zero_positions[cur_zero] = pos as u64;
                cur_zero += 1;
            }
        }

        Ok(Self {
            zero_positions,
            one_positions,
        })
    }

    /// Returns the position of the `rank`-th zero, with `rank` starting at 1.
    ///
    /// # Panics
    /// Panics if `rank` is zero or exceeds the number of zeros.
    #[must_use]
    pub fn select0(&self, rank: usize) -> usize {
        self.zero_positions[rank - 1] as usize
    }

    /// Returns the position of the `rank`-th one, with `rank` starting at 1.
    ///
    /// # Panics
    /// Panics if `rank` is zero or exceeds the number of ones.
    #[must_use]
    pub fn select1(&self, rank: usize) -> usize {
        self.one_positions[rank - 1] as usize
    }

    /// Returns the heap memory used by the position lists in bits.
    #[must_use]
    pub fn memory_space(&self) -> usize {
        (self.zero_positions.len() + self.one_positions.len()) * WORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitVec;

    #[test]
    fn test_naive_rank() {
        let mut bits = BitVec::new(130).unwrap();
        bits.set(0);
        bits.set(64);
        bits.set(129);

        let rank = NaiveRank::new(&bits).unwrap();
        assert_eq!(rank.rank1(0), 0);
        assert_eq!(rank.rank1(1), 1);
        assert_eq!(rank.rank1(64), 1);
        assert_eq!(rank.rank1(65), 2);
        assert_eq!(rank.rank1(130), 3);
        assert_eq!(rank.rank0(130), 127);
    }

    #[test]
    fn test_naive_select() {
        let mut bits = BitVec::new(130).unwrap();
        bits.set(0);
        bits.set(64);
        bits.set(129);

        let select = NaiveSelect::new(&bits, 3).unwrap();
        assert_eq!(select.select1(1), 0);
        assert_eq!(select.select1(2), 64);
        assert_eq!(select.select1(3), 129);
        assert_eq!(select.select0(1), 1);
        assert_eq!(select.select0(127), 128);
    }
}
