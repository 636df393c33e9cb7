//! Word-level select: the position of the k-th set bit within a single 64-bit
//! word. This is the last step of every select query, so it is worth three
//! implementations:
//!
//! - [`select1_pdep`] deposits a single bit at the k-th one via the `PDEP`
//!   instruction and counts trailing zeros. On `x86_64` with the `bmi2`
//!   target feature enabled this compiles to two instructions; elsewhere a
//!   software deposit loop stands in.
//! - [`select1_branchless`] narrows the position with a branch-free binary
//!   search over popcounts. This is the fastest portable variant.
//! - [`select1_linear`] scans bit by bit. It exists as a correctness oracle,
//!   not a production path.
//!
//! [`select1`] picks the best available variant at compile time. All variants
//! return identical results for every valid input.

const WORD_WIDTH: usize = u64::BITS as usize;

/// Returns the 0-indexed position of the `rank`-th set bit of `word`.
///
/// `rank` is 1-indexed: `select1(word, 1)` is the position of the lowest set
/// bit. Callers must guarantee `1 <= rank <= word.count_ones()`; the result is
/// unspecified otherwise.
///
/// # Example
/// ```rust
/// assert_eq!(ibits::word_select::select1(0b10110, 1), 1);
/// assert_eq!(ibits::word_select::select1(0b10110, 3), 4);
/// ```
#[must_use]
#[inline(always)]
#[allow(clippy::inline_always)]
pub fn select1(word: u64, rank: usize) -> usize {
    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    {
        select1_pdep(word, rank)
    }
    #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
    {
        select1_branchless(word, rank)
    }
}

/// Word select via parallel bit deposit: depositing `1 << (rank - 1)` into
/// `word` places a single bit at the `rank`-th one, whose position the
/// trailing-zero count recovers.
///
/// See [`select1`] for the contract.
#[must_use]
#[inline(always)]
#[allow(clippy::inline_always)]
pub fn select1_pdep(word: u64, rank: usize) -> usize {
    debug_assert!(rank >= 1 && rank <= word.count_ones() as usize);
    pdep(1 << (rank - 1), word).trailing_zeros() as usize
}

/// Word select via a branchless binary search: the candidate interval is
/// halved by comparing the popcount of the low `pos + half` bits against the
/// rank, with a conditional move instead of a branch.
///
/// See [`select1`] for the contract.
#[must_use]
pub fn select1_branchless(word: u64, rank: usize) -> usize {
    debug_assert!(rank >= 1 && rank <= word.count_ones() as usize);

    let mut pos = 0;
    let mut length = WORD_WIDTH;
    while length > 1 {
        let half = length / 2;
        let low_ones = (word << (WORD_WIDTH - (pos + half))).count_ones() as usize;
        pos += usize::from(low_ones < rank) * half;
        length -= half;
    }

    pos
}

/// Word select via a bit-by-bit scan.
///
/// See [`select1`] for the contract.
#[must_use]
pub fn select1_linear(mut word: u64, mut rank: usize) -> usize {
    debug_assert!(rank >= 1 && rank <= word.count_ones() as usize);

    let mut pos = 0;
    while rank > 0 {
        rank -= (word & 1) as usize;
        word >>= 1;
        pos += 1;
    }

    pos - 1
}

/// Parallel bit deposit: scatters the low-order bits of `value` to the
/// positions of the set bits of `mask`. Hardware `PDEP` where statically
/// available, otherwise a software loop over the mask bits.
#[inline(always)]
#[allow(clippy::inline_always)]
fn pdep(value: u64, mask: u64) -> u64 {
    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    // SAFETY: gated on the bmi2 target feature being statically enabled.
    unsafe {
        std::arch::x86_64::_pdep_u64(value, mask)
    }

    #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
    {
        let mut mask = mask;
        let mut result = 0;
        let mut value_bit: u64 = 1;
        while mask != 0 {
            if value & value_bit != 0 {
                result |= mask & mask.wrapping_neg();
            }
            mask &= mask - 1;
            value_bit = value_bit.wrapping_add(value_bit);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_known_positions() {
        assert_eq!(select1(1, 1), 0);
        assert_eq!(select1(0b10110, 1), 1);
        assert_eq!(select1(0b10110, 2), 2);
        assert_eq!(select1(0b10110, 3), 4);
        assert_eq!(select1(1 << 63, 1), 63);

        for rank in 1..=64 {
            assert_eq!(select1(u64::MAX, rank), rank - 1);
        }
    }

    #[test]
    fn test_variants_agree() {
        let mut rng = StdRng::seed_from_u64(0xb17_5e1ec7);

        let mut words: Vec<u64> = (0..1000).map(|_| rng.gen()).collect();
        words.extend([1, u64::MAX, 1 << 63, (1 << 63) | 1, 0xaaaa_aaaa_aaaa_aaaa]);

        for word in words {
            for rank in 1..=word.count_ones() as usize {
                let expected = select1_linear(word, rank);
                assert_eq!(select1_pdep(word, rank), expected);
                assert_eq!(select1_branchless(word, rank), expected);
                assert_eq!(select1(word, rank), expected);
            }
        }
    }
}
