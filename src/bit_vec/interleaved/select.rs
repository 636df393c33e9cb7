// Select code is in here to keep it more organized.

use crate::bit_vec::WORD_SIZE;
use crate::buffer::{AllocationError, FixedBuffer};
use crate::util::{mask_low, prefetch_read};
use crate::word_select;

use super::InterleavedBitVec;

/// A select index over an [`InterleavedBitVec`], sampling the superblock of
/// every `STRIDE`-th one and zero.
///
/// The samples bracket the superblock range a queried rank can fall into, so
/// a select query descends sample → superblock → block → word → bit, where
/// each level is either a branchless binary search with explicit prefetching
/// (`BINARY_SEARCH = true`, the default) or a linear scan. With the default
/// stride of 32768 the two sample tables add about 0.2% on top of the bit
/// vector.
///
/// The index borrows the bit vector, which must be finalized before
/// construction and must not be mutated while the index exists.
///
/// `STRIDE` must be a power of two no smaller than the block width; this is
/// checked when a constructor is instantiated.
///
/// # Example
/// ```rust
/// use ibits::{InterleavedBitVec, SampledSelect};
///
/// let mut bits = InterleavedBitVec::<512, 14>::new(1000).unwrap();
/// bits.set(2);
/// bits.set(3);
/// bits.set(999);
/// bits.finalize();
///
/// let select: SampledSelect = SampledSelect::new(&bits, bits.num_ones()).unwrap();
/// assert_eq!(select.select1(1), 2);
/// assert_eq!(select.select1(3), 999);
/// assert_eq!(select.select0(1), 0);
/// ```
#[derive(Debug)]
pub struct SampledSelect<
    'a,
    const BW: usize = 512,
    const BHW: usize = 14,
    const STRIDE: usize = 32768,
    const BINARY_SEARCH: bool = true,
> {
    bitvector: &'a InterleavedBitVec<BW, BHW>,
    zero_samples: FixedBuffer<u64>,
    one_samples: FixedBuffer<u64>,
    num_zeros: usize,
    num_ones: usize,
}

impl<'a, const BW: usize, const BHW: usize, const STRIDE: usize, const BINARY_SEARCH: bool>
    SampledSelect<'a, BW, BHW, STRIDE, BINARY_SEARCH>
{
    const BLOCK_DATA_WIDTH: usize = InterleavedBitVec::<BW, BHW>::BLOCK_DATA_WIDTH;
    const WORDS_PER_BLOCK: usize = InterleavedBitVec::<BW, BHW>::WORDS_PER_BLOCK;
    const BLOCKS_PER_SUPERBLOCK: usize = InterleavedBitVec::<BW, BHW>::BLOCKS_PER_SUPERBLOCK;
    const SUPERBLOCK_DATA_WIDTH: usize = InterleavedBitVec::<BW, BHW>::SUPERBLOCK_DATA_WIDTH;

    // Evaluated when a constructor is monomorphised. A stride below the block
    // width could cross two sample thresholds within a single block, which
    // the sampling pass does not support.
    const PARAMS_VALID: () = {
        assert!(STRIDE.is_power_of_two(), "stride must be a power of two");
        assert!(STRIDE >= BW, "stride must not be smaller than the block width");
    };

    /// Builds a select index for the given finalized bit vector in a single
    /// linear pass over its blocks.
    ///
    /// `num_ones` is the total number of ones in the vector, as reported by
    /// [`InterleavedBitVec::num_ones`]; queries return unspecified positions
    /// if it is wrong.
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the host cannot satisfy the request.
    pub fn new(
        bitvector: &'a InterleavedBitVec<BW, BHW>,
        num_ones: usize,
    ) -> Result<Self, AllocationError> {
        let () = Self::PARAMS_VALID;

        let num_zeros = bitvector.len() - num_ones;

        // One slot per crossed stride threshold, plus the sentinel.
        let mut select = Self {
            bitvector,
            zero_samples: FixedBuffer::new(num_zeros / STRIDE + 2)?,
            one_samples: FixedBuffer::new(num_ones / STRIDE + 2)?,
            num_zeros,
            num_ones,
        };
        select.build();

        Ok(select)
    }

    /// The sampling pass: walks the blocks once, accumulating one and zero
    /// counts, and records the superblock of the block in which each count
    /// crosses its next stride threshold.
    fn build(&mut self) {
        let bitvector = self.bitvector;
        if bitvector.is_empty() {
            return;
        }

        let one_samples = &mut self.one_samples;
        let zero_samples = &mut self.zero_samples;

        let mut cur_one = 0;
        let mut cur_zero = 0;

        let mut total_ones = 0;
        let mut total_zeros = 0;

        let mut threshold_one = 0;
        let mut threshold_zero = 0;

        let mut handle_block = |num_block: usize, num_ones: usize, num_zeros: usize| {
            total_ones += num_ones;
            total_zeros += num_zeros;

            if total_ones >= threshold_one {
                let num_superblock =
                    (num_block * Self::BLOCK_DATA_WIDTH) / Self::SUPERBLOCK_DATA_WIDTH;
                one_samples[cur_one] = num_superblock as u64;

                cur_one += 1;
                threshold_one += STRIDE;
            }

            if total_zeros >= threshold_zero {
                let num_superblock =
                    (num_block * Self::BLOCK_DATA_WIDTH) / Self::SUPERBLOCK_DATA_WIDTH;
                zero_samples[cur_zero] = num_superblock as u64;

                cur_zero += 1;
                threshold_zero += STRIDE;
            }
        };

        let num_blocks = bitvector.num_blocks();
        for num_block in 0..num_blocks - 1 {
            let num_ones = bitvector.block_popcount(num_block);
            handle_block(num_block, num_ones, Self::BLOCK_DATA_WIDTH - num_ones);
        }

        // The last block needs special treatment: the unused bits past the
        // vector length would otherwise be counted as zeros.
        let last_block = num_blocks - 1;
        let pad_zeros = num_blocks * Self::BLOCK_DATA_WIDTH - bitvector.len();
        let num_ones = bitvector.block_popcount(last_block);
        handle_block(
            last_block,
            num_ones,
            Self::BLOCK_DATA_WIDTH - num_ones - pad_zeros,
        );

        // One sentinel sample past the end, so the "next sample" of a rank in
        // the last stride exists without a special case.
        let sentinel = (bitvector.num_superblocks() - 1) as u64;
        one_samples[cur_one] = sentinel;
        zero_samples[cur_zero] = sentinel;
    }

    /// Returns the position of the `rank`-th zero, with `rank` starting at 1.
    ///
    /// Returns the vector length if `rank` is zero or exceeds the number of
    /// zeros in the vector.
    #[must_use]
    pub fn select0(&self, rank: usize) -> usize {
        if rank.wrapping_sub(1) >= self.num_zeros {
            return self.bitvector.len();
        }
        self.select::<true>(rank)
    }

    /// Returns the position of the `rank`-th one, with `rank` starting at 1.
    ///
    /// Returns the vector length if `rank` is zero or exceeds the number of
    /// ones in the vector.
    #[must_use]
    pub fn select1(&self, rank: usize) -> usize {
        if rank.wrapping_sub(1) >= self.num_ones {
            return self.bitvector.len();
        }
        self.select::<false>(rank)
    }

    /// The shared select descent. `ZERO` selects which bit value is ranked;
    /// the branches on it are resolved at compile time.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    fn select<const ZERO: bool>(&self, mut rank: usize) -> usize {
        let bitvector = self.bitvector;
        let superblock_ranks = bitvector.superblock_ranks();
        let data = bitvector.data();

        // Step 1: bracket the superblock range with the stored samples.
        let nearest_sample = (rank - 1) / STRIDE;

        let samples = if ZERO {
            &self.zero_samples
        } else {
            &self.one_samples
        };
        let mut num_superblock = samples[nearest_sample] as usize;
        let last_superblock = samples[nearest_sample + 1] as usize;

        // Number of zeros/ones before the start of a superblock. The zero
        // count is derived from the stored one count.
        let superblock_rank = |num_superblock: usize| {
            if ZERO {
                num_superblock * Self::SUPERBLOCK_DATA_WIDTH
                    - superblock_ranks[num_superblock] as usize
            } else {
                superblock_ranks[num_superblock] as usize
            }
        };

        // Step 2: find the superblock containing the rank.
        if BINARY_SEARCH {
            let mut length = last_superblock - num_superblock + 1;
            while length > 1 {
                let half = length / 2;
                length -= half;

                // Prefetch both candidate midpoints of the next iteration:
                // the conditional move below keeps the branch predictor from
                // speculating, so nothing fetches them ahead of time.
                prefetch_read(superblock_ranks.as_ptr().wrapping_add(num_superblock + length / 2));
                prefetch_read(
                    superblock_ranks.as_ptr().wrapping_add(num_superblock + length / 2 + half),
                );

                num_superblock += usize::from(superblock_rank(num_superblock + half) < rank) * half;
            }
        } else {
            while num_superblock < last_superblock && superblock_rank(num_superblock + 1) < rank {
                num_superblock += 1;
            }
        }

        rank -= superblock_rank(num_superblock);

        // Number of zeros/ones from the superblock start to the start of a
        // block, derived from the block header.
        let block_rank = |num_block: usize| {
            let header = (data[num_block * Self::WORDS_PER_BLOCK] & mask_low(BHW)) as usize;
            if ZERO {
                (num_block % Self::BLOCKS_PER_SUPERBLOCK) * Self::BLOCK_DATA_WIDTH - header
            } else {
                header
            }
        };

        // Step 3: find the block within the superblock. The binary search may
        // probe the zeroed pad blocks past the last real block; the linear
        // scan clamps at the last real block instead.
        let mut num_block = num_superblock * Self::BLOCKS_PER_SUPERBLOCK;

        if BINARY_SEARCH {
            let mut length = Self::BLOCKS_PER_SUPERBLOCK;
            while length > 1 {
                let half = length / 2;
                length -= half;

                prefetch_read(
                    data.as_ptr()
                        .wrapping_add((num_block + length / 2) * Self::WORDS_PER_BLOCK),
                );
                prefetch_read(
                    data.as_ptr()
                        .wrapping_add((num_block + length / 2 + half) * Self::WORDS_PER_BLOCK),
                );

                num_block += usize::from(block_rank(num_block + half) < rank) * half;
            }
        } else {
            let last_block = bitvector
                .num_blocks()
                .min((num_superblock + 1) * Self::BLOCKS_PER_SUPERBLOCK)
                - 1;
            while num_block < last_block && block_rank(num_block + 1) < rank {
                num_block += 1;
            }
        }

        rank -= block_rank(num_block);

        // Step 4: walk the words of the block. The first word only
        // contributes its payload bits; for zeros the header region must
        // count as set before complementing.
        let words = &data[num_block * Self::WORDS_PER_BLOCK..];
        let mut num_word = 0;
        loop {
            let word = words[num_word];
            let word_rank = if ZERO && num_word == 0 {
                (word | mask_low(BHW)).count_zeros() as usize
            } else if ZERO {
                word.count_zeros() as usize
            } else if num_word == 0 {
                (word >> BHW).count_ones() as usize
            } else {
                word.count_ones() as usize
            };

            if rank <= word_rank {
                break;
            }

            rank -= word_rank;
            num_word += 1;
        }

        // Step 5: the bit within the word, with the header bits cleared out
        // of (or, for zeros, forced into) the first word.
        let word = words[num_word];
        let bit = if ZERO {
            let word = if num_word == 0 { word | mask_low(BHW) } else { word };
            word_select::select1(!word, rank)
        } else {
            let word = if num_word == 0 { word & !mask_low(BHW) } else { word };
            word_select::select1(word, rank)
        };

        num_block * Self::BLOCK_DATA_WIDTH + num_word * WORD_SIZE + bit - BHW
    }

    /// Returns the heap memory used by the sample tables in bits.
    #[must_use]
    pub fn memory_space(&self) -> usize {
        (self.zero_samples.len() + self.one_samples.len()) * WORD_SIZE
    }
}
