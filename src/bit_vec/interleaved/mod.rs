//! A succinct bit vector whose rank metadata is interleaved with the bit
//! payload. Rank computes in constant time; the [sampled select
//! index][SampledSelect] built on top answers select in constant time on
//! average with a logarithmic worst case.
//!
//! The bits are grouped into blocks of `BW` bits, of which the first `BHW`
//! bits of the first word hold the block header: the number of ones from the
//! start of the enclosing superblock up to the start of the block. Blocks are
//! grouped into superblocks of `2^BHW` bits, and a separate table stores the
//! total number of ones up to each superblock as a full 64-bit count:
//!
//! ```text
//! ┌────────┬───────────────┬────────┬───────────────┬───┬────────┬──────────┐
//! │ header │     bits      │ header │     bits      │...│ header │   bits   │
//! └────────┴───────────────┴────────┴───────────────┴───┴────────┴──────────┘
//!  ^^^^^^^^ BHW bits wide
//!           ^^^^^^^^^^^^^^^ BW - BHW bits wide
//! ```
//!
//! Interleaving the headers with the payload is what keeps rank queries fast:
//! with 512-bit blocks a query touches one superblock-table word and a single
//! cache line holding both the block header and the bits. The overhead on top
//! of the raw bits is `BHW / (BW - BHW) + 64 / 2^BHW`, about 3.2% for the
//! default parameters.

use crate::buffer::{AllocationError, FixedBuffer};
use crate::util::mask_low;

use super::{BitAccess, WORD_SIZE};

mod select;

pub use select::SampledSelect;


/// A bit vector with constant-time rank support, parameterised by the block
/// width `BW` and the block header width `BHW` in bits.
///
/// The vector is constructed at its final length, mutated bit by bit, and then
/// *finalized*: a single linear pass that computes all block headers and
/// superblock ranks. Rank queries are only meaningful after the finalize pass;
/// [`is_set`] works at any time. Mutating the vector again invalidates the
/// rank data until the next [`finalize`] call.
///
/// The parameters are compile-time constants so the shift and mask distances
/// inline into the query paths. They must satisfy: `BW` a multiple of 64 and
/// greater than 64, `BHW` at most 64, and `2^BHW` greater than and divisible
/// by `BW`. Violations are rejected when a constructor is instantiated.
///
/// # Example
/// ```rust
/// use ibits::InterleavedBitVec;
///
/// let mut bits = InterleavedBitVec::<512, 14>::new(130).unwrap();
/// bits.set(0);
/// bits.set(64);
/// bits.set(129);
/// bits.finalize();
///
/// assert_eq!(bits.rank1(65), 2);
/// assert_eq!(bits.rank0(130), 127);
/// assert!(bits.is_set(129));
/// ```
///
/// [`is_set`]: InterleavedBitVec::is_set
/// [`finalize`]: InterleavedBitVec::finalize
#[derive(Debug)]
pub struct InterleavedBitVec<const BW: usize = 512, const BHW: usize = 14> {
    length: usize,
    num_blocks: usize,
    num_superblocks: usize,
    num_ones: usize,
    data: FixedBuffer<u64>,
    superblock_ranks: FixedBuffer<u64>,
}

impl<const BW: usize, const BHW: usize> InterleavedBitVec<BW, BHW> {
    /// The width of a block in bits, including its header.
    pub const BLOCK_WIDTH: usize = BW;

    /// The width of the rank header stored in the first word of each block.
    pub const BLOCK_HEADER_WIDTH: usize = BHW;

    /// The number of payload bits in a block.
    pub const BLOCK_DATA_WIDTH: usize = BW - BHW;

    /// The number of payload bits in the first word of a block.
    pub const HEADER_DATA_WIDTH: usize = WORD_SIZE - BHW;

    /// The number of words a block occupies.
    pub const WORDS_PER_BLOCK: usize = BW / WORD_SIZE;

    /// The width of a superblock in bits. Superblocks exist so block headers
    /// only need to count ones relative to the superblock start, which is
    /// what lets a header fit into `BHW` bits.
    pub const SUPERBLOCK_WIDTH: usize = 1 << BHW;

    /// The number of blocks a superblock spans.
    pub const BLOCKS_PER_SUPERBLOCK: usize = Self::SUPERBLOCK_WIDTH / BW;

    /// The number of words a superblock spans.
    pub const WORDS_PER_SUPERBLOCK: usize = Self::SUPERBLOCK_WIDTH / WORD_SIZE;

    /// The number of payload bits a superblock spans.
    pub const SUPERBLOCK_DATA_WIDTH: usize =
        Self::SUPERBLOCK_WIDTH - Self::BLOCKS_PER_SUPERBLOCK * BHW;

    // Evaluated when a constructor is monomorphised, turning invalid
    // parameter combinations into compile errors.
    const PARAMS_VALID: () = {
        assert!(BW % WORD_SIZE == 0, "block width must be a multiple of the word width");
        assert!(BW > WORD_SIZE, "blocks must span more than one word");
        assert!(BHW <= WORD_SIZE, "the block header must fit into one word");
        assert!((1 << BHW) > BW, "superblocks must be wider than blocks");
        assert!((1 << BHW) % BW == 0, "superblocks must hold a whole number of blocks");
    };

    /// Creates a bit vector of the given length with all bits set to zero and
    /// no rank data. Call [`finalize`] after mutating to enable rank queries.
    ///
    /// The allocation is padded with one superblock of zeroed blocks past the
    /// last real block, so the select descent can probe block headers without
    /// bounds checks.
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the host cannot satisfy the request.
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    pub fn new(length: usize) -> Result<Self, AllocationError> {
        let () = Self::PARAMS_VALID;

        let num_blocks = length.div_ceil(Self::BLOCK_DATA_WIDTH);
        let num_superblocks = length.div_ceil(Self::SUPERBLOCK_DATA_WIDTH);

        let num_words = (num_blocks + Self::BLOCKS_PER_SUPERBLOCK) * Self::WORDS_PER_BLOCK;

        Ok(Self {
            length,
            num_blocks,
            num_superblocks,
            num_ones: 0,
            data: FixedBuffer::new(num_words)?,
            superblock_ranks: FixedBuffer::new(num_superblocks)?,
        })
    }

    /// Creates a finalized bit vector of the given length with all bits set
    /// to zero.
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the host cannot satisfy the request.
    pub fn from_zeros(length: usize) -> Result<Self, AllocationError> {
        let mut vec = Self::new(length)?;
        vec.finalize();
        Ok(vec)
    }

    /// Creates a finalized bit vector of the given length with all bits set
    /// to one.
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the host cannot satisfy the request.
    pub fn from_ones(length: usize) -> Result<Self, AllocationError> {
        let mut vec = Self::new(length)?;
        for pos in 0..length {
            vec.set(pos);
        }
        vec.finalize();
        Ok(vec)
    }

    /// Maps a logical bit position to its word index in the data buffer and
    /// the bit offset within that word, skipping over the block headers.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    fn bit_location(pos: usize) -> (usize, usize) {
        let num_block = pos / Self::BLOCK_DATA_WIDTH;
        let block_pos = pos % Self::BLOCK_DATA_WIDTH + BHW;
        (
            num_block * Self::WORDS_PER_BLOCK + block_pos / WORD_SIZE,
            block_pos % WORD_SIZE,
        )
    }

    /// Sets the bit at the given position to one. Does not update the rank
    /// data; call [`finalize`] before the next rank query.
    ///
    /// # Panics
    /// May panic in debug builds if the position is out of bounds.
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[inline]
    pub fn set(&mut self, pos: usize) {
        debug_assert!(pos < self.length, "position out of bounds");
        let (num_word, word_pos) = Self::bit_location(pos);
        self.data[num_word] |= 1 << word_pos;
    }

    /// Sets the bit at the given position to zero. Does not update the rank
    /// data; call [`finalize`] before the next rank query.
    ///
    /// # Panics
    /// May panic in debug builds if the position is out of bounds.
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[inline]
    pub fn unset(&mut self, pos: usize) {
        debug_assert!(pos < self.length, "position out of bounds");
        let (num_word, word_pos) = Self::bit_location(pos);
        self.data[num_word] &= !(1 << word_pos);
    }

    /// Sets the bit at the given position to the given value, without a
    /// branch on the value. Does not update the rank data; call [`finalize`]
    /// before the next rank query.
    ///
    /// # Panics
    /// May panic in debug builds if the position is out of bounds.
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[inline]
    pub fn set_to(&mut self, pos: usize, value: bool) {
        debug_assert!(pos < self.length, "position out of bounds");
        let (num_word, word_pos) = Self::bit_location(pos);
        let mask = 1 << word_pos;
        let word = &mut self.data[num_word];
        *word = (*word & !mask) | ((value as u64).wrapping_neg() & mask);
    }

    /// Returns whether the bit at the given position is set. Valid before and
    /// after [`finalize`], which never moves payload bits.
    ///
    /// # Panics
    /// May panic in debug builds if the position is out of bounds.
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[must_use]
    #[inline]
    pub fn is_set(&self, pos: usize) -> bool {
        debug_assert!(pos < self.length, "position out of bounds");
        let (num_word, word_pos) = Self::bit_location(pos);
        (self.data[num_word] >> word_pos) & 1 == 1
    }

    /// Recomputes all block headers and superblock ranks from the payload
    /// bits in a single linear pass, making rank queries reflect all
    /// mutations since construction or the previous finalize.
    pub fn finalize(&mut self) {
        let num_words = self.num_blocks * Self::WORDS_PER_BLOCK;

        // Walking block by block instead of bit by bit keeps this pass at one
        // popcount per word.
        let mut cur_rank: u64 = 0;
        let mut cur_block_rank: u64 = 0;
        let mut cur_superblock = 0;

        let mut i = 0;
        while i < num_words {
            if i % Self::WORDS_PER_SUPERBLOCK == 0 {
                cur_rank += cur_block_rank;
                self.superblock_ranks[cur_superblock] = cur_rank;

                cur_superblock += 1;
                cur_block_rank = 0;
            }

            self.data[i] = (self.data[i] & !mask_low(BHW)) | cur_block_rank;
            cur_block_rank += self.block_popcount_at(i);

            i += Self::WORDS_PER_BLOCK;
        }

        self.num_ones = (cur_rank + cur_block_rank) as usize;

        // The pad blocks keep the running rank in their headers so the
        // block-level binary search stays monotone within the last partially
        // filled superblock; pads that begin a fresh superblock reset to 0.
        while i < self.data.len() {
            if i % Self::WORDS_PER_SUPERBLOCK == 0 {
                cur_block_rank = 0;
            }

            self.data[i] = cur_block_rank;
            i += Self::WORDS_PER_BLOCK;
        }
    }

    /// Returns the number of zeros up to (excluding) the given position.
    /// Positions beyond the length report the total number of zeros.
    ///
    /// Only meaningful after [`finalize`].
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[must_use]
    pub fn rank0(&self, pos: usize) -> usize {
        // Derived from the one-rank instead of stored, which costs nothing on
        // the query path and halves the metadata.
        pos.min(self.length) - self.rank1(pos)
    }

    /// Returns the number of ones up to (excluding) the given position.
    /// Positions beyond the length report the total number of ones.
    ///
    /// Only meaningful after [`finalize`].
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[must_use]
    pub fn rank1(&self, pos: usize) -> usize {
        if pos >= self.length {
            return self.num_ones;
        }

        // Step 1: locate the block, the word within the block, and the bit
        // within the word, with the header offset folded in.
        let num_block = pos / Self::BLOCK_DATA_WIDTH;
        let block_pos = pos % Self::BLOCK_DATA_WIDTH + BHW;

        let num_word = block_pos / WORD_SIZE;
        let word_pos = block_pos % WORD_SIZE;

        // Step 2: the ones up to the enclosing superblock, stored explicitly.
        let num_superblock = pos / Self::SUPERBLOCK_DATA_WIDTH;
        let mut rank = self.superblock_ranks[num_superblock];

        // Step 3: the ones from the superblock start up to the block, stored
        // in the low bits of the block's first word.
        let words = &self.data[num_block * Self::WORDS_PER_BLOCK..];
        let first_word = words[0];
        rank += first_word & mask_low(BHW);

        if num_word == 0 {
            // Step 4a: count the payload bits of the first word below the
            // queried position. The unbounded shift folds the case of a
            // query at the block start to a zero contribution.
            let shift = (WORD_SIZE + BHW - block_pos) as u32;
            rank += u64::from((first_word >> BHW).unbounded_shl(shift).count_ones());
        } else {
            // Step 4b: all payload bits of the first word, ...
            rank += u64::from((first_word >> BHW).count_ones());

            // ... the full words in between, ...
            for &word in &words[1..num_word] {
                rank += u64::from(word.count_ones());
            }

            // ... and the bits of the last word below the queried position,
            // again with the word-aligned case folded to zero by the shift.
            let shift = (WORD_SIZE - word_pos) as u32;
            rank += u64::from(words[num_word].unbounded_shl(shift).count_ones());
        }

        rank as usize
    }

    /// Returns the number of ones within the payload of the given block.
    #[must_use]
    #[inline]
    pub fn block_popcount(&self, num_block: usize) -> usize {
        self.block_popcount_at(num_block * Self::WORDS_PER_BLOCK) as usize
    }

    /// Returns the number of ones within the payload of the block starting at
    /// the given word, masking the header out of the first word.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    fn block_popcount_at(&self, num_word: usize) -> u64 {
        let words = &self.data[num_word..num_word + Self::WORDS_PER_BLOCK];

        let mut popcount = u64::from((words[0] >> BHW).count_ones());
        for &word in &words[1..] {
            popcount += u64::from(word.count_ones());
        }

        popcount
    }

    /// Returns the number of bits the vector contains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns whether the vector contains no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of ones in the vector, as recorded by the last
    /// [`finalize`] pass.
    ///
    /// [`finalize`]: InterleavedBitVec::finalize
    #[must_use]
    pub fn num_ones(&self) -> usize {
        self.num_ones
    }

    /// Returns the number of blocks holding payload bits, excluding the pad
    /// blocks.
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Returns the number of superblocks.
    #[must_use]
    pub fn num_superblocks(&self) -> usize {
        self.num_superblocks
    }

    /// Returns the words holding the interleaved block headers and payload
    /// bits, including the pad blocks.
    #[must_use]
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Returns the per-superblock table of ones up to each superblock.
    #[must_use]
    pub fn superblock_ranks(&self) -> &[u64] {
        &self.superblock_ranks
    }

    /// Returns the heap memory used by this vector in bits, including the
    /// rank metadata and padding.
    #[must_use]
    pub fn memory_space(&self) -> usize {
        (self.data.len() + self.superblock_ranks.len()) * WORD_SIZE
    }
}

impl<const BW: usize, const BHW: usize> BitAccess for InterleavedBitVec<BW, BHW> {
    fn len(&self) -> usize {
        self.length
    }

    fn is_set(&self, pos: usize) -> bool {
        InterleavedBitVec::is_set(self, pos)
    }
}
