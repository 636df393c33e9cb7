#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! This crate provides a compact bit vector that answers access, rank and
//! select queries in (near) constant time, built for vectors of up to 2^64
//! bits with small metadata overhead and cache-friendly query paths.
//!
//! # Data structures
//! - [Bit-Vector][BitVec] with no overhead, the degenerate unindexed case.
//! - [Rank-combined Bit-Vector][InterleavedBitVec]: per-block rank headers
//!   interleaved with the bit payload plus a per-superblock rank table,
//!   answering rank in constant time at ~3-4% space overhead.
//! - [Sampled select index][SampledSelect] over a rank-combined vector,
//!   answering select via a sample → superblock → block → word descent at
//!   ~0.2% additional overhead.
//! - [Naive rank and select][naive] structures that precompute every answer,
//!   used as test oracles.
//!
//! Unlike append-based succinct vectors, the rank-combined vector is created
//! at its final length and mutated in place; a single linear [finalize]
//! pass then computes all rank metadata. The select index is built from the
//! finalized vector in one more linear pass. Queries never allocate.
//!
//! ```rust
//! use ibits::{InterleavedBitVec, SampledSelect};
//!
//! let mut bits = InterleavedBitVec::<512, 14>::new(1000).unwrap();
//! bits.set(2);
//! bits.set(3);
//! bits.set(999);
//! bits.finalize();
//! assert_eq!(bits.rank1(4), 2);
//!
//! let select: SampledSelect = SampledSelect::new(&bits, bits.num_ones()).unwrap();
//! assert_eq!(select.select1(3), 999);
//! assert_eq!(select.select0(1), 0);
//! ```
//!
//! # Intrinsics
//! The query paths use compiler intrinsics for bit manipulation where the
//! target supports them: `popcnt` for all rank arithmetic, `pdep` for the
//! final word-select step, and prefetch instructions in the branchless binary
//! searches. The crate compiles everywhere, falling back to portable
//! implementations; enabling the ``popcnt`` and ``BMI2`` target features on
//! ``x86_64`` is strongly recommended.
//!
//! # Thread safety
//! Mutation, finalize and index construction require exclusive access.
//! Afterwards all queries are pure reads, so the structures can be shared
//! across threads without synchronisation.
//!
//! [finalize]: InterleavedBitVec::finalize

pub use bit_vec::interleaved::{InterleavedBitVec, SampledSelect};
pub use bit_vec::{BitAccess, BitVec};
pub use buffer::{AllocationError, FixedBuffer};

pub mod bit_vec;
pub mod buffer;
pub mod naive;
pub mod word_select;

pub(crate) mod util;
