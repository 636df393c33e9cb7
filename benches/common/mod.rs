#![allow(dead_code)]

use ibits::InterleavedBitVec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bit vector sizes the query benchmarks sweep over.
pub const SIZES: [usize; 5] = [1 << 10, 1 << 14, 1 << 18, 1 << 20, 1 << 22];

pub fn construct_random_vec(rng: &mut StdRng, len: usize) -> InterleavedBitVec {
    let mut bit_vec = InterleavedBitVec::<512, 14>::new(len).expect("allocation failed");
    for pos in 0..len {
        bit_vec.set_to(pos, rng.gen_bool(0.5));
    }
    bit_vec.finalize();

    bit_vec
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}
