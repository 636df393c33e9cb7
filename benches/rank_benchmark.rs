use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::distributions::{Distribution, Uniform};

mod common;

fn bench_rank(b: &mut Criterion) {
    let mut rng = common::rng();

    let mut group = b.benchmark_group("rank");
    for l in common::SIZES {
        let bit_vec = common::construct_random_vec(&mut rng, l);
        let sample = Uniform::new(0, bit_vec.len());

        group.bench_with_input(BenchmarkId::new("rank1", l), &l, |b, _| {
            b.iter_batched(
                || sample.sample(&mut rng),
                |e| black_box(bit_vec.rank1(e)),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("rank0", l), &l, |b, _| {
            b.iter_batched(
                || sample.sample(&mut rng),
                |e| black_box(bit_vec.rank0(e)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
