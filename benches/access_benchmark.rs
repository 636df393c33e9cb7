use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::distributions::{Distribution, Uniform};

mod common;

fn bench_access(b: &mut Criterion) {
    let mut rng = common::rng();

    let mut group = b.benchmark_group("access");
    for l in common::SIZES {
        let bit_vec = common::construct_random_vec(&mut rng, l);
        let sample = Uniform::new(0, bit_vec.len());

        group.bench_with_input(BenchmarkId::new("is_set", l), &l, |b, _| {
            b.iter_batched(
                || sample.sample(&mut rng),
                |e| black_box(bit_vec.is_set(e)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_access);
criterion_main!(benches);
