use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ibits::SampledSelect;
use rand::distributions::{Distribution, Uniform};

mod common;

fn bench_select(b: &mut Criterion) {
    let mut rng = common::rng();

    let mut group = b.benchmark_group("select");
    for l in common::SIZES {
        let bit_vec = common::construct_random_vec(&mut rng, l);

        let binary: SampledSelect = SampledSelect::new(&bit_vec, bit_vec.num_ones()).unwrap();
        let linear: SampledSelect<512, 14, 32768, false> =
            SampledSelect::new(&bit_vec, bit_vec.num_ones()).unwrap();

        let ones = Uniform::new_inclusive(1, bit_vec.num_ones());
        let zeros = Uniform::new_inclusive(1, bit_vec.len() - bit_vec.num_ones());

        group.bench_with_input(BenchmarkId::new("select1 binary", l), &l, |b, _| {
            b.iter_batched(
                || ones.sample(&mut rng),
                |e| black_box(binary.select1(e)),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("select0 binary", l), &l, |b, _| {
            b.iter_batched(
                || zeros.sample(&mut rng),
                |e| black_box(binary.select0(e)),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("select1 linear", l), &l, |b, _| {
            b.iter_batched(
                || ones.sample(&mut rng),
                |e| black_box(linear.select1(e)),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("select0 linear", l), &l, |b, _| {
            b.iter_batched(
                || zeros.sample(&mut rng),
                |e| black_box(linear.select0(e)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
