use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ibits::word_select;
use rand::Rng;

mod common;

fn bench_word_select(b: &mut Criterion) {
    let mut rng = common::rng();

    let mut group = b.benchmark_group("word select");

    let sample = |rng: &mut rand::rngs::StdRng| loop {
        let word: u64 = rng.gen();
        if word != 0 {
            let rank = rng.gen_range(1..=word.count_ones() as usize);
            return (word, rank);
        }
    };

    group.bench_function("pdep", |b| {
        b.iter_batched(
            || sample(&mut rng),
            |(word, rank)| black_box(word_select::select1_pdep(word, rank)),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("branchless", |b| {
        b.iter_batched(
            || sample(&mut rng),
            |(word, rank)| black_box(word_select::select1_branchless(word, rank)),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("linear", |b| {
        b.iter_batched(
            || sample(&mut rng),
            |(word, rank)| black_box(word_select::select1_linear(word, rank)),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_word_select);
criterion_main!(benches);
