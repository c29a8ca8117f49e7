use aptevo_sim::base::Sequence;
use aptevo_sim::evolution::{
    AffinityScorer, AmplificationMode, Amplifier, PointMutator, ScoringConfig, TargetAffinity,
};
use aptevo_sim::simulation::{GcConstrainedGenerator, GcRange, SelexBuilder, SequenceGenerator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const THROMBIN: &str = "GGTTGGTGTGGTTGG";

fn library(size: usize) -> Vec<aptevo_sim::base::Aptamer> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
    GcConstrainedGenerator
        .generate(30, size, GcRange::default(), &mut rng)
        .unwrap()
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let target: Sequence = THROMBIN.parse().unwrap();
    let scorer = TargetAffinity::new(target, ScoringConfig::default()).unwrap();

    for size in [100, 1000, 10_000] {
        let pool = library(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("target_affinity", size), &pool, |b, pool| {
            b.iter(|| {
                let total: f64 = pool.iter().map(|a| scorer.score(a.sequence()).get()).sum();
                black_box(total)
            })
        });
    }

    group.finish();
}

fn bench_amplification(c: &mut Criterion) {
    let mut group = c.benchmark_group("amplification");
    let survivors = library(100);

    for rate in [0.0, 0.01, 0.05, 0.2] {
        let amplifier = Amplifier::new(PointMutator::new(rate).unwrap(), AmplificationMode::Balanced);
        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(BenchmarkId::new("balanced_1000", rate), &rate, |b, _| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
            b.iter(|| black_box(amplifier.amplify(&survivors, 1000, &mut rng).unwrap()))
        });
    }

    group.finish();
}

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("selex_round");

    for library_size in [1000, 10_000] {
        group.throughput(Throughput::Elements(library_size as u64));
        group.bench_with_input(
            BenchmarkId::new("step", library_size),
            &library_size,
            |b, &library_size| {
                b.iter_batched(
                    || {
                        let mut selex = SelexBuilder::new(THROMBIN)
                            .library_size(library_size)
                            .seed(42)
                            .build()
                            .unwrap();
                        selex.seed().unwrap();
                        selex
                    },
                    |mut selex| {
                        selex.step().unwrap();
                        black_box(selex)
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_amplification, bench_round);
criterion_main!(benches);
