//! Property tests for the affinity scorer and the mutator.

use aptevo_sim::base::{Nucleotide, Sequence};
use aptevo_sim::evolution::{AffinityScorer, PointMutator, ScoringConfig, TargetAffinity};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn nucleotide() -> impl Strategy<Value = Nucleotide> {
    prop::sample::select(Nucleotide::ALL.to_vec())
}

fn sequence(max_len: usize) -> impl Strategy<Value = Sequence> {
    prop::collection::vec(nucleotide(), 0..=max_len).prop_map(Sequence::from_nucleotides)
}

fn non_empty_sequence(max_len: usize) -> impl Strategy<Value = Sequence> {
    prop::collection::vec(nucleotide(), 1..=max_len).prop_map(Sequence::from_nucleotides)
}

fn scoring_config() -> impl Strategy<Value = ScoringConfig> {
    (0.01f64..2.0, 0.0f64..1.0, 0.0f64..=1.0).prop_map(|(match_weight, gc_share, target_gc)| {
        ScoringConfig {
            match_weight,
            gc_weight: match_weight * gc_share,
            target_gc,
        }
    })
}

proptest! {
    #[test]
    fn splicing_in_target_never_lowers_score(
        target in non_empty_sequence(40),
        candidate in sequence(60),
        config in scoring_config(),
        start in 0usize..60,
        len in 0usize..60,
    ) {
        let scorer = TargetAffinity::new(target.clone(), config).unwrap();

        let end = (start + len).min(target.len());
        let start = start.min(end);
        let piece: Vec<Nucleotide> = target.as_slice()[start..end].to_vec();
        let spliced = candidate.splice(start, &piece);

        let before = scorer.score(&candidate).get();
        let after = scorer.score(&spliced).get();
        prop_assert!(
            after >= before - 1e-9,
            "score dropped from {} to {} (target {}, candidate {}, spliced {})",
            before, after, target, candidate, spliced
        );
    }

    #[test]
    fn score_is_total_and_bounded(
        target in non_empty_sequence(40),
        candidate in sequence(80),
        config in scoring_config(),
    ) {
        let scorer = TargetAffinity::new(target, config).unwrap();
        let score = scorer.score(&candidate).get();
        prop_assert!(score.is_finite());
        prop_assert!(score >= -1e-12);
        prop_assert!(score <= config.match_weight + config.gc_weight + 1e-12);
    }

    #[test]
    fn score_is_deterministic(target in non_empty_sequence(30), candidate in sequence(30)) {
        let scorer = TargetAffinity::new(target, ScoringConfig::default()).unwrap();
        prop_assert_eq!(scorer.score(&candidate), scorer.score(&candidate));
    }

    #[test]
    fn mutation_preserves_length(candidate in sequence(100), rate in 0.0f64..=1.0, seed in any::<u64>()) {
        let mutator = PointMutator::new(rate).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let (mutated, count) = mutator.mutate_counted(&candidate, &mut rng);
        prop_assert_eq!(mutated.len(), candidate.len());

        let differing = mutated.iter().zip(candidate.iter()).filter(|(a, b)| a != b).count();
        prop_assert_eq!(differing, count);
    }
}
