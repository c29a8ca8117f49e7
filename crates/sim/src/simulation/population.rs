//! The aptamer pool carried between rounds.

use rayon::prelude::*;

use super::diversity;
use crate::base::{Aptamer, ScoredAptamer};
use crate::evolution::AffinityScorer;

/// An ordered pool of aptamers at a given round.
///
/// Duplicates are meaningful: the number of identical sequences is the copy
/// number of that molecule in the pool. Order matters only for tie-breaking
/// during selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    aptamers: Vec<Aptamer>,
    round: usize,
}

impl Population {
    pub fn new(aptamers: Vec<Aptamer>, round: usize) -> Self {
        Self { aptamers, round }
    }

    /// Round this pool was produced in (0 for the initial library).
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn size(&self) -> usize {
        self.aptamers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aptamers.is_empty()
    }

    pub fn aptamers(&self) -> &[Aptamer] {
        &self.aptamers
    }

    pub fn into_aptamers(self) -> Vec<Aptamer> {
        self.aptamers
    }

    pub fn get(&self, index: usize) -> Option<&Aptamer> {
        self.aptamers.get(index)
    }

    pub fn unique_count(&self) -> usize {
        diversity::unique_count(&self.aptamers)
    }

    /// Mean GC content; 0.0 for an empty pool.
    pub fn mean_gc(&self) -> f64 {
        if self.aptamers.is_empty() {
            return 0.0;
        }
        self.aptamers.iter().map(Aptamer::gc_content).sum::<f64>() / self.aptamers.len() as f64
    }

    /// Score every member in parallel. The result is in population order.
    pub fn score<S: AffinityScorer + ?Sized>(&self, scorer: &S) -> Vec<ScoredAptamer> {
        self.aptamers
            .par_iter()
            .map(|aptamer| ScoredAptamer::new(aptamer.clone(), scorer.score_aptamer(aptamer)))
            .collect()
    }

    /// The `k` best distinct sequences, best first.
    ///
    /// Copies of one sequence score identically, so only the first occurrence
    /// is kept. Ties keep population order.
    pub fn top<S: AffinityScorer + ?Sized>(&self, scorer: &S, k: usize) -> Vec<ScoredAptamer> {
        let mut scored = self.score(scorer);
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        let mut seen = std::collections::HashSet::new();
        scored
            .into_iter()
            .filter(|s| seen.insert(s.aptamer.sequence().clone()))
            .take(k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{AffinityScore, Sequence};

    /// Scores by number of G bases.
    struct CountG;

    impl AffinityScorer for CountG {
        fn score(&self, sequence: &Sequence) -> AffinityScore {
            AffinityScore::new(sequence.iter().filter(|b| *b == crate::base::Nucleotide::G).count() as f64)
        }
    }

    fn population(seqs: &[&str]) -> Population {
        Population::new(seqs.iter().map(|s| s.parse().unwrap()).collect(), 0)
    }

    #[test]
    fn test_population_basics() {
        let pop = population(&["AAAA", "GGGG", "AAAA"]);
        assert_eq!(pop.size(), 3);
        assert_eq!(pop.unique_count(), 2);
        assert_eq!(pop.round(), 0);
        assert!(!pop.is_empty());
        assert!((pop.mean_gc() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_preserves_order() {
        let pop = population(&["GAAA", "GGGG", "AAAA", "GGAA"]);
        let scores: Vec<f64> = pop.score(&CountG).iter().map(|s| s.score.get()).collect();
        assert_eq!(scores, vec![1.0, 4.0, 0.0, 2.0]);
    }

    #[test]
    fn test_top_distinct_best_first() {
        let pop = population(&["GAAA", "GGGG", "GGGG", "AAAA", "GGAA"]);
        let top: Vec<String> = pop.top(&CountG, 3).iter().map(|s| s.aptamer.to_string()).collect();
        assert_eq!(top, vec!["GGGG", "GGAA", "GAAA"]);
    }

    #[test]
    fn test_empty_population() {
        let pop = Population::default();
        assert!(pop.is_empty());
        assert_eq!(pop.mean_gc(), 0.0);
        assert!(pop.score(&CountG).is_empty());
        assert!(pop.top(&CountG, 5).is_empty());
    }
}
