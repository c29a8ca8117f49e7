//! PCR-style amplification with mutation.
//!
//! Survivors of selection are replicated back up to the full library size.
//! Every copy passes through the [`PointMutator`], so frequently copied
//! templates dominate the pool while replication errors keep injecting new
//! variants.
//!
//! Two ways of choosing templates are offered:
//! - [`AmplificationMode::Balanced`] (default): each survivor is copied
//!   `target / n` times and the `target % n` leftover slots go to distinct
//!   survivors drawn uniformly. Copy numbers differ by at most one, and a pool
//!   amplified to its own size comes back as the same multiset.
//! - [`AmplificationMode::Resample`]: every slot draws a template uniformly
//!   with replacement. Same expected copy numbers, more drift.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::PointMutator;
use crate::base::Aptamer;
use crate::errors::SelexError;

/// Template choice strategy during amplification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmplificationMode {
    /// Even copy numbers, remainder sampled without replacement.
    #[default]
    Balanced,
    /// Uniform sampling with replacement for every slot.
    Resample,
}

/// Replicates a selected sub-population back to a fixed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplifier {
    mutator: PointMutator,
    mode: AmplificationMode,
}

impl Amplifier {
    pub fn new(mutator: PointMutator, mode: AmplificationMode) -> Self {
        Self { mutator, mode }
    }

    pub fn mutator(&self) -> &PointMutator {
        &self.mutator
    }

    pub fn mode(&self) -> AmplificationMode {
        self.mode
    }

    /// Amplify `selected` to exactly `target_size` members.
    ///
    /// # Errors
    /// `EmptyPopulation` when there is nothing to copy from.
    pub fn amplify<R: Rng + ?Sized>(
        &self,
        selected: &[Aptamer],
        target_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Aptamer>, SelexError> {
        self.amplify_with_stats(selected, target_size, rng)
            .map(|(pool, _)| pool)
    }

    /// Like [`amplify`](Self::amplify), also returning the total number of
    /// substitutions introduced across all copies.
    pub fn amplify_with_stats<R: Rng + ?Sized>(
        &self,
        selected: &[Aptamer],
        target_size: usize,
        rng: &mut R,
    ) -> Result<(Vec<Aptamer>, usize), SelexError> {
        if selected.is_empty() {
            return Err(SelexError::EmptyPopulation { round: None });
        }
        let templates = self.template_indices(selected.len(), target_size, rng);
        Ok(self.replicate(selected, &templates, rng))
    }

    /// Indices into the selected pool, one per output slot.
    ///
    /// `survivors` must be non-zero.
    pub fn template_indices<R: Rng + ?Sized>(
        &self,
        survivors: usize,
        target_size: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        match self.mode {
            AmplificationMode::Resample => (0..target_size)
                .map(|_| rng.random_range(0..survivors))
                .collect(),
            AmplificationMode::Balanced => {
                let copies = target_size / survivors;
                let remainder = target_size % survivors;

                let mut indices = Vec::with_capacity(target_size);
                for _ in 0..copies {
                    indices.extend(0..survivors);
                }
                if remainder > 0 {
                    let mut extra = index::sample(rng, survivors, remainder).into_vec();
                    extra.sort_unstable();
                    indices.extend(extra);
                }
                indices
            }
        }
    }

    /// Copy each template, mutating in parallel with one independent stream
    /// per copy. Seeds come from `rng` in slot order, so the result does not
    /// depend on the number of worker threads.
    fn replicate<R: Rng + ?Sized>(
        &self,
        selected: &[Aptamer],
        templates: &[usize],
        rng: &mut R,
    ) -> (Vec<Aptamer>, usize) {
        if self.mutator.rate() == 0.0 {
            let pool = templates.iter().map(|&i| selected[i].clone()).collect();
            return (pool, 0);
        }

        let seeds: Vec<u64> = (0..templates.len()).map(|_| rng.random()).collect();

        let copies: Vec<(Aptamer, usize)> = templates
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&i, &seed)| {
                let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                let template = &selected[i];
                let (sequence, count) = self.mutator.mutate_counted(template.sequence(), &mut local_rng);
                if count == 0 {
                    (template.clone(), 0)
                } else {
                    (Aptamer::new(sequence), count)
                }
            })
            .collect();

        let mutations = copies.iter().map(|(_, count)| count).sum();
        let pool = copies.into_iter().map(|(aptamer, _)| aptamer).collect();
        (pool, mutations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn aptamers(seqs: &[&str]) -> Vec<Aptamer> {
        seqs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn counts(pool: &[Aptamer]) -> HashMap<String, usize> {
        let mut map = HashMap::new();
        for apt in pool {
            *map.entry(apt.to_string()).or_insert(0) += 1;
        }
        map
    }

    #[test]
    fn test_empty_selection_fails() {
        let amplifier = Amplifier::new(PointMutator::identity(), AmplificationMode::Balanced);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let err = amplifier.amplify(&[], 10, &mut rng).unwrap_err();
        assert_eq!(err, SelexError::EmptyPopulation { round: None });
    }

    #[test]
    fn test_amplify_reaches_target_size() {
        let selected = aptamers(&["AAAA", "CCCC", "GGGG"]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        for mode in [AmplificationMode::Balanced, AmplificationMode::Resample] {
            let amplifier = Amplifier::new(PointMutator::new(0.1).unwrap(), mode);
            for target in [1, 2, 3, 10, 100, 101] {
                assert_eq!(amplifier.amplify(&selected, target, &mut rng).unwrap().len(), target);
            }
        }
    }

    #[test]
    fn test_balanced_copy_numbers_even() {
        let selected = aptamers(&["AAAA", "CCCC", "GGGG"]);
        let amplifier = Amplifier::new(PointMutator::identity(), AmplificationMode::Balanced);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

        let pool = amplifier.amplify(&selected, 11, &mut rng).unwrap();
        let copy_numbers = counts(&pool);
        assert_eq!(copy_numbers.len(), 3);
        for &c in copy_numbers.values() {
            assert!(c == 3 || c == 4, "copy numbers {copy_numbers:?}");
        }
    }

    #[test]
    fn test_balanced_same_size_preserves_multiset() {
        let selected = aptamers(&["AAAA", "CCCC", "AAAA", "TTTT"]);
        let amplifier = Amplifier::new(PointMutator::identity(), AmplificationMode::Balanced);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);

        let pool = amplifier.amplify(&selected, selected.len(), &mut rng).unwrap();
        assert_eq!(counts(&pool), counts(&selected));
    }

    #[test]
    fn test_resample_draws_only_from_selected() {
        let selected = aptamers(&["AAAA", "CCCC"]);
        let amplifier = Amplifier::new(PointMutator::identity(), AmplificationMode::Resample);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);

        let pool = amplifier.amplify(&selected, 200, &mut rng).unwrap();
        let copy_numbers = counts(&pool);
        assert_eq!(copy_numbers.len(), 2);
        // Uniform draws: each template gets roughly half the slots
        for &c in copy_numbers.values() {
            assert!(c > 60 && c < 140);
        }
    }

    #[test]
    fn test_mutation_applied_to_copies() {
        let selected = aptamers(&["AAAAAAAAAA"]);
        let amplifier = Amplifier::new(PointMutator::new(1.0).unwrap(), AmplificationMode::Balanced);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);

        let (pool, mutations) = amplifier.amplify_with_stats(&selected, 5, &mut rng).unwrap();
        assert_eq!(mutations, 50);
        for apt in &pool {
            assert!(apt.sequence().iter().all(|b| b != crate::base::Nucleotide::A));
        }
        // Templates are never modified
        assert_eq!(selected[0].to_string(), "AAAAAAAAAA");
    }

    #[test]
    fn test_amplify_deterministic_with_seed() {
        let selected = aptamers(&["ACGTACGTAC", "GGGGCCCCAA", "TTTTAAAACC"]);
        let amplifier = Amplifier::new(PointMutator::new(0.2).unwrap(), AmplificationMode::Resample);

        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(99);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(99);
        assert_eq!(
            amplifier.amplify(&selected, 50, &mut rng1).unwrap(),
            amplifier.amplify(&selected, 50, &mut rng2).unwrap()
        );
    }
}
