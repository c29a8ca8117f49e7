//! Initial library generation under a GC-content constraint.
//!
//! The engine only seeds its population through the [`SequenceGenerator`]
//! trait, so alternative samplers can be plugged in with
//! [`Selex::with_generator`](crate::simulation::Selex::with_generator).

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::index;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::base::{Aptamer, Nucleotide, Sequence};
use crate::errors::SelexError;
use crate::evolution::PointMutator;

/// Slack applied to both ends of a [`GcRange`] when testing a GC fraction.
pub const GC_TOLERANCE: f64 = 1e-9;

/// Maximum rejected mutants per variant before [`SeedVariantGenerator`] gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Closed interval of allowed GC fractions.
///
/// Serialized as a `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct GcRange {
    pub min: f64,
    pub max: f64,
}

impl GcRange {
    pub fn new(min: f64, max: f64) -> Result<Self, SelexError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Require a non-degenerate sub-interval of [0, 1].
    pub fn validate(&self) -> Result<(), SelexError> {
        let valid = (0.0..=1.0).contains(&self.min)
            && (0.0..=1.0).contains(&self.max)
            && self.min < self.max;
        if !valid {
            return Err(SelexError::invalid(
                "gc_range",
                format!("({}, {})", self.min, self.max),
                "must satisfy 0.0 <= min < max <= 1.0",
            ));
        }
        Ok(())
    }

    /// Whether `fraction` lies in the range, within [`GC_TOLERANCE`].
    pub fn contains(&self, fraction: f64) -> bool {
        fraction >= self.min - GC_TOLERANCE && fraction <= self.max + GC_TOLERANCE
    }

    /// GC counts `k` for which a `length`-base sequence falls in the range.
    pub fn feasible_counts(&self, length: usize) -> Vec<usize> {
        if length == 0 {
            return Vec::new();
        }
        (0..=length)
            .filter(|&k| self.contains(k as f64 / length as f64))
            .collect()
    }

    fn unsatisfiable(&self, length: usize) -> SelexError {
        SelexError::UnsatisfiableConstraint {
            length,
            min: self.min,
            max: self.max,
        }
    }
}

impl Default for GcRange {
    fn default() -> Self {
        Self { min: 0.4, max: 0.6 }
    }
}

impl From<(f64, f64)> for GcRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<GcRange> for (f64, f64) {
    fn from(range: GcRange) -> Self {
        (range.min, range.max)
    }
}

/// Produces a batch of aptamers of fixed length within a GC range.
///
/// Takes `&mut dyn RngCore` so implementations stay object safe and share the
/// engine's seeded stream.
pub trait SequenceGenerator: Send + Sync {
    /// Generate `count` aptamers of exactly `length` bases.
    ///
    /// # Errors
    /// `UnsatisfiableConstraint` when no `length`-base sequence can have a GC
    /// content inside `gc_range`.
    fn generate(
        &self,
        length: usize,
        count: usize,
        gc_range: GcRange,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Aptamer>, SelexError>;
}

impl<T: SequenceGenerator + ?Sized> SequenceGenerator for Box<T> {
    fn generate(
        &self,
        length: usize,
        count: usize,
        gc_range: GcRange,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Aptamer>, SelexError> {
        (**self).generate(length, count, gc_range, rng)
    }
}

/// Uniform sampling conditioned on the GC range.
///
/// Every sequence whose GC fraction lies in the range is equally likely: the
/// GC count `k` is drawn with weight `C(length, k)` among the feasible counts,
/// then `k` positions are chosen uniformly and filled with G/C, the rest with
/// A/T, each base uniformly. No rejection loop is involved, so narrow ranges
/// cost the same as wide ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct GcConstrainedGenerator;

impl GcConstrainedGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draw a single sequence with exactly `gc_count` G/C bases.
    pub fn sequence_with_gc<R: Rng + ?Sized>(length: usize, gc_count: usize, rng: &mut R) -> Sequence {
        let mut bases: Vec<Nucleotide> = (0..length)
            .map(|_| if rng.random::<bool>() { Nucleotide::A } else { Nucleotide::T })
            .collect();
        for pos in index::sample(rng, length, gc_count.min(length)) {
            bases[pos] = if rng.random::<bool>() { Nucleotide::G } else { Nucleotide::C };
        }
        Sequence::from_nucleotides(bases)
    }
}

/// `ln C(n, k)` for every `k` in `0..=n`.
fn ln_binomials(n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n + 1);
    let mut current = 0.0;
    out.push(current);
    for k in 0..n {
        current += ((n - k) as f64).ln() - ((k + 1) as f64).ln();
        out.push(current);
    }
    out
}

impl SequenceGenerator for GcConstrainedGenerator {
    fn generate(
        &self,
        length: usize,
        count: usize,
        gc_range: GcRange,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Aptamer>, SelexError> {
        if length == 0 {
            return Err(SelexError::invalid("seq_length", length, "must be > 0"));
        }
        gc_range.validate()?;

        let feasible = gc_range.feasible_counts(length);
        if feasible.is_empty() {
            return Err(gc_range.unsatisfiable(length));
        }

        let ln_c = ln_binomials(length);
        let peak = feasible
            .iter()
            .map(|&k| ln_c[k])
            .fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = feasible.iter().map(|&k| (ln_c[k] - peak).exp()).collect();
        let gc_counts = WeightedIndex::new(&weights).map_err(|_| gc_range.unsatisfiable(length))?;

        Ok((0..count)
            .map(|_| {
                let k = feasible[gc_counts.sample(rng)];
                Aptamer::new(Self::sequence_with_gc(length, k, rng))
            })
            .collect())
    }
}

/// Variants of a known seed sequence.
///
/// Each variant is the seed passed through a [`PointMutator`]; mutants whose
/// GC content falls outside the range are discarded and redrawn, up to
/// `max_attempts` times per variant.
#[derive(Debug, Clone)]
pub struct SeedVariantGenerator {
    seed: Sequence,
    mutator: PointMutator,
    max_attempts: usize,
}

impl SeedVariantGenerator {
    /// # Errors
    /// `InvalidConfiguration` for an empty seed or a rate outside [0, 1].
    pub fn new(seed: Sequence, rate: f64) -> Result<Self, SelexError> {
        if seed.is_empty() {
            return Err(SelexError::invalid("seed_sequence", "\"\"", "must not be empty"));
        }
        Ok(Self {
            seed,
            mutator: PointMutator::new(rate)?,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn seed(&self) -> &Sequence {
        &self.seed
    }

    pub fn rate(&self) -> f64 {
        self.mutator.rate()
    }
}

impl SequenceGenerator for SeedVariantGenerator {
    fn generate(
        &self,
        length: usize,
        count: usize,
        gc_range: GcRange,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Aptamer>, SelexError> {
        if length != self.seed.len() {
            return Err(SelexError::invalid(
                "seq_length",
                length,
                format!("must equal the seed sequence length ({})", self.seed.len()),
            ));
        }
        gc_range.validate()?;
        if gc_range.feasible_counts(length).is_empty() {
            return Err(gc_range.unsatisfiable(length));
        }

        let mut variants = Vec::with_capacity(count);
        for _ in 0..count {
            let variant = (0..self.max_attempts)
                .map(|_| self.mutator.mutate(&self.seed, rng))
                .find(|candidate| gc_range.contains(candidate.gc_content()))
                .ok_or_else(|| gc_range.unsatisfiable(length))?;
            variants.push(Aptamer::new(variant));
        }
        Ok(variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn range(min: f64, max: f64) -> GcRange {
        GcRange::new(min, max).unwrap()
    }

    #[test]
    fn test_gc_range_validation() {
        assert!(GcRange::new(0.4, 0.6).is_ok());
        assert!(GcRange::new(0.0, 1.0).is_ok());
        assert!(GcRange::new(0.6, 0.4).is_err());
        assert!(GcRange::new(0.5, 0.5).is_err());
        assert!(GcRange::new(-0.1, 0.5).is_err());
        assert!(GcRange::new(0.5, 1.1).is_err());
        assert!(GcRange::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_gc_range_serializes_as_pair() {
        let json = serde_json::to_string(&range(0.4, 0.6)).unwrap();
        assert_eq!(json, "[0.4,0.6]");
        let back: GcRange = serde_json::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(back, range(0.25, 0.75));
    }

    #[test]
    fn test_feasible_counts() {
        assert_eq!(range(0.4, 0.6).feasible_counts(10), vec![4, 5, 6]);
        assert_eq!(range(0.4, 0.6).feasible_counts(30), (12..=18).collect::<Vec<_>>());
        assert!(range(0.4, 0.6).feasible_counts(3).is_empty());
        assert!(range(0.4, 0.6).feasible_counts(0).is_empty());
    }

    #[test]
    fn test_ln_binomials() {
        let ln_c = ln_binomials(5);
        let expected = [1.0, 5.0, 10.0, 10.0, 5.0, 1.0];
        for (got, want) in ln_c.iter().zip(expected) {
            assert!((got.exp() - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_generate_respects_length_and_gc() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let gc = range(0.4, 0.6);
        let library = GcConstrainedGenerator.generate(30, 200, gc, &mut rng).unwrap();

        assert_eq!(library.len(), 200);
        for apt in &library {
            assert_eq!(apt.len(), 30);
            assert!(gc.contains(apt.gc_content()), "gc {}", apt.gc_content());
        }
    }

    #[test]
    fn test_generate_is_diverse() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let library = GcConstrainedGenerator.generate(30, 100, range(0.4, 0.6), &mut rng).unwrap();
        let unique: std::collections::HashSet<_> = library.iter().map(|a| a.sequence().clone()).collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_generate_uses_every_base() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let library = GcConstrainedGenerator.generate(40, 50, range(0.3, 0.7), &mut rng).unwrap();
        let mut seen = [false; 4];
        for apt in &library {
            for base in apt.sequence().iter() {
                seen[base.to_index() as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_generate_unsatisfiable() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let err = GcConstrainedGenerator.generate(3, 5, range(0.4, 0.6), &mut rng).unwrap_err();
        assert!(matches!(err, SelexError::UnsatisfiableConstraint { length: 3, .. }));
    }

    #[test]
    fn test_generate_zero_length_rejected() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let err = GcConstrainedGenerator.generate(0, 5, range(0.4, 0.6), &mut rng).unwrap_err();
        assert!(matches!(err, SelexError::InvalidConfiguration { parameter: "seq_length", .. }));
    }

    #[test]
    fn test_generate_deterministic_with_seed() {
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(7);
        assert_eq!(
            GcConstrainedGenerator.generate(25, 20, range(0.4, 0.6), &mut rng1).unwrap(),
            GcConstrainedGenerator.generate(25, 20, range(0.4, 0.6), &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_sequence_with_gc_exact_count() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        for k in 0..=20 {
            let seq = GcConstrainedGenerator::sequence_with_gc(20, k, &mut rng);
            assert_eq!(seq.gc_count(), k);
        }
    }

    #[test]
    fn test_seed_variants_stay_close_to_seed() {
        let seed: Sequence = "ACGTACGTACGTACGTACGT".parse().unwrap();
        let generator = SeedVariantGenerator::new(seed.clone(), 0.1).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);

        let variants = generator.generate(20, 50, range(0.3, 0.7), &mut rng).unwrap();
        assert_eq!(variants.len(), 50);
        for v in &variants {
            assert_eq!(v.len(), 20);
            assert!(range(0.3, 0.7).contains(v.gc_content()));
            let diffs = v.sequence().iter().zip(seed.iter()).filter(|(a, b)| a != b).count();
            assert!(diffs <= 12);
        }
    }

    #[test]
    fn test_seed_variants_length_mismatch() {
        let generator = SeedVariantGenerator::new("ACGTACGT".parse().unwrap(), 0.1).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(generator.generate(10, 5, range(0.3, 0.7), &mut rng).is_err());
    }

    #[test]
    fn test_seed_variants_give_up() {
        // An all-A seed never mutates at rate 0, so GC stays 0
        let generator = SeedVariantGenerator::new(Sequence::uniform(Nucleotide::A, 10), 0.0)
            .unwrap()
            .with_max_attempts(5);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let err = generator.generate(10, 1, range(0.4, 0.6), &mut rng).unwrap_err();
        assert!(matches!(err, SelexError::UnsatisfiableConstraint { .. }));
    }
}
