//! Point mutation during replication.
//!
//! Every base of a copied sequence independently mutates with probability
//! `rate`. A mutation always replaces the base with one of the three *other*
//! bases chosen uniformly, so the realised substitution rate equals the
//! configured one (there is no silent self-substitution).
//!
//! Two sampling strategies produce the same per-base law:
//! - a dense pass drawing one uniform number per base, and
//! - a sparse pass that jumps straight to the next mutated position using
//!   geometrically distributed gaps, which is much cheaper for the low rates
//!   typical of error-prone PCR.
//!
//! Sequences are immutable, so mutation returns a new [`Sequence`]. When no
//! base changed the input's storage is shared instead of copied.

use rand::Rng;
use rand_distr::{Distribution, Geometric};
use serde::{Deserialize, Serialize};

use crate::base::{Nucleotide, Sequence};
use crate::errors::SelexError;

/// At or below this rate [`PointMutator::mutate`] uses geometric skipping.
pub const SPARSE_RATE_THRESHOLD: f64 = 0.1;

/// Uniform per-base substitution model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMutator {
    rate: f64,
}

impl PointMutator {
    /// Create a mutator with the given per-base substitution probability.
    ///
    /// # Errors
    /// `InvalidConfiguration` unless `0.0 <= rate <= 1.0`.
    pub fn new(rate: f64) -> Result<Self, SelexError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(SelexError::invalid(
                "mutation_rate",
                rate,
                "must be between 0.0 and 1.0",
            ));
        }
        Ok(Self { rate })
    }

    /// A mutator that never changes anything.
    pub fn identity() -> Self {
        Self { rate: 0.0 }
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Replace `base` with one of the other three bases, uniformly.
    #[inline]
    pub fn substitute<R: Rng + ?Sized>(base: Nucleotide, rng: &mut R) -> Nucleotide {
        base.others()[rng.random_range(0..3)]
    }

    /// Mutate a single base with probability `rate`.
    #[inline]
    pub fn mutate_base<R: Rng + ?Sized>(&self, base: Nucleotide, rng: &mut R) -> Nucleotide {
        if rng.random::<f64>() < self.rate {
            Self::substitute(base, rng)
        } else {
            base
        }
    }

    /// Return a mutated copy of `sequence`. Length is preserved exactly.
    pub fn mutate<R: Rng + ?Sized>(&self, sequence: &Sequence, rng: &mut R) -> Sequence {
        self.mutate_counted(sequence, rng).0
    }

    /// Like [`mutate`](Self::mutate) but also returns the number of
    /// substituted positions.
    pub fn mutate_counted<R: Rng + ?Sized>(
        &self,
        sequence: &Sequence,
        rng: &mut R,
    ) -> (Sequence, usize) {
        if self.rate == 0.0 || sequence.is_empty() {
            return (sequence.clone(), 0);
        }

        let mut bases = sequence.to_vec();
        let count = if self.rate <= SPARSE_RATE_THRESHOLD {
            self.mutate_bases_sparse(&mut bases, rng)
        } else {
            self.mutate_bases(&mut bases, rng)
        };

        if count == 0 {
            (sequence.clone(), 0)
        } else {
            (Sequence::from_nucleotides(bases), count)
        }
    }

    /// Dense pass: one Bernoulli trial per base. Returns the mutation count.
    pub fn mutate_bases<R: Rng + ?Sized>(&self, bases: &mut [Nucleotide], rng: &mut R) -> usize {
        let mut count = 0;
        for slot in bases.iter_mut() {
            if rng.random::<f64>() < self.rate {
                *slot = Self::substitute(*slot, rng);
                count += 1;
            }
        }
        count
    }

    /// Sparse pass: skip over non-mutating bases with Geometric(rate) gaps.
    ///
    /// The gap before the next mutated base is the number of failures before
    /// the first success of a Bernoulli(rate) process, which is exactly what
    /// the dense pass would observe. Falls back to the dense pass for rates
    /// the geometric sampler rejects.
    pub fn mutate_bases_sparse<R: Rng + ?Sized>(
        &self,
        bases: &mut [Nucleotide],
        rng: &mut R,
    ) -> usize {
        if self.rate <= 0.0 {
            return 0;
        }
        let geometric = match Geometric::new(self.rate) {
            Ok(g) => g,
            Err(_) => return self.mutate_bases(bases, rng),
        };

        let len = bases.len();
        let mut count = 0;
        let mut pos = 0usize;
        loop {
            let skip = usize::try_from(geometric.sample(rng)).unwrap_or(usize::MAX);
            pos = pos.saturating_add(skip);
            if pos >= len {
                break;
            }
            bases[pos] = Self::substitute(bases[pos], rng);
            count += 1;
            pos += 1;
        }
        count
    }
}
