use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::Aptamer;

/// A binding-affinity score. Higher is better.
///
/// Unlike a plain `f64` the score is totally ordered (via `f64::total_cmp`),
/// so it can be sorted without a fallible comparator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffinityScore(f64);

impl AffinityScore {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the inner f64 value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for AffinityScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AffinityScore {}

impl PartialOrd for AffinityScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AffinityScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for AffinityScore {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<AffinityScore> for f64 {
    fn from(score: AffinityScore) -> Self {
        score.0
    }
}

impl Add for AffinityScore {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for AffinityScore {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for AffinityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*}", precision, self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An aptamer paired with the score it received in one round.
///
/// Built fresh every round and never carried into the next one: survivors are
/// rescored after amplification because their copies may have mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAptamer {
    pub aptamer: Aptamer,
    pub score: AffinityScore,
}

impl ScoredAptamer {
    pub fn new(aptamer: Aptamer, score: AffinityScore) -> Self {
        Self { aptamer, score }
    }
}
