//! Affinity scoring against a fixed target.
//!
//! Binding affinity here is a heuristic proxy, not a physical prediction. The
//! default scorer, [`TargetAffinity`], combines two terms:
//!
//! - **Match**: the number of positions where the candidate agrees with the
//!   target when both are aligned at their 5' ends, divided by the target
//!   length. Candidates shorter or longer than the target are compared over
//!   the overlapping prefix only.
//! - **GC closeness**: `1 - |gc_count - target_gc * len| / max(len, target_len)`.
//!   For candidates at least as long as the target this is exactly
//!   `1 - |gc_content - target_gc|`.
//!
//! `score = match_weight * match + gc_weight * gc_closeness`
//!
//! Changing one base moves the GC term by at most `gc_weight / target_len`
//! while gaining one positional match adds `match_weight / target_len`. With
//! `gc_weight <= match_weight` (checked at construction), writing the target's
//! own bases over any stretch of a candidate can only raise its score.
//!
//! [`evaluate_aptamer`] is the standalone, target-free evaluation used to
//! judge a single sequence against desired properties (length, GC content)
//! plus its folding potential. [`PropertyScorer`] exposes it through the same
//! [`AffinityScorer`] trait the engine consumes.

use serde::{Deserialize, Serialize};

use crate::base::{folding_potential, AffinityScore, Aptamer, Sequence};
use crate::errors::SelexError;

/// Anything that can score a sequence. Scoring must be deterministic and free
/// of side effects; the engine calls it from several threads at once.
pub trait AffinityScorer: Send + Sync {
    /// Score one sequence. Must be defined for every sequence, whatever its
    /// length.
    fn score(&self, sequence: &Sequence) -> AffinityScore;

    /// Score an aptamer. The default delegates to [`score`](Self::score).
    fn score_aptamer(&self, aptamer: &Aptamer) -> AffinityScore {
        self.score(aptamer.sequence())
    }
}

impl<T: AffinityScorer + ?Sized> AffinityScorer for Box<T> {
    fn score(&self, sequence: &Sequence) -> AffinityScore {
        (**self).score(sequence)
    }
}

/// Weights of the target-affinity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the positional-match term
    pub match_weight: f64,
    /// Weight of the GC-closeness term (must not exceed `match_weight`)
    pub gc_weight: f64,
    /// Preferred GC content of a binder
    pub target_gc: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_weight: 0.8,
            gc_weight: 0.2,
            target_gc: 0.5,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), SelexError> {
        if !self.match_weight.is_finite() || self.match_weight <= 0.0 {
            return Err(SelexError::invalid(
                "scoring.match_weight",
                self.match_weight,
                "must be a finite value greater than 0.0",
            ));
        }
        if !self.gc_weight.is_finite() || self.gc_weight < 0.0 {
            return Err(SelexError::invalid(
                "scoring.gc_weight",
                self.gc_weight,
                "must be a finite, non-negative value",
            ));
        }
        if self.gc_weight > self.match_weight {
            return Err(SelexError::invalid(
                "scoring.gc_weight",
                self.gc_weight,
                format!("must not exceed match_weight ({})", self.match_weight),
            ));
        }
        if !(0.0..=1.0).contains(&self.target_gc) {
            return Err(SelexError::invalid(
                "scoring.target_gc",
                self.target_gc,
                "must be between 0.0 and 1.0",
            ));
        }
        Ok(())
    }
}

/// Default scorer: similarity to a fixed target sequence plus GC preference.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetAffinity {
    target: Sequence,
    config: ScoringConfig,
}

impl TargetAffinity {
    /// # Errors
    /// `InvalidConfiguration` for an empty target or invalid weights.
    pub fn new(target: Sequence, config: ScoringConfig) -> Result<Self, SelexError> {
        if target.is_empty() {
            return Err(SelexError::invalid("target", "\"\"", "target must not be empty"));
        }
        config.validate()?;
        Ok(Self { target, config })
    }

    pub fn target(&self) -> &Sequence {
        &self.target
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Fraction of target positions matched by `sequence` (5'-anchored).
    pub fn match_fraction(&self, sequence: &Sequence) -> f64 {
        let matches = sequence
            .iter()
            .zip(self.target.iter())
            .filter(|(a, b)| a == b)
            .count();
        matches as f64 / self.target.len() as f64
    }

    /// GC closeness in `[0, 1]`; 1 means the preferred GC content exactly.
    pub fn gc_closeness(&self, sequence: &Sequence) -> f64 {
        let len = sequence.len() as f64;
        let denom = sequence.len().max(self.target.len()) as f64;
        let deviation = (sequence.gc_count() as f64 - self.config.target_gc * len).abs() / denom;
        1.0 - deviation
    }
}

impl AffinityScorer for TargetAffinity {
    fn score(&self, sequence: &Sequence) -> AffinityScore {
        AffinityScore::new(
            self.config.match_weight * self.match_fraction(sequence)
                + self.config.gc_weight * self.gc_closeness(sequence),
        )
    }
}

/// Desired properties for standalone evaluation.
///
/// Deserializes from a map such as
/// `{"target_length": 30, "target_gc_content": 0.5}`; both keys are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_gc_content: Option<f64>,
}

impl TargetProperties {
    pub fn new(target_length: Option<usize>, target_gc_content: Option<f64>) -> Self {
        Self {
            target_length,
            target_gc_content,
        }
    }

    pub fn validate(&self) -> Result<(), SelexError> {
        if self.target_length == Some(0) {
            return Err(SelexError::invalid(
                "target_length",
                0,
                "must be greater than 0",
            ));
        }
        if let Some(gc) = self.target_gc_content {
            if !(0.0..=1.0).contains(&gc) {
                return Err(SelexError::invalid(
                    "target_gc_content",
                    gc,
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        Ok(())
    }
}

/// Evaluate a sequence against desired properties.
///
/// The result is the mean of the available components, each in `[0, 1]`:
/// - length score `1 - |len - target_length| / target_length` (floored at 0),
/// - GC score `1 - |gc_content - target_gc_content|`,
/// - folding potential, capped at 1 (always present).
///
/// # Errors
/// `InvalidConfiguration` if the properties are out of range.
pub fn evaluate_aptamer(sequence: &Sequence, properties: &TargetProperties) -> Result<f64, SelexError> {
    properties.validate()?;
    Ok(evaluate_unchecked(sequence, properties))
}

fn evaluate_unchecked(sequence: &Sequence, properties: &TargetProperties) -> f64 {
    let mut scores = Vec::with_capacity(3);

    if let Some(target_length) = properties.target_length {
        let diff = sequence.len().abs_diff(target_length) as f64;
        scores.push((1.0 - diff / target_length as f64).max(0.0));
    }

    if let Some(target_gc) = properties.target_gc_content {
        scores.push(1.0 - (sequence.gc_content() - target_gc).abs());
    }

    scores.push(folding_potential(sequence).min(1.0));

    scores.iter().sum::<f64>() / scores.len() as f64
}

/// [`evaluate_aptamer`] as an [`AffinityScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyScorer {
    properties: TargetProperties,
}

impl PropertyScorer {
    pub fn new(properties: TargetProperties) -> Result<Self, SelexError> {
        properties.validate()?;
        Ok(Self { properties })
    }

    pub fn properties(&self) -> &TargetProperties {
        &self.properties
    }
}

impl AffinityScorer for PropertyScorer {
    fn score(&self, sequence: &Sequence) -> AffinityScore {
        AffinityScore::new(evaluate_unchecked(sequence, &self.properties))
    }
}
