use std::error;
use std::fmt;

use thiserror::Error;

/// Error returned when attempting to convert an invalid byte/character into
/// a `Nucleotide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidNucleotide(pub u8);

impl fmt::Display for InvalidNucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid nucleotide byte: {} ('{}')", self.0, self.0 as char)
    }
}

impl error::Error for InvalidNucleotide {}

/// Error type for failures when parsing a `Sequence` from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSequence {
    /// A character was not recognized as a valid nucleotide.
    InvalidChar { position: usize, found: char },
}

impl fmt::Display for InvalidSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChar { position, found } => {
                write!(f, "Invalid character in sequence at position {position}: '{found}'")
            }
        }
    }
}

impl error::Error for InvalidSequence {}

/// Errors surfaced by the SELEX engine and its collaborators.
///
/// Every variant carries enough context (parameter name, round number, the
/// offending constraint) to diagnose the failure without re-running. None of
/// these are transient: the engine never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelexError {
    /// A parameter violated its documented range at construction or run entry.
    #[error("Invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: String,
        reason: String,
    },

    /// No sequence of the requested length can have a GC content in range.
    #[error("Unsatisfiable constraint: no {length}-base sequence has GC content in [{min}, {max}]")]
    UnsatisfiableConstraint { length: usize, min: f64, max: f64 },

    /// Selection left nothing to amplify.
    #[error("Empty population: no survivors to amplify{}", round_suffix(.round))]
    EmptyPopulation { round: Option<usize> },

    /// The engine already completed a run and its policy forbids re-running.
    #[error("Simulation already ran ({rounds} rounds recorded); create a new engine or use the restart policy")]
    AlreadyRun { rounds: usize },
}

fn round_suffix(round: &Option<usize>) -> String {
    match round {
        Some(r) => format!(" in round {r}"),
        None => String::new(),
    }
}

impl SelexError {
    /// Shorthand for an `InvalidConfiguration` error.
    pub fn invalid(
        parameter: &'static str,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            parameter,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach a round number to an `EmptyPopulation` error. Other variants are
    /// returned unchanged.
    pub fn in_round(self, round: usize) -> Self {
        match self {
            Self::EmptyPopulation { .. } => Self::EmptyPopulation { round: Some(round) },
            other => other,
        }
    }
}

impl From<InvalidSequence> for SelexError {
    fn from(e: InvalidSequence) -> Self {
        Self::invalid("sequence", "<input>", e.to_string())
    }
}
