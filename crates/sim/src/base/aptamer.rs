use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::Sequence;
use crate::errors::InvalidSequence;

/// Shortest hairpin loop (in bases) counted by [`folding_potential`].
pub const MIN_LOOP_SPAN: usize = 4;
/// Pairs this far apart or further are ignored by [`folding_potential`].
pub const MAX_PAIR_SPAN: usize = 20;
/// Divisor applied to the raw pairing sum.
pub const FOLDING_NORMALIZER: f64 = 10.0;

/// Heuristic secondary-structure potential of a sequence.
///
/// Every pair `(i, j)` with `MIN_LOOP_SPAN <= j - i < MAX_PAIR_SPAN` whose
/// bases are Watson-Crick complements contributes `1 / (j - i)`, so close
/// stems weigh more than distant ones. The sum is divided by
/// [`FOLDING_NORMALIZER`]. This is a proxy for hairpin formation, not a
/// thermodynamic prediction.
pub fn folding_potential(sequence: &Sequence) -> f64 {
    let bases = sequence.as_slice();
    let n = bases.len();
    let mut score = 0.0;

    for i in 0..n {
        let partner = bases[i].complement();
        let end = (i + MAX_PAIR_SPAN).min(n);
        for (j, &base) in bases.iter().enumerate().take(end).skip(i + MIN_LOOP_SPAN) {
            if base == partner {
                score += 1.0 / (j - i) as f64;
            }
        }
    }

    score / FOLDING_NORMALIZER
}

/// A candidate sequence with its derived attributes.
///
/// GC content and folding score are computed once in [`Aptamer::new`] and
/// never change: an aptamer is not mutated after creation, mutation builds a
/// new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aptamer {
    sequence: Sequence,
    gc_content: f64,
    folding_score: f64,
}

impl Aptamer {
    /// Wrap a sequence and compute its cached attributes.
    pub fn new(sequence: Sequence) -> Self {
        let gc_content = sequence.gc_content();
        let folding_score = folding_potential(&sequence);
        Self {
            sequence,
            gc_content,
            folding_score,
        }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn gc_content(&self) -> f64 {
        self.gc_content
    }

    pub fn folding_score(&self) -> f64 {
        self.folding_score
    }

    pub fn into_sequence(self) -> Sequence {
        self.sequence
    }
}

impl From<Sequence> for Aptamer {
    fn from(sequence: Sequence) -> Self {
        Self::new(sequence)
    }
}

impl FromStr for Aptamer {
    type Err = InvalidSequence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sequence::from_str(s).map(Self::new)
    }
}

impl fmt::Display for Aptamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence)
    }
}

// Cached attributes are always recomputed, never trusted from input.
impl<'de> Deserialize<'de> for Aptamer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            sequence: Sequence,
        }
        Raw::deserialize(deserializer).map(|raw| Aptamer::new(raw.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folding_potential_no_pairs() {
        let seq = Sequence::from_str("AAAAAAAAAA").unwrap();
        assert_eq!(folding_potential(&seq), 0.0);
    }

    #[test]
    fn test_folding_potential_short_sequence() {
        let seq = Sequence::from_str("AT").unwrap();
        assert_eq!(folding_potential(&seq), 0.0);
        assert_eq!(folding_potential(&Sequence::default()), 0.0);
    }

    #[test]
    fn test_folding_potential_single_pair() {
        // A at 0 pairs with T at 4 (span 4), nothing else complements.
        let seq = Sequence::from_str("AAAAT").unwrap();
        assert!((folding_potential(&seq) - 0.25 / FOLDING_NORMALIZER).abs() < 1e-12);

        // Span 3 is too tight to count.
        let seq = Sequence::from_str("AAAT").unwrap();
        assert_eq!(folding_potential(&seq), 0.0);
    }

    #[test]
    fn test_folding_potential_ignores_distant_pairs() {
        let mut text = String::from("A");
        text.push_str(&"C".repeat(MAX_PAIR_SPAN - 1));
        text.push('T');
        // A at 0 and T at MAX_PAIR_SPAN are exactly MAX_PAIR_SPAN apart
        let seq = Sequence::from_str(&text).unwrap();
        assert_eq!(folding_potential(&seq), 0.0);
    }

    #[test]
    fn test_folding_potential_favours_hairpins() {
        let hairpin = Sequence::from_str("GGGGAAAACCCC").unwrap();
        let flat = Sequence::from_str("GGGGAAAAGGGG").unwrap();
        assert!(folding_potential(&hairpin) > folding_potential(&flat));
    }

    #[test]
    fn test_aptamer_caches_attributes() {
        let apt: Aptamer = "GGCCAATT".parse().unwrap();
        assert!((apt.gc_content() - 0.5).abs() < 1e-12);
        assert_eq!(apt.folding_score(), folding_potential(apt.sequence()));
        assert_eq!(apt.len(), 8);
    }

    #[test]
    fn test_aptamer_deserialize_recomputes() {
        let json = r#"{"sequence":"GGGG","gc_content":0.0,"folding_score":99.0}"#;
        let apt: Aptamer = serde_json::from_str(json).unwrap();
        assert_eq!(apt.gc_content(), 1.0);
        assert_eq!(apt.folding_score(), 0.0);
    }
}
