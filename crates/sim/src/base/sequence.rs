use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::Nucleotide;
use crate::errors::InvalidSequence;

/// Immutable DNA sequence.
///
/// `Sequence` holds its bases in a reference-counted `Arc<[Nucleotide]>`, so
/// cloning is cheap and amplified copies of the same molecule share storage.
/// There is no in-place mutation: operations that change bases (mutation,
/// splicing) return a new `Sequence`.
///
/// Serialized as a plain `"ACGT..."` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(Arc<[Nucleotide]>);

impl Sequence {
    /// Create a `Sequence` from a vector of `Nucleotide`s.
    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides.into())
    }

    /// A sequence made of `len` copies of `base`.
    pub fn uniform(base: Nucleotide, len: usize) -> Self {
        Self::from_nucleotides(vec![base; len])
    }

    /// Return the length of the sequence in bases.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the sequence contains no bases.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the `Nucleotide` at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Nucleotide> {
        self.0.get(index).copied()
    }

    /// Borrow the underlying `Nucleotide` slice.
    #[inline]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.0
    }

    /// Iterate over the bases.
    pub fn iter(&self) -> impl Iterator<Item = Nucleotide> + '_ {
        self.0.iter().copied()
    }

    /// Copy the bases into an owned vector (for building a modified copy).
    pub fn to_vec(&self) -> Vec<Nucleotide> {
        self.0.to_vec()
    }

    /// Number of G and C bases.
    pub fn gc_count(&self) -> usize {
        self.0.iter().filter(|n| n.is_gc()).count()
    }

    /// Fraction of bases that are G or C. The empty sequence has GC content 0.
    pub fn gc_content(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.gc_count() as f64 / self.len() as f64
    }

    /// Return a new sequence with `bases` written over positions
    /// `start..start + bases.len()`. Bases that would fall past the end are
    /// dropped, so the length never changes.
    pub fn splice(&self, start: usize, bases: &[Nucleotide]) -> Self {
        let mut data = self.to_vec();
        for (slot, &base) in data.iter_mut().skip(start).zip(bases) {
            *slot = base;
        }
        Self::from_nucleotides(data)
    }

    /// Return the current strong reference count to the shared data (useful
    /// for assertions about copying behavior).
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::from_nucleotides(Vec::new())
    }
}

impl From<Vec<Nucleotide>> for Sequence {
    fn from(nucleotides: Vec<Nucleotide>) -> Self {
        Self::from_nucleotides(nucleotides)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &nuc in self.0.iter() {
            write!(f, "{}", nuc.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = InvalidSequence;

    /// Parse a textual representation (e.g. "ACGT") into a `Sequence`.
    ///
    /// Case-insensitive. Surrounding whitespace is ignored; any other
    /// character outside the DNA alphabet produces `InvalidChar`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data: Result<Vec<Nucleotide>, _> = s
            .trim()
            .chars()
            .enumerate()
            .map(|(position, c)| {
                u8::try_from(c)
                    .ok()
                    .and_then(Nucleotide::from_ascii)
                    .ok_or(InvalidSequence::InvalidChar { position, found: c })
            })
            .collect();

        Ok(Self::from_nucleotides(data?))
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Sequence::from_str(&text).map_err(de::Error::custom)
    }
}
