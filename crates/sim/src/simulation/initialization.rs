//! Sources for the round-0 library.
//!
//! A run starts either from random sequences produced by the configured
//! [`SequenceGenerator`], from mutated variants of a known binder, or from a
//! user-supplied pool (typically read from FASTA). A user pool is taken as is:
//! its size need not equal `library_size`, and the first amplification brings
//! it to size.

use std::fs;
use std::path::Path;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::generator::{GcRange, SeedVariantGenerator, SequenceGenerator};
use crate::base::{Aptamer, Sequence};
use crate::errors::SelexError;

/// Where the initial population comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialLibrary {
    /// `library_size` sequences from the engine's generator.
    #[default]
    Random,
    /// Point-mutated variants of `seed` at per-base `rate`.
    SeedVariants { seed: Sequence, rate: f64 },
    /// An explicit pool, used verbatim.
    Sequences(Vec<Sequence>),
}

impl InitialLibrary {
    pub fn validate(&self) -> Result<(), SelexError> {
        match self {
            Self::Random => Ok(()),
            Self::SeedVariants { seed, rate } => SeedVariantGenerator::new(seed.clone(), *rate).map(|_| ()),
            Self::Sequences(sequences) => {
                if sequences.is_empty() {
                    return Err(SelexError::invalid(
                        "initial_library",
                        "[]",
                        "must contain at least one sequence",
                    ));
                }
                if let Some(pos) = sequences.iter().position(Sequence::is_empty) {
                    return Err(SelexError::invalid(
                        "initial_library",
                        format!("sequence #{pos}"),
                        "sequences must not be empty",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Short label for logs and summaries.
    pub fn describe(&self) -> String {
        match self {
            Self::Random => "random".to_string(),
            Self::SeedVariants { seed, rate } => {
                format!("variants of {seed} at rate {rate}")
            }
            Self::Sequences(sequences) => format!("{} supplied sequences", sequences.len()),
        }
    }

    /// Build the round-0 population.
    ///
    /// `generator` is only consulted for [`InitialLibrary::Random`].
    pub fn materialize(
        &self,
        generator: &dyn SequenceGenerator,
        length: usize,
        count: usize,
        gc_range: GcRange,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Aptamer>, SelexError> {
        match self {
            Self::Random => generator.generate(length, count, gc_range, rng),
            Self::SeedVariants { seed, rate } => {
                SeedVariantGenerator::new(seed.clone(), *rate)?.generate(length, count, gc_range, rng)
            }
            Self::Sequences(sequences) => Ok(sequences.iter().cloned().map(Aptamer::new).collect()),
        }
    }
}

/// Parse FASTA text into sequences.
///
/// Multi-line records are joined; header lines only delimit records. Lines
/// before the first header are accepted as a bare record, so a plain
/// one-sequence-per-line file parses too.
pub fn parse_fasta(text: &str) -> Result<Vec<Sequence>, SelexError> {
    let mut records: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_header_record = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('>') {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            in_header_record = true;
        } else if in_header_record {
            current.push_str(line);
        } else {
            records.push(line.to_string());
        }
    }
    if !current.is_empty() {
        records.push(current);
    }

    if records.is_empty() {
        return Err(SelexError::invalid("fasta", "<input>", "no sequences found"));
    }

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record
                .parse::<Sequence>()
                .map_err(|e| SelexError::invalid("fasta", format!("record #{}", i + 1), e.to_string()))
        })
        .collect()
}

/// Read and parse a FASTA file.
pub fn load_fasta(path: impl AsRef<Path>) -> Result<Vec<Sequence>, SelexError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| SelexError::invalid("fasta", path.display(), e.to_string()))?;
    parse_fasta(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::GcConstrainedGenerator;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_parse_fasta_multiline_records() {
        let text = ">apt1 first\nACGT\nACGT\n\n>apt2\nggcc\n";
        let seqs = parse_fasta(text).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].to_string(), "ACGTACGT");
        assert_eq!(seqs[1].to_string(), "GGCC");
    }

    #[test]
    fn test_parse_fasta_bare_lines() {
        let seqs = parse_fasta("ACGT\nTTTT\n").unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[1].to_string(), "TTTT");
    }

    #[test]
    fn test_parse_fasta_rejects_invalid_base() {
        let err = parse_fasta(">a\nACGN\n").unwrap_err();
        assert!(err.to_string().contains("record #1"));
    }

    #[test]
    fn test_parse_fasta_empty_input() {
        assert!(parse_fasta("").is_err());
        assert!(parse_fasta(">only header\n").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(InitialLibrary::Random.validate().is_ok());
        assert!(InitialLibrary::Sequences(Vec::new()).validate().is_err());
        assert!(InitialLibrary::Sequences(vec![Sequence::default()]).validate().is_err());
        let bad_rate = InitialLibrary::SeedVariants {
            seed: "ACGT".parse().unwrap(),
            rate: 2.0,
        };
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn test_materialize_supplied_pool_verbatim() {
        let pool: Vec<Sequence> = vec!["ACGT".parse().unwrap(), "GGGG".parse().unwrap()];
        let library = InitialLibrary::Sequences(pool.clone());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let aptamers = library
            .materialize(&GcConstrainedGenerator, 30, 100, GcRange::default(), &mut rng)
            .unwrap();
        let seqs: Vec<Sequence> = aptamers.into_iter().map(Aptamer::into_sequence).collect();
        assert_eq!(seqs, pool);
    }

    #[test]
    fn test_materialize_random_uses_generator() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let aptamers = InitialLibrary::Random
            .materialize(&GcConstrainedGenerator, 20, 15, GcRange::default(), &mut rng)
            .unwrap();
        assert_eq!(aptamers.len(), 15);
        assert!(aptamers.iter().all(|a| a.len() == 20));
    }

    #[test]
    fn test_serde_round_trip_shapes() {
        let json = serde_json::to_string(&InitialLibrary::Random).unwrap();
        assert_eq!(json, "\"random\"");

        let parsed: InitialLibrary =
            serde_json::from_str(r#"{"seed_variants":{"seed":"ACGTACGT","rate":0.1}}"#).unwrap();
        assert!(matches!(parsed, InitialLibrary::SeedVariants { rate, .. } if rate == 0.1));
    }
}
