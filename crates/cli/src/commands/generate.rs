use anyhow::{Context, Result};
use aptevo_sim::base::Aptamer;
use aptevo_sim::simulation::{GcConstrainedGenerator, GcRange, SeedVariantGenerator, SequenceGenerator};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use crate::args::{parse_sequence, GenerateArgs};

pub fn generate_library(args: &GenerateArgs) -> Result<()> {
    let gc_range = GcRange::new(args.gc_min, args.gc_max)?;
    let mut rng = match args.seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
    };

    let aptamers: Vec<Aptamer> = match &args.seed_sequence {
        Some(text) => {
            let seed = parse_sequence(text, "seed sequence")?;
            debug!(seed = %seed, rate = args.rate, "generating seed variants");
            SeedVariantGenerator::new(seed.clone(), args.rate)?.generate(
                seed.len(),
                args.count,
                gc_range,
                &mut rng,
            )?
        }
        None => GcConstrainedGenerator::new().generate(args.length, args.count, gc_range, &mut rng)?,
    };

    let content = to_fasta(&aptamers);
    match &args.output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {} sequences to {}", aptamers.len(), path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}

fn to_fasta(aptamers: &[Aptamer]) -> String {
    let mut fasta = String::new();
    for (i, aptamer) in aptamers.iter().enumerate() {
        fasta.push_str(&format!(
            ">aptamer_{}|gc={:.2}\n{}\n",
            i + 1,
            aptamer.gc_content(),
            aptamer
        ));
    }
    fasta
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptevo_sim::simulation::parse_fasta;

    #[test]
    fn test_fasta_is_readable_back() {
        let aptamers: Vec<Aptamer> = ["GGTTGG", "ACGTAC"].iter().map(|s| s.parse().unwrap()).collect();
        let fasta = to_fasta(&aptamers);
        assert!(fasta.starts_with(">aptamer_1|gc=0.67\nGGTTGG\n"));

        let back = parse_fasta(&fasta).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].to_string(), "ACGTAC");
    }
}
