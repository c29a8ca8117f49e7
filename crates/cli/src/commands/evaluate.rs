use anyhow::Result;
use aptevo_sim::base::Aptamer;
use aptevo_sim::evolution::{evaluate_aptamer, AffinityScorer, ScoringConfig, TargetAffinity, TargetProperties};

use crate::args::{parse_sequence, EvaluateArgs};

pub fn evaluate_sequence(args: &EvaluateArgs) -> Result<()> {
    let aptamer = Aptamer::new(parse_sequence(&args.sequence, "sequence")?);
    let properties = TargetProperties::new(args.target_length, args.target_gc);
    let score = evaluate_aptamer(aptamer.sequence(), &properties)?;

    println!("🧪 Aptamer {aptamer}");
    println!("  • Length: {} nt", aptamer.len());
    println!("  • GC Content: {:.3}", aptamer.gc_content());
    println!("  • Folding Potential: {:.3}", aptamer.folding_score());
    println!("  • Property Score: {score:.4}");

    if let Some(target) = &args.target {
        let target = parse_sequence(target, "target")?;
        let scorer = TargetAffinity::new(target.clone(), ScoringConfig::default())?;
        println!(
            "  • Affinity to {target}: {:.4} (match {:.3}, gc closeness {:.3})",
            scorer.score_aptamer(&aptamer),
            scorer.match_fraction(aptamer.sequence()),
            scorer.gc_closeness(aptamer.sequence())
        );
    }

    Ok(())
}
