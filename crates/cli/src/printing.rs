use aptevo_analysis::analysis::{composition, distance, diversity, temporal};
use aptevo_sim::base::{ScoredAptamer, Sequence};
use aptevo_sim::simulation::{Population, RoundRecord, SelexConfig};

pub fn print_parameters(config: &SelexConfig) {
    let run = &config.run;
    println!("\n📋 SELEX Configuration");
    println!("  • Target: {} ({} nt) [--target]", config.target, config.target.len());
    println!("  • Rounds: {} [-r, --rounds]", run.num_rounds);
    println!("  • Library Size: {} [-n, --library-size]", run.library_size);
    println!(
        "  • Selection Pressure: {} [-p, --selection-pressure]",
        run.selection_pressure
    );
    println!("  • Mutation Rate: {} [-m, --mutation-rate]", run.mutation_rate);
    if let Some(seed) = config.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n🧬 Initial Library");
    println!("  • Source: {}", config.initial_library.describe());
    println!("  • Sequence Length: {} nt [-l, --seq-length]", run.seq_length);
    println!(
        "  • GC Range: {:.2}-{:.2} [--gc-min, --gc-max]",
        run.gc_range.min, run.gc_range.max
    );

    println!("\n🎯 Scoring & Amplification");
    println!(
        "  • Weights: match={:.2}, gc={:.2} (target GC {:.2})",
        config.scoring.match_weight, config.scoring.gc_weight, config.scoring.target_gc
    );
    println!("  • Amplification: {:?} [--amplification]", config.amplification);
    println!();
}

pub fn print_history(history: &[RoundRecord]) {
    println!("\n📈 Round History");
    println!(
        "  {:>5}  {:>10}  {:>10}  {:>10}  {:>9}  {:>7}  {:>8}",
        "round", "mean", "best", "selected", "diversity", "unique", "entropy"
    );
    for r in history {
        println!(
            "  {:>5}  {:>10.4}  {:>10.4}  {:>10.4}  {:>9.4}  {:>7}  {:>8.3}",
            r.round,
            r.mean_score,
            r.best_score,
            r.selected_mean_score,
            r.diversity,
            r.unique_sequences,
            r.entropy
        );
    }
}

pub fn print_top_aptamers(top: &[ScoredAptamer]) {
    println!("\n🏆 Top Aptamers");
    for (rank, scored) in top.iter().enumerate() {
        println!(
            "  {:>2}. {}  score={:.4}  gc={:.2}",
            rank + 1,
            scored.aptamer,
            scored.score,
            scored.aptamer.gc_content()
        );
    }
}

pub fn print_pool_analysis(population: &Population, target: &Sequence, history: &[RoundRecord]) {
    println!("\n🔬 Final Pool");
    println!(
        "  • Haplotype Diversity: {:.4}",
        diversity::haplotype_diversity(population)
    );
    println!(
        "  • Nucleotide Diversity (π): {:.4}",
        diversity::nucleotide_diversity(population)
    );
    println!(
        "  • Effective Sequences: {:.1}",
        diversity::effective_number(population)
    );
    println!("  • Mean GC: {:.3}", composition::gc_content(population, None));
    println!("  • Consensus: {}", composition::consensus(population));
    if let Some(summary) = distance::distance_to_target(population, target) {
        println!(
            "  • Distance to Target: min={} mean={:.2} max={} (exact matches: {})",
            summary.min, summary.mean, summary.max, summary.exact_matches
        );
    }
    match temporal::convergence_round(history, CONVERGED_DIVERSITY) {
        Some(round) => println!("  • Converged (diversity < {CONVERGED_DIVERSITY}) in round {round}"),
        None => println!("  • Not converged (diversity stayed >= {CONVERGED_DIVERSITY})"),
    }
}

const CONVERGED_DIVERSITY: f64 = 0.1;

/// Round history as CSV, one row per record.
pub fn history_csv(history: &[RoundRecord]) -> String {
    let mut csv = String::from(
        "round,mean_score,best_score,worst_score,selected_mean_score,diversity,\
         unique_sequences,entropy,population_size,selected_count,mean_gc,best_sequence\n",
    );
    for r in history {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            r.round,
            r.mean_score,
            r.best_score,
            r.worst_score,
            r.selected_mean_score,
            r.diversity,
            r.unique_sequences,
            r.entropy,
            r.population_size,
            r.selected_count,
            r.mean_gc,
            r.best_sequence
        ));
    }
    csv
}
