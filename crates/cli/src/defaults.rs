//! Shared default values for the command line.
//! Simulation defaults live in `aptevo_sim::simulation::configs`; these only
//! cover what the CLI itself adds.

pub const CONFIG_FILE: &str = "aptevo.json";

/// Per-base rate for `--seed-sequence` variants.
pub const SEED_VARIANT_RATE: f64 = 0.1;

pub const TOP_APTAMERS: usize = 5;

pub const GENERATE_COUNT: usize = 10;
pub const GC_MIN: f64 = 0.4;
pub const GC_MAX: f64 = 0.6;

/// Default `RUST_LOG`-style filter; `--verbose` swaps `info` for `debug`.
pub fn log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,aptevo={level},aptevo_sim={level}")
}
