use anyhow::{Context, Result};
use aptevo_sim::simulation::SelexConfig;
use tracing::info;

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_config(args: &InitArgs) -> Result<()> {
    println!("🧬 aptevo - In-silico SELEX");
    println!("============================================\n");

    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            args.output.display()
        );
    }

    let config = args.selex.apply(SelexConfig::default())?;
    print_parameters(&config);

    let json = config.to_json()?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(path = %args.output.display(), "configuration written");

    println!("✓ Configuration written to {}", args.output.display());
    println!(
        "\n💡 Use 'aptevo run --config {}' to start the run",
        args.output.display()
    );

    Ok(())
}
