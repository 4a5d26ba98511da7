//! Splice the generated leaderboard table into README.md between the LB markers.

use anyhow::Context;
use clap::Parser;
use pubmedrag::{eval::splice_leaderboard, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "update_readme")]
struct Args {
    /// README to update (default: output.readme from config).
    #[arg(long)]
    readme: Option<PathBuf>,

    /// Leaderboard markdown (default: output.leaderboard from config).
    #[arg(long)]
    leaderboard: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    config.init_logger();
    let readme_path = args.readme.unwrap_or_else(|| config.output.readme.clone());
    let leaderboard_path = args
        .leaderboard
        .unwrap_or_else(|| config.output.leaderboard.clone());

    if !leaderboard_path.exists() {
        anyhow::bail!(
            "{} not found. Run the leaderboard generator first.",
            leaderboard_path.display()
        );
    }

    let readme = std::fs::read_to_string(&readme_path)
        .with_context(|| format!("Failed to read {}", readme_path.display()))?;
    let leaderboard = std::fs::read_to_string(&leaderboard_path)
        .with_context(|| format!("Failed to read {}", leaderboard_path.display()))?;

    let updated = splice_leaderboard(&readme, &leaderboard)?;
    std::fs::write(&readme_path, updated)
        .with_context(|| format!("Failed to write {}", readme_path.display()))?;

    println!("{} updated with leaderboard.", readme_path.display());
    Ok(())
}
