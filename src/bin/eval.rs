//! Evaluation CLI: context hit rate at one k, saved as JSON metrics and a markdown report.

use anyhow::Context;
use clap::Parser;
use pubmedrag::{
    eval::{context_hit_rate, write_eval_outputs},
    ingest::{build_index_from_dir, load_qa_pairs},
    Config,
};
use std::path::PathBuf;

/// Run the hit-rate evaluation and save metrics/report.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Folder with *.txt abstracts.
    data_dir: PathBuf,

    /// JSONL with fields: question, answer.
    qa_path: PathBuf,

    /// Top-k to retrieve (default: retrieval.default_k from config).
    #[arg(short, long)]
    k: Option<usize>,

    /// Where to save metrics/report (default: output.dir from config).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    config.init_logger();
    let k = args.k.unwrap_or(config.retrieval.default_k);
    let out_dir = args.out_dir.unwrap_or_else(|| config.output.dir.clone());

    let qa_pairs = load_qa_pairs(&args.qa_path)
        .with_context(|| format!("Failed to load QA pairs from {}", args.qa_path.display()))?;
    let index = build_index_from_dir(&args.data_dir, config.bm25_params())
        .with_context(|| format!("Failed to build index from {}", args.data_dir.display()))?;

    let hit_rate = context_hit_rate(&qa_pairs, &index, k);
    let (metrics_path, report_path) = write_eval_outputs(&out_dir, k, hit_rate)?;

    println!("Saved: {}", metrics_path.display());
    println!("Saved: {}", report_path.display());
    Ok(())
}
