//! Leaderboard CLI: sweep k = 1..=max_k and write a markdown metrics table.

use anyhow::Context;
use clap::Parser;
use pubmedrag::{
    eval::{answer_candidates, evaluate_k, naive_candidate_extraction, render_leaderboard},
    ingest::{build_index_from_dir, load_qa_pairs},
    llm::LlmAnswerer,
    Config,
};
use std::path::PathBuf;

/// Evaluate hit rate, precision@k and faithfulness for each k.
#[derive(Parser, Debug)]
#[command(name = "leaderboard")]
struct Args {
    /// Folder with *.txt abstracts.
    data_dir: PathBuf,

    /// JSONL with QA pairs.
    qa_path: PathBuf,

    /// Test values of k from 1..=max_k (default: eval.max_k from config).
    #[arg(long)]
    max_k: Option<usize>,

    /// Markdown table output (default: output.leaderboard from config).
    #[arg(long = "out")]
    out_path: Option<PathBuf>,

    /// Generate candidate answers with the configured LLM instead of the naive extractor.
    #[arg(long)]
    use_llm: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    config.init_logger();
    let max_k = args.max_k.unwrap_or(config.eval.max_k);
    if max_k == 0 {
        anyhow::bail!("--max-k must be greater than 0");
    }
    let out_path = args
        .out_path
        .unwrap_or_else(|| config.output.leaderboard.clone());

    let qa_pairs = load_qa_pairs(&args.qa_path)
        .with_context(|| format!("Failed to load QA pairs from {}", args.qa_path.display()))?;
    let index = build_index_from_dir(&args.data_dir, config.bm25_params())
        .with_context(|| format!("Failed to build index from {}", args.data_dir.display()))?;

    // Candidates depend only on the question, not on k
    let answerer = if args.use_llm {
        LlmAnswerer::from_config(&config.llm)
    } else {
        None
    };
    let candidates = match &answerer {
        Some(answerer) => {
            answer_candidates(&qa_pairs, &index, answerer, config.eval.candidate_k).await
        }
        None => {
            if args.use_llm {
                log::warn!("--use-llm given but no answerer is configured; using naive extractor");
            }
            naive_candidate_extraction(&qa_pairs, &index)
        }
    };

    let mut rows = Vec::new();
    for k in 1..=max_k {
        let row = evaluate_k(
            &qa_pairs,
            &index,
            &candidates,
            k,
            config.eval.faithfulness_threshold,
        )?;
        log::info!(
            "k={} hit_rate={:.3} precision@k={:.3} faithfulness={:.3}",
            row.k,
            row.hit_rate,
            row.precision_at_k,
            row.faithfulness
        );
        rows.push(row);
    }

    std::fs::write(&out_path, render_leaderboard(&rows))
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    println!("Saved leaderboard to {}", out_path.display());
    Ok(())
}
