//! Query CLI: rank a corpus directory against one query and print JSON.

use anyhow::Result;
use clap::Parser;
use pubmedrag::{ingest::build_index_from_dir, search::topk_ids_scores, Config};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Rank the `*.txt` abstracts in a folder against a query.
#[derive(Parser, Debug)]
#[command(name = "pubmedrag")]
struct Args {
    /// Folder with *.txt abstracts.
    data_dir: PathBuf,

    /// Query text.
    #[arg(short = 'q', long = "q")]
    query: String,

    /// Top-k results (default: retrieval.default_k from config).
    #[arg(short, long)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    results: Vec<(String, f64)>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    config.init_logger();
    if args.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }
    let k = args.k.unwrap_or(config.retrieval.default_k);

    let index = build_index_from_dir(&args.data_dir, config.bm25_params())?;

    let start = Instant::now();
    let results = topk_ids_scores(&index, &args.query, k);
    log::debug!("Query took {:?}, returned {} results", start.elapsed(), results.len());

    let output = QueryOutput {
        query: &args.query,
        results,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
