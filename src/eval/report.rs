//! Metric aggregation per k and the markdown/JSON reports built from it.

use crate::error::{PubmedRagError, Result};
use crate::eval::{context_hit_rate, faithfulness_overlap, retrieval_precision_at_k, QaPair};
use crate::search::Retriever;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const LEADERBOARD_START: &str = "<!-- LB-START -->";
pub const LEADERBOARD_END: &str = "<!-- LB-END -->";

/// All three metrics at one retrieval depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub k: usize,
    pub hit_rate: f64,
    pub precision_at_k: f64,
    pub faithfulness: f64,
}

/// Compute hit rate, precision@k and faithfulness for one `k`.
pub fn evaluate_k<R: Retriever + ?Sized>(
    qa_pairs: &[QaPair],
    retriever: &R,
    candidates: &[String],
    k: usize,
    threshold: f64,
) -> Result<MetricsRow> {
    Ok(MetricsRow {
        k,
        hit_rate: context_hit_rate(qa_pairs, retriever, k),
        precision_at_k: retrieval_precision_at_k(qa_pairs, retriever, k),
        faithfulness: faithfulness_overlap(qa_pairs, candidates, retriever, k, threshold)?,
    })
}

/// Markdown table with one row per k.
pub fn render_leaderboard(rows: &[MetricsRow]) -> String {
    let mut lines = vec![
        "| k | hit_rate | precision@k | faithfulness |".to_string(),
        "|---|----------|-------------|--------------|".to_string(),
    ];
    for row in rows {
        lines.push(format!(
            "| {} | {:.3} | {:.3} | {:.3} |",
            row.k, row.hit_rate, row.precision_at_k, row.faithfulness
        ));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct HitRateMetrics {
    k: usize,
    hit_rate: f64,
}

/// Write `metrics_<ts>.json` and `report_<ts>.md` into `out_dir`, creating it
/// if needed. Returns `(metrics_path, report_path)`.
pub fn write_eval_outputs(out_dir: &Path, k: usize, hit_rate: f64) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(out_dir)?;
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let metrics_path = out_dir.join(format!("metrics_{}.json", ts));
    let report_path = out_dir.join(format!("report_{}.md", ts));

    let metrics = serde_json::to_string_pretty(&HitRateMetrics { k, hit_rate })?;
    std::fs::write(&metrics_path, metrics)?;

    let report = format!(
        "# Evaluation Report\n\n- `k`: **{}**\n- `hit_rate`: **{:.3}**\n",
        k, hit_rate
    );
    std::fs::write(&report_path, report)?;

    log::info!(
        "Wrote {} and {}",
        metrics_path.display(),
        report_path.display()
    );
    Ok((metrics_path, report_path))
}

/// Replace the block between the leaderboard markers in `readme`.
pub fn splice_leaderboard(readme: &str, leaderboard: &str) -> Result<String> {
    let (before, rest) = readme.split_once(LEADERBOARD_START).ok_or_else(|| {
        PubmedRagError::Parse(format!("Marker {} not found in README", LEADERBOARD_START))
    })?;
    let (_, after) = rest.split_once(LEADERBOARD_END).ok_or_else(|| {
        PubmedRagError::Parse(format!("Marker {} not found in README", LEADERBOARD_END))
    })?;
    Ok(format!(
        "{}{}\n\n{}\n\n{}{}",
        before,
        LEADERBOARD_START,
        leaderboard.trim(),
        LEADERBOARD_END,
        after
    ))
}
