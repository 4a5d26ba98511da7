//! Evaluation layer: QA pairs, metrics (hit rate, P@K, faithfulness), candidate
//! answers, and reports.

pub mod candidates;
pub mod metrics;
pub mod query;
pub mod report;

pub use candidates::{answer_candidates, naive_candidate_extraction, split_sentences};
pub use metrics::{context_hit_rate, faithfulness_overlap, retrieval_precision_at_k};
pub use query::QaPair;
pub use report::{evaluate_k, render_leaderboard, splice_leaderboard, write_eval_outputs, MetricsRow};
