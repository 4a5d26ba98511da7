//! Evaluation metrics: context hit rate, precision@k, and faithfulness overlap.
//!
//! All three treat degenerate input (no QA pairs, k of 0, empty token sets) as a
//! zero score rather than an error.

use crate::error::{PubmedRagError, Result};
use crate::eval::QaPair;
use crate::search::{content_token_set, Retriever};
use std::collections::HashSet;

/// Texts of the top-`k` documents for `question`. Unresolvable ids are skipped.
fn retrieve_texts<'a, R: Retriever + ?Sized>(
    retriever: &'a R,
    question: &str,
    k: usize,
) -> Vec<&'a str> {
    retriever
        .query(question, k)
        .iter()
        .filter_map(|r| retriever.get_document_by_id(&r.doc_id))
        .collect()
}

/// Context hit rate: fraction of QA pairs where at least one of the top-k
/// documents contains the expected answer. Returns 0.0 for no pairs.
pub fn context_hit_rate<R: Retriever + ?Sized>(qa_pairs: &[QaPair], retriever: &R, k: usize) -> f64 {
    if qa_pairs.is_empty() {
        return 0.0;
    }
    let hits = qa_pairs
        .iter()
        .filter(|pair| {
            retrieve_texts(retriever, &pair.question, k)
                .iter()
                .any(|text| pair.is_relevant(text))
        })
        .count();
    hits as f64 / qa_pairs.len() as f64
}

/// Precision at K averaged over QA pairs.
/// Per pair: (top-k documents containing the expected answer) / k.
/// The denominator is k even when fewer documents come back. If k is 0, returns 0.0.
pub fn retrieval_precision_at_k<R: Retriever + ?Sized>(
    qa_pairs: &[QaPair],
    retriever: &R,
    k: usize,
) -> f64 {
    if k == 0 || qa_pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = qa_pairs
        .iter()
        .map(|pair| {
            let relevant = retrieve_texts(retriever, &pair.question, k)
                .iter()
                .filter(|text| pair.is_relevant(text))
                .count();
            relevant as f64 / k as f64
        })
        .sum();
    total / qa_pairs.len() as f64
}

/// Share of the candidate's tokens that also occur in the document's tokens.
/// Asymmetric: the denominator is always the candidate's token count.
fn overlap_ratio(candidate: &HashSet<String>, doc: &HashSet<String>) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    candidate.intersection(doc).count() as f64 / candidate.len() as f64
}

/// Faithfulness: fraction of QA pairs whose candidate answer is lexically grounded
/// in at least one of the top-k documents for its question.
///
/// A candidate is grounded in a document when
/// `|candidate ∩ document| / |candidate| >= threshold` over stop-word-filtered
/// token sets. Candidates without content tokens, and questions that retrieve
/// nothing, count as unfaithful.
///
/// # Errors
///
/// Returns [`PubmedRagError::Validation`] if `candidates` and `qa_pairs` differ in length.
pub fn faithfulness_overlap<R: Retriever + ?Sized>(
    qa_pairs: &[QaPair],
    candidates: &[String],
    retriever: &R,
    k: usize,
    threshold: f64,
) -> Result<f64> {
    if qa_pairs.len() != candidates.len() {
        return Err(PubmedRagError::Validation(format!(
            "qa_pairs and candidates must have same length ({} pairs, {} candidates)",
            qa_pairs.len(),
            candidates.len()
        )));
    }
    if qa_pairs.is_empty() {
        return Ok(0.0);
    }

    let mut faithful = 0usize;
    for (pair, candidate) in qa_pairs.iter().zip(candidates) {
        let cand_tokens = content_token_set(candidate);
        if cand_tokens.is_empty() {
            continue;
        }
        let grounded = retrieve_texts(retriever, &pair.question, k)
            .iter()
            .any(|text| overlap_ratio(&cand_tokens, &content_token_set(text)) >= threshold);
        if grounded {
            faithful += 1;
        }
    }

    Ok(faithful as f64 / qa_pairs.len() as f64)
}
