//! Candidate answers for faithfulness scoring: a naive extractive baseline and
//! an LLM-backed generator with the same shape.

use crate::eval::QaPair;
use crate::llm::LlmAnswerer;
use crate::search::{token_set, Retriever};
use regex::Regex;
use std::sync::OnceLock;

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").expect("Invalid regex pattern"))
}

/// Split text into sentences after `.`, `!` or `?` followed by whitespace.
/// The terminator stays with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in sentence_boundary().find_iter(text) {
        // terminators are ASCII, so start + 1 is a char boundary
        sentences.push(&text[last..m.start() + 1]);
        last = m.end();
    }
    sentences.push(&text[last..]);
    sentences
}

/// Sentence of `doc_text` sharing the most distinct tokens with `question`.
/// Ties keep the earliest sentence.
pub fn best_sentence<'a>(question: &str, doc_text: &'a str) -> &'a str {
    let q_tokens = token_set(question);
    let mut best = "";
    let mut best_score: Option<usize> = None;
    for sentence in split_sentences(doc_text) {
        let score = token_set(sentence).intersection(&q_tokens).count();
        if best_score.map_or(true, |b| score > b) {
            best_score = Some(score);
            best = sentence;
        }
    }
    best
}

/// Naive candidate answers: for each question, the best-overlapping sentence of
/// the single top-ranked document, or `""` when nothing is retrieved.
pub fn naive_candidate_extraction<R: Retriever + ?Sized>(
    qa_pairs: &[QaPair],
    retriever: &R,
) -> Vec<String> {
    qa_pairs
        .iter()
        .map(|pair| {
            let top = retriever.query(&pair.question, 1);
            top.first()
                .and_then(|r| retriever.get_document_by_id(&r.doc_id))
                .map(|text| best_sentence(&pair.question, text).to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Candidate answers from an external answerer, one per QA pair.
///
/// The context for each question is the text of its top-`k` documents joined
/// by blank lines (empty when nothing is retrieved).
pub async fn answer_candidates<R: Retriever + ?Sized>(
    qa_pairs: &[QaPair],
    retriever: &R,
    answerer: &LlmAnswerer,
    k: usize,
) -> Vec<String> {
    let mut candidates = Vec::with_capacity(qa_pairs.len());
    for pair in qa_pairs {
        let context = retriever
            .query(&pair.question, k)
            .iter()
            .filter_map(|r| retriever.get_document_by_id(&r.doc_id))
            .collect::<Vec<_>>()
            .join("\n\n");
        candidates.push(answerer.answer(&pair.question, &context).await);
    }
    log::info!(
        "Generated {} candidate answers with {}",
        candidates.len(),
        answerer.model()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Bm25Index;

    fn index(docs: &[&str], ids: &[&str]) -> Bm25Index {
        let mut index = Bm25Index::new();
        index
            .add(
                docs.iter().map(|s| s.to_string()).collect(),
                Some(ids.iter().map(|s| s.to_string()).collect()),
            )
            .unwrap();
        index
    }

    #[test]
    fn split_sentences_on_terminators() {
        let sentences =
            split_sentences(" Insulin lowers glucose. Does MRI help?  Yes!\nIt does. 3.5 mg dose");
        assert_eq!(
            sentences,
            vec![
                "Insulin lowers glucose.",
                "Does MRI help?",
                "Yes!",
                "It does.",
                "3.5 mg dose"
            ]
        );
    }

    #[test]
    fn split_sentences_no_terminator() {
        assert_eq!(split_sentences("single clause"), vec!["single clause"]);
        assert_eq!(split_sentences(""), vec![""]);
    }

    #[test]
    fn best_sentence_max_overlap() {
        let doc = "Diabetes is common. Insulin therapy regulates blood glucose. MRI is unrelated.";
        assert_eq!(
            best_sentence("what regulates blood glucose?", doc),
            "Insulin therapy regulates blood glucose."
        );
    }

    #[test]
    fn best_sentence_ties_keep_first() {
        let doc = "Alpha beta. Gamma delta.";
        assert_eq!(best_sentence("unrelated question", doc), "Alpha beta.");
    }

    #[test]
    fn naive_extraction_uses_top_document() {
        let r = index(
            &[
                "MRI imaging detects brain changes. It is non-invasive.",
                "Insulin is a hormone. Insulin therapy regulates blood glucose.",
            ],
            &["mri", "insulin"],
        );
        let qa = vec![
            QaPair::new("what regulates glucose?", "insulin"),
            QaPair::new("is mri non-invasive?", "non-invasive"),
        ];
        let cands = naive_candidate_extraction(&qa, &r);
        assert_eq!(cands[0], "Insulin therapy regulates blood glucose.");
        assert_eq!(cands[1], "It is non-invasive.");
    }

    fn unreachable_answerer() -> LlmAnswerer {
        // Port 1 on loopback refuses connections, so every answer is the fallback
        LlmAnswerer::with_client_settings(
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            64,
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            std::time::Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn answer_candidates_use_top_k_context() {
        let r = index(
            &[
                "Insulin lowers glucose. It is a hormone.",
                "MRI detects brain changes.",
            ],
            &["insulin", "mri"],
        );
        let qa = vec![QaPair::new("what lowers glucose?", "insulin")];
        let answerer = unreachable_answerer();
        let cands = answer_candidates(&qa, &r, &answerer, 2).await;
        assert_eq!(cands, vec!["Insulin lowers glucose".to_string()]);
    }

    #[tokio::test]
    async fn answer_candidates_empty_index_gives_empty_answer() {
        let r = Bm25Index::new();
        let qa = vec![QaPair::new("what lowers glucose?", "insulin")];
        let answerer = unreachable_answerer();
        let cands = answer_candidates(&qa, &r, &answerer, 2).await;
        assert_eq!(cands, vec![String::new()]);
    }

    #[test]
    fn naive_extraction_empty_index() {
        let r = Bm25Index::new();
        let qa = vec![QaPair::new("anything?", "x")];
        assert_eq!(naive_candidate_extraction(&qa, &r), vec![String::new()]);
    }
}
