use crate::error::{PubmedRagError, Result};
use crate::search::retriever::{Retriever, SearchResult};
use crate::search::tokenize::tokenize;
use std::collections::HashMap;

/// Free parameters of the BM25 Okapi formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term saturation: how much repeated occurrences of a term keep adding to the score.
    pub k1: f64,
    /// Length normalization: 0.0 ignores document length, 1.0 fully normalizes by it.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Term statistics over the whole collection. Rebuilt from scratch on every mutation.
#[derive(Debug, Clone)]
struct Bm25Model {
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f64,
    idf: HashMap<String, f64>,
}

impl Bm25Model {
    fn build(tokenized: &[Vec<String>]) -> Self {
        let mut term_freqs = Vec::with_capacity(tokenized.len());
        let mut doc_lengths = Vec::with_capacity(tokenized.len());
        let mut doc_freqs: HashMap<String, u32> = HashMap::new();

        for tokens in tokenized {
            let mut tf: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lengths.push(tokens.len());
            term_freqs.push(tf);
        }

        let n = tokenized.len() as f64;
        let total_length: usize = doc_lengths.iter().sum();
        let avg_doc_length = if tokenized.is_empty() {
            0.0
        } else {
            total_length as f64 / n
        };

        // IDF: ln((N - df + 0.5) / (df + 0.5) + 1), always positive
        let idf = doc_freqs
            .into_iter()
            .map(|(term, df)| {
                let df = df as f64;
                (term, ((n - df + 0.5) / (df + 0.5) + 1.0).ln())
            })
            .collect();

        Self {
            term_freqs,
            doc_lengths,
            avg_doc_length,
            idf,
        }
    }

    fn scores(&self, query_tokens: &[String], params: Bm25Params) -> Vec<f64> {
        let mut scores = vec![0.0; self.term_freqs.len()];

        for token in query_tokens {
            let idf = match self.idf.get(token) {
                Some(idf) => *idf,
                None => continue,
            };
            for (doc, tf_map) in self.term_freqs.iter().enumerate() {
                let tf = match tf_map.get(token) {
                    Some(tf) => *tf as f64,
                    None => continue,
                };
                // tf > 0 implies a non-empty document, so avg_doc_length > 0
                let dl = self.doc_lengths[doc] as f64;
                let norm = params.k1 * (1.0 - params.b + params.b * dl / self.avg_doc_length);
                scores[doc] += idf * (tf * (params.k1 + 1.0)) / (tf + norm);
            }
        }

        scores
    }
}

/// In-memory BM25 ranking engine over an append-only document collection.
///
/// Documents and identifiers are kept in two parallel vectors. Every call to
/// [`Bm25Index::add`] re-tokenizes the entire collection and rebuilds the
/// relevance model, so callers with many documents should add them in one batch.
#[derive(Debug, Clone, Default)]
pub struct Bm25Index {
    params: Bm25Params,
    docs: Vec<String>,
    doc_ids: Vec<String>,
    model: Option<Bm25Model>,
}

impl Bm25Index {
    /// Create an empty index with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with explicit `k1` / `b`
    pub fn with_params(params: Bm25Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Identifiers in insertion order
    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    /// Append documents and rebuild the relevance model over the whole collection.
    ///
    /// When `ids` is `None`, identifiers are assigned sequentially as strings
    /// continuing from the current collection size.
    ///
    /// # Errors
    ///
    /// Returns [`PubmedRagError::Validation`] if `ids` and `docs` differ in length.
    /// Nothing is appended in that case.
    pub fn add(&mut self, docs: Vec<String>, ids: Option<Vec<String>>) -> Result<()> {
        let start = self.docs.len();
        let ids = match ids {
            Some(ids) => ids,
            None => (start..start + docs.len()).map(|i| i.to_string()).collect(),
        };
        if ids.len() != docs.len() {
            return Err(PubmedRagError::Validation(format!(
                "ids and docs must have same length ({} ids, {} docs)",
                ids.len(),
                docs.len()
            )));
        }

        self.docs.extend(docs);
        self.doc_ids.extend(ids);
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        if self.docs.is_empty() {
            self.model = None;
            return;
        }
        let tokenized: Vec<Vec<String>> = self.docs.iter().map(|d| tokenize(d)).collect();
        let model = Bm25Model::build(&tokenized);
        log::debug!(
            "Rebuilt BM25 model: {} documents, {} terms, avg length {:.1}",
            self.docs.len(),
            model.idf.len(),
            model.avg_doc_length
        );
        self.model = Some(model);
    }

    /// Raw BM25 score of every document against `text`, in insertion order.
    /// Empty when nothing has been added yet.
    pub fn get_scores(&self, text: &str) -> Vec<f64> {
        match &self.model {
            Some(model) => model.scores(&tokenize(text), self.params),
            None => Vec::new(),
        }
    }

    /// Rank every document against `text` and keep the first `k`.
    ///
    /// Ties keep insertion order. Zero-scoring documents are kept so that a
    /// non-empty collection always yields `min(k, len)` results; callers that
    /// want only matches can filter on `score > 0.0`.
    pub fn query(&self, text: &str, k: usize) -> Vec<SearchResult> {
        let scores = self.get_scores(text);
        if scores.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        // sort_by is stable: equal scores stay in insertion order
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        order.truncate(k);

        order
            .into_iter()
            .enumerate()
            .map(|(rank, idx)| SearchResult {
                doc_id: self.doc_ids[idx].clone(),
                score: scores[idx],
                rank: rank + 1,
            })
            .collect()
    }

    /// Text of the first document stored under `doc_id`
    pub fn get_document_by_id(&self, doc_id: &str) -> Option<&str> {
        self.doc_ids
            .iter()
            .position(|id| id == doc_id)
            .map(|idx| self.docs[idx].as_str())
    }
}

impl Retriever for Bm25Index {
    fn query(&self, text: &str, k: usize) -> Vec<SearchResult> {
        Bm25Index::query(self, text, k)
    }

    fn get_document_by_id(&self, doc_id: &str) -> Option<&str> {
        Bm25Index::get_document_by_id(self, doc_id)
    }
}

/// `(identifier, score)` pairs for the top-`k` documents.
pub fn topk_ids_scores(index: &Bm25Index, query: &str, k: usize) -> Vec<(String, f64)> {
    index
        .query(query, k)
        .into_iter()
        .map(|r| (r.doc_id, r.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn medical_index() -> Bm25Index {
        let mut index = Bm25Index::new();
        index
            .add(
                strings(&[
                    "Insulin therapy helps regulate blood glucose in patients with diabetes.",
                    "MRI imaging of the brain reveals structural changes in neurodegenerative disease.",
                    "Antibiotic stewardship reduces resistance and improves clinical outcomes.",
                ]),
                Some(strings(&["insulin", "mri", "antibiotic"])),
            )
            .unwrap();
        index
    }

    #[test]
    fn test_query_ranks_relevant_doc_first() {
        let index = medical_index();
        let results = index.query("insulin regulates glucose levels", 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].doc_id, "insulin");
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].rank, 2);
    }

    #[test]
    fn test_two_document_scenario() {
        let mut index = Bm25Index::new();
        index
            .add(
                strings(&[
                    "Insulin therapy regulates blood glucose.",
                    "MRI imaging detects brain changes.",
                ]),
                Some(strings(&["insulin", "mri"])),
            )
            .unwrap();
        let results = index.query("insulin regulates glucose levels", 2);
        assert_eq!(results[0].doc_id, "insulin");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_query_empty_index_returns_empty() {
        let index = Bm25Index::new();
        assert!(index.query("anything", 5).is_empty());
        assert!(index.get_scores("anything").is_empty());
    }

    #[test]
    fn test_query_respects_k() {
        let index = medical_index();
        assert!(index.query("glucose", 0).is_empty());
        assert_eq!(index.query("glucose", 1).len(), 1);
        assert_eq!(index.query("glucose", 3).len(), 3);
        assert_eq!(index.query("glucose", 10).len(), 3);
    }

    #[test]
    fn test_zero_scores_kept_in_insertion_order() {
        let index = medical_index();
        let results = index.query("nonexistent_xyz_term", 3);
        assert_eq!(results.len(), 3);
        let ids: Vec<&str> = results.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["insulin", "mri", "antibiotic"]);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_ties_broken_by_insertion_order() {
        let mut index = Bm25Index::new();
        index
            .add(
                strings(&["cancer screening", "unrelated text", "cancer screening"]),
                Some(strings(&["first", "middle", "second"])),
            )
            .unwrap();
        let results = index.query("cancer", 3);
        assert_eq!(results[0].doc_id, "first");
        assert_eq!(results[1].doc_id, "second");
        assert_eq!(results[0].score, results[1].score);
        assert_eq!(results[2].doc_id, "middle");
    }

    #[test]
    fn test_results_sorted_descending() {
        let index = medical_index();
        let results = index.query("brain imaging glucose resistance", 3);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_query_is_idempotent() {
        let index = medical_index();
        let first = index.query("clinical outcomes of insulin", 3);
        let second = index.query("clinical outcomes of insulin", 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_higher_tf_ranks_first() {
        let mut index = Bm25Index::new();
        index
            .add(strings(&["statin statin statin", "statin trial"]), None)
            .unwrap();
        let results = index.query("statin", 2);
        assert_eq!(results[0].doc_id, "0");
    }

    #[test]
    fn test_add_auto_ids_continue_from_len() {
        let mut index = Bm25Index::new();
        index.add(strings(&["a doc", "b doc"]), None).unwrap();
        index.add(strings(&["c doc"]), None).unwrap();
        assert_eq!(index.doc_ids(), &strings(&["0", "1", "2"])[..]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_add_length_mismatch_is_validation_error() {
        let mut index = Bm25Index::new();
        let err = index
            .add(strings(&["one", "two"]), Some(strings(&["only-one"])))
            .unwrap_err();
        assert!(matches!(err, PubmedRagError::Validation(_)));
        assert!(index.is_empty(), "nothing should be appended on error");
    }

    #[test]
    fn test_add_rebuilds_model_over_whole_collection() {
        let mut index = Bm25Index::new();
        index
            .add(strings(&["aspirin lowers fever"]), Some(strings(&["aspirin"])))
            .unwrap();
        index
            .add(strings(&["vaccine prevents measles"]), Some(strings(&["vaccine"])))
            .unwrap();
        let results = index.query("measles", 2);
        assert_eq!(results[0].doc_id, "vaccine");
        assert!(results[0].score > 0.0);
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_get_document_by_id_first_match_wins() {
        let mut index = Bm25Index::new();
        index
            .add(strings(&["first text", "second text"]), Some(strings(&["dup", "dup"])))
            .unwrap();
        assert_eq!(index.get_document_by_id("dup"), Some("first text"));
        assert_eq!(index.get_document_by_id("missing"), None);
    }

    #[test]
    fn test_params_affect_scores() {
        let docs = strings(&["glucose glucose glucose glucose", "glucose"]);
        let mut low = Bm25Index::with_params(Bm25Params { k1: 0.1, b: 0.75 });
        low.add(docs.clone(), None).unwrap();
        let mut high = Bm25Index::with_params(Bm25Params { k1: 3.0, b: 0.75 });
        high.add(docs, None).unwrap();

        let low_scores = low.get_scores("glucose");
        let high_scores = high.get_scores("glucose");
        let low_ratio = low_scores[0] / low_scores[1];
        let high_ratio = high_scores[0] / high_scores[1];
        assert!(high_ratio > low_ratio, "larger k1 should reward repeated terms more");
    }

    #[test]
    fn test_topk_ids_scores() {
        let index = medical_index();
        let pairs = topk_ids_scores(&index, "antibiotic resistance", 1);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "antibiotic");
    }
}
