use serde::Serialize;

/// One ranked hit returned by a [`Retriever`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub doc_id: String,
    pub score: f64,
    /// 1-indexed position in the result list
    pub rank: usize,
}

/// Capability the evaluation layer needs from a ranking engine.
///
/// Any engine that can rank documents for a query and resolve an identifier
/// back to its text can be evaluated; the lexical [`crate::search::Bm25Index`]
/// is the one shipped here.
pub trait Retriever {
    /// Top-`k` documents for `text`, sorted by descending score.
    fn query(&self, text: &str, k: usize) -> Vec<SearchResult>;

    /// Text of the first document stored under `doc_id`.
    fn get_document_by_id(&self, doc_id: &str) -> Option<&str>;
}
