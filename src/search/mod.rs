//! Ranking engine: tokenizer, BM25 index, and the retriever capability.

pub mod bm25;
pub mod retriever;
pub mod tokenize;

pub use bm25::{topk_ids_scores, Bm25Index, Bm25Params};
pub use retriever::{Retriever, SearchResult};
pub use tokenize::{content_token_set, token_set, tokenize, STOP_WORDS};
