//! Corpus and QA loaders feeding the ranking engine and the evaluation layer.

pub mod corpus;
pub mod qa;

pub use corpus::{build_index_from_dir, load_txt_corpus};
pub use qa::{load_qa_pairs, parse_qa_pairs};
