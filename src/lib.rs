pub mod config;
pub mod error;
pub mod eval;
pub mod ingest;
pub mod llm;
pub mod search;

pub use config::Config;
pub use error::{PubmedRagError, Result};
