use crate::error::{PubmedRagError, Result};
use crate::search::{Bm25Index, Bm25Params};
use std::path::Path;
use walkdir::WalkDir;

/// Load every `*.txt` file directly under `dir` (non-recursive).
///
/// Files are visited in file-name order. Text is trimmed and files that are
/// empty after trimming are skipped. Identifiers are file stems.
///
/// Returns `(docs, ids)`, index-aligned.
pub fn load_txt_corpus(dir: &Path) -> Result<(Vec<String>, Vec<String>)> {
    if !dir.is_dir() {
        return Err(PubmedRagError::NotFound(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    let mut docs = Vec::new();
    let mut ids = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_txt = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext == "txt")
            .unwrap_or(false);
        if !is_txt {
            continue;
        }

        let text = std::fs::read_to_string(path)?;
        let text = text.trim();
        if text.is_empty() {
            log::debug!("Skipping empty file {}", path.display());
            continue;
        }

        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        docs.push(text.to_string());
        ids.push(id);
    }

    log::info!("Loaded {} documents from {}", docs.len(), dir.display());
    Ok((docs, ids))
}

/// Load a corpus directory and index it with a single `add` call.
pub fn build_index_from_dir(dir: &Path, params: Bm25Params) -> Result<Bm25Index> {
    let (docs, ids) = load_txt_corpus(dir)?;
    let mut index = Bm25Index::with_params(params);
    index.add(docs, Some(ids))?;
    Ok(index)
}
