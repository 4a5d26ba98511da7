use crate::error::Result;
use crate::eval::QaPair;
use std::path::Path;

/// Parse JSON Lines QA records (`question`, `answer`). Blank lines are skipped;
/// other fields are ignored.
pub fn parse_qa_pairs(content: &str) -> Result<Vec<QaPair>> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        pairs.push(serde_json::from_str::<QaPair>(line)?);
    }
    Ok(pairs)
}

/// Load QA pairs from a JSON Lines file.
pub fn load_qa_pairs(path: &Path) -> Result<Vec<QaPair>> {
    let content = std::fs::read_to_string(path)?;
    let pairs = parse_qa_pairs(&content)?;
    log::info!("Loaded {} QA pairs from {}", pairs.len(), path.display());
    Ok(pairs)
}
