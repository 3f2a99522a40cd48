//! Graph document load/save (JSON).

use std::path::Path;

use tracing::instrument;

use crate::types::GraphDocument;

/// Loads a graph document from `path`. Returns error if file is missing or invalid JSON.
#[instrument(level = "trace", skip(path))]
pub fn load_document(path: &Path) -> Result<GraphDocument, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Saves a graph document to `path` as pretty JSON, creating the parent directory if needed.
#[instrument(level = "trace", skip(path, doc))]
pub fn save_document(path: &Path, doc: &GraphDocument) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(doc)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}
