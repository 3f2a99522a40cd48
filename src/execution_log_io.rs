//! Writes execution logs to disk for debugging.

use std::path::Path;

use tracing::instrument;

use crate::types::ExecutionLog;

/// Default filename for an execution log under a run directory.
pub const EXECUTION_LOG_FILENAME: &str = "execution.log.json";

/// Writes `log` to `path` as pretty JSON. Creates parent directory if needed.
#[instrument(level = "trace", skip(path, log))]
pub fn write_execution_log(path: &Path, log: &ExecutionLog) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(log)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(path, json)
}

/// Loads an execution log from `path`.
pub fn load_execution_log(path: &Path) -> Result<ExecutionLog, std::io::Error> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
