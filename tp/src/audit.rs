//! Append-only action audit log
//!
//! Records a human-readable message for every completed mutating action.
//! Appending is fire-and-forget from the pipeline's perspective: failures
//! are logged, never surfaced to the user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors while writing to the audit log
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub user_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only sink for completed actions
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, user_id: &str, message: &str) -> Result<(), AuditError>;
}

/// File-backed sink writing one JSON record per line
pub struct JsonlAuditSink {
    path: PathBuf,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn append(&self, user_id: &str, message: &str) -> Result<(), AuditError> {
        let record = ActionRecord {
            user_id: user_id.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        };
        let line = serde_json::to_string(&record)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;

        debug!(user_id, "append: action recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_writes_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actions.jsonl");
        let sink = JsonlAuditSink::new(&path);

        sink.append("user-1", "Agent action: Deleted playlist \"Gym\".")
            .await
            .unwrap();
        sink.append("user-1", "Agent action: Created playlist \"Study\".")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: ActionRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.user_id, "user-1");
        assert!(first.message.contains("Deleted playlist"));
    }

    #[tokio::test]
    async fn test_append_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("actions.jsonl");
        let sink = JsonlAuditSink::new(&path);

        sink.append("user-2", "Agent action: Renamed a playlist.").await.unwrap();
        assert!(path.exists());
    }
}
