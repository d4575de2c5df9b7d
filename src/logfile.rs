//! Append-only JSONL session log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::record::LogRecord;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("log I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One file per collection session, named with the session-start timestamp.
/// Opened once in append mode; the handle lives for the session. A failed
/// append affects only that record.
pub struct SessionLog {
    file: File,
    path: PathBuf,
}

impl SessionLog {
    pub fn create(dir: &Path, session_start_ms: i64) -> std::io::Result<Self> {
        let path = dir.join(format!("link_samples_{session_start_ms}.jsonl"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, path })
    }

    pub fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
