//! Append-only audit trail, one JSON line per step, one file per session.
//!
//! Writing is best-effort: every failure is dropped after a `debug!` so the
//! trail can never change a decision or the exit code.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::types::encode_session_id;

/// Step label attached to each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    EventReceived,
    Classification,
    Decision,
    Response,
}

#[derive(Debug, Serialize)]
struct AuditRecord<'a> {
    timestamp: String,
    kind: AuditKind,
    event: &'a str,
    data: &'a Value,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: Option<PathBuf>,
}

impl AuditLog {
    /// A logger writing under `dir`.
    pub fn enabled(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// A logger that records nothing.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Path of the log file for `session_id`, if enabled.
    pub fn path_for(&self, session_id: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|d| d.join(format!("{}.jsonl", encode_session_id(session_id))))
    }

    /// Append one record. Never fails.
    pub fn record(&self, session_id: &str, kind: AuditKind, event: &str, data: Value) {
        let Some(path) = self.path_for(session_id) else {
            return;
        };
        let record = AuditRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            kind,
            event,
            data: &data,
        };
        if let Err(e) = append_line(&path, &record) {
            tracing::debug!(path = %path.display(), error = %e, "audit write dropped");
        }
    }
}

fn append_line(path: &Path, record: &AuditRecord<'_>) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
