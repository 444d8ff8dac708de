//! File-backed flag store: one small text file per `(session, kind)`.
//!
//! Layout: `<state_dir>/<encoded-session>.<kind>`, content is the flag text.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::FlagStore;
use crate::error::Result;
use crate::types::{encode_session_id, FlagKind};

#[derive(Debug, Clone)]
pub struct FileFlagStore {
    dir: PathBuf,
}

impl FileFlagStore {
    /// Create a store rooted at `dir`. The directory is created lazily on the
    /// first `set`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, session_id: &str, kind: FlagKind) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_session_id(session_id), kind.as_str()))
    }
}

impl FlagStore for FileFlagStore {
    fn has(&self, session_id: &str, kind: FlagKind) -> bool {
        self.record_path(session_id, kind).is_file()
    }

    fn get(&self, session_id: &str, kind: FlagKind) -> Option<String> {
        fs::read_to_string(self.record_path(session_id, kind)).ok()
    }

    fn set(&self, session_id: &str, kind: FlagKind, text: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.record_path(session_id, kind), text)?;
        tracing::debug!(session = session_id, flag = %kind, "flag set");
        Ok(())
    }

    fn clear(&self, session_id: &str, kind: FlagKind) {
        match fs::remove_file(self.record_path(session_id, kind)) {
            Ok(()) => tracing::debug!(session = session_id, flag = %kind, "flag cleared"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::debug!(session = session_id, flag = %kind, error = %e, "clear failed, treating as absent")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
