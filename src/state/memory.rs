//! In-memory flag store for hosts that outlive a single event.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::FlagStore;
use crate::error::Result;
use crate::types::FlagKind;

#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: Mutex<HashMap<(String, FlagKind), String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with at least one flag set.
    pub fn session_count(&self) -> usize {
        let flags = self.lock();
        let mut sessions: Vec<&str> = flags.keys().map(|(s, _)| s.as_str()).collect();
        sessions.sort_unstable();
        sessions.dedup();
        sessions.len()
    }

    // A poisoned lock only means another thread panicked mid-update; the map
    // itself is still a valid set of flags.
    fn lock(&self) -> MutexGuard<'_, HashMap<(String, FlagKind), String>> {
        self.flags.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FlagStore for MemoryFlagStore {
    fn has(&self, session_id: &str, kind: FlagKind) -> bool {
        self.lock().contains_key(&(session_id.to_string(), kind))
    }

    fn get(&self, session_id: &str, kind: FlagKind) -> Option<String> {
        self.lock().get(&(session_id.to_string(), kind)).cloned()
    }

    fn set(&self, session_id: &str, kind: FlagKind, text: &str) -> Result<()> {
        self.lock()
            .insert((session_id.to_string(), kind), text.to_string());
        Ok(())
    }

    fn clear(&self, session_id: &str, kind: FlagKind) {
        self.lock().remove(&(session_id.to_string(), kind));
    }

    fn clear_all(&self, session_id: &str) {
        self.lock().retain(|(s, _), _| s != session_id);
    }
}
