//! Session state: durable per-session flags shared across hook invocations.
//!
//! Every hook invocation is a separate process, so [`FileFlagStore`] keeps
//! nothing in memory and round-trips each call through the filesystem.
//! [`MemoryFlagStore`] offers the same contract for long-running hosts.
//!
//! Neither store guards a read-then-write sequence: callers must not deliver
//! two events for the same session concurrently.

pub mod file;
pub mod memory;

pub use file::FileFlagStore;
pub use memory::MemoryFlagStore;

use crate::error::Result;
use crate::types::{FlagKind, SessionFlags};

/// Existence flags keyed by `(session_id, kind)`, each carrying a text.
pub trait FlagStore {
    /// Whether the flag is set. A missing record is `false`, never an error.
    fn has(&self, session_id: &str, kind: FlagKind) -> bool;

    /// The text stored with the flag, if set.
    fn get(&self, session_id: &str, kind: FlagKind) -> Option<String>;

    /// Set the flag, overwriting any previous text.
    fn set(&self, session_id: &str, kind: FlagKind, text: &str) -> Result<()>;

    /// Remove the flag. Absent records are already cleared.
    fn clear(&self, session_id: &str, kind: FlagKind);

    /// Remove every flag kind for the session.
    fn clear_all(&self, session_id: &str) {
        for kind in FlagKind::ALL {
            self.clear(session_id, *kind);
        }
    }

    /// Presence snapshot of both flags.
    fn flags(&self, session_id: &str) -> SessionFlags {
        SessionFlags {
            question_pending: self.has(session_id, FlagKind::Question),
            commit_approved: self.has(session_id, FlagKind::CommitApproved),
        }
    }
}
