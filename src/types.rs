//! Core domain types for hookgate.

use serde::{Deserialize, Serialize};

/// Session id used when an event carries none.
pub const UNKNOWN_SESSION: &str = "unknown";

// ---------------------------------------------------------------------------
// FlagKind
// ---------------------------------------------------------------------------

/// The per-session facts hookgate tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// A question prompt is awaiting an answer.
    Question,
    /// The user approved git commits for this session.
    CommitApproved,
}

impl FlagKind {
    /// Every kind, in a stable order. Session cleanup iterates this.
    pub const ALL: &'static [FlagKind] = &[FlagKind::Question, FlagKind::CommitApproved];

    /// Canonical string representation, also used as the record file suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::CommitApproved => "commit_approved",
        }
    }
}

impl std::fmt::Display for FlagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionFlags
// ---------------------------------------------------------------------------

/// Snapshot of a session's flag presence, as the policy sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub question_pending: bool,
    pub commit_approved: bool,
}

// ---------------------------------------------------------------------------
// Session ids
// ---------------------------------------------------------------------------

/// Encode a session id as a file stem.
///
/// ASCII letters, digits and `-` are kept. Every other byte, `_` included,
/// becomes `_XX` (uppercase hex), so distinct ids never share a stem. The
/// empty id encodes to a lone `_`, which no other id produces.
pub fn encode_session_id(session_id: &str) -> String {
    if session_id.is_empty() {
        return "_".to_string();
    }
    let mut encoded = String::with_capacity(session_id.len());
    for byte in session_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("_{byte:02X}"));
        }
    }
    encoded
}
