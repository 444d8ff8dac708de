//! Pre-tool-use policy.
//!
//! Rules, first match wins:
//!
//! 1. A pending question blocks every tool outside the read-only allow-list.
//! 2. A shell command that runs `git commit` is blocked unless the session
//!    has commit approval.
//! 3. Everything else is allowed.

use std::collections::BTreeSet;

use regex::Regex;
use serde_json::Value;

use crate::config::PolicyConfig;
use crate::error::Result;
use crate::types::SessionFlags;

/// `git`, any number of option tokens (each optionally followed by one
/// argument, as in `-c key=value` or `-C dir`), then the `commit` subcommand.
///
/// A shell word is a run of quoted spans and unquoted non-space characters,
/// so `-c "user.name=A B"` and `-C 'my repo'` each count as one option.
const GIT_COMMIT_PATTERN: &str = concat!(
    r"\bgit\s+",
    // option word, then an optional argument word that does not start with `-`
    r#"(?:-(?:"[^"]*"|'[^']*'|[^\s"'])+"#,
    r#"(?:\s+(?:"[^"]*"|'[^']*'|[^-\s"'])(?:"[^"]*"|'[^']*'|[^\s"'])*)?\s+)*"#,
    r#"commit(?:$|[\s;&|)'"])"#,
);

/// Result of evaluating one proposed tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Block(String),
}

impl Decision {
    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Block(_) => "block",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    read_only_tools: BTreeSet<String>,
    shell_tool: String,
    git_commit: Regex,
}

impl Policy {
    pub fn new(config: &PolicyConfig) -> Result<Self> {
        Ok(Self {
            read_only_tools: config.read_only_tools.iter().cloned().collect(),
            shell_tool: config.shell_tool.clone(),
            git_commit: Regex::new(GIT_COMMIT_PATTERN)?,
        })
    }

    pub fn is_read_only(&self, tool_name: &str) -> bool {
        self.read_only_tools.contains(tool_name)
    }

    /// Whether a shell command line invokes `git commit`.
    pub fn is_git_commit(&self, command: &str) -> bool {
        self.git_commit.is_match(command)
    }

    pub fn evaluate(&self, tool_name: &str, tool_input: &Value, flags: SessionFlags) -> Decision {
        if flags.question_pending && !self.is_read_only(tool_name) {
            return Decision::Block(self.question_pending_message(tool_name));
        }

        if tool_name == self.shell_tool && !flags.commit_approved {
            if let Some(command) = shell_command(tool_input) {
                if self.is_git_commit(command) {
                    return Decision::Block(unapproved_commit_message());
                }
            }
        }

        Decision::Allow
    }

    fn question_pending_message(&self, tool_name: &str) -> String {
        let allowed: Vec<&str> = self.read_only_tools.iter().map(String::as_str).collect();
        format!(
            "The user asked a question that has not been answered yet. Answering it takes \
             priority over any action: `{tool_name}` is not allowed now. Reply with the answer \
             only. Read-only tools still available: {}.",
            allowed.join(", ")
        )
    }
}

fn unapproved_commit_message() -> String {
    "POLICY VIOLATION: git commits require explicit user approval in this session. \
     Do not commit. Stage nothing further, report the change, and wait for the user to \
     approve by starting a prompt with `commit!`."
        .to_string()
}

/// The command line of a shell tool call. Older payloads used `cmd`.
fn shell_command(tool_input: &Value) -> Option<&str> {
    tool_input["command"]
        .as_str()
        .or_else(|| tool_input["cmd"].as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
