//! Prompt prefix conventions.
//!
//! Two independent recognizers run over every submitted prompt:
//!
//! - **Question**: case-sensitive marker (default `Q:`) followed by at least
//!   one whitespace character.
//! - **Commit approval**: case-insensitive marker (default `commit!`)
//!   followed by whitespace or the end of the prompt.
//!
//! A prompt may match both. The residual is the prompt with the marker and
//! the whitespace after it removed.

use regex::Regex;
use serde::Serialize;

use crate::config::MarkerConfig;
use crate::error::Result;

/// What the classifier found in one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Residual text when the question convention matched.
    pub question: Option<String>,
    /// Residual text when the commit approval convention matched.
    pub commit_approval: Option<String>,
}

impl Classification {
    pub fn is_question(&self) -> bool {
        self.question.is_some()
    }

    pub fn is_commit_approved(&self) -> bool {
        self.commit_approval.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.commit_approval.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PromptClassifier {
    question: Regex,
    commit_approval: Regex,
}

impl PromptClassifier {
    pub fn new(markers: &MarkerConfig) -> Result<Self> {
        let question = Regex::new(&format!(r"^{}\s+", regex::escape(&markers.question)))?;
        let commit_approval = Regex::new(&format!(
            r"(?i)^{}(?:\s+|$)",
            regex::escape(&markers.commit_approval)
        ))?;
        Ok(Self {
            question,
            commit_approval,
        })
    }

    pub fn classify(&self, prompt: &str) -> Classification {
        Classification {
            question: strip_prefix(&self.question, prompt),
            commit_approval: strip_prefix(&self.commit_approval, prompt),
        }
    }
}

fn strip_prefix(pattern: &Regex, prompt: &str) -> Option<String> {
    pattern
        .find(prompt)
        .map(|m| prompt[m.end()..].to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
