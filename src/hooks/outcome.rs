//! Result of handling one hook event, and its translation to the process
//! boundary (response body, output channel, exit code).

use serde_json::{json, Value};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAULT: i32 = 1;
pub const EXIT_BLOCK: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Proceed. Carries the response body (`{}` when there is nothing to add).
    Allow(Value),
    /// Deliberate policy refusal.
    Block(String),
    /// Input could not be handled.
    Fault(String),
}

impl Outcome {
    /// Allow with the empty response.
    pub fn neutral() -> Self {
        Outcome::Allow(json!({}))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Allow(_) => EXIT_OK,
            Outcome::Block(_) => EXIT_BLOCK,
            Outcome::Fault(_) => EXIT_FAULT,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Allow(_) => "allow",
            Outcome::Block(_) => "block",
            Outcome::Fault(_) => "fault",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Outcome::Allow(body) => body.clone(),
            Outcome::Block(msg) | Outcome::Fault(msg) => json!({ "error": msg }),
        }
    }

    /// Write the body to its channel: stdout when allowed, stderr otherwise.
    pub fn emit(&self) {
        match self {
            Outcome::Allow(_) => println!("{}", self.body()),
            Outcome::Block(_) | Outcome::Fault(_) => eprintln!("{}", self.body()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::neutral().exit_code(), 0);
        assert_eq!(Outcome::Block("no".into()).exit_code(), 2);
        assert_eq!(Outcome::Fault("bad".into()).exit_code(), 1);
    }

    #[test]
    fn bodies() {
        assert_eq!(Outcome::neutral().body(), json!({}));
        assert_eq!(
            Outcome::Block("no".into()).body(),
            json!({"error": "no"})
        );
        assert_eq!(
            Outcome::Fault("bad".into()).body(),
            json!({"error": "bad"})
        );
    }

    #[test]
    fn allow_keeps_payload() {
        let body = json!({"hookSpecificOutput": {"additionalContext": "x"}});
        assert_eq!(Outcome::Allow(body.clone()).body(), body);
    }
}
