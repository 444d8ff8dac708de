//! Claude Code hook runtime handlers.
//!
//! One process handles one event: the payload is read completely from stdin,
//! routed by `hook_event_name`, and answered with exactly one JSON object.
//!
//! # Contract
//!
//! - **Exit 0**: allowed or neutral; the body goes to stdout.
//! - **Exit 2**: policy refusal; `{"error": ...}` goes to stderr.
//! - **Exit 1**: malformed input or an internal fault; `{"error": ...}` on
//!   stderr.
//! - **Never panic.** Dispatch runs under `catch_unwind`; a panic is a fault.
//!   [`run_hook`] swaps the default panic hook for one that only logs at
//!   `debug`, so the `{"error": ...}` body is the only thing on stderr.
//!
//! Session state is read and written without locking. The caller must not
//! deliver two events for the same session at the same time.

use std::io::Read;
use std::panic::{self, AssertUnwindSafe};

use serde_json::{json, Value};

use super::classifier::PromptClassifier;
use super::event::{HookEvent, HookEventKind};
use super::outcome::Outcome;
use super::policy::{Decision, Policy};
use crate::config::HookGateConfig;
use crate::error::Result;
use crate::observability::{AuditKind, AuditLog};
use crate::state::{FileFlagStore, FlagStore};
use crate::types::{FlagKind, UNKNOWN_SESSION};

const QUESTION_INSTRUCTION: &str = "The user is asking a question, not requesting changes. \
Respond with an answer only. Do not invoke any tools, edit files, or run commands while \
answering.";

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// **Hook entry point.** Reads one event from stdin and handles it with the
/// file-backed store described by `config`.
pub fn run_hook(config: &HookGateConfig) -> Outcome {
    let raw = match read_hook_input() {
        Ok(raw) => raw,
        Err(e) => return Outcome::Fault(format!("failed to read hook event: {e}")),
    };

    silence_panic_output();

    match Dispatcher::from_config(config) {
        Ok(dispatcher) => dispatcher.dispatch_guarded(&raw),
        Err(e) => Outcome::Fault(format!("failed to initialize hook handler: {e}")),
    }
}

/// The process exits right after one dispatch, so the hook is never restored.
fn silence_panic_output() {
    panic::set_hook(Box::new(|info| {
        tracing::debug!(panic = %info, "hook handler panicked");
    }));
}

/// Drain stdin completely before anything is parsed.
fn read_hook_input() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes events to their handlers. The only mutator of the flag store.
#[derive(Debug)]
pub struct Dispatcher<S: FlagStore> {
    store: S,
    classifier: PromptClassifier,
    policy: Policy,
    audit: AuditLog,
}

impl Dispatcher<FileFlagStore> {
    pub fn from_config(config: &HookGateConfig) -> Result<Self> {
        let audit = if config.audit.is_enabled() {
            AuditLog::enabled(config.resolved_audit_dir())
        } else {
            AuditLog::disabled()
        };
        Ok(Dispatcher::new(
            FileFlagStore::new(config.resolved_state_dir()),
            PromptClassifier::new(&config.markers)?,
            Policy::new(&config.policy)?,
            audit,
        ))
    }
}

impl<S: FlagStore> Dispatcher<S> {
    pub fn new(store: S, classifier: PromptClassifier, policy: Policy, audit: AuditLog) -> Self {
        Self {
            store,
            classifier,
            policy,
            audit,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// [`dispatch`](Self::dispatch), with any panic reported as a fault.
    pub fn dispatch_guarded(&self, raw: &str) -> Outcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(raw))).unwrap_or_else(|_| {
            tracing::error!("hook handler panicked");
            Outcome::Fault("internal error while handling hook event".to_string())
        })
    }

    /// Handle one complete raw payload.
    pub fn dispatch(&self, raw: &str) -> Outcome {
        let event = match HookEvent::parse(raw) {
            Ok(event) => event,
            Err(e) => {
                let outcome = Outcome::Fault(format!("malformed hook event: {e}"));
                self.audit.record(
                    UNKNOWN_SESSION,
                    AuditKind::Response,
                    "",
                    json!({"outcome": outcome.label(), "error": e.to_string()}),
                );
                return outcome;
            }
        };

        let session = event.session_id.as_str();
        if self.audit.is_enabled() {
            self.audit.record(
                session,
                AuditKind::EventReceived,
                event.name(),
                json!({
                    "prompt": event.prompt,
                    "tool_name": event.tool_name,
                    "tool_input": event.tool_input,
                }),
            );
        }

        let outcome = match event.kind() {
            HookEventKind::UserPromptSubmit => self.on_prompt_submit(&event),
            HookEventKind::PreToolUse => self.on_pre_tool_use(&event),
            kind if kind.is_session_boundary() => self.on_session_boundary(&event),
            _ => Outcome::neutral(),
        };

        self.audit.record(
            session,
            AuditKind::Response,
            event.name(),
            json!({
                "outcome": outcome.label(),
                "exit_code": outcome.exit_code(),
                "body": outcome.body(),
            }),
        );
        outcome
    }

    // -----------------------------------------------------------------------
    // UserPromptSubmit
    // -----------------------------------------------------------------------

    /// **Hook: `UserPromptSubmit`**
    ///
    /// Records each marker convention the prompt matches. A question also
    /// injects an answer-only instruction. Never blocks.
    fn on_prompt_submit(&self, event: &HookEvent) -> Outcome {
        let session = event.session_id.as_str();
        let prompt = event.prompt.as_deref().unwrap_or("");
        let classification = self.classifier.classify(prompt);

        self.audit.record(
            session,
            AuditKind::Classification,
            event.name(),
            serde_json::to_value(&classification).unwrap_or_default(),
        );

        if classification.is_empty() {
            return Outcome::neutral();
        }
        tracing::debug!(
            session,
            question = classification.is_question(),
            commit_approved = classification.is_commit_approved(),
            "prompt matched a convention"
        );

        if let Some(text) = &classification.commit_approval {
            self.persist(session, FlagKind::CommitApproved, text);
        }

        match &classification.question {
            Some(text) => {
                self.persist(session, FlagKind::Question, text);
                Outcome::Allow(question_context(text))
            }
            None => Outcome::neutral(),
        }
    }

    fn persist(&self, session: &str, kind: FlagKind, text: &str) {
        if let Err(e) = self.store.set(session, kind, text) {
            tracing::warn!(session, flag = %kind, error = %e, "failed to persist flag");
        }
    }

    // -----------------------------------------------------------------------
    // PreToolUse
    // -----------------------------------------------------------------------

    /// **Hook: `PreToolUse`**
    ///
    /// Evaluates the proposed tool call against the session's flags.
    fn on_pre_tool_use(&self, event: &HookEvent) -> Outcome {
        let session = event.session_id.as_str();
        let tool_name = event.tool_name.as_deref().unwrap_or("");
        let flags = self.store.flags(session);
        let decision = self.policy.evaluate(tool_name, &event.tool_input, flags);
        let reason = match &decision {
            Decision::Block(msg) => Value::String(msg.clone()),
            Decision::Allow => Value::Null,
        };

        self.audit.record(
            session,
            AuditKind::Decision,
            event.name(),
            json!({
                "tool_name": tool_name,
                "flags": flags,
                "decision": decision.label(),
                "reason": reason,
            }),
        );

        if decision.is_block() {
            tracing::info!(session, tool = tool_name, "tool call blocked");
        }
        match decision {
            Decision::Allow => Outcome::neutral(),
            Decision::Block(msg) => Outcome::Block(msg),
        }
    }

    // -----------------------------------------------------------------------
    // SessionStart / SessionEnd
    // -----------------------------------------------------------------------

    /// **Hook: `SessionStart` / `SessionEnd`**
    ///
    /// Both boundaries reset the session to "no flags set".
    fn on_session_boundary(&self, event: &HookEvent) -> Outcome {
        self.store.clear_all(&event.session_id);
        Outcome::neutral()
    }
}

fn question_context(question: &str) -> Value {
    json!({
        "hookSpecificOutput": {
            "hookEventName": "UserPromptSubmit",
            "additionalContext": format!("{QUESTION_INSTRUCTION}\n\nQuestion: {question}"),
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
