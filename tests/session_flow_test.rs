//! End-to-end session flows through the file-backed dispatcher.
//!
//! Each `dispatch` call stands in for a separate hook process: the store is
//! rebuilt from config every time so nothing survives in memory.

use std::path::Path;

use serde_json::{json, Value};

use hookgate::config::HookGateConfig;
use hookgate::hooks::{Dispatcher, Outcome};
use hookgate::state::{FileFlagStore, FlagStore};
use hookgate::types::FlagKind;

fn config_in(dir: &Path, audit: bool) -> HookGateConfig {
    let mut config = HookGateConfig {
        state_dir: Some(dir.join("state")),
        ..Default::default()
    };
    config.audit.enabled = Some(audit);
    config
}

/// Handle one event as a fresh invocation would.
fn invoke(config: &HookGateConfig, event: Value) -> Outcome {
    let dispatcher = Dispatcher::from_config(config).unwrap();
    dispatcher.dispatch_guarded(&event.to_string())
}

fn prompt(session: &str, text: &str) -> Value {
    json!({"session_id": session, "hook_event_name": "UserPromptSubmit", "prompt": text})
}

fn tool(session: &str, name: &str, input: Value) -> Value {
    json!({"session_id": session, "hook_event_name": "PreToolUse", "tool_name": name, "tool_input": input})
}

fn boundary(session: &str, name: &str) -> Value {
    json!({"session_id": session, "hook_event_name": name})
}

#[test]
fn question_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);
    let store = FileFlagStore::new(config.resolved_state_dir());

    let outcome = invoke(&config, prompt("s1", "Q: what is x?"));
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        store.get("s1", FlagKind::Question).as_deref(),
        Some("what is x?")
    );

    let write = invoke(&config, tool("s1", "Write", json!({"file_path": "a.txt", "content": "x"})));
    assert_eq!(write.exit_code(), 2);
    assert!(write.body()["error"].is_string());

    let read = invoke(&config, tool("s1", "Read", json!({"file_path": "a.txt"})));
    assert_eq!(read, Outcome::neutral());

    assert_eq!(invoke(&config, boundary("s1", "SessionEnd")).exit_code(), 0);
    assert!(!store.has("s1", FlagKind::Question));
    assert!(!store.has("s1", FlagKind::CommitApproved));

    let write_again = invoke(&config, tool("s1", "Write", json!({"file_path": "a.txt"})));
    assert_eq!(write_again.exit_code(), 0);
}

#[test]
fn commit_approval_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);
    let commit = json!({"command": "git commit -m \"x\""});

    invoke(&config, prompt("s2", "commit! fix bug"));
    assert_eq!(invoke(&config, tool("s2", "Bash", commit.clone())).exit_code(), 0);
    assert_eq!(invoke(&config, tool("s2", "Bash", commit.clone())).exit_code(), 0);

    let fresh = invoke(&config, tool("s3", "Bash", commit.clone()));
    assert_eq!(fresh.exit_code(), 2);
    assert!(fresh.body()["error"]
        .as_str()
        .unwrap()
        .contains("POLICY VIOLATION"));

    // Approval ends with the session.
    invoke(&config, boundary("s2", "SessionStart"));
    assert_eq!(invoke(&config, tool("s2", "Bash", commit)).exit_code(), 2);
}

#[test]
fn flag_prefixed_commit_is_gated() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);
    let cmd = json!({"command": "git -c user.email=a@b.c commit -am wip"});

    assert_eq!(invoke(&config, tool("s4", "Bash", cmd.clone())).exit_code(), 2);
    invoke(&config, prompt("s4", "Commit! go ahead"));
    assert_eq!(invoke(&config, tool("s4", "Bash", cmd)).exit_code(), 0);
}

#[test]
fn quoted_option_commit_is_gated() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);

    for command in [
        r#"git -c "user.name=A B" commit -m x"#,
        r#"git -C "my repo" commit -m x"#,
        "git -c user.name='A B' commit -m x",
    ] {
        let outcome = invoke(&config, tool("s8", "Bash", json!({ "command": command })));
        assert_eq!(outcome.exit_code(), 2, "{command}");
    }
}

#[test]
fn similar_session_ids_keep_separate_state() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), true);
    let store = FileFlagStore::new(config.resolved_state_dir());

    invoke(&config, prompt("a.b", "Q: dotted?"));
    invoke(&config, prompt("a_b", "commit! underscored"));

    assert!(store.has("a.b", FlagKind::Question));
    assert!(!store.has("a.b", FlagKind::CommitApproved));
    assert!(store.has("a_b", FlagKind::CommitApproved));
    assert!(!store.has("a_b", FlagKind::Question));

    assert_eq!(invoke(&config, tool("a_b", "Write", json!({}))).exit_code(), 0);
    invoke(&config, boundary("a_b", "SessionEnd"));
    assert!(store.has("a.b", FlagKind::Question));

    let audit_dir = config.resolved_audit_dir();
    let dotted = std::fs::read_to_string(audit_dir.join("a_2Eb.jsonl")).unwrap();
    let underscored = std::fs::read_to_string(audit_dir.join("a_5Fb.jsonl")).unwrap();
    assert!(dotted.contains("dotted?"));
    assert!(!dotted.contains("underscored"));
    assert!(underscored.contains("underscored"));
}

#[test]
fn null_or_empty_session_id_is_unknown_session() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);
    let store = FileFlagStore::new(config.resolved_state_dir());

    let read = json!({
        "session_id": null,
        "hook_event_name": "PreToolUse",
        "tool_name": "Read",
        "tool_input": {"file_path": "a"},
    });
    assert_eq!(invoke(&config, read), Outcome::neutral());

    invoke(&config, prompt("", "Q: anyone?"));
    assert!(store.has("unknown", FlagKind::Question));
}

#[test]
fn neither_convention_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);
    let store = FileFlagStore::new(config.resolved_state_dir());

    for text in ["hello", "q: lower", "commit!now", "Q:tight", ""] {
        assert_eq!(invoke(&config, prompt("s5", text)), Outcome::neutral());
    }
    assert!(!store.has("s5", FlagKind::Question));
    assert!(!store.has("s5", FlagKind::CommitApproved));
    assert!(!config.resolved_state_dir().exists());
}

#[test]
fn malformed_event_is_fault() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), false);
    let dispatcher = Dispatcher::from_config(&config).unwrap();

    let outcome = dispatcher.dispatch_guarded("{\"session_id\": ");
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.body()["error"]
        .as_str()
        .unwrap()
        .starts_with("malformed hook event"));
}

#[test]
fn audit_trail_records_each_step() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path(), true);

    invoke(&config, prompt("s6", "Q: how?"));
    invoke(&config, tool("s6", "Edit", json!({"file_path": "a"})));
    invoke(&config, boundary("s6", "SessionEnd"));

    let log_path = config.resolved_audit_dir().join("s6.jsonl");
    let records: Vec<Value> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let kinds: Vec<&str> = records.iter().map(|r| r["kind"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "event_received",
            "classification",
            "response",
            "event_received",
            "decision",
            "response",
            "event_received",
            "response",
        ]
    );
    assert_eq!(records[1]["data"]["question"], "how?");
    assert_eq!(records[4]["data"]["decision"], "block");
    assert_eq!(records[5]["data"]["exit_code"], 2);
    assert!(records.iter().all(|r| r["timestamp"].is_string()));

    // Clearing flags leaves the history in place.
    assert!(log_path.is_file());
}

#[test]
fn broken_audit_dir_does_not_change_decisions() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_in(tmp.path(), true);
    let blocker = tmp.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();
    config.audit.dir = Some(blocker);

    invoke(&config, prompt("s7", "Q: still?"));
    assert_eq!(invoke(&config, tool("s7", "Write", json!({}))).exit_code(), 2);
    assert_eq!(invoke(&config, tool("s7", "Grep", json!({}))).exit_code(), 0);
}
