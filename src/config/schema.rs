//! Configuration data structures for hookgate.
//!
//! Defines the YAML config format: storage locations, audit logging, the
//! tool policy, and the prompt marker conventions. Designed for multi-source
//! loading with serde.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for hookgate.
///
/// Loaded from YAML files, environment variables, and CLI flags.
/// Multiple sources are merged with well-defined priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookGateConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Directory holding per-session flag records. `None` = platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Tool policy.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Prompt prefix conventions.
    #[serde(default)]
    pub markers: MarkerConfig,
}

impl Default for HookGateConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            state_dir: None,
            audit: AuditConfig::default(),
            policy: PolicyConfig::default(),
            markers: MarkerConfig::default(),
        }
    }
}

impl HookGateConfig {
    /// Directory where flag records live.
    pub fn resolved_state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| default_data_root().join("state"))
    }

    /// Directory where per-session audit logs live.
    pub fn resolved_audit_dir(&self) -> PathBuf {
        if let Some(dir) = &self.audit.dir {
            return dir.clone();
        }
        match &self.state_dir {
            Some(state) => state
                .parent()
                .map(|p| p.join("logs"))
                .unwrap_or_else(|| state.join("logs")),
            None => default_data_root().join("logs"),
        }
    }
}

// ---------------------------------------------------------------------------
// AuditConfig
// ---------------------------------------------------------------------------

/// Append-only audit trail toggle and location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether to write the audit trail at all. `None` leaves the decision to
    /// a lower-priority source, and is off when no source sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override for the log directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl AuditConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// PolicyConfig
// ---------------------------------------------------------------------------

/// Inputs to the pre-tool-use policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Tools that stay usable while a question is pending.
    #[serde(default = "default_read_only_tools")]
    pub read_only_tools: Vec<String>,

    /// Name of the shell-execution tool whose commands are checked for commits.
    #[serde(default = "default_shell_tool")]
    pub shell_tool: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            read_only_tools: default_read_only_tools(),
            shell_tool: default_shell_tool(),
        }
    }
}

// ---------------------------------------------------------------------------
// MarkerConfig
// ---------------------------------------------------------------------------

/// Prompt prefixes that set session flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Case-sensitive question marker.
    #[serde(default = "default_question_marker")]
    pub question: String,

    /// Case-insensitive commit approval marker.
    #[serde(default = "default_commit_marker")]
    pub commit_approval: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            question: default_question_marker(),
            commit_approval: default_commit_marker(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_READ_ONLY_TOOLS: &[&str] = &[
    "Read",
    "Grep",
    "Glob",
    "LS",
    "WebFetch",
    "WebSearch",
    "TodoRead",
];

fn default_version() -> String {
    "1.0".to_string()
}

fn default_read_only_tools() -> Vec<String> {
    DEFAULT_READ_ONLY_TOOLS.iter().map(|s| s.to_string()).collect()
}

fn default_shell_tool() -> String {
    "Bash".to_string()
}

fn default_question_marker() -> String {
    "Q:".to_string()
}

fn default_commit_marker() -> String {
    "commit!".to_string()
}

/// Platform data directory via the `directories` crate, falling back to the
/// system temp dir when no home directory is known.
fn default_data_root() -> PathBuf {
    directories::ProjectDirs::from("dev", "hookgate", "hookgate")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("hookgate"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = HookGateConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.state_dir.is_none());
        assert_eq!(config.audit.enabled, None);
        assert!(!config.audit.is_enabled());
        assert_eq!(config.policy.shell_tool, "Bash");
        assert_eq!(config.markers.question, "Q:");
        assert_eq!(config.markers.commit_approval, "commit!");
        assert!(config.policy.read_only_tools.iter().any(|t| t == "Read"));
        assert!(!config.policy.read_only_tools.iter().any(|t| t == "Write"));
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: HookGateConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, HookGateConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
policy:
  read_only_tools: [Read]
markers:
  question: "??"
"#;
        let config: HookGateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.policy.read_only_tools, vec!["Read".to_string()]);
        assert_eq!(config.policy.shell_tool, "Bash");
        assert_eq!(config.markers.question, "??");
        assert_eq!(config.markers.commit_approval, "commit!");
    }

    #[test]
    fn explicit_audit_toggle_is_kept() {
        let config: HookGateConfig = serde_yaml::from_str("audit:\n  enabled: false\n").unwrap();
        assert_eq!(config.audit.enabled, Some(false));
        assert!(!config.audit.is_enabled());

        let config: HookGateConfig = serde_yaml::from_str("audit:\n  enabled: true\n").unwrap();
        assert!(config.audit.is_enabled());
    }

    #[test]
    fn explicit_state_dir_wins() {
        let config = HookGateConfig {
            state_dir: Some(PathBuf::from("/tmp/hg/state")),
            ..Default::default()
        };
        assert_eq!(config.resolved_state_dir(), PathBuf::from("/tmp/hg/state"));
        assert_eq!(config.resolved_audit_dir(), PathBuf::from("/tmp/hg/logs"));
    }

    #[test]
    fn explicit_audit_dir_wins() {
        let mut config = HookGateConfig::default();
        config.audit.dir = Some(PathBuf::from("/var/log/hookgate"));
        assert_eq!(
            config.resolved_audit_dir(),
            PathBuf::from("/var/log/hookgate")
        );
    }

    #[test]
    fn default_dirs_are_siblings() {
        let config = HookGateConfig::default();
        let state = config.resolved_state_dir();
        let logs = config.resolved_audit_dir();
        assert_eq!(state.parent(), logs.parent());
        assert!(state.ends_with("state"));
        assert!(logs.ends_with("logs"));
    }
}
