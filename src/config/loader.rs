//! Multi-source config loading with priority merging.
//!
//! Priority order (highest wins):
//!   CLI flags > Environment vars > Project config > User config > Defaults

use std::path::{Path, PathBuf};

use super::schema::{HookGateConfig, PolicyConfig, MarkerConfig};
use crate::error::HookGateError;

pub const ENV_STATE_DIR: &str = "HOOKGATE_STATE_DIR";
pub const ENV_AUDIT: &str = "HOOKGATE_AUDIT";
pub const ENV_AUDIT_DIR: &str = "HOOKGATE_AUDIT_DIR";
pub const ENV_READ_ONLY_TOOLS: &str = "HOOKGATE_READ_ONLY_TOOLS";

/// Name of the per-project config file.
pub const PROJECT_CONFIG_FILE: &str = ".hookgate.yaml";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Values supplied on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub state_dir: Option<PathBuf>,
    pub audit: bool,
}

/// Load configuration from all available sources and merge them.
///
/// Sources (low → high priority):
///   1. Built-in defaults
///   2. User config  (`~/.config/hookgate/config.yaml`)
///   3. Project config (`.hookgate.yaml` in `project_dir`)
///   4. Environment variables (`HOOKGATE_*`)
///   5. CLI flags
pub fn load_config(
    cli: &CliOverrides,
    project_dir: Option<&Path>,
) -> Result<HookGateConfig, HookGateError> {
    let mut config = HookGateConfig::default();

    if let Some(user) = load_user_config() {
        config = merge_configs(config, user);
    }

    if let Some(dir) = project_dir {
        if let Some(project) = load_project_config(dir) {
            config = merge_configs(config, project);
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    if let Some(dir) = &cli.state_dir {
        config.state_dir = Some(dir.clone());
    }
    if cli.audit {
        config.audit.enabled = Some(true);
    }

    validate(&config)?;
    Ok(config)
}

/// Load user config from the platform-specific config directory.
///
/// Returns `None` if the file does not exist or is unparseable.
pub fn load_user_config() -> Option<HookGateConfig> {
    let path = user_config_path()?;
    load_config_file(&path)
}

/// Load project config from `.hookgate.yaml` in the given directory.
///
/// Returns `None` if the file does not exist or is unparseable.
pub fn load_project_config(dir: &Path) -> Option<HookGateConfig> {
    load_config_file(&dir.join(PROJECT_CONFIG_FILE))
}

/// Apply environment overrides to a config in place.
///
/// `lookup` resolves a variable name to its value; production code passes
/// `std::env::var`, tests pass a map.
///
/// Supported variables:
/// - `HOOKGATE_STATE_DIR`: flag record directory
/// - `HOOKGATE_AUDIT`: `"1"`, `"true"` or `"yes"` enables the audit trail
/// - `HOOKGATE_AUDIT_DIR`: audit log directory
/// - `HOOKGATE_READ_ONLY_TOOLS`: comma-separated tool allow-list
pub fn apply_env_overrides<F>(config: &mut HookGateConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_STATE_DIR).filter(|v| !v.trim().is_empty()) {
        config.state_dir = Some(PathBuf::from(val.trim()));
    }

    if let Some(val) = lookup(ENV_AUDIT) {
        config.audit.enabled = Some(matches!(
            val.trim().to_lowercase().as_str(),
            "1" | "true" | "yes"
        ));
    }

    if let Some(val) = lookup(ENV_AUDIT_DIR).filter(|v| !v.trim().is_empty()) {
        config.audit.dir = Some(PathBuf::from(val.trim()));
    }

    if let Some(val) = lookup(ENV_READ_ONLY_TOOLS) {
        let tools: Vec<String> = val
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !tools.is_empty() {
            config.policy.read_only_tools = tools;
        }
    }
}

/// Reject configs the classifier and policy cannot work with.
pub fn validate(config: &HookGateConfig) -> Result<(), HookGateError> {
    if config.markers.question.trim().is_empty() {
        return Err(HookGateError::Config(
            "markers.question must not be empty".into(),
        ));
    }
    if config.markers.commit_approval.trim().is_empty() {
        return Err(HookGateError::Config(
            "markers.commit_approval must not be empty".into(),
        ));
    }
    if config.policy.shell_tool.trim().is_empty() {
        return Err(HookGateError::Config(
            "policy.shell_tool must not be empty".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Platform-specific user config path via the `directories` crate.
fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "hookgate", "hookgate")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Try to load and parse a YAML config file. Returns `None` on any error.
fn load_config_file(path: &Path) -> Option<HookGateConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` fields take priority over `base` wherever
/// the overlay differs from the built-in default. Optional fields win
/// whenever the overlay sets them.
fn merge_configs(mut base: HookGateConfig, overlay: HookGateConfig) -> HookGateConfig {
    if overlay.version != "1.0" {
        base.version = overlay.version;
    }

    if overlay.state_dir.is_some() {
        base.state_dir = overlay.state_dir;
    }

    if overlay.audit.enabled.is_some() {
        base.audit.enabled = overlay.audit.enabled;
    }
    if overlay.audit.dir.is_some() {
        base.audit.dir = overlay.audit.dir;
    }

    let default_policy = PolicyConfig::default();
    if overlay.policy.read_only_tools != default_policy.read_only_tools {
        base.policy.read_only_tools = overlay.policy.read_only_tools;
    }
    if overlay.policy.shell_tool != default_policy.shell_tool {
        base.policy.shell_tool = overlay.policy.shell_tool;
    }

    let default_markers = MarkerConfig::default();
    if overlay.markers.question != default_markers.question {
        base.markers.question = overlay.markers.question;
    }
    if overlay.markers.commit_approval != default_markers.commit_approval {
        base.markers.commit_approval = overlay.markers.commit_approval;
    }

    base
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
