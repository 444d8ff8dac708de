//! Configuration system: YAML config layered with env vars and CLI flags.

pub mod loader;
pub mod schema;

// Re-export the most commonly used types.
pub use loader::{apply_env_overrides, load_config, CliOverrides};
pub use schema::{AuditConfig, HookGateConfig, MarkerConfig, PolicyConfig};
