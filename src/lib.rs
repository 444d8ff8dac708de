//! hookgate: per-session policy hooks for Claude Code.
//!
//! Tracks two prompt-driven session flags (a pending question and commit
//! approval) across independent hook invocations, and uses them to allow or
//! refuse proposed tool calls.

pub mod config;
pub mod error;
pub mod hooks;
pub mod observability;
pub mod state;
pub mod types;
