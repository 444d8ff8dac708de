//! Diagnostic logging and the per-session audit trail.
//!
//! - [`init_logging`]: one-time `tracing` setup with `RUST_LOG` support
//! - [`audit::AuditLog`]: optional append-only JSON-lines record of each
//!   event hookgate handles

pub mod audit;

pub use audit::{AuditKind, AuditLog};

use tracing_subscriber::EnvFilter;

/// Initialize diagnostic logging with `RUST_LOG` environment variable support.
///
/// Defaults to `hookgate=warn`. Output goes to stderr without ANSI colors;
/// stdout is reserved for the hook response. Subsequent calls are silently
/// ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hookgate=warn"));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_does_not_panic() {
        init_logging();
        // Second call should also not panic (try_init ignores re-init).
        init_logging();
    }
}
