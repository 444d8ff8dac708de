//! Claude Code hook event handling: prompt conventions, tool policy,
//! and the per-event dispatcher.

pub mod classifier;
pub mod event;
pub mod handlers;
pub mod outcome;
pub mod policy;

pub use classifier::{Classification, PromptClassifier};
pub use event::{HookEvent, HookEventKind};
pub use handlers::{run_hook, Dispatcher};
pub use outcome::Outcome;
pub use policy::{Decision, Policy};
