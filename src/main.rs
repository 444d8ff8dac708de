use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use hookgate::config::{load_config, CliOverrides, HookGateConfig};
use hookgate::hooks::Outcome;
use hookgate::state::{FileFlagStore, FlagStore};
use hookgate::types::FlagKind;

#[derive(Parser)]
#[command(name = "hookgate")]
#[command(version, about = "Per-session policy hooks for Claude Code: question gating and commit approval")]
struct Cli {
    /// Override the flag state directory
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one hook event from stdin (invoked by Claude Code)
    Hook {
        /// Append an audit trail for this event
        #[arg(long)]
        audit: bool,
    },
    /// Inspect or reset session flags
    State {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Print the resolved configuration as YAML
    Config,
}

#[derive(Subcommand)]
enum StateAction {
    /// Show the flags currently set for a session
    Show {
        /// Session id
        session_id: String,
    },
    /// Clear every flag for a session
    Clear {
        /// Session id
        session_id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    hookgate::observability::init_logging();

    let overrides = CliOverrides {
        state_dir: cli.state_dir.clone(),
        audit: matches!(cli.command, Commands::Hook { audit: true }),
    };
    let cwd = std::env::current_dir().ok();

    match cli.command {
        Commands::Hook { .. } => {
            let outcome = match load_config(&overrides, cwd.as_deref()) {
                Ok(config) => hookgate::hooks::run_hook(&config),
                Err(e) => Outcome::Fault(format!("invalid configuration: {e}")),
            };
            outcome.emit();
            process::exit(outcome.exit_code());
        }
        Commands::State { action } => {
            let config = config_or_exit(&overrides, cwd.as_deref());
            cmd_state(&config, action);
        }
        Commands::Config => {
            let config = config_or_exit(&overrides, cwd.as_deref());
            cmd_config(&config);
        }
    }
}

// ---------------------------------------------------------------------------
// CLI command implementations
// ---------------------------------------------------------------------------

fn config_or_exit(overrides: &CliOverrides, cwd: Option<&std::path::Path>) -> HookGateConfig {
    load_config(overrides, cwd).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
}

fn cmd_state(config: &HookGateConfig, action: StateAction) {
    let store = FileFlagStore::new(config.resolved_state_dir());

    match action {
        StateAction::Show { session_id } => {
            let mut flags = serde_json::Map::new();
            for kind in FlagKind::ALL {
                let value = store
                    .get(&session_id, *kind)
                    .map(serde_json::Value::String)
                    .unwrap_or(serde_json::Value::Null);
                flags.insert(kind.as_str().to_string(), value);
            }
            let report = serde_json::json!({
                "session_id": session_id,
                "state_dir": store.dir().display().to_string(),
                "flags": flags,
            });
            match serde_json::to_string_pretty(&report) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: cannot render state: {}", e);
                    process::exit(1);
                }
            }
        }
        StateAction::Clear { session_id } => {
            store.clear_all(&session_id);
            eprintln!("[hookgate] Cleared all flags for session '{}'.", session_id);
        }
    }
}

fn cmd_config(config: &HookGateConfig) {
    match serde_yaml::to_string(config) {
        Ok(text) => {
            print!("{}", text);
            println!("# state dir: {}", config.resolved_state_dir().display());
            println!("# audit dir: {}", config.resolved_audit_dir().display());
        }
        Err(e) => {
            eprintln!("Error: cannot render config: {}", e);
            process::exit(1);
        }
    }
}
