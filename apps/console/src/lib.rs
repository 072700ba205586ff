//! # Sant'Sapore Console Library
//!
//! Core library for the `sapore` command-line back-office.
//!
//! ## Module Organization
//! ```text
//! sapore_console/
//! ├── lib.rs          ◄─── You are here (logging, setup & run)
//! ├── cli.rs          ◄─── clap definition of the command line
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── context.rs  ◄─── AppContext: config, client, board, debouncer
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command enum + dispatch
//! │   └── *.rs        ◄─── One module per back-office screen
//! ├── output.rs       ◄─── Text / JSON rendering of command results
//! └── error.rs        ◄─── CommandError for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sapore_client::ClientConfig;

use cli::Cli;
use commands::Command;
use error::CommandResult;
use output::CommandOutput;
use state::AppContext;

/// Runs the console.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Parse Command Line ───────────────────────────────────────────────► │
/// │     • --help / --version / usage errors exit here (clap)                │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,sapore=debug,reqwest=warn; override with RUST_LOG   │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config or platform console.toml, then SAPORE_* variables        │
/// │                                                                         │
/// │  4. Build AppContext ─────────────────────────────────────────────────► │
/// │     • Session file, ApiClient, PricingBoard, Debouncer                  │
/// │                                                                         │
/// │  5. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • Output on stdout, notice on stderr, sysexits status               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Sant'Sapore console");

    let json = cli.json;
    match execute(cli).await {
        Ok(output) => {
            println!("{}", output.render(json));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = ?e.code, "Command failed");
            if json {
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&e).unwrap_or_else(|_| e.to_string())
                );
            } else {
                eprintln!("{}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Loads configuration, builds the context and runs the parsed command.
pub async fn execute(cli: Cli) -> CommandResult<CommandOutput> {
    let config = ClientConfig::load(cli.config.clone())?;

    // `config` must work even when the session file cannot be opened
    if let Command::Config(command) = cli.command {
        return commands::config::run(&config, cli.config, command);
    }

    let ctx = AppContext::from_config(config)?;
    commands::dispatch(&ctx, cli.command, Utc::now()).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=sapore=trace` - Show trace for sapore crates only
/// - Default: INFO, with debug for sapore crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sapore=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
