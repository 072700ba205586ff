//! # Sant'Sapore Console Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sant'Sapore Console                              │
//! │                                                                         │
//! │  $ sapore orders create --customer 7 --item 3=12                        │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    sapore_console (lib.rs)                       │  │
//! │  │                                                                  │  │
//! │  │  cli.rs ──────► clap parses the command line                     │  │
//! │  │  lib.rs ──────► logging, config, AppContext, dispatch            │  │
//! │  │  commands/ ───► one module per back-office screen                │  │
//! │  │  state/ ──────► AppContext (client, session, board, debouncer)   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    REST backend (HTTP + JSON)                    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging to stderr)
//! 3. Load console.toml and environment overrides
//! 4. Open the session file and build the API client
//! 5. Run the command and print its output

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs so commands can be driven from tests
    sapore_console::run().await
}
