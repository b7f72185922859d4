//! # Tackboard Server
//!
//! The binary is intentionally thin: it parses arguments, prepares storage
//! through `tackboardapp`, and serves the HTTP routes the browser front end
//! talks to.
//!
//! ## Workspace Structure
//!
//! - `crates/tackboardapp/`: persistence library, UI agnostic
//! - `crates/tackboard/`: this binary, with CLI, logging and HTTP
//!
//! ## Testing Approach
//!
//! - **Stores (`tackboardapp::store`)**: unit tests against temp directories.
//! - **HTTP (`src/http/`)**: the axum `Router` is driven in-process with
//!   `tower::ServiceExt::oneshot`, with a recording launcher in place of the
//!   real one.
//! - **Binary (`tests/`)**: `assert_cmd` runs the `paths` subcommand.

mod cli;
mod http;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
