//! # CLI Behavior
//!
//! `tackboard` with no subcommand serves the board, the same as
//! `tackboard serve`. The server binds to loopback, creates any missing
//! storage, and opens the board in the default browser unless
//! `--no-browser` is given or `open_browser = false` is configured.
//!
//! `tackboard paths` prints where the document and attachments live, which
//! is handy for backups.
//!
//! ## Module Structure
//!
//! - `commands`: dispatch, logging setup, output
//! - `setup`: argument parsing via clap

mod commands;
pub mod setup;

pub use commands::run;
