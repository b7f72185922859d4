use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tackboard", bin_name = "tackboard", version)]
#[command(about = "Local board with file attachments, served to your browser", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory holding the board document, uploads and tackboard.toml
    #[arg(short, long, global = true, help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    #[arg(long, global = true, default_value = "info", help_heading = "Options")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the board over HTTP (default)
    Serve(ServeArgs),

    /// Print the document file and attachment directory
    Paths,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to bind, overrides `host` from the config
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overrides `port` from the config
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open the board in a browser on startup
    #[arg(long)]
    pub no_browser: bool,
}
