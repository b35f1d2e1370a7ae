use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "harvester-tui")]
#[command(about = "Terminal UI for the harvester time tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the real tracker backend over stdio
    Run,
    /// Run in dev mode with a local in-memory backend
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
}
