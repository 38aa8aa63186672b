//! Command-line interface for pingpong_server.

use clap::{Parser, Subcommand};

/// Ping Pong Server - match results and leaderboard backend
#[derive(Parser, Debug)]
#[command(name = "pingpong_server")]
#[command(about = "Backend for the browser ping-pong game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Path to a TOML config file (defaults apply if it doesn't exist)
        #[arg(short, long, default_value = "pingpong.toml", env = "PINGPONG_CONFIG")]
        config: std::path::PathBuf,

        /// Port to bind to
        #[arg(short, long, env = "PINGPONG_PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "PINGPONG_HOST")]
        host: Option<String>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, env = "PINGPONG_DB")]
        db_path: Option<String>,

        /// Directory containing index.html and other client assets
        #[arg(long, env = "PINGPONG_STATIC_DIR")]
        static_dir: Option<std::path::PathBuf>,
    },

    /// Print the current leaderboard
    Leaderboard {
        /// Path to the database file
        #[arg(long, default_value = "db.sqlite", env = "PINGPONG_DB")]
        db_path: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
