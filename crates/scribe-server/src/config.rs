use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Secret keys that must never reach production.
pub const PLACEHOLDER_SECRETS: &[&str] = &["dev", "change-me"];

#[derive(Debug, Parser)]
#[command(name = "scribe", version, about = "A small blog backed by SQLite")]
pub struct Cli {
    /// Path to the SQLite database file. Its directory is created if missing.
    #[arg(long, env = "SCRIBE_DATABASE", default_value = "instance/scribe.sqlite", global = true)]
    pub database: PathBuf,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clear the existing data and create new tables.
    InitDb,

    /// Run the blog server (default).
    Serve,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Key used to sign session cookies.
    #[arg(long, env = "SCRIBE_SECRET_KEY", default_value = "dev", hide_env_values = true, global = true)]
    pub secret_key: String,

    #[arg(long, env = "SCRIBE_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    #[arg(long, env = "SCRIBE_PORT", default_value_t = 5000, global = true)]
    pub port: u16,

    /// How many days a login session stays valid (1 to 3650).
    #[arg(
        long,
        env = "SCRIBE_SESSION_DAYS",
        default_value_t = 31,
        value_parser = clap::value_parser!(i64).range(1..=3650),
        global = true
    )]
    pub session_days: i64,
}
