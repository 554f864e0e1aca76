//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentinel_domain::HttpMethod;

#[derive(Debug, Parser)]
#[command(
    name = "sentinel",
    version,
    about = "Token-authenticated API client",
    long_about = "Logs in to a game API, keeps the tokens on disk and refreshes them transparently while sending requests."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./sentinel.{toml,json,yaml} when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the issued tokens
    Login {
        #[command(subcommand)]
        provider: LoginCommand,
    },

    /// Send an API request and print the response body
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: HttpMethod,

        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,

        /// Query parameter as key=value; may be repeated
        #[arg(long = "query", short = 'q', value_parser = parse_pair)]
        query: Vec<(String, String)>,

        /// Send without an access token
        #[arg(long)]
        anonymous: bool,

        /// Fail instead of refreshing an expired token
        #[arg(long)]
        no_refresh: bool,

        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print download progress to stderr
        #[arg(long)]
        progress: bool,
    },

    /// Show the device id and token state
    Status,

    /// Forget the stored tokens
    SignOut,
}

#[derive(Debug, Subcommand)]
pub enum LoginCommand {
    /// Username and password
    Credentials {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Signed wallet message
    Wallet {
        #[arg(long)]
        address: String,

        #[arg(long)]
        signature: String,

        #[arg(long)]
        message: String,
    },

    /// This installation's device id
    Device,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}
