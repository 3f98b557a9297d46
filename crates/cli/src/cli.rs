//! Command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

/// Fans out per-company notifications when tasks and their companies are created.
#[derive(Parser, Debug)]
#[command(name = "taskhook", author, version, about)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TASKHOOK_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Receive document-created events over HTTP
    Serve(ServeArgs),

    /// Process one event body read from a file or stdin
    Replay(ReplayArgs),

    /// Fan out to an explicit company list, bypassing the trigger
    Send(SendArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Options shared by every run mode.
#[derive(Args, Debug, Clone)]
pub struct DispatchArgs {
    /// Notification endpoint receiving one POST per company
    #[arg(long, env = "TASKHOOK_ENDPOINT")]
    pub endpoint: Url,

    /// Seconds to wait after a trigger before reading children
    #[arg(
        long,
        default_value_t = dispatcher::DEFAULT_SETTLE_DELAY.as_secs(),
        env = "TASKHOOK_SETTLE_DELAY_SECS"
    )]
    pub settle_delay_secs: u64,

    /// Upper bound on a single notification call, in seconds
    #[arg(
        long,
        default_value_t = dispatcher::DEFAULT_CALL_TIMEOUT.as_secs(),
        env = "TASKHOOK_CALL_TIMEOUT_SECS"
    )]
    pub call_timeout_secs: u64,

    /// Firestore project holding the `tasks` collection
    #[arg(long, env = "FIRESTORE_PROJECT_ID")]
    pub firestore_project: String,

    /// Firestore database id
    #[arg(long, default_value = firestore::DEFAULT_DATABASE, env = "FIRESTORE_DATABASE")]
    pub firestore_database: String,

    /// Firestore REST API root
    #[arg(long, default_value = firestore::DEFAULT_BASE_URL, env = "FIRESTORE_BASE_URL")]
    pub firestore_base_url: Url,

    /// OAuth access token sent as a bearer credential
    #[arg(long, env = "FIRESTORE_ACCESS_TOKEN", hide_env_values = true)]
    pub firestore_token: Option<String>,
}

impl DispatchArgs {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub dispatch: DispatchArgs,

    /// Address the event receiver listens on
    #[arg(long, default_value = "0.0.0.0:8080", env = "TASKHOOK_BIND_ADDR")]
    pub bind: SocketAddr,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub dispatch: DispatchArgs,

    /// Event JSON file, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub event: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub dispatch: DispatchArgs,

    /// Task whose companies are notified
    #[arg(long)]
    pub task_id: String,

    /// Organisation stamped on every payload; omit to exercise the skip path
    #[arg(long)]
    pub org_id: Option<String>,

    /// Company id to notify; repeat for several. An empty value sends a null id.
    #[arg(long = "company")]
    pub companies: Vec<String>,
}
