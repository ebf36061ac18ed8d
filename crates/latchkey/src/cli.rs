//! Clap derive structures for the `latchkey` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use latchkey_core::SmartlockId;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// latchkey -- manage Nuki smart locks from the command line
#[derive(Debug, Parser)]
#[command(
    name = "latchkey",
    version,
    about = "Manage Nuki smart locks from the command line",
    long_about = "Polls the Nuki Web API for smart-lock state and issues lock,\n\
        unlock, and unlatch actions. After every action the lock state is\n\
        re-polled once immediately and once after the mechanical settle time.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Web API bearer token
    #[arg(long, env = "LATCHKEY_API_TOKEN", global = true, hide_env = true)]
    pub api_token: Option<String>,

    /// API base URL (overrides the vendor cloud default)
    #[arg(long, env = "LATCHKEY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LATCHKEY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "LATCHKEY_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all smartlocks on the account
    #[command(alias = "devices", alias = "ls")]
    List,

    /// Show one smartlock, fetched straight from the API
    Status {
        /// Smartlock id
        id: SmartlockId,
    },

    /// Lock a smartlock
    Lock(ActionArgs),

    /// Unlock a smartlock
    Unlock(ActionArgs),

    /// Open the door latch
    Open(ActionArgs),

    /// Run the device-side lock'n'go sequence
    #[command(name = "lock-n-go")]
    LockNGo {
        /// Smartlock id
        id: SmartlockId,

        /// Unlatch after the lock phase completes
        #[arg(long)]
        unlatch: bool,

        /// Return as soon as the vendor accepts the action
        #[arg(long)]
        no_wait: bool,
    },

    /// Poll continuously and print snapshot changes
    Watch {
        /// Poll interval in seconds
        #[arg(long, short = 'i', default_value = "30")]
        interval: u64,
    },

    /// Probe the account and report whether the token works
    Validate,
}

#[derive(Debug, Args)]
pub struct ActionArgs {
    /// Smartlock id
    pub id: SmartlockId,

    /// Return as soon as the vendor accepts the action instead of
    /// waiting out the settle poll
    #[arg(long)]
    pub no_wait: bool,
}
