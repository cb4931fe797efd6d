//! Clap derive structures for the `sutro` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sutro -- water chemistry from your Sutro monitor
#[derive(Debug, Parser)]
#[command(
    name = "sutro",
    version,
    about = "Check pool and spa water chemistry from a Sutro monitor",
    long_about = "Read sensors, water readings, and treatment recommendations from a\n\
        Sutro smart pool monitor, and mark recommendations as done.",
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

#[derive(Debug, Clone, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "SUTRO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// GraphQL endpoint (overrides profile)
    #[arg(long, env = "SUTRO_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "SUTRO_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SUTRO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SUTRO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password and link the account to a profile
    Login(LoginArgs),

    /// Show every sensor and binary sensor
    #[command(alias = "st")]
    Status,

    /// Show the latest water chemistry reading
    #[command(alias = "r")]
    Readings,

    /// List and complete treatment recommendations
    #[command(alias = "recs")]
    Recommendations(RecommendationsArgs),

    /// Poll continuously and print every update until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Save the profile and store the token in the system keyring
    #[arg(long)]
    pub save: bool,

    /// With --save, write the token to the config file instead of the keyring
    #[arg(long, requires = "save")]
    pub plaintext: bool,
}

// ── Recommendations ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecommendationsArgs {
    #[command(subcommand)]
    pub command: RecommendationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecommendationsCommand {
    /// List current recommendations as to-do items
    #[command(alias = "ls")]
    List,

    /// Mark a recommendation as done
    Complete {
        /// Recommendation ID
        id: String,
    },

    /// Mark a completed recommendation as not done
    Uncomplete {
        /// Recommendation ID
        id: String,
    },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (defaults to the profile's poll interval)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file if none exists
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
