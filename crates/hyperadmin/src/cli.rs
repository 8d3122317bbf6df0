//! Clap derive structures for the `hyperadmin` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hyperadmin -- administer forum users through the hypermedia API
#[derive(Debug, Parser)]
#[command(
    name = "hyperadmin",
    version,
    about = "Administer forum users through a hypermedia API",
    long_about = "Browse, create, edit and delete forum users and their messages.\n\n\
        Every action is discovered from link relations in the API's\n\
        Collection+JSON and HAL responses; no resource URL is hard-coded\n\
        beyond the users collection.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "HYPERADMIN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Forum API base URL (overrides profile)
    #[arg(long, short = 'u', env = "HYPERADMIN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HYPERADMIN_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default: wait for the server)
    #[arg(long, env = "HYPERADMIN_TIMEOUT", global = true)]
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
    /// Plain text, one URL per line (scripting)
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
    /// Manage forum users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage messages of a user
    #[command(alias = "msg")]
    Messages(MessagesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users
    #[command(alias = "ls")]
    List,

    /// Show a user with their restricted profile and message history
    #[command(alias = "get")]
    Show {
        /// User URL (absolute, or relative to the API URL)
        url: String,
    },

    /// Create a user from the server's new-user template
    Create {
        /// Field assignment, repeatable (e.g. --set nickname=Mystery)
        #[arg(
            long = "set",
            short = 's',
            value_name = "FIELD=VALUE",
            value_parser = parse_assignment,
            required = true
        )]
        set: Vec<(String, String)>,
    },

    /// Modify the editable fields of a user
    Edit {
        /// User URL
        url: String,

        /// Field assignment, repeatable (e.g. --set email=me@forum.com)
        #[arg(
            long = "set",
            short = 's',
            value_name = "FIELD=VALUE",
            value_parser = parse_assignment,
            required = true
        )]
        set: Vec<(String, String)>,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User URL
        url: String,
    },
}

// ── Messages ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MessagesArgs {
    #[command(subcommand)]
    pub command: MessagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// Delete a message
    #[command(alias = "rm")]
    Delete {
        /// Message URL
        url: String,

        /// Select this user first and show their history after deletion
        #[arg(long)]
        user: Option<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or extend the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
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

// ── Value parsers ────────────────────────────────────────────────────

/// Parse `FIELD=VALUE`. The value may itself contain `=` and may be empty.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
