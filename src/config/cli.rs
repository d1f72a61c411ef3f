//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::Driver;

use super::defaults;

/// SCM: provider-agnostic source control client
///
/// Parses stored webhook deliveries and queries repositories on GitHub,
/// Gitea, and Azure DevOps through one canonical model.
#[derive(Debug, Parser)]
#[command(name = "scm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// SCM provider
    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderArg>,

    /// API base URL (defaults to https://api.github.com/ for GitHub)
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Bearer token for the Authorization header
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Outbound proxy URL
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Log every raw HTTP response at debug level
    #[arg(long = "dump-response", global = true)]
    pub dump_response: bool,

    /// Shared secret used to verify webhook signatures
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for scm
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Parse a stored webhook delivery and print the canonical event
    Webhook(WebhookArgs),

    /// Fetch a repository and print it with the rate-limit snapshot
    Repo(RepoArgs),
}

/// Arguments of `scm webhook`.
#[derive(Debug, Args)]
pub struct WebhookArgs {
    /// File holding the raw request body
    #[arg(long)]
    pub payload: PathBuf,

    /// Request headers in 'Key: Value' or 'Key=Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K: V")]
    pub headers: Vec<String>,
}

/// Arguments of `scm repo`.
#[derive(Debug, Args)]
pub struct RepoArgs {
    /// Repository in OWNER/NAME form
    pub name: String,
}

/// Provider argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// GitHub or GitHub Enterprise
    Github,
    /// Gitea
    Gitea,
    /// Azure DevOps
    Azure,
}

impl From<ProviderArg> for Driver {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Github => Self::Github,
            ProviderArg::Gitea => Self::Gitea,
            ProviderArg::Azure => Self::Azure,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
