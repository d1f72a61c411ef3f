//! Configuration layer for the `scm` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`Task`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! `provider` has no default. `base_url` defaults to the public GitHub API
//! for the GitHub provider and is required for every other provider.
//!
//! # Boolean Flag Semantics
//!
//! `--dump-response` uses OR semantics: if set `true` in either CLI or TOML,
//! the result is `true`. The CLI cannot turn off a value enabled in TOML.
//!
//! # Empty Values
//!
//! An empty `token`, `proxy`, or `webhook.secret` counts as unset. An empty
//! secret therefore disables signature verification.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, ProviderArg, RepoArgs, WebhookArgs};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, WebhookSection, default_config_template};
pub use validated::{Task, ValidatedConfig, write_default_config};
