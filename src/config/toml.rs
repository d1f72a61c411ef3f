//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Provider name: "github", "gitea", or "azure"
    pub provider: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Bearer token for the Authorization header
    pub token: Option<String>,

    /// Outbound proxy URL
    pub proxy: Option<String>,

    /// Log every raw HTTP response at debug level
    #[serde(default)]
    pub dump_response: bool,

    /// Webhook verification section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// Webhook verification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Shared secret for signature verification
    pub secret: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# SCM Client Configuration File

# Provider (required): "github", "gitea", or "azure"
provider = "github"

# API base URL
# Defaults to https://api.github.com/ for GitHub; required for Gitea and Azure DevOps
# base_url = "https://try.gitea.io"
# base_url = "https://dev.azure.com/my-org"

# Bearer token sent in the Authorization header (can be overridden by --token)
# token = "your-token-here"

# Outbound proxy URL
# proxy = "http://127.0.0.1:8080"

# Log every raw HTTP response at debug level
# Note: enabled if set here OR via --dump-response
# dump_response = false

[webhook]
# Shared secret for webhook signature verification (GitHub, Gitea)
# Leave unset to skip verification
# secret = "your-webhook-secret"
"#
    .to_string()
}
