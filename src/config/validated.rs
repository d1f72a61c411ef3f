//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::model::Driver;

use super::cli::{Cli, Command, RepoArgs, WebhookArgs};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML config. Secrets are never shown by the `Display` impl.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Provider the client talks to
    pub provider: Driver,

    /// API base URL
    pub base_url: Url,

    /// Bearer token, if any
    pub token: Option<String>,

    /// Outbound proxy URL, if any
    pub proxy: Option<String>,

    /// Whether raw responses are logged
    pub dump_response: bool,

    /// Webhook signature secret, if any
    pub secret: Option<String>,

    /// Verbose logging enabled
    pub verbose: bool,

    /// What to run
    pub task: Task,
}

/// A runnable subcommand with its validated arguments.
#[derive(Debug)]
pub enum Task {
    /// Parse a stored webhook delivery.
    Webhook {
        /// File holding the raw request body
        payload: PathBuf,
        /// Delivery headers
        headers: HeaderMap,
    },
    /// Fetch one repository.
    Repo {
        /// `OWNER/NAME`
        name: String,
    },
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let task = match &self.task {
            Task::Webhook { .. } => "webhook",
            Task::Repo { .. } => "repo",
        };

        write!(
            f,
            "Config {{ provider: {}, base_url: {}, token: {}, proxy: {}, dump_response: {}, \
             secret: {}, task: {} }}",
            self.provider,
            self.base_url,
            if self.token.is_some() { "set" } else { "none" },
            self.proxy.as_deref().map_or_else(|| "none".to_string(), redact_userinfo),
            self.dump_response,
            if self.secret.is_some() { "set" } else { "none" },
            task,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider is missing or unknown
    /// - The base URL is missing (Gitea, Azure) or invalid
    /// - The proxy URL is invalid
    /// - A header or repository argument is malformed
    /// - The subcommand is `init`
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let task = Self::resolve_task(&cli.command)?;
        let provider = Self::resolve_provider(cli, toml)?;
        let base_url = Self::resolve_base_url(cli, toml, provider)?;
        let proxy = Self::resolve_proxy(cli, toml)?;

        let token = non_empty(
            cli.token
                .as_deref()
                .or_else(|| toml.and_then(|t| t.token.as_deref())),
        );
        let secret = non_empty(
            cli.secret
                .as_deref()
                .or_else(|| toml.and_then(|t| t.webhook.secret.as_deref())),
        );

        // Flags only enable
        let dump_response = cli.dump_response || toml.is_some_and(|t| t.dump_response);

        Ok(Self {
            provider,
            base_url,
            token,
            proxy,
            dump_response,
            secret,
            verbose: cli.verbose,
            task,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_task(command: &Command) -> Result<Task, ConfigError> {
        match command {
            Command::Init { .. } => Err(ConfigError::UnexpectedCommand("init")),
            Command::Webhook(WebhookArgs { payload, headers }) => Ok(Task::Webhook {
                payload: payload.clone(),
                headers: parse_headers(headers)?,
            }),
            Command::Repo(RepoArgs { name }) => {
                parse_repository(name)?;
                Ok(Task::Repo { name: name.clone() })
            }
        }
    }

    fn resolve_provider(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Driver, ConfigError> {
        // CLI takes precedence
        if let Some(provider) = cli.provider {
            return Ok(provider.into());
        }

        if let Some(name) = toml.and_then(|t| t.provider.as_deref()) {
            return parse_provider(name);
        }

        Err(ConfigError::missing(
            field::PROVIDER,
            "Use --provider or set provider in config file",
        ))
    }

    fn resolve_base_url(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        provider: Driver,
    ) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > provider default
        let explicit = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.base_url.as_deref()));

        let url_str = match (explicit, provider) {
            (Some(url), _) => url,
            (None, Driver::Github) => defaults::GITHUB_BASE_URL,
            (None, _) => {
                return Err(ConfigError::missing(
                    field::BASE_URL,
                    "Use --base-url or set base_url in config file",
                ));
            }
        };

        parse_url(url_str)
    }

    fn resolve_proxy(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<String>, ConfigError> {
        let proxy = non_empty(
            cli.proxy
                .as_deref()
                .or_else(|| toml.and_then(|t| t.proxy.as_deref())),
        );

        if let Some(ref proxy) = proxy {
            parse_url(proxy)?;
        }

        Ok(proxy)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_url(s: &str) -> Result<Url, ConfigError> {
    Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
        url: s.to_string(),
        reason: e.to_string(),
    })
}

/// Masks any `user:pass@` part of a URL for display.
fn redact_userinfo(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "set".to_string();
    };
    if url.username().is_empty() && url.password().is_none() {
        return url.to_string();
    }
    // Only fails for URLs that cannot carry credentials
    if url.set_password(None).is_err() || url.set_username("***").is_err() {
        return "set".to_string();
    }
    url.to_string()
}

fn parse_provider(s: &str) -> Result<Driver, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "github" => Ok(Driver::Github),
        "gitea" => Ok(Driver::Gitea),
        "azure" | "azure-devops" => Ok(Driver::Azure),
        _ => Err(ConfigError::InvalidProvider {
            value: s.to_string(),
        }),
    }
}

/// Splits `OWNER/NAME`. Nested namespaces keep everything before the last `/`.
fn parse_repository(s: &str) -> Result<(&str, &str), ConfigError> {
    match s.rsplit_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok((owner, name)),
        _ => Err(ConfigError::InvalidRepository {
            value: s.to_string(),
        }),
    }
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    for entry in raw {
        let (name, value) = parse_header_string(entry)?;
        let header_name = parse_header_name(&name)?;
        let header_value = parse_header_value(&name, &value)?;
        headers.append(header_name, header_value);
    }

    Ok(headers)
}

// Splits at whichever of ':' or '=' comes first, so values may contain either.
fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    let split = s
        .find([':', '='])
        .map(|at| (&s[..at], &s[at + 1..]));

    match split {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        }),
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
