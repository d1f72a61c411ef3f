//! Application execution logic.
//!
//! Builds a provider client from the validated configuration and runs the
//! selected task against it.

use std::fs::File;
use std::path::{Path, PathBuf};

use http::HeaderMap;
use thiserror::Error;

use scm_client::config::{Task, ValidatedConfig};
use scm_client::driver::{azure, gitea, github};
use scm_client::model::{Driver, Repository, Webhook};
use scm_client::service::{SecretResolver, StaticSecret};
use scm_client::transport::{BearerAuth, HttpClient, Rate, ReqwestClient, Token, Transport};
use scm_client::webhook::read_capped;
use scm_client::{Client, ScmError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the provider client.
    #[error("Failed to create {provider} client: {source}")]
    ClientCreation {
        /// Configured provider
        provider: Driver,
        /// Underlying error
        #[source]
        source: ScmError,
    },

    /// Failed to read the stored webhook body.
    #[error("Failed to read payload '{}': {source}", path.display())]
    PayloadRead {
        /// Path to the payload file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The provider rejected or failed to parse the delivery.
    #[error("Failed to parse webhook: {0}")]
    Webhook(#[source] ScmError),

    /// The repository lookup failed.
    #[error("Failed to fetch repository '{name}': {source}")]
    Repository {
        /// `OWNER/NAME`
        name: String,
        /// Underlying error
        #[source]
        source: ScmError,
    },

    /// Failed to encode output.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Executes the configured task and prints its result to stdout.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the payload cannot be
/// read, or the provider call fails.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let client = create_client(&config).map_err(|source| RunError::ClientCreation {
        provider: config.provider,
        source,
    })?;

    tracing::debug!(driver = %client.driver(), base_url = %client.base_url(), "Client ready");

    let output = match config.task {
        Task::Webhook { payload, headers } => {
            let body = read_payload(&payload)?;
            let hook = parse_webhook(&client, body, headers, config.secret.as_deref())?;
            tracing::info!(kind = hook.kind(), repo = %hook.repository().full_name(), "Parsed webhook");
            serde_json::to_string_pretty(&hook)?
        }
        Task::Repo { name } => {
            let repo = fetch_repository(&client, &name).await?;
            render_repository(&repo, client.rate())?
        }
    };

    println!("{output}");
    Ok(())
}

/// Builds the reqwest-backed client the configuration describes.
fn create_client(config: &ValidatedConfig) -> Result<Client, ScmError> {
    let http = ReqwestClient::with_proxy(config.proxy.as_deref().unwrap_or(""))?;
    let mut auth = BearerAuth::new(http);
    if let Some(ref token) = config.token {
        auth = auth.with_token(Token::new(token.clone()));
    }

    let transport = Transport::with_client(config.base_url.as_str(), auth)?
        .with_dump_response(config.dump_response);

    build_client(config.provider, transport)
}

/// Attaches the driver for `provider` to `transport`.
fn build_client<H: HttpClient + 'static>(
    provider: Driver,
    transport: Transport<H>,
) -> Result<Client, ScmError> {
    match provider {
        Driver::Github => Ok(github::from_transport(transport)),
        Driver::Gitea => Ok(gitea::from_transport(transport)),
        Driver::Azure => Ok(azure::from_transport(transport)),
        _ => Err(ScmError::NotSupported),
    }
}

/// Reads the stored body, stopping at the webhook payload cap.
fn read_payload(path: &Path) -> Result<Vec<u8>, RunError> {
    File::open(path)
        .and_then(read_capped)
        .map_err(|source| RunError::PayloadRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Replays a stored delivery through the client's webhook service.
fn parse_webhook(
    client: &Client,
    body: Vec<u8>,
    headers: HeaderMap,
    secret: Option<&str>,
) -> Result<Webhook, RunError> {
    let mut request = http::Request::new(body);
    *request.method_mut() = http::Method::POST;
    *request.headers_mut() = headers;

    let resolver = secret.map(StaticSecret::new);
    client
        .webhooks()
        .parse(&request, resolver.as_ref().map(|r| r as &dyn SecretResolver))
        .map_err(RunError::Webhook)
}

async fn fetch_repository(client: &Client, name: &str) -> Result<Repository, RunError> {
    let (repo, _) = client
        .repositories()
        .find(None, name)
        .await
        .map_err(|source| RunError::Repository {
            name: name.to_string(),
            source,
        })?;
    Ok(repo)
}

/// Pretty JSON for the repository followed by one rate-limit line.
fn render_repository(repo: &Repository, rate: Rate) -> Result<String, RunError> {
    let json = serde_json::to_string_pretty(repo)?;
    Ok(format!(
        "{json}\nrate: {}/{} remaining, resets at {}",
        rate.remaining, rate.limit, rate.reset
    ))
}
