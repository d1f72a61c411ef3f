//! GitHub and GitHub Enterprise driver.
//!
//! Implements repositories, apps and webhooks. API calls go through
//! [`Wrapper`], which records the GitHub request id and rate-limit headers
//! on every response.

mod apps;
mod repo;
mod webhook;

#[cfg(test)]
mod mod_tests;

use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{Driver, User};
use crate::transport::{
    AuthContext, Executor, HttpClient, Rate, ReqwestClient, Request, Response, Transport,
};
use crate::{Client, ScmError};

pub use self::apps::AppsService;
pub use self::repo::RepositoryService;
pub use self::webhook::WebhookService;

/// Public GitHub API address.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

const REQUEST_ID: &str = "X-GitHub-Request-Id";
const RATE_LIMIT: &str = "X-RateLimit-Limit";
const RATE_REMAINING: &str = "X-RateLimit-Remaining";
const RATE_RESET: &str = "X-RateLimit-Reset";

/// Creates a GitHub client for `uri` without a proxy.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` is not a valid URL.
pub fn new(uri: &str) -> Result<Client, ScmError> {
    new_with_proxy(uri, "")
}

/// Creates a GitHub client whose requests are all routed through `proxy`.
///
/// An empty `proxy` connects directly.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` or `proxy` is not a valid URL.
pub fn new_with_proxy(uri: &str, proxy: &str) -> Result<Client, ScmError> {
    new_with_client(uri, ReqwestClient::with_proxy(proxy)?)
}

/// Creates a client for the public GitHub API.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if the HTTP client cannot be built.
pub fn new_default() -> Result<Client, ScmError> {
    new(DEFAULT_BASE_URL)
}

/// Creates a GitHub client executing through `client`.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` is not a valid URL.
pub fn new_with_client<H: HttpClient + 'static>(uri: &str, client: H) -> Result<Client, ScmError> {
    Ok(from_transport(Transport::with_client(uri, client)?))
}

/// Creates a GitHub client from a configured [`Transport`].
#[must_use]
pub fn from_transport<H: HttpClient + 'static>(transport: Transport<H>) -> Client {
    let executor: Arc<dyn Executor> = Arc::new(transport);
    let wrapper = Wrapper::new(Arc::clone(&executor));

    Client::builder(Driver::Github, executor)
        .repositories(Arc::new(RepositoryService::new(wrapper.clone())))
        .apps(Arc::new(AppsService::new(wrapper)))
        .webhooks(Arc::new(WebhookService))
        .build()
}

/// Maps an API base URL to the matching website address.
#[must_use]
pub fn website_address(base: &url::Url) -> String {
    match base.host_str() {
        Some("api.github.com") => "https://github.com/".to_string(),
        Some(host) => match base.port() {
            Some(port) => format!("{}://{host}:{port}/", base.scheme()),
            None => format!("{}://{host}/", base.scheme()),
        },
        None => base.to_string(),
    }
}

/// JSON request/response helper shared by the GitHub services.
#[derive(Clone)]
pub(crate) struct Wrapper {
    executor: Arc<dyn Executor>,
}

/// Error body returned by the GitHub API.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: String,
}

impl Wrapper {
    pub(crate) const fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Executes a request and decodes a JSON response.
    pub(crate) async fn json<T: DeserializeOwned>(
        &self,
        auth: Option<&AuthContext>,
        request: Request,
    ) -> Result<(T, Response), ScmError> {
        let path = request.path.clone();
        let response = self.send(auth, request).await?;
        let out = serde_json::from_slice(&response.body).map_err(|e| ScmError::decode(path, e))?;
        Ok((out, response))
    }

    /// Builds a request with an optional JSON body.
    pub(crate) fn request<I: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        input: Option<&I>,
    ) -> Result<Request, ScmError> {
        let request = Request::new(method, path);
        match input {
            Some(input) => request
                .with_json(input)
                .map_err(|e| ScmError::decode("request body", e)),
            None => Ok(request),
        }
    }

    /// Executes a request, records GitHub metadata and rejects error statuses.
    pub(crate) async fn send(
        &self,
        auth: Option<&AuthContext>,
        request: Request,
    ) -> Result<Response, ScmError> {
        let mut response = self.executor.execute(auth, request).await?;

        response.id = response
            .headers
            .get(REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        response.rate = Rate::from_headers(&response.headers, RATE_LIMIT, RATE_REMAINING, RATE_RESET);
        self.executor.set_rate(response.rate);

        if !response.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&response.body)
                .map(|e| e.message)
                .unwrap_or_default();
            tracing::debug!(
                status = %response.status,
                request_id = %response.id,
                message = %message,
                "GitHub API returned an error"
            );
            return Err(ScmError::from_status(response.status, message));
        }

        Ok(response)
    }
}

/// A GitHub account as it appears in API and webhook payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireUser {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: String,
}

impl From<WireUser> for User {
    fn from(from: WireUser) -> Self {
        Self {
            login: from.login,
            name: from.name.unwrap_or_default(),
            email: from.email.unwrap_or_default(),
            avatar: from.avatar_url,
        }
    }
}
