//! Production HTTP client implementation using reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Default HTTP client backed by `reqwest::Client`.
///
/// Inherits reqwest's connection pooling. The URL is handed to reqwest
/// already parsed, so encoded path segments reach the wire unchanged.
///
/// # Example
///
/// ```no_run
/// use scm_client::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.github.com/repos/octocat/hello-world")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (timeouts, TLS, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    /// Creates a client that routes every request through `proxy_url`.
    ///
    /// An empty `proxy_url` yields a direct client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the proxy URL cannot be parsed,
    /// or [`HttpError::Connection`] if the client cannot be built.
    pub fn with_proxy(proxy_url: &str) -> Result<Self, HttpError> {
        if proxy_url.is_empty() {
            return Ok(Self::new());
        }

        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| HttpError::InvalidUrl(format!("proxy {proxy_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| HttpError::Connection(Box::new(e)))?;

        tracing::debug!(proxy = proxy_url, "Routing SCM requests through proxy");
        Ok(Self::from_client(client))
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url);

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
