//! The transport core: one relative request in, one response out.

use std::fmt::Write as _;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::ScmError;

use super::{
    AuthContext, HttpClient, HttpError, HttpRequest, HttpResponse, Page, Rate, RateCell,
    ReqwestClient, parse_link_header,
};

/// A provider API request relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, optionally with a query string.
    ///
    /// Pre-encoded characters (e.g. `%2F`) are sent as written.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Optional request body.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Serializes `body` as JSON and sets the content type.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `body` cannot be encoded.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }
}

/// A provider API response.
///
/// The body is handed over untouched; decoding it is the caller's job.
#[derive(Debug, Clone)]
pub struct Response {
    /// Provider request id, filled in by driver wrappers that know the header.
    pub id: String,
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
    /// Pagination values from the `Link` header.
    pub page: Page,
    /// Rate-limit values, filled in by driver wrappers.
    pub rate: Rate,
}

impl Response {
    /// Wraps a raw response and parses its pagination links.
    #[must_use]
    pub fn from_http(response: HttpResponse) -> Self {
        let page = parse_link_header(&response.headers);
        Self {
            id: String::new(),
            status: response.status,
            headers: response.headers,
            body: response.body,
            page,
            rate: Rate::default(),
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Executes requests against one provider server.
///
/// Holds the default base URL, the injectable [`HttpClient`] and the
/// client-wide [`RateCell`]. No other state is shared between calls.
///
/// # Example
///
/// ```no_run
/// use scm_client::transport::{AuthContext, Request, Transport};
///
/// # async fn example() -> Result<(), scm_client::ScmError> {
/// let transport = Transport::new("https://api.github.com")?;
/// let auth = AuthContext::new().with_base_url("https://proxy.internal/upstream");
/// let response = transport.execute(Some(&auth), Request::get("user")).await?;
/// assert_eq!(response.status, 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Transport<H = ReqwestClient> {
    client: H,
    base_url: Url,
    rate: RateCell,
    dump_response: bool,
}

impl Transport<ReqwestClient> {
    /// Creates a transport using the default reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if `base_url` cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_client(base_url, ReqwestClient::new())
    }
}

impl<H> Transport<H> {
    /// Creates a transport executing through `client`.
    ///
    /// The base URL is normalized to end with `/` so relative paths are
    /// appended to it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if `base_url` cannot be parsed.
    pub fn with_client(base_url: &str, client: H) -> Result<Self, HttpError> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            rate: RateCell::new(),
            dump_response: false,
        })
    }

    /// Enables the diagnostic response dump.
    #[must_use]
    pub const fn with_dump_response(mut self, enabled: bool) -> Self {
        self.dump_response = enabled;
        self
    }

    /// Returns the default base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the wrapped HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the most recent rate-limit snapshot.
    #[must_use]
    pub fn rate(&self) -> Rate {
        self.rate.get()
    }

    /// Records a new rate-limit snapshot.
    pub fn set_rate(&self, rate: Rate) {
        self.rate.set(rate);
    }

    /// Resolves the absolute URL for `path`, honoring a base URL override.
    fn resolve_url(&self, auth: Option<&AuthContext>, path: &str) -> Result<Url, HttpError> {
        let url = match auth.and_then(AuthContext::base_url_override) {
            Some(base) => normalize_base_url(base)?.join(path),
            None => self.base_url.join(path),
        };

        url.map_err(|e| HttpError::InvalidUrl(format!("{path}: {e}")))
    }
}

impl<H: HttpClient> Transport<H> {
    /// Executes one request.
    ///
    /// The returned [`Response`] carries the full body and parsed
    /// [`Page`] values; its `rate` and `id` are left for driver wrappers.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Transport`] if the URL cannot be built or the
    /// HTTP client fails. Non-2xx statuses are not errors at this layer.
    pub async fn execute(
        &self,
        auth: Option<&AuthContext>,
        request: Request,
    ) -> Result<Response, ScmError> {
        let url = self.resolve_url(auth, &request.path)?;

        let mut http_request = HttpRequest::new(request.method, url);
        http_request.headers = request.headers;
        http_request.body = request.body;
        http_request.token = auth.and_then(|a| a.token.clone());

        tracing::debug!(
            method = %http_request.method,
            url = %http_request.url,
            "Executing SCM request"
        );

        let response = self.client.request(http_request).await?;

        tracing::debug!(status = %response.status, "Received SCM response");

        if self.dump_response {
            dump_response(&response);
        }

        Ok(Response::from_http(response))
    }
}

/// Object-safe view of a [`Transport`], used by [`Client`](crate::Client).
#[async_trait]
pub trait Executor: Send + Sync {
    /// See [`Transport::execute`].
    async fn execute(
        &self,
        auth: Option<&AuthContext>,
        request: Request,
    ) -> Result<Response, ScmError>;

    /// See [`Transport::base_url`].
    fn base_url(&self) -> &Url;

    /// See [`Transport::rate`].
    fn rate(&self) -> Rate;

    /// See [`Transport::set_rate`].
    fn set_rate(&self, rate: Rate);
}

#[async_trait]
impl<H: HttpClient + 'static> Executor for Transport<H> {
    async fn execute(
        &self,
        auth: Option<&AuthContext>,
        request: Request,
    ) -> Result<Response, ScmError> {
        Self::execute(self, auth, request).await
    }

    fn base_url(&self) -> &Url {
        Self::base_url(self)
    }

    fn rate(&self) -> Rate {
        Self::rate(self)
    }

    fn set_rate(&self, rate: Rate) {
        Self::set_rate(self, rate);
    }
}

/// Parses `raw` and makes sure its path ends with `/`.
fn normalize_base_url(raw: &str) -> Result<Url, HttpError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Writes a readable copy of `response` to the dump log target.
fn dump_response(response: &HttpResponse) {
    let mut raw = format!("HTTP {}\n", response.status);
    for (name, value) in &response.headers {
        let _ = writeln!(raw, "{name}: {}", String::from_utf8_lossy(value.as_bytes()));
    }
    raw.push('\n');
    raw.push_str(&String::from_utf8_lossy(&response.body));

    tracing::debug!(target: "scm_client::dump", "{raw}");
}
