//! Per-call authentication overrides and the bearer-token decorator.
//!
//! The [`Transport`](super::Transport) never interprets tokens. It forwards
//! the token of an [`AuthContext`] on [`HttpRequest::token`], and an
//! authentication layer such as [`BearerAuth`] turns it into a header.

use std::fmt;

use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, HeaderValue};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// An OAuth-style access token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token {
    /// The access token sent to the provider.
    pub token: String,
    /// Refresh token, if the provider issued one.
    pub refresh: String,
    /// Expiry reported by the provider.
    pub expires: Option<DateTime<Utc>>,
}

impl Token {
    /// Creates a token without refresh or expiry information.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }
}

// Tokens end up in logs through `Debug` on requests; never print them.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token", &"<redacted>")
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}

/// Request-scoped override of the client's server URL and credentials.
///
/// Passed explicitly to every call. Absence (or empty fields) means "use the
/// client defaults"; the override never mutates client-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Base URL to use instead of the client's configured one.
    pub base_url: Option<String>,
    /// Token to install for this call only.
    pub token: Option<Token>,
}

impl AuthContext {
    /// Creates an empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirects this call to another server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Installs a token for this call.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns the base URL override, treating an empty string as absent.
    #[must_use]
    pub fn base_url_override(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Authentication decorator that writes an `Authorization` header.
///
/// The per-call token carried on the request wins over the default token.
/// The scheme defaults to `Bearer`; GitHub and Gitea also accept `token`.
///
/// # Example
///
/// ```
/// use scm_client::transport::{BearerAuth, ReqwestClient, Token};
///
/// let client = BearerAuth::new(ReqwestClient::new())
///     .with_scheme("token")
///     .with_token(Token::new("ghp_example"));
/// ```
#[derive(Debug, Clone)]
pub struct BearerAuth<H> {
    inner: H,
    scheme: String,
    default_token: Option<Token>,
}

impl<H> BearerAuth<H> {
    /// Wraps an HTTP client with no default token.
    #[must_use]
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            scheme: "Bearer".to_string(),
            default_token: None,
        }
    }

    /// Sets the authorization scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the token used when a request carries none.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.default_token = Some(token);
        self
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn inner(&self) -> &H {
        &self.inner
    }

    fn header_value(&self, token: &Token) -> Result<HeaderValue, HttpError> {
        let mut value = HeaderValue::from_str(&format!("{} {}", self.scheme, token.token))
            .map_err(|e| HttpError::InvalidHeader(format!("authorization: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl<H: HttpClient> HttpClient for BearerAuth<H> {
    async fn request(&self, mut req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let header = match req.token.as_ref().or(self.default_token.as_ref()) {
            Some(token) if !token.token.is_empty() => Some(self.header_value(token)?),
            _ => None,
        };

        if let Some(value) = header {
            req.headers.insert(AUTHORIZATION, value);
        }

        self.inner.request(req).await
    }
}
