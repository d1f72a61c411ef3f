//! The Driver Contract.
//!
//! One trait per resource domain. A provider driver implements the domains it
//! supports; the rest are filled by [`Unsupported`], so every [`Client`]
//! answers every operation, either with data or with
//! [`ScmError::NotSupported`].
//!
//! Only canonical [`model`](crate::model) types cross this boundary.
//!
//! [`Client`]: crate::Client

mod unsupported;


use std::collections::HashMap;

use async_trait::async_trait;
use http::HeaderMap;

use crate::ScmError;
use crate::model::{
    App, Driver, Hook, HookInput, Installation, InstallationToken, InstallationTokenOptions,
    ListOptions, Perm, RepoListOptions, Repository, Status, StatusInput, Webhook,
};
use crate::transport::{AuthContext, Response};

pub use unsupported::Unsupported;

/// Repository operations.
///
/// `repo` is always the provider's full repository name, e.g. `owner/name`.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Returns a repository by name.
    async fn find(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
    ) -> Result<(Repository, Response), ScmError>;

    /// Returns a repository webhook by id.
    async fn find_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        id: &str,
    ) -> Result<(Hook, Response), ScmError>;

    /// Returns the authenticated user's permissions on a repository.
    async fn find_perms(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
    ) -> Result<(Perm, Response), ScmError>;

    /// Lists repositories of the authenticated user.
    async fn list(
        &self,
        auth: Option<&AuthContext>,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError>;

    /// Searches repositories by name, optionally within one user's account.
    async fn list_v2(
        &self,
        auth: Option<&AuthContext>,
        opts: &RepoListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError>;

    /// Lists the repositories of a namespace.
    async fn list_namespace(
        &self,
        auth: Option<&AuthContext>,
        namespace: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError>;

    /// Lists the repositories of an organization.
    async fn list2(
        &self,
        auth: Option<&AuthContext>,
        namespace: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Repository>, Response), ScmError>;

    /// Returns each language's share of the repository, in percent.
    async fn list_repo_languages(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
    ) -> Result<(HashMap<String, f64>, Response), ScmError>;

    /// Lists repository webhooks.
    async fn list_hooks(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Hook>, Response), ScmError>;

    /// Lists the commit statuses of a ref.
    async fn list_status(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        reference: &str,
        opts: &ListOptions,
    ) -> Result<(Vec<Status>, Response), ScmError>;

    /// Registers a repository webhook.
    async fn create_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        input: &HookInput,
    ) -> Result<(Hook, Response), ScmError>;

    /// Creates a commit status.
    async fn create_status(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        reference: &str,
        input: &StatusInput,
    ) -> Result<(Status, Response), ScmError>;

    /// Replaces a repository webhook's configuration.
    async fn update_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        id: &str,
        input: &HookInput,
    ) -> Result<(Hook, Response), ScmError>;

    /// Deletes a repository webhook.
    async fn delete_hook(
        &self,
        auth: Option<&AuthContext>,
        repo: &str,
        id: &str,
    ) -> Result<Response, ScmError>;
}

/// App and installation operations.
#[async_trait]
pub trait AppsService: Send + Sync {
    /// Returns an app by slug; an empty slug returns the authenticated app.
    async fn get(
        &self,
        auth: Option<&AuthContext>,
        slug: &str,
    ) -> Result<(App, Response), ScmError>;

    /// Lists the installations of the authenticated app.
    async fn list_installations(
        &self,
        auth: Option<&AuthContext>,
        opts: &ListOptions,
    ) -> Result<(Vec<Installation>, Response), ScmError>;

    async fn get_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<(Installation, Response), ScmError>;

    /// Lists installations accessible to the authenticated user.
    async fn list_user_installations(
        &self,
        auth: Option<&AuthContext>,
        opts: &ListOptions,
    ) -> Result<(Vec<Installation>, Response), ScmError>;

    async fn suspend_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<Response, ScmError>;

    async fn unsuspend_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<Response, ScmError>;

    async fn delete_installation(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<Response, ScmError>;

    /// Creates an installation access token, optionally restricted by `opts`.
    async fn create_installation_token(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
        opts: Option<&InstallationTokenOptions>,
    ) -> Result<(InstallationToken, Response), ScmError>;

    async fn find_organization_installation(
        &self,
        auth: Option<&AuthContext>,
        org: &str,
    ) -> Result<(Installation, Response), ScmError>;

    async fn find_repository_installation(
        &self,
        auth: Option<&AuthContext>,
        owner: &str,
        repo: &str,
    ) -> Result<(Installation, Response), ScmError>;

    async fn find_repository_installation_by_id(
        &self,
        auth: Option<&AuthContext>,
        id: i64,
    ) -> Result<(Installation, Response), ScmError>;

    async fn find_user_installation(
        &self,
        auth: Option<&AuthContext>,
        user: &str,
    ) -> Result<(Installation, Response), ScmError>;
}

/// Inbound webhook normalization.
///
/// Parsing is a pure function of the request and the resolver; it performs
/// no I/O and shares no state.
pub trait WebhookService: Send + Sync {
    /// Classifies, verifies and decodes one webhook delivery.
    ///
    /// Only the first [`MAX_PAYLOAD_BYTES`] of the body are looked at, but
    /// the body is already in memory by then. Callers buffering untrusted
    /// input should read it through [`read_capped`].
    ///
    /// [`MAX_PAYLOAD_BYTES`]: crate::webhook::MAX_PAYLOAD_BYTES
    /// [`read_capped`]: crate::webhook::read_capped
    ///
    /// # Errors
    ///
    /// - [`ScmError::UnknownEvent`] if the discriminator is missing or not handled
    /// - [`ScmError::SignatureMismatch`] if a secret was resolved and the signature is wrong
    /// - [`ScmError::Decode`] if a known event's body is malformed
    /// - [`ScmError::NotSupported`] if the provider has no webhook support
    fn parse(
        &self,
        request: &http::Request<Vec<u8>>,
        resolver: Option<&dyn SecretResolver>,
    ) -> Result<Webhook, ScmError>;
}

/// What a [`SecretResolver`] is told about a delivery.
#[derive(Debug, Clone, Copy)]
pub struct SecretRequest<'a> {
    /// Provider that sent the delivery.
    pub driver: Driver,
    /// Raw event discriminator.
    pub event: &'a str,
    /// Delivery headers.
    pub headers: &'a HeaderMap,
}

/// Supplies the shared secret used to verify a webhook signature.
///
/// Returning `None` skips verification for that delivery.
pub trait SecretResolver: Send + Sync {
    fn secret(&self, request: &SecretRequest<'_>) -> Option<String>;
}

/// A resolver that returns the same secret for every delivery.
///
/// An empty secret declines verification.
#[derive(Clone)]
pub struct StaticSecret(String);

impl StaticSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl std::fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticSecret").field(&"<redacted>").finish()
    }
}

impl SecretResolver for StaticSecret {
    fn secret(&self, _request: &SecretRequest<'_>) -> Option<String> {
        (!self.0.is_empty()).then(|| self.0.clone())
    }
}

impl<F> SecretResolver for F
where
    F: Fn(&SecretRequest<'_>) -> Option<String> + Send + Sync,
{
    fn secret(&self, request: &SecretRequest<'_>) -> Option<String> {
        self(request)
    }
}
