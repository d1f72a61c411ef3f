//! The provider-agnostic client facade.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::ScmError;
use crate::model::Driver;
use crate::service::{AppsService, RepositoryService, Unsupported, WebhookService};
use crate::transport::{AuthContext, Executor, Rate, Request, Response};

/// A client for one provider server.
///
/// The driver identity and the attached resource services are fixed when the
/// client is built. Cloning is cheap and clones share the rate snapshot.
///
/// # Example
///
/// ```no_run
/// use scm_client::driver::github;
///
/// # async fn example() -> Result<(), scm_client::ScmError> {
/// let client = github::new("https://api.github.com")?;
/// let (repo, response) = client.repositories().find(None, "octocat/hello-world").await?;
/// println!("{} ({} calls left)", repo.full_name(), response.rate.remaining);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    driver: Driver,
    executor: Arc<dyn Executor>,
    repositories: Arc<dyn RepositoryService>,
    apps: Arc<dyn AppsService>,
    webhooks: Arc<dyn WebhookService>,
}

impl Client {
    /// Starts building a client; every domain defaults to [`Unsupported`].
    #[must_use]
    pub fn builder(driver: Driver, executor: Arc<dyn Executor>) -> ClientBuilder {
        ClientBuilder {
            driver,
            executor,
            repositories: Arc::new(Unsupported),
            apps: Arc::new(Unsupported),
            webhooks: Arc::new(Unsupported),
        }
    }

    /// Returns the provider this client targets.
    #[must_use]
    pub const fn driver(&self) -> Driver {
        self.driver
    }

    /// Returns the default base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.executor.base_url()
    }

    /// Returns the most recent rate-limit snapshot.
    #[must_use]
    pub fn rate(&self) -> Rate {
        self.executor.rate()
    }

    /// Executes a raw request against the provider API.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Transport`] if the URL cannot be built or the
    /// round-trip fails.
    pub async fn execute(
        &self,
        auth: Option<&AuthContext>,
        request: Request,
    ) -> Result<Response, ScmError> {
        self.executor.execute(auth, request).await
    }

    #[must_use]
    pub fn repositories(&self) -> &dyn RepositoryService {
        self.repositories.as_ref()
    }

    #[must_use]
    pub fn apps(&self) -> &dyn AppsService {
        self.apps.as_ref()
    }

    #[must_use]
    pub fn webhooks(&self) -> &dyn WebhookService {
        self.webhooks.as_ref()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("driver", &self.driver)
            .field("base_url", &self.base_url().as_str())
            .finish_non_exhaustive()
    }
}

/// Attaches resource services to a [`Client`].
pub struct ClientBuilder {
    driver: Driver,
    executor: Arc<dyn Executor>,
    repositories: Arc<dyn RepositoryService>,
    apps: Arc<dyn AppsService>,
    webhooks: Arc<dyn WebhookService>,
}

impl ClientBuilder {
    #[must_use]
    pub fn repositories(mut self, service: Arc<dyn RepositoryService>) -> Self {
        self.repositories = service;
        self
    }

    #[must_use]
    pub fn apps(mut self, service: Arc<dyn AppsService>) -> Self {
        self.apps = service;
        self
    }

    #[must_use]
    pub fn webhooks(mut self, service: Arc<dyn WebhookService>) -> Self {
        self.webhooks = service;
        self
    }

    #[must_use]
    pub fn build(self) -> Client {
        Client {
            driver: self.driver,
            executor: self.executor,
            repositories: self.repositories,
            apps: self.apps,
            webhooks: self.webhooks,
        }
    }
}
