//! Gitea driver.
//!
//! Only webhook parsing is provided. Deliveries name the event in the
//! `X-Gitea-Event` header and are signed with a bare hex HMAC-SHA256 in
//! `X-Gitea-Signature`.

mod webhook;

#[cfg(test)]
mod webhook_tests;

use std::sync::Arc;

use crate::model::Driver;
use crate::transport::{Executor, HttpClient, ReqwestClient, Transport};
use crate::{Client, ScmError};

pub use self::webhook::WebhookService;

/// Creates a Gitea client for a server URL such as `https://try.gitea.io`.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` is not a valid URL.
pub fn new(uri: &str) -> Result<Client, ScmError> {
    new_with_client(uri, ReqwestClient::new())
}

/// Creates a Gitea client executing through `client`.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` is not a valid URL.
pub fn new_with_client<H: HttpClient + 'static>(uri: &str, client: H) -> Result<Client, ScmError> {
    Ok(from_transport(Transport::with_client(uri, client)?))
}

/// Creates a Gitea client from a configured [`Transport`].
#[must_use]
pub fn from_transport<H: HttpClient + 'static>(transport: Transport<H>) -> Client {
    let executor: Arc<dyn Executor> = Arc::new(transport);
    Client::builder(Driver::Gitea, executor)
        .webhooks(Arc::new(WebhookService))
        .build()
}
