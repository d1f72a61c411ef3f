//! Azure DevOps driver.
//!
//! Azure DevOps service hooks post every event to one endpoint and name the
//! event in the body's `eventType` field. Deliveries are not signed, so a
//! secret resolver is never consulted. Repository and app operations are
//! not provided by this driver.

mod webhook;

#[cfg(test)]
mod webhook_tests;

use std::sync::Arc;

use crate::model::Driver;
use crate::transport::{Executor, HttpClient, ReqwestClient, Transport};
use crate::{Client, ScmError};

pub use self::webhook::WebhookService;

/// Creates an Azure DevOps client for an organization URL such as
/// `https://dev.azure.com/org`.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` is not a valid URL.
pub fn new(uri: &str) -> Result<Client, ScmError> {
    new_with_client(uri, ReqwestClient::new())
}

/// Creates an Azure DevOps client executing through `client`.
///
/// # Errors
///
/// Returns [`ScmError::Transport`] if `uri` is not a valid URL.
pub fn new_with_client<H: HttpClient + 'static>(uri: &str, client: H) -> Result<Client, ScmError> {
    Ok(from_transport(Transport::with_client(uri, client)?))
}

/// Creates an Azure DevOps client from a configured [`Transport`].
#[must_use]
pub fn from_transport<H: HttpClient + 'static>(transport: Transport<H>) -> Client {
    let executor: Arc<dyn Executor> = Arc::new(transport);
    Client::builder(Driver::Azure, executor)
        .webhooks(Arc::new(WebhookService))
        .build()
}
