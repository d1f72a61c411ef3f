//! SCM Client: a provider-agnostic client for source control platforms.
//!
//! One [`Client`] exposes the same repository, app and webhook operations for
//! every supported provider, while each driver keeps its wire format private.
//!
//! ```no_run
//! use scm_client::driver::github;
//!
//! # async fn demo() -> Result<(), scm_client::ScmError> {
//! let client = github::new_default()?;
//! let (repo, response) = client.repositories().find(None, "octocat/hello-world").await?;
//! println!("{} ({} requests left)", repo.full_name(), response.rate.remaining);
//! # Ok(())
//! # }
//! ```
//!
//! Inbound webhooks are normalized into one [`model::Webhook`] enum:
//!
//! ```no_run
//! use scm_client::driver::gitea;
//! use scm_client::service::StaticSecret;
//!
//! # fn demo(request: http::Request<Vec<u8>>) -> Result<(), scm_client::ScmError> {
//! let client = gitea::new("https://try.gitea.io")?;
//! let hook = client.webhooks().parse(&request, Some(&StaticSecret::new("s3cr3t")))?;
//! println!("{} from {}", hook.kind(), hook.repository().full_name());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod service;
pub mod time;
pub mod transport;
pub mod webhook;

pub use client::{Client, ClientBuilder};
pub use error::ScmError;
