//! Transport core shared by every provider driver.
//!
//! This module provides:
//! - The injectable HTTP execution strategy ([`HttpClient`], [`ReqwestClient`])
//! - Per-call overrides ([`AuthContext`]) and an auth decorator ([`BearerAuth`])
//! - Pagination parsing ([`Page`], [`parse_link_header`])
//! - The client-wide rate-limit snapshot ([`Rate`], [`RateCell`])
//! - Request execution ([`Transport`], [`Executor`])

mod auth;
mod client;
mod error;
mod executor;
mod http;
mod page;
mod rate;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod page_tests;

pub use self::auth::{AuthContext, BearerAuth, Token};
pub use self::client::ReqwestClient;
pub use self::error::HttpError;
pub use self::executor::{Executor, Request, Response, Transport};
pub use self::http::{HttpClient, HttpRequest, HttpResponse};
pub use self::page::{Page, parse_link_header, parse_link_value};
pub use self::rate::{Rate, RateCell};
