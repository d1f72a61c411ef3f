//! Error taxonomy shared by the transport core, drivers and webhook parsing.

use http::StatusCode;
use thiserror::Error;

use crate::transport::HttpError;

/// Error returned by every client, service and webhook operation.
///
/// Expected conditions (unsupported operation, missing resource, bad
/// signature, unknown event) are always reported through this type and
/// never by panicking.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The resource does not exist at the provider.
    #[error("Not Found")]
    NotFound,

    /// The operation has no analogue on this provider.
    #[error("Not Supported")]
    NotSupported,

    /// Credentials were rejected or lack the required scope.
    #[error("Not Authorized")]
    NotAuthorized,

    /// The webhook discriminator is not handled by this driver.
    ///
    /// Holds the raw discriminator (empty if it was missing).
    #[error("Unknown webhook event '{0}'")]
    UnknownEvent(String),

    /// A payload matched a known discriminator but could not be decoded.
    #[error("Failed to decode '{event}' payload: {source}")]
    Decode {
        /// The discriminator or resource being decoded
        event: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The webhook signature did not match the shared secret.
    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    /// The provider answered with an error status not covered above.
    #[error("Provider error ({status}): {message}")]
    Provider {
        /// HTTP status code
        status: StatusCode,
        /// Message extracted from the error body
        message: String,
    },

    /// URL construction or the HTTP round-trip failed.
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl ScmError {
    /// Classifies a non-success provider status.
    ///
    /// 401 and 403 map to [`NotAuthorized`](Self::NotAuthorized), 404 to
    /// [`NotFound`](Self::NotFound); anything else keeps its status and message.
    #[must_use]
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::NotAuthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            _ => Self::Provider {
                status,
                message: message.into(),
            },
        }
    }

    /// Creates a [`Decode`](Self::Decode) error.
    #[must_use]
    pub fn decode(event: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            event: event.into(),
            source,
        }
    }

    /// Returns true for [`UnknownEvent`](Self::UnknownEvent).
    #[must_use]
    pub const fn is_unknown_event(&self) -> bool {
        matches!(self, Self::UnknownEvent(_))
    }

    /// Returns true for [`NotSupported`](Self::NotSupported).
    #[must_use]
    pub const fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported)
    }
}
