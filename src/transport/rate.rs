//! Rate-limit snapshot shared by every call of one client.

use std::sync::{Mutex, PoisonError};

use http::HeaderMap;

/// Request quota as last reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed per window.
    pub limit: i64,
    /// Requests left in the current window.
    pub remaining: i64,
    /// Unix time (seconds) at which the window resets.
    pub reset: i64,
}

impl Rate {
    /// Reads a rate snapshot from vendor-specific header names.
    ///
    /// Missing or unparsable headers become zero.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, limit: &str, remaining: &str, reset: &str) -> Self {
        Self {
            limit: header_i64(headers, limit),
            remaining: header_i64(headers, remaining),
            reset: header_i64(headers, reset),
        }
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> i64 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Thread-safe cell holding the most recent [`Rate`].
///
/// Reads and writes replace the whole tuple under one lock, so a reader
/// never sees fields from two different snapshots.
#[derive(Debug, Default)]
pub struct RateCell {
    rate: Mutex<Rate>,
}

impl RateCell {
    /// Creates a cell holding the zero snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn get(&self) -> Rate {
        *self.rate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the snapshot.
    pub fn set(&self, rate: Rate) {
        *self.rate.lock().unwrap_or_else(PoisonError::into_inner) = rate;
    }
}
