// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for content resolution.
//!
//! Every variant here means the content behind one locator could not be
//! obtained. The ingestion pipeline treats all of them as per-item failures:
//! the evidence item is logged and skipped, the run continues.

/// Errors that can occur while resolving a content locator.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The locator does not have the `/ipfs/<46 alnum>/<name>` shape.
    ///
    /// Raised before any network call is attempted.
    #[error("Invalid content locator '{locator}': {reason}")]
    InvalidLocator {
        /// The locator as received
        locator: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The gateway request failed (connection, timeout, body read).
    #[error("Failed to fetch {locator}")]
    FetchFailed {
        /// Canonical locator that was requested
        locator: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The gateway answered with a non-success status.
    #[error("Gateway returned status {status} for {locator}")]
    UnexpectedStatus {
        /// Canonical locator that was requested
        locator: String,
        /// HTTP status code
        status: u16,
    },

    /// The evidence document is not valid JSON of the expected shape.
    #[error("Malformed evidence document at {locator}")]
    MalformedDocument {
        /// Canonical locator of the document
        locator: String,
        /// The JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the on-disk content cache failed.
    #[error("Content cache I/O error at {path}")]
    CacheIo {
        /// Path of the cache entry
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Create an `InvalidLocator` error.
    pub fn invalid_locator(locator: impl Into<String>, reason: &'static str) -> Self {
        ContentError::InvalidLocator {
            locator: locator.into(),
            reason,
        }
    }

    /// Create a `FetchFailed` error from any error type.
    pub fn fetch_failed(
        locator: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ContentError::FetchFailed {
            locator: locator.into(),
            source: Box::new(source),
        }
    }

    /// Create a `CacheIo` error from an I/O error and path.
    pub fn cache_io(path: impl Into<String>, source: std::io::Error) -> Self {
        ContentError::CacheIo {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the error was raised before touching the network.
    pub fn is_invalid_locator(&self) -> bool {
        matches!(self, ContentError::InvalidLocator { .. })
    }
}
