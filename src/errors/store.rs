// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the record store and side-files.

/// Errors that can occur while reading or writing persisted records.
///
/// Store failures are not per-item: a store that cannot be written leaves the
/// run with nothing to build on, so the pipeline propagates them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error at a record or directory path.
    #[error("Store I/O error at {path}: {details}")]
    Io {
        /// Path that caused the error
        path: String,
        /// What was being attempted
        details: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {details}")]
    Serialization {
        /// Which record or file was involved
        details: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// The on-disk layout was written by an incompatible version.
    #[error("Unsupported store layout version {found} (expected {expected})")]
    VersionMismatch {
        /// Version found on disk
        found: u32,
        /// Version this build writes
        expected: u32,
    },

    /// An update referenced a record that does not exist.
    #[error("Record not found: {collection}/{id}")]
    RecordNotFound {
        /// Collection name
        collection: &'static str,
        /// Record id
        id: u64,
    },

    /// An insert collided with an existing record's unique key.
    #[error("Duplicate record in {collection}: {key}")]
    DuplicateRecord {
        /// Collection name
        collection: &'static str,
        /// The colliding key
        key: String,
    },
}

impl StoreError {
    /// Create an `Io` error.
    pub fn io(path: impl Into<String>, details: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            details: details.into(),
            source,
        }
    }

    /// Create a `Serialization` error.
    pub fn serialization(details: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Serialization {
            details: details.into(),
            source,
        }
    }
}
