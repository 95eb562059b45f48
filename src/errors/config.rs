// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for configuration loading.

/// Errors that can occur while building an [`IndexerConfig`](crate::IndexerConfig)
/// from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing configuration: {field}")]
    Missing {
        /// Name of the missing variable
        field: String,
    },

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {field}: '{value}' ({details})")]
    Invalid {
        /// Name of the variable
        field: String,
        /// Raw value
        value: String,
        /// Parser message
        details: String,
    },
}

impl ConfigError {
    /// Create a `Missing` error for a specific field.
    pub fn missing(field: impl Into<String>) -> Self {
        ConfigError::Missing {
            field: field.into(),
        }
    }

    /// Create an `Invalid` error.
    pub fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        details: impl std::fmt::Display,
    ) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            value: value.into(),
            details: details.to_string(),
        }
    }
}
