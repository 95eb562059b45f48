// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared RPC error types for chain source operations.
//!
//! Every call into a [`ChainSource`](crate::ChainSource) reports failures with
//! [`RpcError`]. The variant [`RpcError::ResultLimitExceeded`] is special: it is
//! the provider telling us a log query matched more results than it is willing
//! to return, and the range fetcher recovers from it by splitting the query.

/// Errors that can occur while talking to the chain.
///
/// # Examples
///
/// ```rust
/// use vagarish::RpcError;
///
/// let error = RpcError::BlockNotFound { block_number: 42 };
/// assert!(!error.is_result_limit());
/// assert_eq!(error.to_string(), "Block not found: 42");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The provider refused a log query because it matched too many results.
    ///
    /// Recoverable by querying a narrower block range.
    #[error("Log query for blocks {from_block}-{to_block} exceeded the provider result limit")]
    ResultLimitExceeded {
        /// First block of the rejected query
        from_block: u64,
        /// Last block of the rejected query
        to_block: u64,
    },

    /// Failed to fetch logs from the chain.
    #[error("Failed to fetch logs for {operation}")]
    GetLogsFailed {
        /// Description of the query that failed (e.g., "Evidence 100-200")
        operation: String,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Block was not found at the specified block number.
    ///
    /// Usually means the block is beyond the provider's view of the chain tip.
    #[error("Block not found: {block_number}")]
    BlockNotFound {
        /// The block number that wasn't found
        block_number: u64,
    },

    /// Failed to fetch the current block number.
    #[error("Failed to get current block number")]
    GetBlockNumberFailed {
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to fetch block details by number.
    ///
    /// Different from `BlockNotFound`: the RPC call itself failed.
    #[error("Failed to fetch block {block_number} details")]
    GetBlockFailed {
        /// The block number we tried to fetch
        block_number: u64,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A read-only contract call failed.
    #[error("Contract call failed during {operation}")]
    CallFailed {
        /// Description of the call (e.g., "disputes(12)")
        operation: String,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The provider URL could not be parsed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),
}

impl RpcError {
    /// Returns `true` if this error is the provider's result-limit rejection.
    pub fn is_result_limit(&self) -> bool {
        matches!(self, RpcError::ResultLimitExceeded { .. })
    }

    /// Helper to create a `ResultLimitExceeded` error.
    pub fn result_limit_exceeded(from_block: u64, to_block: u64) -> Self {
        RpcError::ResultLimitExceeded {
            from_block,
            to_block,
        }
    }

    /// Helper to create a `GetLogsFailed` error from any error type.
    pub fn get_logs_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetLogsFailed {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockNumberFailed` error from any error type.
    pub fn get_block_number_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        RpcError::GetBlockNumberFailed {
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockFailed` error from any error type.
    pub fn get_block_failed(
        block_number: u64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetBlockFailed {
            block_number,
            source: Box::new(source),
        }
    }

    /// Helper to create a `CallFailed` error from any error type.
    pub fn call_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::CallFailed {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}
