// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for block timestamp resolution.

use super::{RpcError, StoreError};

/// Errors that can occur while resolving a block's timestamp.
///
/// # Examples
///
/// ```rust,ignore
/// use vagarish::{BlockTimestampCache, BlockTimestampError};
///
/// match cache.timestamp_of(7_303_699).await {
///     Ok(ts) => println!("Mined at {ts}"),
///     Err(BlockTimestampError::Rpc(e)) => eprintln!("Chain unavailable: {e}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BlockTimestampError {
    /// The chain could not provide the block.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The persistent timestamp cache could not be read or written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The block's timestamp does not fit a calendar date.
    #[error("Timestamp {timestamp} of block {block_number} is out of range")]
    OutOfRange {
        /// Block number
        block_number: u64,
        /// Raw unix timestamp
        timestamp: u64,
    },
}
