// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for event fetching.

use super::RpcError;

/// Errors that can occur while fetching an event stream over a block range.
///
/// A provider result-limit rejection never shows up here: the range fetcher
/// splits the query instead. What remains is fatal for the current fetch.
///
/// # Examples
///
/// ```rust,ignore
/// use vagarish::{EventFetchError, RangeFetcher, DisputeCreated};
///
/// match fetcher.fetch::<DisputeCreated>(Some(root), 0, latest).await {
///     Ok(events) => println!("Fetched {} dispute creations", events.len()),
///     Err(EventFetchError::RangeUnsplittable { from_block, .. }) => {
///         eprintln!("Block {from_block} alone holds too many events");
///     }
///     Err(e) => eprintln!("Fetch failed: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EventFetchError {
    /// A log could not be decoded as the expected event.
    ///
    /// The range fetcher logs these and keeps going; they only surface when a
    /// caller decodes a log directly.
    #[error("Failed to decode event: {details}")]
    DecodeFailed {
        /// Details about why the decode failed
        details: String,
    },

    /// A range at the minimum split width still exceeds the provider limit.
    #[error(
        "Blocks {from_block}-{to_block} exceed the provider result limit and cannot be split further"
    )]
    RangeUnsplittable {
        /// First block of the range
        from_block: u64,
        /// Last block of the range
        to_block: u64,
    },

    /// RPC error when communicating with the chain.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Invalid input provided to an operation.
    ///
    /// For example a range whose end lies before its start.
    #[error("Invalid input: {details}")]
    InvalidInput {
        /// Details about what was invalid
        details: String,
    },
}

impl EventFetchError {
    /// Create a `DecodeFailed` error with details.
    pub fn decode_failed(details: impl Into<String>) -> Self {
        EventFetchError::DecodeFailed {
            details: details.into(),
        }
    }

    /// Create a `RangeUnsplittable` error.
    pub fn range_unsplittable(from_block: u64, to_block: u64) -> Self {
        EventFetchError::RangeUnsplittable {
            from_block,
            to_block,
        }
    }

    /// Create an `InvalidInput` error with details.
    pub fn invalid_input(details: impl Into<String>) -> Self {
        EventFetchError::InvalidInput {
            details: details.into(),
        }
    }
}
