// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for subcourt resolution.

use super::{RpcError, StoreError};

/// Errors that can occur while resolving dispute subcourts.
#[derive(Debug, thiserror::Error)]
pub enum CourtError {
    /// The `disputes(uint256)` call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The call returned data that is not a valid `disputes` return tuple.
    #[error("Failed to decode subcourt of dispute {dispute_id}: {details}")]
    DecodeFailed {
        /// Protocol dispute id
        dispute_id: String,
        /// Decoder message
        details: String,
    },

    /// A dispute id could not be encoded as a uint256.
    #[error("Dispute id '{dispute_id}' is not a valid uint256")]
    InvalidDisputeId {
        /// The offending id
        dispute_id: String,
    },

    /// Reading or writing the court side-file failed.
    #[error("Court side-file error: {0}")]
    SideFile(#[from] StoreError),
}

impl CourtError {
    /// Create a `DecodeFailed` error.
    pub fn decode_failed(dispute_id: impl Into<String>, details: impl Into<String>) -> Self {
        CourtError::DecodeFailed {
            dispute_id: dispute_id.into(),
            details: details.into(),
        }
    }
}
