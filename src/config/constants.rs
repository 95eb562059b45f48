// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known addresses and constants
//!
//! Centralizes protocol addresses and network defaults used throughout the crate.

use alloy_primitives::{address, Address};

/// The `KlerosLiquid` arbitrator on Ethereum mainnet.
///
/// Every dispute starts as a `DisputeCreation` event emitted by this contract.
///
/// Contract: 0x988b3a538b618c7a603e1c11ab82cd16dbe28069
pub const KLEROS_LIQUID: Address = address!("988b3a538b618c7a603e1c11ab82cd16dbe28069");

/// Public IPFS gateway operated by Kleros.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.kleros.io";

/// Maximum number of logs Infura-style providers return for one `eth_getLogs`.
pub const PROVIDER_RESULT_LIMIT: usize = 10_000;

/// JSON-RPC error code providers use for "limit exceeded".
pub const RESULT_LIMIT_ERROR_CODE: i64 = -32005;

/// Message fragments providers use when a log query matches too many results.
pub const RESULT_LIMIT_MESSAGES: &[&str] = &[
    "query returned more than",
    "more than 10000 results",
    "log response size exceeded",
];

/// Data directory used when `DATA_DIR` is not set.
pub const DEFAULT_DATA_DIR: &str = "files";
