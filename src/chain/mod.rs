// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain log source abstraction
//!
//! The pipeline needs four things from a chain: logs for one event signature
//! over a block range, the current height, block timestamps, and read-only
//! contract calls. [`ChainSource`] captures exactly that, so the ingestion
//! logic can run against a live provider ([`RpcChain`]) or an in-memory mock.
//!
//! # Example
//!
//! ```rust,ignore
//! use vagarish::{RpcChain, ChainSource};
//!
//! let chain = RpcChain::connect_http("https://mainnet.infura.io/v3/<key>")?;
//! let height = chain.block_number().await?;
//! ```

use alloy_primitives::{Address, Bytes, B256};
use alloy_rpc_types::Log;
use async_trait::async_trait;

use crate::errors::RpcError;

mod rpc;

pub use rpc::{is_result_limit_error, RpcChain};

/// One `eth_getLogs` query: a single event signature over an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogQuery {
    /// Emitting contract; `None` matches every address
    pub address: Option<Address>,
    /// Event signature hash (topic 0)
    pub topic0: B256,
    /// First block (inclusive)
    pub from_block: u64,
    /// Last block (inclusive)
    pub to_block: u64,
}

impl LogQuery {
    /// Create a query over `[from_block, to_block]`
    pub const fn new(
        address: Option<Address>,
        topic0: B256,
        from_block: u64,
        to_block: u64,
    ) -> Self {
        Self {
            address,
            topic0,
            from_block,
            to_block,
        }
    }

    /// Same query restricted to another range
    pub const fn with_range(self, from_block: u64, to_block: u64) -> Self {
        Self {
            from_block,
            to_block,
            ..self
        }
    }
}

/// Read-only access to a chain
///
/// Implementations must report a provider's result-limit rejection as
/// [`RpcError::ResultLimitExceeded`]; every other failure is treated as fatal
/// by callers.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Logs matching `query`, in ascending block order
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, RpcError>;

    /// Current chain height
    async fn block_number(&self) -> Result<u64, RpcError>;

    /// Unix timestamp (seconds) of a block
    async fn block_timestamp(&self, block_number: u64) -> Result<u64, RpcError>;

    /// `eth_call` against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError>;
}

#[async_trait]
impl<T: ChainSource + ?Sized> ChainSource for std::sync::Arc<T> {
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, RpcError> {
        (**self).get_logs(query).await
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        (**self).block_number().await
    }

    async fn block_timestamp(&self, block_number: u64) -> Result<u64, RpcError> {
        (**self).block_timestamp(block_number).await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        (**self).call(to, data).await
    }
}
