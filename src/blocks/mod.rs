// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block timestamp resolution
//!
//! Evidence records are dated by the block they were submitted in. Looking a
//! block up is one RPC round-trip, and busy disputes put many evidence
//! submissions in nearby or identical blocks, so every resolved timestamp is
//! kept twice: in the record store (survives restarts) and in a process-local
//! map (skips even the store lookup).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, Instrument};

use crate::chain::ChainSource;
use crate::errors::BlockTimestampError;
use crate::store::{BlockTimestampEntry, RecordStore};
use crate::tracing::spans;

/// Block number to timestamp, backed by the record store
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use vagarish::{BlockTimestampCache, FsStore, RpcChain};
///
/// let chain = Arc::new(RpcChain::connect_http(&rpc_url)?);
/// let store = Arc::new(FsStore::open("files/records").await?);
/// let cache = BlockTimestampCache::new(chain, store);
///
/// let mined_at = cache.datetime_of(7_303_699).await?;
/// ```
#[derive(Debug)]
pub struct BlockTimestampCache<C, S> {
    chain: C,
    store: S,
    memory: Mutex<HashMap<u64, u64>>,
}

impl<C: ChainSource, S: RecordStore> BlockTimestampCache<C, S> {
    /// Create a cache over a chain and a store
    pub fn new(chain: C, store: S) -> Self {
        Self {
            chain,
            store,
            memory: Mutex::new(HashMap::new()),
        }
    }

    /// Unix timestamp (seconds) of `block_number`
    ///
    /// Checks memory, then the store, then asks the chain and records the
    /// answer in both.
    pub async fn timestamp_of(&self, block_number: u64) -> Result<u64, BlockTimestampError> {
        if let Some(ts) = self.memory.lock().await.get(&block_number) {
            return Ok(*ts);
        }

        let span = spans::block_timestamp(block_number);
        async move {
            let timestamp = match self.store.block_timestamp(block_number).await? {
                Some(ts) => ts,
                None => {
                    let ts = self.chain.block_timestamp(block_number).await?;
                    self.store
                        .put_block_timestamp(BlockTimestampEntry {
                            block_number,
                            timestamp: ts,
                        })
                        .await?;
                    debug!(timestamp = ts, "Fetched block timestamp from chain");
                    ts
                }
            };

            self.memory.lock().await.insert(block_number, timestamp);
            Ok(timestamp)
        }
        .instrument(span)
        .await
    }

    /// UTC time of `block_number`
    pub async fn datetime_of(
        &self,
        block_number: u64,
    ) -> Result<DateTime<Utc>, BlockTimestampError> {
        let timestamp = self.timestamp_of(block_number).await?;
        i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(BlockTimestampError::OutOfRange {
                block_number,
                timestamp,
            })
    }
}
