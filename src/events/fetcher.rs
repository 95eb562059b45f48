// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Event fetching over arbitrarily large block ranges
//!
//! Providers cap how many logs a single `eth_getLogs` call may return. The
//! [`RangeFetcher`] first asks for the whole range and, when the provider
//! refuses, splits the range at its midpoint and recurses on both halves. The
//! halves are concatenated left then right, so the output order is identical
//! to what an uncapped provider would have returned.

use std::time::Duration;

use alloy_primitives::{Address, BlockNumber};
use alloy_rpc_types::Log;
use futures::future::{try_join, BoxFuture, FutureExt};
use tracing::{debug, warn, Instrument};

use super::decoded::{DecodedEvent, EventKind};
use super::range::BlockRange;
use crate::chain::{ChainSource, LogQuery};
use crate::config::IndexerConfig;
use crate::errors::{EventFetchError, RpcError};
use crate::tracing::spans;

/// Upper end of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTarget {
    /// A fixed block (inclusive)
    Number(BlockNumber),
    /// Current chain height, resolved once per fetch
    Latest,
}

impl From<BlockNumber> for BlockTarget {
    fn from(block: BlockNumber) -> Self {
        BlockTarget::Number(block)
    }
}

/// Fetches one event stream over a block range, splitting on provider limits
///
/// # Examples
///
/// ```rust,ignore
/// use vagarish::{BlockTarget, DisputeCreated, RangeFetcher, RpcChain};
///
/// let fetcher = RangeFetcher::new(RpcChain::connect_http(&rpc_url)?)
///     .with_concurrent_split(true);
///
/// let created: Vec<DisputeCreated> = fetcher
///     .fetch(Some(root_contract), 7_303_699, BlockTarget::Latest)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct RangeFetcher<C> {
    chain: C,
    min_split_width: u64,
    concurrent_split: bool,
    rate_limit_delay: Option<Duration>,
}

impl<C: ChainSource> RangeFetcher<C> {
    /// Create a fetcher that splits down to single blocks, sequentially and
    /// without any delay between calls
    pub fn new(chain: C) -> Self {
        Self {
            chain,
            min_split_width: 1,
            concurrent_split: false,
            rate_limit_delay: None,
        }
    }

    /// Create a fetcher using the splitting and pacing settings of `config`
    pub fn from_config(chain: C, config: &IndexerConfig) -> Self {
        Self {
            chain,
            min_split_width: config.min_split_width.max(1),
            concurrent_split: config.concurrent_split,
            rate_limit_delay: config.rate_limit_delay,
        }
    }

    /// Ranges this wide or narrower are never split again
    pub fn with_min_split_width(mut self, width: u64) -> Self {
        self.min_split_width = width.max(1);
        self
    }

    /// Fetch the two halves of a split range concurrently
    pub fn with_concurrent_split(mut self, concurrent: bool) -> Self {
        self.concurrent_split = concurrent;
        self
    }

    /// Sleep this long before every provider call
    pub fn with_rate_limit_delay(mut self, delay: Option<Duration>) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// The underlying chain source
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Resolve a [`BlockTarget`] to a concrete block number
    pub async fn resolve_target(&self, target: BlockTarget) -> Result<BlockNumber, RpcError> {
        match target {
            BlockTarget::Number(block) => Ok(block),
            BlockTarget::Latest => self.chain.block_number().await,
        }
    }

    /// Fetch the raw logs of one event type over `[from_block, to_block]`
    ///
    /// `address` restricts the emitting contract; `None` matches all.
    ///
    /// # Errors
    ///
    /// - [`EventFetchError::InvalidInput`] if the range ends before it starts
    /// - [`EventFetchError::RangeUnsplittable`] if a range at the minimum split
    ///   width still exceeds the provider result limit
    /// - [`EventFetchError::Rpc`] for every other provider failure
    pub async fn fetch_event_range(
        &self,
        kind: EventKind,
        address: Option<Address>,
        from_block: BlockNumber,
        to_block: BlockTarget,
    ) -> Result<Vec<Log>, EventFetchError> {
        let to_block = self.resolve_target(to_block).await?;
        let range = BlockRange::new(from_block, to_block).ok_or_else(|| {
            EventFetchError::invalid_input(format!(
                "to_block {to_block} is before from_block {from_block}"
            ))
        })?;

        let query = LogQuery::new(address, kind.signature_hash(), range.from(), range.to());
        let span = spans::fetch_event_range(kind.name(), address, range.from(), range.to());

        async move {
            let logs = self.fetch_split(query, range).await?;
            debug!(logs = logs.len(), "Fetched event range");
            Ok(logs)
        }
        .instrument(span)
        .await
    }

    /// Fetch and decode one event type over `[from_block, to_block]`
    ///
    /// Logs that do not decode as `E` are logged and skipped.
    pub async fn fetch<E: DecodedEvent>(
        &self,
        address: Option<Address>,
        from_block: BlockNumber,
        to_block: BlockTarget,
    ) -> Result<Vec<E>, EventFetchError> {
        let logs = self
            .fetch_event_range(E::KIND, address, from_block, to_block)
            .await?;

        let mut events = Vec::with_capacity(logs.len());
        for log in &logs {
            match E::from_log(log) {
                Ok(event) => events.push(event),
                Err(e) => warn!(
                    event = %E::KIND,
                    address = %log.address(),
                    block_number = ?log.block_number,
                    transaction_hash = ?log.transaction_hash,
                    error = %e,
                    "Skipping undecodable log"
                ),
            }
        }

        Ok(events)
    }

    fn fetch_split(
        &self,
        query: LogQuery,
        range: BlockRange,
    ) -> BoxFuture<'_, Result<Vec<Log>, EventFetchError>> {
        async move {
            if let Some(delay) = self.rate_limit_delay {
                tokio::time::sleep(delay).await;
            }

            let query = query.with_range(range.from(), range.to());
            match self.chain.get_logs(&query).await {
                Ok(logs) => Ok(logs),
                Err(e) if e.is_result_limit() => {
                    let halves = if range.len() > self.min_split_width {
                        range.split_mid()
                    } else {
                        None
                    };
                    let Some((left, right)) = halves else {
                        return Err(EventFetchError::range_unsplittable(range.from(), range.to()));
                    };

                    debug!(
                        range = %range,
                        left = %left,
                        right = %right,
                        "Result limit exceeded, splitting range"
                    );

                    let (mut head, tail) = if self.concurrent_split {
                        try_join(self.fetch_split(query, left), self.fetch_split(query, right))
                            .await?
                    } else {
                        let head = self.fetch_split(query, left).await?;
                        let tail = self.fetch_split(query, right).await?;
                        (head, tail)
                    };
                    head.extend(tail);
                    Ok(head)
                }
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }
}
