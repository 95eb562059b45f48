// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for vagarish operations.
//!
//! Telemetry stays out of business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a helper here and attaches the
//! span to its future.
//!
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use alloy_primitives::{Address, BlockNumber};
use tracing::{Level, Span};

/// Create span for one ingestion run.
///
/// Parent: None (root span for this operation)
/// Children: fetch_event_range, resolve_courts, ingest_evidence spans
#[inline]
pub(crate) fn ingest_run(root_contract: Address, start_block: BlockNumber) -> Span {
    tracing::span!(
        Level::INFO,
        "vagarish.ingest_run",
        root_contract = %root_contract,
        start_block = start_block,
    )
}

/// Create span for fetching one event stream over a block range.
///
/// Parent: ingest_run span
/// Children: RPC calls for each (sub-)range
#[inline]
pub(crate) fn fetch_event_range(
    event: &str,
    address: Option<Address>,
    from_block: BlockNumber,
    to_block: BlockNumber,
) -> Span {
    tracing::debug_span!(
        "vagarish.fetch_event_range",
        event = event,
        address = ?address,
        from_block = from_block,
        to_block = to_block,
    )
}

/// Create span for resolving the subcourt of every discovered dispute.
///
/// Parent: ingest_run span
#[inline]
pub(crate) fn resolve_courts(disputes: usize) -> Span {
    tracing::debug_span!("vagarish.resolve_courts", disputes = disputes)
}

/// Create span for preparing one evidence submission.
///
/// Parent: ingest_run span
/// Children: resolve_content, block_timestamp spans
#[inline]
pub(crate) fn ingest_evidence(
    arbitrable: Address,
    evidence_group_id: &str,
    block_number: BlockNumber,
) -> Span {
    tracing::debug_span!(
        "vagarish.ingest_evidence",
        arbitrable = %arbitrable,
        evidence_group_id = evidence_group_id,
        block_number = block_number,
    )
}

/// Create span for resolving an evidence document and its attached file.
#[inline]
pub(crate) fn resolve_content(locator: &str) -> Span {
    tracing::trace_span!("vagarish.resolve_content", locator = locator)
}

/// Create span for a block timestamp lookup that missed memory.
#[inline]
pub(crate) fn block_timestamp(block_number: BlockNumber) -> Span {
    tracing::trace_span!("vagarish.block_timestamp", block_number = block_number)
}
