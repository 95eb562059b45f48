// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the vagarish library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`EventFetchError`],
//!   [`ContentError`], [`StoreError`], ...)
//! - **Unified error type** ([`IndexerError`]) for callers that only need to
//!   know that the run failed
//!
//! # Fatal vs. per-item
//!
//! The ingestion pipeline separates errors by scope:
//!
//! - [`RpcError`] (other than the result limit), [`EventFetchError`],
//!   [`CourtError`] and [`StoreError`] abort the run and surface as
//!   [`IndexerError`].
//! - [`ContentError`] is local to one evidence item; the pipeline logs it and
//!   moves on. It never reaches [`IndexerError`] from the pipeline, although the
//!   `From` conversion exists for callers using the resolver directly.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vagarish::{IndexerError, IngestionPipeline};
//!
//! async fn ingest(pipeline: &IngestionPipeline<Chain, Store>) -> Result<(), IndexerError> {
//!     let report = pipeline.run().await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

mod blocks;
mod config;
mod content;
mod courts;
mod events;
mod rpc;
mod store;

pub use blocks::BlockTimestampError;
pub use config::ConfigError;
pub use content::ContentError;
pub use courts::CourtError;
pub use events::EventFetchError;
pub use rpc::RpcError;
pub use store::StoreError;

/// Unified error type for all vagarish operations.
///
/// All module-specific error types convert into `IndexerError` via `From`, so
/// `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// Error from fetching an event stream.
    #[error("Event fetch error: {0}")]
    Events(#[from] EventFetchError),

    /// Error from block timestamp resolution.
    #[error("Block timestamp error: {0}")]
    Blocks(#[from] BlockTimestampError),

    /// Error from a direct chain call.
    #[error("Chain error: {0}")]
    Rpc(#[from] RpcError),

    /// Error from subcourt resolution.
    #[error("Court resolution error: {0}")]
    Courts(#[from] CourtError),

    /// Error from the record store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from content resolution.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Error from configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
