// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Off-chain evidence content
//!
//! Evidence events point at a JSON document on IPFS, which may in turn point
//! at an attached file. This module validates those locators, fetches through
//! an HTTP gateway and keeps a durable, write-once cache keyed by the
//! keccak-256 hash of each canonical locator.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vagarish::{ContentResolver, DiskContentCache, HttpGateway};
//!
//! let resolver = ContentResolver::new(
//!     Arc::new(HttpGateway::new(&config.ipfs_gateway, config.content_timeout)?),
//!     Box::new(DiskContentCache::new(config.content_cache_dir())),
//! )
//! .with_retries(config.content_retries);
//! ```

mod cache;
mod document;
mod gateway;
mod locator;
mod resolver;

pub use cache::{ContentCache, ContentCacheStats, DiskContentCache, MemoryContentCache};
pub use document::EvidenceDocument;
pub use gateway::{ContentGateway, HttpGateway};
pub use locator::ContentLocator;
pub use resolver::{ContentResolver, ResolvedContent, ResolvedFile};
