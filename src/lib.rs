// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Indexer for Kleros arbitration disputes and their off-chain evidence.
//!
//! An ingestion run reads `DisputeCreation` events from the arbitrator, the
//! `Dispute` and `Evidence` events of every arbitrable contract behind them,
//! resolves each evidence document over IPFS, extracts text from attached
//! files, and persists disputes and evidence as linked records ready for
//! full-text search.
//!
//! The main pieces:
//!
//! - [`RangeFetcher`]: log fetching that splits block ranges around provider
//!   result caps
//! - [`ContentResolver`]: locator validation, cached gateway fetches and
//!   evidence document parsing
//! - [`DocumentExtractor`]: text extraction from `txt`, `md` and `pdf` payloads
//! - [`RecordStore`]: durable dispute, evidence and block timestamp storage
//! - [`IngestionPipeline`]: the phases tying them together
//! - [`search()`]: the read contract over persisted records
//!
//! Chain access, the content gateway and the store are passed in explicitly;
//! nothing is global.

pub mod blocks;
pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod content;
pub mod courts;
pub mod errors;
pub mod events;
pub mod extract;
pub mod pipeline;
pub mod search;
pub mod store;
mod tracing;

pub use blocks::BlockTimestampCache;
pub use chain::{ChainSource, LogQuery, RpcChain};
pub use config::{IndexerConfig, IndexerConfigBuilder};
pub use content::{
    ContentCache, ContentCacheStats, ContentGateway, ContentLocator, ContentResolver,
    DiskContentCache, EvidenceDocument, HttpGateway, MemoryContentCache, ResolvedContent,
    ResolvedFile,
};
pub use courts::{CourtMap, CourtResolution, CourtResolver};
pub use errors::{
    BlockTimestampError, ConfigError, ContentError, CourtError, EventFetchError, IndexerError,
    RpcError, StoreError,
};
pub use events::{
    ArbitrationEvent, BlockRange, BlockTarget, DecodedEvent, DisputeCreated, DisputeLinked,
    EventKind, EventMeta, EvidenceSubmitted, RangeFetcher,
};
pub use extract::{DocumentExtractor, DocumentFormat, Extraction};
pub use pipeline::{IngestReport, IngestionPipeline};
pub use search::{search, SearchQuery, SearchResult};
pub use store::{
    BlockTimestampEntry, DisputeRecord, EvidenceRecord, FsStore, MemoryStore, NewDispute,
    NewEvidence, RecordId, RecordStore,
};
