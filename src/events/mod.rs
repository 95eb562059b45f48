// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Arbitration event streams
//!
//! This module handles:
//! - `DisputeCreation`, `Dispute` and `Evidence` event definitions
//! - Typed decoding of raw logs at the fetch boundary
//! - Range fetching with transparent splitting on provider result limits

pub mod decoded;
pub mod definitions;
pub mod fetcher;
pub mod range;

pub use decoded::{
    ArbitrationEvent, DecodedEvent, DisputeCreated, DisputeLinked, EventKind, EventMeta,
    EvidenceSubmitted,
};
pub use fetcher::{BlockTarget, RangeFetcher};
pub use range::BlockRange;
