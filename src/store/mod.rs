// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Persisted dispute, evidence and block-timestamp records
//!
//! Two backends implement [`RecordStore`]:
//!
//! - [`FsStore`]: one pretty-printed JSON file per record under a versioned
//!   directory layout, written atomically. This is what the binary uses and
//!   what downstream readers consume.
//! - [`MemoryStore`]: the same semantics without touching disk.
//!
//! Record ids are sequential per collection and restart at 1 after
//! [`RecordStore::reset_disputes_and_evidence`], so re-ingesting unchanged
//! chain state reproduces the same ids and byte-identical files.

use std::fmt;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

mod fs;
mod memory;
mod state;

pub use fs::FsStore;
pub(crate) use fs::{read_json, write_json};
pub use memory::MemoryStore;

/// System-assigned record id, unique within one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The raw id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dispute opened on the arbitrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeRecord {
    /// Store-assigned id, sequential from 1
    pub id: RecordId,
    /// Protocol dispute id, decimal
    pub kleros_liquid_id: String,
    /// Contract that opened the dispute
    pub arbitrable: Address,
    /// Set by the arbitrable's `Dispute` event
    pub evidence_group_id: Option<String>,
    /// Set by the arbitrable's `Dispute` event
    pub meta_evidence_id: Option<String>,
    /// Subcourt read from the arbitrator's `disputes` getter
    pub court_id: Option<u64>,
    /// Evidence linked to this dispute, in ingestion order
    pub evidence_ids: Vec<RecordId>,
    pub created_at_block: u64,
    pub transaction_hash: Option<B256>,
}

/// Fields of a dispute known at creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDispute {
    /// Protocol dispute id, decimal; unique together with `arbitrable`
    pub kleros_liquid_id: String,
    /// Contract that opened the dispute
    pub arbitrable: Address,
    /// Subcourt, when known
    pub court_id: Option<u64>,
    /// Block of the `DisputeCreation` event
    pub created_at_block: u64,
    /// Transaction that emitted `DisputeCreation`
    pub transaction_hash: Option<B256>,
}

/// A piece of evidence, always owned by an existing dispute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: RecordId,
    /// `name`, `title` and `description` of the evidence document
    pub text_content: String,
    /// Text extracted from the attached file
    pub file_text_content: Option<String>,
    /// The document attaches a file in a text-bearing format
    pub has_file: bool,
    /// Raw locator of the attached file
    pub file_uri: Option<String>,
    /// Canonical locator of the evidence document
    pub evidence_uri: String,
    /// Submitting party
    pub by_address: Address,
    /// Timestamp of the block the evidence was submitted in
    pub created_in: DateTime<Utc>,
    pub block_number: u64,
    /// Owning dispute's record id
    pub dispute_id: RecordId,
}

/// Fields of an evidence record before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvidence {
    /// Searchable text from the evidence document
    pub text_content: String,
    /// Text extracted from the attached file, if any
    pub file_text_content: Option<String>,
    /// The document attaches a file in a text-bearing format
    pub has_file: bool,
    /// Raw locator of the attached file
    pub file_uri: Option<String>,
    /// Canonical locator of the evidence document
    pub evidence_uri: String,
    /// Submitting party
    pub by_address: Address,
    /// Timestamp of the submission block
    pub created_in: DateTime<Utc>,
    /// Submission block
    pub block_number: u64,
    /// Owning dispute; must already exist
    pub dispute_id: RecordId,
}

/// A block number and its unix timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTimestampEntry {
    pub block_number: u64,
    pub timestamp: u64,
}

/// Durable storage for ingested records
///
/// Every mutating call is flushed before it returns; there is no cross-call
/// transaction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Delete every dispute and evidence record and restart both id sequences
    ///
    /// Block timestamps are kept.
    async fn reset_disputes_and_evidence(&self) -> Result<(), StoreError>;

    /// Create a dispute, assigning the next id
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateRecord`] if a dispute with the same
    /// `kleros_liquid_id` and `arbitrable` already exists.
    async fn insert_dispute(&self, dispute: NewDispute) -> Result<DisputeRecord, StoreError>;

    /// Replace an existing dispute
    ///
    /// # Errors
    ///
    /// [`StoreError::RecordNotFound`] if no dispute has `dispute.id`.
    async fn update_dispute(&self, dispute: &DisputeRecord) -> Result<(), StoreError>;

    /// Dispute by record id
    async fn get_dispute(&self, id: RecordId) -> Result<Option<DisputeRecord>, StoreError>;

    /// Dispute by protocol id and arbitrable
    async fn find_dispute(
        &self,
        kleros_liquid_id: &str,
        arbitrable: Address,
    ) -> Result<Option<DisputeRecord>, StoreError>;

    /// Lowest-id dispute of `arbitrable` with this evidence group
    async fn find_dispute_by_evidence_group(
        &self,
        evidence_group_id: &str,
        arbitrable: Address,
    ) -> Result<Option<DisputeRecord>, StoreError>;

    /// All disputes, ordered by id
    async fn list_disputes(&self) -> Result<Vec<DisputeRecord>, StoreError>;

    /// Create an evidence record, assigning the next id
    ///
    /// # Errors
    ///
    /// [`StoreError::RecordNotFound`] if `evidence.dispute_id` does not exist.
    async fn insert_evidence(&self, evidence: NewEvidence) -> Result<EvidenceRecord, StoreError>;

    /// Evidence by record id
    async fn get_evidence(&self, id: RecordId) -> Result<Option<EvidenceRecord>, StoreError>;

    /// All evidence, ordered by id
    async fn list_evidence(&self) -> Result<Vec<EvidenceRecord>, StoreError>;

    /// Persisted timestamp of a block
    async fn block_timestamp(&self, block_number: u64) -> Result<Option<u64>, StoreError>;

    /// Persist a block timestamp; a block already present is left untouched
    async fn put_block_timestamp(&self, entry: BlockTimestampEntry) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    async fn reset_disputes_and_evidence(&self) -> Result<(), StoreError> {
        (**self).reset_disputes_and_evidence().await
    }

    async fn insert_dispute(&self, dispute: NewDispute) -> Result<DisputeRecord, StoreError> {
        (**self).insert_dispute(dispute).await
    }

    async fn update_dispute(&self, dispute: &DisputeRecord) -> Result<(), StoreError> {
        (**self).update_dispute(dispute).await
    }

    async fn get_dispute(&self, id: RecordId) -> Result<Option<DisputeRecord>, StoreError> {
        (**self).get_dispute(id).await
    }

    async fn find_dispute(
        &self,
        kleros_liquid_id: &str,
        arbitrable: Address,
    ) -> Result<Option<DisputeRecord>, StoreError> {
        (**self).find_dispute(kleros_liquid_id, arbitrable).await
    }

    async fn find_dispute_by_evidence_group(
        &self,
        evidence_group_id: &str,
        arbitrable: Address,
    ) -> Result<Option<DisputeRecord>, StoreError> {
        (**self)
            .find_dispute_by_evidence_group(evidence_group_id, arbitrable)
            .await
    }

    async fn list_disputes(&self) -> Result<Vec<DisputeRecord>, StoreError> {
        (**self).list_disputes().await
    }

    async fn insert_evidence(&self, evidence: NewEvidence) -> Result<EvidenceRecord, StoreError> {
        (**self).insert_evidence(evidence).await
    }

    async fn get_evidence(&self, id: RecordId) -> Result<Option<EvidenceRecord>, StoreError> {
        (**self).get_evidence(id).await
    }

    async fn list_evidence(&self) -> Result<Vec<EvidenceRecord>, StoreError> {
        (**self).list_evidence().await
    }

    async fn block_timestamp(&self, block_number: u64) -> Result<Option<u64>, StoreError> {
        (**self).block_timestamp(block_number).await
    }

    async fn put_block_timestamp(&self, entry: BlockTimestampEntry) -> Result<(), StoreError> {
        (**self).put_block_timestamp(entry).await
    }
}
