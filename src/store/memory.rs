// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory record store

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::state::RecordState;
use super::{
    BlockTimestampEntry, DisputeRecord, EvidenceRecord, NewDispute, NewEvidence, RecordId,
    RecordStore,
};
use crate::errors::StoreError;

/// Record store held in process memory
///
/// Nothing survives the process; useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<RecordState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn reset_disputes_and_evidence(&self) -> Result<(), StoreError> {
        self.state.lock().await.reset();
        Ok(())
    }

    async fn insert_dispute(&self, dispute: NewDispute) -> Result<DisputeRecord, StoreError> {
        self.state.lock().await.insert_dispute(dispute)
    }

    async fn update_dispute(&self, dispute: &DisputeRecord) -> Result<(), StoreError> {
        self.state.lock().await.update_dispute(dispute)
    }

    async fn get_dispute(&self, id: RecordId) -> Result<Option<DisputeRecord>, StoreError> {
        Ok(self.state.lock().await.get_dispute(id))
    }

    async fn find_dispute(
        &self,
        kleros_liquid_id: &str,
        arbitrable: Address,
    ) -> Result<Option<DisputeRecord>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .find_dispute(kleros_liquid_id, arbitrable))
    }

    async fn find_dispute_by_evidence_group(
        &self,
        evidence_group_id: &str,
        arbitrable: Address,
    ) -> Result<Option<DisputeRecord>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .find_dispute_by_evidence_group(evidence_group_id, arbitrable))
    }

    async fn list_disputes(&self) -> Result<Vec<DisputeRecord>, StoreError> {
        Ok(self.state.lock().await.list_disputes())
    }

    async fn insert_evidence(&self, evidence: NewEvidence) -> Result<EvidenceRecord, StoreError> {
        self.state.lock().await.insert_evidence(evidence)
    }

    async fn get_evidence(&self, id: RecordId) -> Result<Option<EvidenceRecord>, StoreError> {
        Ok(self.state.lock().await.get_evidence(id))
    }

    async fn list_evidence(&self) -> Result<Vec<EvidenceRecord>, StoreError> {
        Ok(self.state.lock().await.list_evidence())
    }

    async fn block_timestamp(&self, block_number: u64) -> Result<Option<u64>, StoreError> {
        Ok(self.state.lock().await.block_timestamp(block_number))
    }

    async fn put_block_timestamp(&self, entry: BlockTimestampEntry) -> Result<(), StoreError> {
        self.state.lock().await.put_block_timestamp(entry);
        Ok(())
    }
}
