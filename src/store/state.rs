// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Indexed record state shared by both store backends

use std::collections::{BTreeMap, BTreeSet, HashMap};

use alloy_primitives::Address;

use super::{
    BlockTimestampEntry, DisputeRecord, EvidenceRecord, NewDispute, NewEvidence, RecordId,
};
use crate::errors::StoreError;

pub(super) const DISPUTES: &str = "disputes";
pub(super) const EVIDENCE: &str = "evidence";

#[derive(Debug, Default)]
pub(super) struct RecordState {
    disputes: BTreeMap<RecordId, DisputeRecord>,
    evidence: BTreeMap<RecordId, EvidenceRecord>,
    blocks: BTreeMap<u64, u64>,
    by_protocol_id: HashMap<(String, Address), RecordId>,
    by_evidence_group: HashMap<(String, Address), BTreeSet<RecordId>>,
}

impl RecordState {
    /// Rebuild state from records loaded off disk
    pub(super) fn from_records(
        disputes: Vec<DisputeRecord>,
        evidence: Vec<EvidenceRecord>,
        blocks: Vec<BlockTimestampEntry>,
    ) -> Self {
        let mut state = Self::default();
        for dispute in disputes {
            state.index(&dispute);
            state.disputes.insert(dispute.id, dispute);
        }
        state.evidence = evidence.into_iter().map(|e| (e.id, e)).collect();
        state.blocks = blocks
            .into_iter()
            .map(|b| (b.block_number, b.timestamp))
            .collect();
        state
    }

    pub(super) fn reset(&mut self) {
        self.disputes.clear();
        self.evidence.clear();
        self.by_protocol_id.clear();
        self.by_evidence_group.clear();
    }

    fn next_dispute_id(&self) -> RecordId {
        RecordId(self.disputes.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn next_evidence_id(&self) -> RecordId {
        RecordId(self.evidence.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn index(&mut self, dispute: &DisputeRecord) {
        self.by_protocol_id.insert(
            (dispute.kleros_liquid_id.clone(), dispute.arbitrable),
            dispute.id,
        );
        if let Some(group) = &dispute.evidence_group_id {
            self.by_evidence_group
                .entry((group.clone(), dispute.arbitrable))
                .or_default()
                .insert(dispute.id);
        }
    }

    fn unindex_group(&mut self, dispute: &DisputeRecord) {
        if let Some(group) = &dispute.evidence_group_id {
            let key = (group.clone(), dispute.arbitrable);
            if let Some(ids) = self.by_evidence_group.get_mut(&key) {
                ids.remove(&dispute.id);
                if ids.is_empty() {
                    self.by_evidence_group.remove(&key);
                }
            }
        }
    }

    pub(super) fn insert_dispute(
        &mut self,
        new: NewDispute,
    ) -> Result<DisputeRecord, StoreError> {
        let key = (new.kleros_liquid_id, new.arbitrable);
        if self.by_protocol_id.contains_key(&key) {
            return Err(StoreError::DuplicateRecord {
                collection: DISPUTES,
                key: format!("{}@{}", key.0, key.1),
            });
        }
        let (kleros_liquid_id, arbitrable) = key;
        let record = DisputeRecord {
            id: self.next_dispute_id(),
            kleros_liquid_id,
            arbitrable,
            evidence_group_id: None,
            meta_evidence_id: None,
            court_id: new.court_id,
            evidence_ids: Vec::new(),
            created_at_block: new.created_at_block,
            transaction_hash: new.transaction_hash,
        };
        self.index(&record);
        self.disputes.insert(record.id, record.clone());
        Ok(record)
    }

    pub(super) fn update_dispute(&mut self, dispute: &DisputeRecord) -> Result<(), StoreError> {
        let Some(previous) = self.disputes.get(&dispute.id).cloned() else {
            return Err(StoreError::RecordNotFound {
                collection: DISPUTES,
                id: dispute.id.0,
            });
        };
        self.unindex_group(&previous);
        if previous.kleros_liquid_id != dispute.kleros_liquid_id
            || previous.arbitrable != dispute.arbitrable
        {
            self.by_protocol_id
                .remove(&(previous.kleros_liquid_id.clone(), previous.arbitrable));
        }
        self.index(dispute);
        self.disputes.insert(dispute.id, dispute.clone());
        Ok(())
    }

    pub(super) fn get_dispute(&self, id: RecordId) -> Option<DisputeRecord> {
        self.disputes.get(&id).cloned()
    }

    pub(super) fn find_dispute(
        &self,
        kleros_liquid_id: &str,
        arbitrable: Address,
    ) -> Option<DisputeRecord> {
        self.by_protocol_id
            .get(&(kleros_liquid_id.to_string(), arbitrable))
            .and_then(|id| self.get_dispute(*id))
    }

    pub(super) fn find_dispute_by_evidence_group(
        &self,
        evidence_group_id: &str,
        arbitrable: Address,
    ) -> Option<DisputeRecord> {
        self.by_evidence_group
            .get(&(evidence_group_id.to_string(), arbitrable))
            .and_then(|ids| ids.first())
            .and_then(|id| self.get_dispute(*id))
    }

    pub(super) fn list_disputes(&self) -> Vec<DisputeRecord> {
        self.disputes.values().cloned().collect()
    }

    pub(super) fn insert_evidence(&mut self, new: NewEvidence) -> Result<EvidenceRecord, StoreError> {
        if !self.disputes.contains_key(&new.dispute_id) {
            return Err(StoreError::RecordNotFound {
                collection: DISPUTES,
                id: new.dispute_id.0,
            });
        }
        let record = EvidenceRecord {
            id: self.next_evidence_id(),
            text_content: new.text_content,
            file_text_content: new.file_text_content,
            has_file: new.has_file,
            file_uri: new.file_uri,
            evidence_uri: new.evidence_uri,
            by_address: new.by_address,
            created_in: new.created_in,
            block_number: new.block_number,
            dispute_id: new.dispute_id,
        };
        self.evidence.insert(record.id, record.clone());
        Ok(record)
    }

    pub(super) fn get_evidence(&self, id: RecordId) -> Option<EvidenceRecord> {
        self.evidence.get(&id).cloned()
    }

    pub(super) fn list_evidence(&self) -> Vec<EvidenceRecord> {
        self.evidence.values().cloned().collect()
    }

    pub(super) fn block_timestamp(&self, block_number: u64) -> Option<u64> {
        self.blocks.get(&block_number).copied()
    }

    /// Returns `true` if the entry was new
    pub(super) fn put_block_timestamp(&mut self, entry: BlockTimestampEntry) -> bool {
        if self.blocks.contains_key(&entry.block_number) {
            return false;
        }
        self.blocks.insert(entry.block_number, entry.timestamp);
        true
    }
}
