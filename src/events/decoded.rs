// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strongly typed arbitration events
//!
//! Raw logs are decoded into these types at the fetch boundary. Nothing past
//! the [`RangeFetcher`](crate::RangeFetcher) sees a raw log.
//!
//! Numeric protocol ids (`uint256`) are kept as decimal strings so the exact
//! on-chain value survives into persisted records.

use std::fmt;

use alloy_primitives::{Address, B256};
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::errors::EventFetchError;
use crate::events::definitions::{Dispute, DisputeCreation, Evidence};

/// The three event streams the indexer consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `DisputeCreation` on the arbitrator
    DisputeCreation,
    /// `Dispute` on an arbitrable (correlation)
    Dispute,
    /// `Evidence` on an arbitrable
    Evidence,
}

impl EventKind {
    /// Event name as declared in the ABI
    pub const fn name(&self) -> &'static str {
        match self {
            EventKind::DisputeCreation => "DisputeCreation",
            EventKind::Dispute => "Dispute",
            EventKind::Evidence => "Evidence",
        }
    }

    /// Topic 0 for log queries
    pub const fn signature_hash(&self) -> B256 {
        match self {
            EventKind::DisputeCreation => DisputeCreation::SIGNATURE_HASH,
            EventKind::Dispute => Dispute::SIGNATURE_HASH,
            EventKind::Evidence => Evidence::SIGNATURE_HASH,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a decoded event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Emitting contract
    pub address: Address,
    /// Block the log was included in
    pub block_number: u64,
    /// Transaction that emitted the log
    pub transaction_hash: Option<B256>,
    /// Position of the log in its block
    pub log_index: Option<u64>,
}

impl EventMeta {
    fn from_log(log: &Log) -> Result<Self, EventFetchError> {
        let block_number = log
            .block_number
            .ok_or_else(|| EventFetchError::decode_failed("log has no block number"))?;

        Ok(Self {
            address: log.address(),
            block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
        })
    }
}

/// A dispute opened on the arbitrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeCreated {
    /// Log origin (the arbitrator)
    pub meta: EventMeta,
    /// Protocol dispute id
    pub dispute_id: String,
    /// Contract that opened the dispute
    pub arbitrable: Address,
}

/// An arbitrable linking a dispute to its evidence group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeLinked {
    /// Log origin (the arbitrable)
    pub meta: EventMeta,
    /// Arbitrator the dispute was raised with
    pub arbitrator: Address,
    /// Protocol dispute id
    pub dispute_id: String,
    /// Meta-evidence id
    pub meta_evidence_id: String,
    /// Evidence group id
    pub evidence_group_id: String,
}

/// A party submitting evidence to an arbitrable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSubmitted {
    /// Log origin (the arbitrable)
    pub meta: EventMeta,
    /// Arbitrator the evidence is addressed to
    pub arbitrator: Address,
    /// Evidence group id
    pub evidence_group_id: String,
    /// Submitting party
    pub party: Address,
    /// Content locator of the evidence JSON document
    pub evidence: String,
}

/// A typed event that can be decoded from a raw log
pub trait DecodedEvent: Sized + Send + 'static {
    /// Which stream this event belongs to
    const KIND: EventKind;

    /// Decode a raw log
    fn from_log(log: &Log) -> Result<Self, EventFetchError>;

    /// Log origin
    fn meta(&self) -> &EventMeta;
}

fn decode_err(kind: EventKind, err: alloy_sol_types::Error) -> EventFetchError {
    EventFetchError::decode_failed(format!("{kind}: {err}"))
}

impl DecodedEvent for DisputeCreated {
    const KIND: EventKind = EventKind::DisputeCreation;

    fn from_log(log: &Log) -> Result<Self, EventFetchError> {
        let meta = EventMeta::from_log(log)?;
        let event = DisputeCreation::decode_log(&log.inner)
            .map_err(|e| decode_err(Self::KIND, e))?
            .data;

        Ok(Self {
            meta,
            dispute_id: event._disputeID.to_string(),
            arbitrable: event._arbitrable,
        })
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }
}

impl DecodedEvent for DisputeLinked {
    const KIND: EventKind = EventKind::Dispute;

    fn from_log(log: &Log) -> Result<Self, EventFetchError> {
        let meta = EventMeta::from_log(log)?;
        let event = Dispute::decode_log(&log.inner)
            .map_err(|e| decode_err(Self::KIND, e))?
            .data;

        Ok(Self {
            meta,
            arbitrator: event._arbitrator,
            dispute_id: event._disputeID.to_string(),
            meta_evidence_id: event._metaEvidenceID.to_string(),
            evidence_group_id: event._evidenceGroupID.to_string(),
        })
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }
}

impl DecodedEvent for EvidenceSubmitted {
    const KIND: EventKind = EventKind::Evidence;

    fn from_log(log: &Log) -> Result<Self, EventFetchError> {
        let meta = EventMeta::from_log(log)?;
        let event = Evidence::decode_log(&log.inner)
            .map_err(|e| decode_err(Self::KIND, e))?
            .data;

        Ok(Self {
            meta,
            arbitrator: event._arbitrator,
            evidence_group_id: event._evidenceGroupID.to_string(),
            party: event._party,
            evidence: event._evidence,
        })
    }

    fn meta(&self) -> &EventMeta {
        &self.meta
    }
}

/// Any arbitration event, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ArbitrationEvent {
    /// See [`DisputeCreated`]
    DisputeCreated(DisputeCreated),
    /// See [`DisputeLinked`]
    DisputeLinked(DisputeLinked),
    /// See [`EvidenceSubmitted`]
    EvidenceSubmitted(EvidenceSubmitted),
}

impl ArbitrationEvent {
    /// Decode a raw log, dispatching on topic 0
    pub fn decode(log: &Log) -> Result<Self, EventFetchError> {
        let topic0 = log
            .topic0()
            .copied()
            .ok_or_else(|| EventFetchError::decode_failed("log has no topics"))?;

        if topic0 == EventKind::DisputeCreation.signature_hash() {
            DisputeCreated::from_log(log).map(Self::DisputeCreated)
        } else if topic0 == EventKind::Dispute.signature_hash() {
            DisputeLinked::from_log(log).map(Self::DisputeLinked)
        } else if topic0 == EventKind::Evidence.signature_hash() {
            EvidenceSubmitted::from_log(log).map(Self::EvidenceSubmitted)
        } else {
            Err(EventFetchError::decode_failed(format!(
                "unknown event signature {topic0}"
            )))
        }
    }

    /// Which stream this event belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DisputeCreated(_) => EventKind::DisputeCreation,
            Self::DisputeLinked(_) => EventKind::Dispute,
            Self::EvidenceSubmitted(_) => EventKind::Evidence,
        }
    }

    /// Log origin
    pub fn meta(&self) -> &EventMeta {
        match self {
            Self::DisputeCreated(e) => &e.meta,
            Self::DisputeLinked(e) => &e.meta,
            Self::EvidenceSubmitted(e) => &e.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, LogData, U256};

    fn raw_log(address: Address, data: LogData, block: u64) -> Log {
        Log {
            inner: alloy_primitives::Log { address, data },
            block_hash: None,
            block_number: Some(block),
            block_timestamp: None,
            transaction_hash: Some(B256::repeat_byte(0x11)),
            transaction_index: Some(0),
            log_index: Some(3),
            removed: false,
        }
    }

    #[test]
    fn test_decode_dispute_creation() {
        let arbitrator = address!("988b3a538b618c7a603e1c11ab82cd16dbe28069");
        let arbitrable = address!("00000000000000000000000000000000000000aa");
        let data = DisputeCreation {
            _disputeID: U256::from(4u64),
            _arbitrable: arbitrable,
        }
        .encode_log_data();

        let event = DisputeCreated::from_log(&raw_log(arbitrator, data, 100)).unwrap();
        assert_eq!(event.dispute_id, "4");
        assert_eq!(event.arbitrable, arbitrable);
        assert_eq!(event.meta.address, arbitrator);
        assert_eq!(event.meta.block_number, 100);
        assert_eq!(event.meta.log_index, Some(3));
    }

    #[test]
    fn test_decode_keeps_large_ids_exact() {
        let arbitrable = address!("00000000000000000000000000000000000000aa");
        let group = U256::from_str_radix("123456789012345678901234567890", 10).unwrap();
        let data = Dispute {
            _arbitrator: Address::ZERO,
            _disputeID: U256::from(7u64),
            _metaEvidenceID: U256::from(1u64),
            _evidenceGroupID: group,
        }
        .encode_log_data();

        let event = DisputeLinked::from_log(&raw_log(arbitrable, data, 5)).unwrap();
        assert_eq!(event.evidence_group_id, "123456789012345678901234567890");
        assert_eq!(event.meta_evidence_id, "1");
    }

    #[test]
    fn test_dispatch_by_topic() {
        let arbitrable = address!("00000000000000000000000000000000000000aa");
        let data = Evidence {
            _arbitrator: Address::ZERO,
            _evidenceGroupID: U256::from(77u64),
            _party: address!("00000000000000000000000000000000000000bb"),
            _evidence: "/ipfs/QmX/evidence.json".to_string(),
        }
        .encode_log_data();

        let event = ArbitrationEvent::decode(&raw_log(arbitrable, data, 9)).unwrap();
        assert_eq!(event.kind(), EventKind::Evidence);
        match event {
            ArbitrationEvent::EvidenceSubmitted(e) => {
                assert_eq!(e.evidence_group_id, "77");
                assert_eq!(e.evidence, "/ipfs/QmX/evidence.json");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_wrong_event_fails_to_decode() {
        let data = DisputeCreation {
            _disputeID: U256::from(1u64),
            _arbitrable: Address::ZERO,
        }
        .encode_log_data();

        let err = EvidenceSubmitted::from_log(&raw_log(Address::ZERO, data, 1)).unwrap_err();
        assert!(matches!(err, EventFetchError::DecodeFailed { .. }));
    }

    #[test]
    fn test_missing_block_number_fails() {
        let data = DisputeCreation {
            _disputeID: U256::from(1u64),
            _arbitrable: Address::ZERO,
        }
        .encode_log_data();
        let mut log = raw_log(Address::ZERO, data, 1);
        log.block_number = None;

        assert!(DisputeCreated::from_log(&log).is_err());
    }
}
