// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-run ingestion counters

use std::fmt;

use serde::{Deserialize, Serialize};

/// What one ingestion run saw and did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Chain height every stream was fetched up to
    pub head_block: u64,
    /// `DisputeCreation` events on the root contract
    pub dispute_creations: usize,
    /// Distinct arbitrable contracts
    pub arbitrables: usize,
    /// `Dispute` events across all arbitrables
    pub correlation_events: usize,
    /// `Evidence` events across all arbitrables
    pub evidence_events: usize,
    /// Subcourts came from the side-file
    pub courts_reused: bool,
    /// Dispute records written
    pub disputes_persisted: usize,
    /// Creation events repeating an existing (dispute id, arbitrable)
    pub duplicate_creations: usize,
    /// Disputes that received evidence-group and meta-evidence ids
    pub disputes_correlated: usize,
    /// `Dispute` events with no matching dispute
    pub missing_correlations: usize,
    /// `Dispute` and `Evidence` events addressed to another arbitrator
    pub foreign_arbitrator_events: usize,
    /// Evidence records written
    pub evidence_persisted: usize,
    /// Evidence events whose group matched no dispute
    pub evidence_missing_dispute: usize,
    /// Evidence events whose document could not be resolved
    pub evidence_unresolvable: usize,
    /// Attached files turned into text
    pub files_extracted: usize,
    /// Attached files in a format text is not extracted from
    pub files_unsupported: usize,
    /// Attached files in a supported format that failed to parse
    pub files_parse_failed: usize,
    /// Attached files that could not be fetched
    pub files_unavailable: usize,
}

impl IngestReport {
    /// Evidence events that did not produce a record
    pub fn evidence_skipped(&self) -> usize {
        self.evidence_missing_dispute + self.evidence_unresolvable
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "head {}: {} disputes ({} correlated, {} uncorrelated) across {} arbitrables; \
             {}/{} evidence stored ({} without dispute, {} unresolvable); \
             files: {} extracted, {} unsupported, {} unparsable, {} unavailable",
            self.head_block,
            self.disputes_persisted,
            self.disputes_correlated,
            self.missing_correlations,
            self.arbitrables,
            self.evidence_persisted,
            self.evidence_events,
            self.evidence_missing_dispute,
            self.evidence_unresolvable,
            self.files_extracted,
            self.files_unsupported,
            self.files_parse_failed,
            self.files_unavailable,
        )
    }
}
