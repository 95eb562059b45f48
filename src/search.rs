// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read-only filtered lookup over persisted records
//!
//! Filters combine with AND. Dispute-level filters (`dispute_id`,
//! `court_ids`) decide which disputes are candidates; evidence-level filters
//! (`text`, `submitter`) decide which of a candidate's evidence is returned.
//! When an evidence-level filter is set, a dispute with no matching evidence
//! is left out.
//!
//! # Example
//!
//! ```rust,ignore
//! use vagarish::{search, FsStore, SearchQuery};
//!
//! let store = FsStore::open("files/records").await?;
//! let query = SearchQuery::new().with_text("escrow").with_court_ids([0, 8]);
//! for hit in search(&store, &query).await? {
//!     println!("{} ({} evidence)", hit.dispute.kleros_liquid_id, hit.evidence.len());
//! }
//! ```

use std::collections::{BTreeSet, HashMap};

use alloy_primitives::Address;
use serde::Serialize;

use crate::errors::StoreError;
use crate::store::{DisputeRecord, EvidenceRecord, RecordId, RecordStore};

/// Filters for [`search`]; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Exact protocol dispute id
    pub dispute_id: Option<String>,
    /// Case-insensitive substring of evidence text or extracted file text
    pub text: Option<String>,
    /// Subcourts the dispute must belong to; empty means any
    pub court_ids: BTreeSet<u64>,
    /// Submitting party of the evidence
    pub submitter: Option<Address>,
}

impl SearchQuery {
    /// Match everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the dispute with this protocol id (decimal)
    pub fn with_dispute_id(mut self, dispute_id: impl Into<String>) -> Self {
        self.dispute_id = Some(dispute_id.into());
        self
    }

    /// Blank text is treated as no text filter
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Only disputes in one of these subcourts
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use vagarish::SearchQuery;
    ///
    /// let query = SearchQuery::new()
    ///     .with_dispute_id("42")
    ///     .with_court_ids([2, 5, 2])
    ///     .with_submitter(Address::ZERO);
    /// assert_eq!(query.dispute_id.as_deref(), Some("42"));
    /// assert_eq!(query.court_ids.len(), 2);
    /// assert_eq!(query.submitter, Some(Address::ZERO));
    /// ```
    pub fn with_court_ids(mut self, court_ids: impl IntoIterator<Item = u64>) -> Self {
        self.court_ids = court_ids.into_iter().collect();
        self
    }

    /// Only evidence submitted by this address
    pub fn with_submitter(mut self, submitter: Address) -> Self {
        self.submitter = Some(submitter);
        self
    }

    fn filters_evidence(&self) -> bool {
        self.text.is_some() || self.submitter.is_some()
    }

    fn matches_dispute(&self, dispute: &DisputeRecord) -> bool {
        if let Some(id) = &self.dispute_id {
            if dispute.kleros_liquid_id != *id {
                return false;
            }
        }
        if !self.court_ids.is_empty() {
            match dispute.court_id {
                Some(court) if self.court_ids.contains(&court) => {}
                _ => return false,
            }
        }
        true
    }

    fn matches_evidence(&self, evidence: &EvidenceRecord, needle: Option<&str>) -> bool {
        if let Some(submitter) = self.submitter {
            if evidence.by_address != submitter {
                return false;
            }
        }
        match needle {
            None => true,
            Some(needle) => {
                evidence.text_content.to_lowercase().contains(needle)
                    || evidence
                        .file_text_content
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(needle))
            }
        }
    }
}

/// A dispute and the evidence of it that matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub dispute: DisputeRecord,
    /// In the dispute's linking order
    pub evidence: Vec<EvidenceRecord>,
}

/// Run `query` against `store`, ordered by dispute record id
pub async fn search<S: RecordStore + ?Sized>(
    store: &S,
    query: &SearchQuery,
) -> Result<Vec<SearchResult>, StoreError> {
    let mut disputes = store.list_disputes().await?;
    disputes.sort_by_key(|d| d.id);

    let evidence: HashMap<RecordId, EvidenceRecord> = store
        .list_evidence()
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let needle = query.text.as_ref().map(|t| t.to_lowercase());

    let mut results = Vec::new();
    for dispute in disputes {
        if !query.matches_dispute(&dispute) {
            continue;
        }

        let matched: Vec<EvidenceRecord> = dispute
            .evidence_ids
            .iter()
            .filter_map(|id| evidence.get(id))
            .filter(|e| query.matches_evidence(e, needle.as_deref()))
            .cloned()
            .collect();

        if query.filters_evidence() && matched.is_empty() {
            continue;
        }
        results.push(SearchResult {
            dispute,
            evidence: matched,
        });
    }

    Ok(results)
}
