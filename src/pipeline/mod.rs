// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The ingestion pipeline
//!
//! One run rebuilds every dispute and evidence record from chain history:
//!
//! 1. **Discover**: `DisputeCreation` events of the root contract, and the
//!    distinct arbitrable contracts behind them in first-seen order.
//! 2. **Fetch**: `Dispute` and `Evidence` events of each arbitrable.
//! 3. **Courts**: the subcourt of every dispute (side-file permitting).
//! 4. **Persist disputes**: wipe disputes and evidence, write one record per
//!    creation event.
//! 5. **Correlate**: attach evidence-group and meta-evidence ids.
//! 6. **Resolve evidence**: fetch each evidence document and attached file,
//!    extract text, date it by block, write it and link it to its dispute.
//!
//! Chain, store and content failures are scoped differently. A failing chain
//! or store aborts the run; a single evidence item that cannot be resolved is
//! logged with its event payload and skipped. Re-running from the start is the
//! recovery path, and produces the same records for the same chain state.

use std::collections::HashSet;
use std::sync::Arc;

use alloy_primitives::Address;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn, Instrument};

use crate::blocks::BlockTimestampCache;
use crate::chain::ChainSource;
use crate::config::IndexerConfig;
use crate::content::ContentResolver;
use crate::courts::CourtResolver;
use crate::errors::{BlockTimestampError, IndexerError, StoreError};
use crate::events::{
    BlockTarget, DisputeCreated, DisputeLinked, EvidenceSubmitted, RangeFetcher,
};
use crate::extract::{DocumentExtractor, Extraction};
use crate::store::{NewDispute, NewEvidence, RecordId, RecordStore};
use crate::tracing::spans;

mod report;

pub use report::IngestReport;

/// Output of the discovery phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Chain height used for every stream of this run
    pub head_block: u64,
    /// `DisputeCreation` events of the root contract, in block order
    pub creations: Vec<DisputeCreated>,
    /// Distinct arbitrables, in order of first appearance
    pub arbitrables: Vec<Address>,
}

/// Events emitted by the discovered arbitrables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArbitrableEvents {
    /// `Dispute` events, grouped by arbitrable in discovery order
    pub correlations: Vec<DisputeLinked>,
    /// `Evidence` events, grouped by arbitrable in discovery order
    pub evidence: Vec<EvidenceSubmitted>,
}

/// Distinct arbitrables in order of first appearance
pub fn distinct_arbitrables(creations: &[DisputeCreated]) -> Vec<Address> {
    let mut seen = HashSet::new();
    creations
        .iter()
        .map(|c| c.arbitrable)
        .filter(|a| seen.insert(*a))
        .collect()
}

/// Evidence ready to be written
struct PreparedEvidence {
    evidence: NewEvidence,
    extraction: FileOutcome,
}

enum FileOutcome {
    None,
    Extracted,
    Unsupported,
    ParseFailed,
    Unavailable,
}

enum EvidenceOutcome {
    Ready(Box<PreparedEvidence>),
    MissingDispute,
    Unresolvable,
}

/// Rebuilds dispute and evidence records from chain history
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use vagarish::{
///     ContentResolver, DiskContentCache, FsStore, HttpGateway, IndexerConfig,
///     IngestionPipeline, RpcChain,
/// };
///
/// let config = IndexerConfig::from_env()?;
/// let chain = Arc::new(RpcChain::connect_http(config.rpc_url.as_deref().unwrap_or_default())?);
/// let store = Arc::new(FsStore::open(config.records_dir()).await?);
/// let resolver = ContentResolver::new(
///     Arc::new(HttpGateway::new(&config.ipfs_gateway, config.content_timeout)?),
///     Box::new(DiskContentCache::new(config.content_cache_dir())),
/// );
///
/// let pipeline = IngestionPipeline::new(chain, store, resolver, &config);
/// let report = pipeline.run().await?;
/// println!("{report}");
/// ```
pub struct IngestionPipeline<C, S> {
    root_contract: Address,
    start_block: u64,
    evidence_concurrency: usize,
    fetcher: RangeFetcher<Arc<C>>,
    courts: CourtResolver<Arc<C>>,
    resolver: ContentResolver,
    extractor: DocumentExtractor,
    timestamps: BlockTimestampCache<Arc<C>, Arc<S>>,
    store: Arc<S>,
}

impl<C, S> std::fmt::Debug for IngestionPipeline<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("root_contract", &self.root_contract)
            .field("start_block", &self.start_block)
            .field("evidence_concurrency", &self.evidence_concurrency)
            .finish_non_exhaustive()
    }
}

impl<C: ChainSource, S: RecordStore> IngestionPipeline<C, S> {
    /// Wire a pipeline from its collaborators and `config`
    ///
    /// The subcourt side-file lives at [`IndexerConfig::court_ids_path`].
    pub fn new(
        chain: Arc<C>,
        store: Arc<S>,
        resolver: ContentResolver,
        config: &IndexerConfig,
    ) -> Self {
        Self {
            root_contract: config.root_contract,
            start_block: config.start_block,
            evidence_concurrency: config.evidence_concurrency.max(1),
            fetcher: RangeFetcher::from_config(chain.clone(), config),
            courts: CourtResolver::new(chain.clone(), config.root_contract)
                .with_side_file(config.court_ids_path()),
            resolver,
            extractor: DocumentExtractor::new(),
            timestamps: BlockTimestampCache::new(chain, store.clone()),
            store,
        }
    }

    /// The record store this pipeline writes to
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run every phase once
    ///
    /// # Errors
    ///
    /// Chain, subcourt and store failures abort the run. Per-item evidence
    /// failures are counted in the report instead.
    pub async fn run(&self) -> Result<IngestReport, IndexerError> {
        let span = spans::ingest_run(self.root_contract, self.start_block);

        async move {
            let mut report = IngestReport::default();

            let discovery = self.discover().await?;
            report.head_block = discovery.head_block;
            report.dispute_creations = discovery.creations.len();
            report.arbitrables = discovery.arbitrables.len();

            let events = self.fetch_arbitrable_events(&discovery).await?;
            report.correlation_events = events.correlations.len();
            report.evidence_events = events.evidence.len();

            let dispute_ids: Vec<String> = discovery
                .creations
                .iter()
                .map(|c| c.dispute_id.clone())
                .collect();
            let courts = self.courts.resolve_all(&dispute_ids).await?;
            report.courts_reused = courts.reused;

            self.store.reset_disputes_and_evidence().await?;
            for creation in &discovery.creations {
                let existing = self
                    .store
                    .find_dispute(&creation.dispute_id, creation.arbitrable)
                    .await?;
                if existing.is_some() {
                    warn!(
                        dispute_id = %creation.dispute_id,
                        arbitrable = %creation.arbitrable,
                        block_number = creation.meta.block_number,
                        "Duplicate dispute creation, keeping the first"
                    );
                    report.duplicate_creations += 1;
                    continue;
                }
                self.store
                    .insert_dispute(NewDispute {
                        kleros_liquid_id: creation.dispute_id.clone(),
                        arbitrable: creation.arbitrable,
                        court_id: courts.courts.get(&creation.dispute_id).copied(),
                        created_at_block: creation.meta.block_number,
                        transaction_hash: creation.meta.transaction_hash,
                    })
                    .await?;
                report.disputes_persisted += 1;
            }
            info!(disputes = report.disputes_persisted, "Persisted disputes");

            self.correlate(&events.correlations, &mut report).await?;
            self.resolve_evidence(&events.evidence, &mut report).await?;

            info!(%report, "Ingestion finished");
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Fetch dispute creations up to the current head and derive arbitrables
    pub async fn discover(&self) -> Result<Discovery, IndexerError> {
        let head_block = self.fetcher.resolve_target(BlockTarget::Latest).await?;
        let creations: Vec<DisputeCreated> = self
            .fetcher
            .fetch(
                Some(self.root_contract),
                self.start_block,
                BlockTarget::Number(head_block),
            )
            .await?;
        let arbitrables = distinct_arbitrables(&creations);

        info!(
            head_block,
            creations = creations.len(),
            arbitrables = arbitrables.len(),
            "Discovered disputes"
        );

        Ok(Discovery {
            head_block,
            creations,
            arbitrables,
        })
    }

    /// Fetch `Dispute` and `Evidence` events of every discovered arbitrable
    ///
    /// Arbitrables are scanned from genesis: evidence may be submitted before
    /// the dispute it belongs to is created.
    pub async fn fetch_arbitrable_events(
        &self,
        discovery: &Discovery,
    ) -> Result<ArbitrableEvents, IndexerError> {
        let to_block = BlockTarget::Number(discovery.head_block);
        let mut events = ArbitrableEvents::default();

        for (i, arbitrable) in discovery.arbitrables.iter().enumerate() {
            let correlations: Vec<DisputeLinked> =
                self.fetcher.fetch(Some(*arbitrable), 0, to_block).await?;
            let evidence: Vec<EvidenceSubmitted> =
                self.fetcher.fetch(Some(*arbitrable), 0, to_block).await?;

            debug!(
                arbitrable = %arbitrable,
                correlations = correlations.len(),
                evidence = evidence.len(),
                progress = i + 1,
                total = discovery.arbitrables.len(),
                "Fetched arbitrable events"
            );
            events.correlations.extend(correlations);
            events.evidence.extend(evidence);
        }

        Ok(events)
    }

    async fn correlate(
        &self,
        correlations: &[DisputeLinked],
        report: &mut IngestReport,
    ) -> Result<(), IndexerError> {
        for event in correlations {
            if event.arbitrator != self.root_contract {
                debug!(
                    arbitrable = %event.meta.address,
                    arbitrator = %event.arbitrator,
                    dispute_id = %event.dispute_id,
                    "Skipping correlation for another arbitrator"
                );
                report.foreign_arbitrator_events += 1;
                continue;
            }

            let found = self
                .store
                .find_dispute(&event.dispute_id, event.meta.address)
                .await?;
            let Some(mut dispute) = found else {
                warn!(
                    arbitrable = %event.meta.address,
                    dispute_id = %event.dispute_id,
                    evidence_group_id = %event.evidence_group_id,
                    meta_evidence_id = %event.meta_evidence_id,
                    block_number = event.meta.block_number,
                    transaction_hash = ?event.meta.transaction_hash,
                    "No dispute matches correlation event, skipping"
                );
                report.missing_correlations += 1;
                continue;
            };

            dispute.evidence_group_id = Some(event.evidence_group_id.clone());
            dispute.meta_evidence_id = Some(event.meta_evidence_id.clone());
            self.store.update_dispute(&dispute).await?;
            report.disputes_correlated += 1;
        }

        info!(
            correlated = report.disputes_correlated,
            missing = report.missing_correlations,
            "Correlated disputes"
        );
        Ok(())
    }

    async fn resolve_evidence(
        &self,
        evidence: &[EvidenceSubmitted],
        report: &mut IngestReport,
    ) -> Result<(), IndexerError> {
        let mut relevant = Vec::with_capacity(evidence.len());
        for event in evidence {
            if event.arbitrator == self.root_contract {
                relevant.push(event);
            } else {
                report.foreign_arbitrator_events += 1;
            }
        }

        // Resolution runs ahead; writes below stay in event order.
        let mut outcomes = stream::iter(relevant)
            .map(|event| self.prepare_evidence(event))
            .buffered(self.evidence_concurrency);

        while let Some(outcome) = outcomes.next().await {
            match outcome? {
                EvidenceOutcome::Ready(prepared) => {
                    let PreparedEvidence {
                        evidence,
                        extraction,
                    } = *prepared;
                    match extraction {
                        FileOutcome::None => {}
                        FileOutcome::Extracted => report.files_extracted += 1,
                        FileOutcome::Unsupported => report.files_unsupported += 1,
                        FileOutcome::ParseFailed => report.files_parse_failed += 1,
                        FileOutcome::Unavailable => report.files_unavailable += 1,
                    }
                    self.persist_evidence(evidence).await?;
                    report.evidence_persisted += 1;
                }
                EvidenceOutcome::MissingDispute => report.evidence_missing_dispute += 1,
                EvidenceOutcome::Unresolvable => report.evidence_unresolvable += 1,
            }
        }

        info!(
            persisted = report.evidence_persisted,
            skipped = report.evidence_skipped(),
            "Resolved evidence"
        );
        Ok(())
    }

    async fn prepare_evidence(
        &self,
        event: &EvidenceSubmitted,
    ) -> Result<EvidenceOutcome, IndexerError> {
        let span = spans::ingest_evidence(
            event.meta.address,
            &event.evidence_group_id,
            event.meta.block_number,
        );

        async move {
            let found = self
                .store
                .find_dispute_by_evidence_group(&event.evidence_group_id, event.meta.address)
                .await?;
            let Some(dispute) = found else {
                warn!(
                    party = %event.party,
                    evidence = %event.evidence,
                    transaction_hash = ?event.meta.transaction_hash,
                    "No dispute holds this evidence group, skipping"
                );
                return Ok(EvidenceOutcome::MissingDispute);
            };

            let content = match self.resolver.resolve(&event.evidence).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(
                        party = %event.party,
                        evidence = %event.evidence,
                        transaction_hash = ?event.meta.transaction_hash,
                        error = %e,
                        "Evidence content unresolvable, skipping"
                    );
                    return Ok(EvidenceOutcome::Unresolvable);
                }
            };

            let (file_text_content, extraction) = match &content.file {
                Some(file) => match self.extractor.extract_known(&file.bytes, file.format).await {
                    Extraction::Text(text) => (Some(text), FileOutcome::Extracted),
                    Extraction::ParseFailure { reason } => {
                        warn!(
                            file = %file.locator,
                            format = %file.format,
                            reason = %reason,
                            "No extractable text in attached file"
                        );
                        (None, FileOutcome::ParseFailed)
                    }
                    Extraction::Unsupported { .. } => (None, FileOutcome::Unsupported),
                },
                None if content.file_unavailable => (None, FileOutcome::Unavailable),
                None if content.document.file_uri().is_some() => {
                    debug!(
                        format = ?content.document.declared_format(),
                        "Attached file format not extracted"
                    );
                    (None, FileOutcome::Unsupported)
                }
                None => (None, FileOutcome::None),
            };

            let created_in = match self.timestamps.datetime_of(event.meta.block_number).await {
                Ok(dt) => dt,
                Err(e @ BlockTimestampError::OutOfRange { .. }) => {
                    warn!(error = %e, evidence = %event.evidence, "Skipping evidence");
                    return Ok(EvidenceOutcome::Unresolvable);
                }
                Err(e) => return Err(e.into()),
            };

            Ok(EvidenceOutcome::Ready(Box::new(PreparedEvidence {
                evidence: NewEvidence {
                    text_content: content.document.text_content(),
                    file_text_content,
                    has_file: content.document.has_text_file(),
                    file_uri: content.document.file_uri().map(str::to_string),
                    evidence_uri: content.locator.to_string(),
                    by_address: event.party,
                    created_in,
                    block_number: event.meta.block_number,
                    dispute_id: dispute.id,
                },
                extraction,
            })))
        }
        .instrument(span)
        .await
    }

    /// Write one evidence record and append it to its dispute
    async fn persist_evidence(&self, evidence: NewEvidence) -> Result<RecordId, IndexerError> {
        let dispute_id = evidence.dispute_id;
        let record = self.store.insert_evidence(evidence).await?;

        let mut dispute = self.store.get_dispute(dispute_id).await?.ok_or(
            StoreError::RecordNotFound {
                collection: "disputes",
                id: dispute_id.as_u64(),
            },
        )?;
        dispute.evidence_ids.push(record.id);
        self.store.update_dispute(&dispute).await?;

        debug!(evidence_id = %record.id, dispute_id = %dispute_id, "Linked evidence");
        Ok(record.id)
    }
}
