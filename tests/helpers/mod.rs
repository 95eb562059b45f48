// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for vagarish integration tests
//!
//! Provides in-memory implementations of [`ChainSource`] and
//! [`ContentGateway`] so the pipeline can be driven without a node or an
//! IPFS gateway.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, LogData, B256, U256};
use alloy_rpc_types::Log;
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use vagarish::events::definitions::{disputesCall, Dispute, DisputeCreation, Evidence};
use vagarish::{ChainSource, ContentError, ContentGateway, ContentLocator, LogQuery, RpcError};

/// Every block is mined at `GENESIS_TIMESTAMP + block`
#[allow(dead_code)]
pub const GENESIS_TIMESTAMP: u64 = 1_600_000_000;

/// A syntactically valid 46-character content hash
#[allow(dead_code)]
pub const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

/// `/ipfs/<CID>/<name>`
#[allow(dead_code)]
pub fn ipfs_path(name: &str) -> String {
    format!("/ipfs/{CID}/{name}")
}

/// One-page PDF whose text layer is `text`
#[allow(dead_code)]
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref = pdf.len();
    let size = objects.len() + 1;
    let mut tail = format!("xref\n0 {size}\n0000000000 65535 f \n");
    for offset in offsets {
        tail.push_str(&format!("{offset:010} 00000 n \n"));
    }
    tail.push_str(&format!(
        "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n"
    ));
    pdf.extend_from_slice(tail.as_bytes());
    pdf
}

/// In-memory chain
///
/// Answers `eth_getLogs` from a fixed log list, failing with a result-limit
/// error when a query would return more than `cap` logs. `disputes(uint256)`
/// calls are answered from a dispute-id to subcourt map (default 0).
///
/// # Example
///
/// ```rust,ignore
/// let chain = MockChain::new(1_000)
///     .with_log(creation_log(ROOT, 4, ARBITRABLE, 10))
///     .with_court(4, 2)
///     .with_cap(100);
/// ```
#[allow(dead_code)]
pub struct MockChain {
    head: u64,
    logs: Vec<Log>,
    cap: Option<usize>,
    courts: HashMap<u64, u64>,
    get_logs_calls: AtomicUsize,
    court_calls: AtomicUsize,
    timestamp_calls: AtomicUsize,
    seen_queries: Mutex<Vec<LogQuery>>,
}

#[allow(dead_code)]
impl MockChain {
    /// Chain at height `head` with no logs and no result cap
    pub fn new(head: u64) -> Self {
        Self {
            head,
            logs: Vec::new(),
            cap: None,
            courts: HashMap::new(),
            get_logs_calls: AtomicUsize::new(0),
            court_calls: AtomicUsize::new(0),
            timestamp_calls: AtomicUsize::new(0),
            seen_queries: Mutex::new(Vec::new()),
        }
    }

    /// Append a log; logs must be added in block order
    pub fn with_log(mut self, log: Log) -> Self {
        self.logs.push(log);
        self
    }

    pub fn with_logs(mut self, logs: impl IntoIterator<Item = Log>) -> Self {
        self.logs.extend(logs);
        self
    }

    /// Fail any query returning more than `cap` logs
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn with_court(mut self, dispute_id: u64, court: u64) -> Self {
        self.courts.insert(dispute_id, court);
        self
    }

    pub fn get_logs_calls(&self) -> usize {
        self.get_logs_calls.load(Ordering::SeqCst)
    }

    pub fn court_calls(&self) -> usize {
        self.court_calls.load(Ordering::SeqCst)
    }

    pub fn timestamp_calls(&self) -> usize {
        self.timestamp_calls.load(Ordering::SeqCst)
    }

    pub fn seen_queries(&self) -> Vec<LogQuery> {
        self.seen_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainSource for MockChain {
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, RpcError> {
        self.get_logs_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_queries.lock().unwrap().push(*query);

        let logs: Vec<Log> = self
            .logs
            .iter()
            .filter(|log| log.topic0() == Some(&query.topic0))
            .filter(|log| query.address.is_none_or(|a| log.address() == a))
            .filter(|log| {
                log.block_number
                    .is_some_and(|b| b >= query.from_block && b <= query.to_block)
            })
            .cloned()
            .collect();

        if let Some(cap) = self.cap {
            if logs.len() > cap {
                return Err(RpcError::result_limit_exceeded(
                    query.from_block,
                    query.to_block,
                ));
            }
        }
        Ok(logs)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        Ok(self.head)
    }

    async fn block_timestamp(&self, block_number: u64) -> Result<u64, RpcError> {
        self.timestamp_calls.fetch_add(1, Ordering::SeqCst);
        if block_number > self.head {
            return Err(RpcError::BlockNotFound { block_number });
        }
        Ok(GENESIS_TIMESTAMP + block_number)
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        self.court_calls.fetch_add(1, Ordering::SeqCst);
        let call = disputesCall::abi_decode(&data).map_err(|e| {
            RpcError::call_failed("disputes", std::io::Error::other(e.to_string()))
        })?;
        let dispute_id: u64 = call._disputeID.saturating_to();
        let court = self.courts.get(&dispute_id).copied().unwrap_or(0);

        let ret = (
            U256::from(court),
            Address::ZERO,
            U256::from(2u64),
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            false,
        );
        Ok(ret.abi_encode_params().into())
    }
}

/// In-memory content network with a fetch counter
#[allow(dead_code)]
#[derive(Default)]
pub struct MockGateway {
    content: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `path` (leading-slash form)
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.content.insert(path.into(), bytes.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGateway for MockGateway {
    async fn fetch(&self, locator: &ContentLocator) -> Result<Vec<u8>, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.content
            .get(locator.as_str())
            .cloned()
            .ok_or_else(|| ContentError::UnexpectedStatus {
                locator: locator.to_string(),
                status: 404,
            })
    }
}

/// Raw log as returned by a node
#[allow(dead_code)]
pub fn raw_log(address: Address, data: LogData, block: u64) -> Log {
    Log {
        inner: alloy_primitives::Log { address, data },
        block_number: Some(block),
        transaction_hash: Some(B256::left_padding_from(&block.to_be_bytes())),
        log_index: Some(0),
        ..Default::default()
    }
}

/// `DisputeCreation` emitted by `arbitrator`
#[allow(dead_code)]
pub fn creation_log(arbitrator: Address, dispute_id: u64, arbitrable: Address, block: u64) -> Log {
    let data = DisputeCreation {
        _disputeID: U256::from(dispute_id),
        _arbitrable: arbitrable,
    }
    .encode_log_data();
    raw_log(arbitrator, data, block)
}

/// `Dispute` emitted by `arbitrable`
#[allow(dead_code)]
pub fn dispute_log(
    arbitrable: Address,
    arbitrator: Address,
    dispute_id: u64,
    meta_evidence_id: u64,
    evidence_group_id: u64,
    block: u64,
) -> Log {
    let data = Dispute {
        _arbitrator: arbitrator,
        _disputeID: U256::from(dispute_id),
        _metaEvidenceID: U256::from(meta_evidence_id),
        _evidenceGroupID: U256::from(evidence_group_id),
    }
    .encode_log_data();
    raw_log(arbitrable, data, block)
}

/// `Evidence` emitted by `arbitrable`
#[allow(dead_code)]
pub fn evidence_log(
    arbitrable: Address,
    arbitrator: Address,
    evidence_group_id: u64,
    party: Address,
    evidence: &str,
    block: u64,
) -> Log {
    let data = Evidence {
        _arbitrator: arbitrator,
        _evidenceGroupID: U256::from(evidence_group_id),
        _party: party,
        _evidence: evidence.to_string(),
    }
    .encode_log_data();
    raw_log(arbitrable, data, block)
}
