// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Filesystem record store with versioning and atomic writes

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::state::{RecordState, DISPUTES, EVIDENCE};
use super::{
    BlockTimestampEntry, DisputeRecord, EvidenceRecord, NewDispute, NewEvidence, RecordId,
    RecordStore,
};
use crate::errors::StoreError;

/// Current on-disk layout version
const LAYOUT_VERSION: u32 = 1;

const LAYOUT_FILE: &str = "layout.json";
const BLOCKS: &str = "blocks";

/// Serialized layout marker (versioned)
#[derive(Debug, Serialize, Deserialize)]
struct Layout {
    version: u32,
}

/// Record store writing one JSON file per record
///
/// ```text
/// <root>/layout.json
/// <root>/disputes/0000000001.json
/// <root>/evidence/0000000001.json
/// <root>/blocks/7303699.json
/// ```
///
/// All records are loaded into memory on [`open`](Self::open); every mutation
/// is written through before the call returns, via a temp file and rename.
///
/// # Examples
///
/// ```rust,ignore
/// use vagarish::{FsStore, RecordStore};
///
/// let store = FsStore::open("files/records").await?;
/// for dispute in store.list_disputes().await? {
///     println!("{} -> {:?}", dispute.kleros_liquid_id, dispute.evidence_group_id);
/// }
/// ```
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
    state: Mutex<RecordState>,
}

impl FsStore {
    /// Open (or create) a store rooted at `root`
    ///
    /// # Errors
    ///
    /// - [`StoreError::VersionMismatch`] if the layout was written by an
    ///   incompatible version
    /// - [`StoreError::Io`] / [`StoreError::Serialization`] if existing
    ///   records cannot be read
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        for dir in [DISPUTES, EVIDENCE, BLOCKS] {
            create_dir(&root.join(dir)).await?;
        }

        let layout_path = root.join(LAYOUT_FILE);
        match read_json::<Layout>(&layout_path).await? {
            Some(layout) if layout.version != LAYOUT_VERSION => {
                return Err(StoreError::VersionMismatch {
                    found: layout.version,
                    expected: LAYOUT_VERSION,
                });
            }
            Some(_) => {}
            None => {
                write_json(
                    &layout_path,
                    &Layout {
                        version: LAYOUT_VERSION,
                    },
                )
                .await?;
            }
        }

        let disputes: Vec<DisputeRecord> = load_dir(&root.join(DISPUTES)).await?;
        let evidence: Vec<EvidenceRecord> = load_dir(&root.join(EVIDENCE)).await?;
        let blocks: Vec<BlockTimestampEntry> = load_dir(&root.join(BLOCKS)).await?;

        info!(
            path = %root.display(),
            disputes = disputes.len(),
            evidence = evidence.len(),
            blocks = blocks.len(),
            version = LAYOUT_VERSION,
            "Opened record store"
        );

        Ok(Self {
            state: Mutex::new(RecordState::from_records(disputes, evidence, blocks)),
            root,
        })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a dispute record file
    pub fn dispute_path(&self, id: RecordId) -> PathBuf {
        self.root.join(DISPUTES).join(record_file(id))
    }

    /// Path of an evidence record file
    pub fn evidence_path(&self, id: RecordId) -> PathBuf {
        self.root.join(EVIDENCE).join(record_file(id))
    }

    fn block_path(&self, block_number: u64) -> PathBuf {
        self.root.join(BLOCKS).join(format!("{block_number}.json"))
    }
}

fn record_file(id: RecordId) -> String {
    format!("{:010}.json", id.0)
}

async fn create_dir(dir: &Path) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        StoreError::io(
            dir.display().to_string(),
            "Failed to create store directory",
            e,
        )
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::io(
                path.display().to_string(),
                "Failed to read record",
                e,
            ))
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::serialization(path.display().to_string(), e))
}

pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut json = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::serialization(path.display().to_string(), e))?;
    json.push(b'\n');

    // Write atomically using a temp file
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &json).await.map_err(|e| {
        StoreError::io(
            temp_path.display().to_string(),
            "Failed to write record",
            e,
        )
    })?;
    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StoreError::io(
            path.display().to_string(),
            format!("Failed to rename from {}", temp_path.display()),
            e,
        )
    })
}

async fn load_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
    let io_err = |e: std::io::Error| {
        StoreError::io(dir.display().to_string(), "Failed to list records", e)
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => paths.push(path),
            Some("tmp") => {
                warn!(path = %path.display(), "Ignoring leftover temp file");
            }
            _ => {}
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(record) = read_json(&path).await? {
            records.push(record);
        }
    }
    Ok(records)
}

async fn clear_dir(dir: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(StoreError::io(
                dir.display().to_string(),
                "Failed to clear records",
                e,
            ))
        }
    }
    create_dir(dir).await
}

#[async_trait]
impl RecordStore for FsStore {
    async fn reset_disputes_and_evidence(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        clear_dir(&self.root.join(EVIDENCE)).await?;
        clear_dir(&self.root.join(DISPUTES)).await?;
        state.reset();
        debug!(path = %self.root.display(), "Cleared disputes and evidence");
        Ok(())
    }

    async fn insert_dispute(&self, dispute: NewDispute) -> Result<DisputeRecord, StoreError> {
        let mut state = self.state.lock().await;
        let record = state.insert_dispute(dispute)?;
        write_json(&self.dispute_path(record.id), &record).await?;
        Ok(record)
    }

    async fn update_dispute(&self, dispute: &DisputeRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.update_dispute(dispute)?;
        write_json(&self.dispute_path(dispute.id), dispute).await
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
        let mut state = self.state.lock().await;
        let record = state.insert_evidence(evidence)?;
        write_json(&self.evidence_path(record.id), &record).await?;
        Ok(record)
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
        let mut state = self.state.lock().await;
        if state.put_block_timestamp(entry) {
            write_json(&self.block_path(entry.block_number), &entry).await?;
        }
        Ok(())
    }
}
