// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Content cache backends
//!
//! - [`DiskContentCache`]: one file per locator, named by the locator's
//!   keccak-256 hash. Survives restarts.
//! - [`MemoryContentCache`]: a map in process memory, for tests and dry runs.
//!
//! Entries are write-once: content behind an IPFS locator never changes, so a
//! second `put` for a key that already exists is ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::locator::ContentLocator;
use crate::errors::ContentError;

/// Statistics about cache usage during this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// New entries written
    pub writes: u64,
}

/// Storage for raw bytes keyed by content locator
#[async_trait]
pub trait ContentCache: Send + Sync {
    /// Cached bytes for `locator`, if present
    async fn get(&self, locator: &ContentLocator) -> Result<Option<Vec<u8>>, ContentError>;

    /// Store bytes for `locator` unless an entry already exists
    async fn put(&self, locator: &ContentLocator, bytes: &[u8]) -> Result<(), ContentError>;

    /// Usage counters
    async fn stats(&self) -> ContentCacheStats;
}

/// Content cache on the local filesystem
///
/// # Examples
///
/// ```rust,ignore
/// use vagarish::DiskContentCache;
///
/// let cache = DiskContentCache::new("files/ipfs-cache");
/// ```
#[derive(Debug)]
pub struct DiskContentCache {
    dir: PathBuf,
    stats: Mutex<ContentCacheStats>,
    temp_seq: AtomicU64,
}

impl DiskContentCache {
    /// Create a cache rooted at `dir`
    ///
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stats: Mutex::new(ContentCacheStats::default()),
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Root directory of the cache
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `locator`
    pub fn entry_path(&self, locator: &ContentLocator) -> PathBuf {
        self.dir.join(locator.cache_key())
    }

    /// Temp file for one write; unique per process and per call
    fn temp_path(&self, locator: &ContentLocator) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            "{}.{}.{seq}.tmp",
            locator.cache_key(),
            std::process::id()
        ))
    }
}

#[async_trait]
impl ContentCache for DiskContentCache {
    async fn get(&self, locator: &ContentLocator) -> Result<Option<Vec<u8>>, ContentError> {
        let path = self.entry_path(locator);
        let found = match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(ContentError::cache_io(path.display().to_string(), e)),
        };

        let mut stats = self.stats.lock().await;
        if found.is_some() {
            stats.hits += 1;
            debug!(locator = %locator, path = %path.display(), "Content cache hit");
        } else {
            stats.misses += 1;
        }
        Ok(found)
    }

    async fn put(&self, locator: &ContentLocator, bytes: &[u8]) -> Result<(), ContentError> {
        let path = self.entry_path(locator);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ContentError::cache_io(self.dir.display().to_string(), e))?;

        // Write atomically using a temp file
        let temp_path = self.temp_path(locator);
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(|e| ContentError::cache_io(temp_path.display().to_string(), e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| ContentError::cache_io(path.display().to_string(), e))?;

        self.stats.lock().await.writes += 1;
        debug!(
            locator = %locator,
            path = %path.display(),
            bytes = bytes.len(),
            "Cached content"
        );
        Ok(())
    }

    async fn stats(&self) -> ContentCacheStats {
        *self.stats.lock().await
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, Vec<u8>>,
    stats: ContentCacheStats,
}

/// Content cache held in process memory
#[derive(Debug, Default)]
pub struct MemoryContentCache {
    state: Mutex<MemoryState>,
}

impl MemoryContentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

#[async_trait]
impl ContentCache for MemoryContentCache {
    async fn get(&self, locator: &ContentLocator) -> Result<Option<Vec<u8>>, ContentError> {
        let mut state = self.state.lock().await;
        let found = state.entries.get(&locator.cache_key()).cloned();
        if found.is_some() {
            state.stats.hits += 1;
        } else {
            state.stats.misses += 1;
        }
        Ok(found)
    }

    async fn put(&self, locator: &ContentLocator, bytes: &[u8]) -> Result<(), ContentError> {
        let mut state = self.state.lock().await;
        let key = locator.cache_key();
        if !state.entries.contains_key(&key) {
            state.entries.insert(key, bytes.to_vec());
            state.stats.writes += 1;
        }
        Ok(())
    }

    async fn stats(&self) -> ContentCacheStats {
        self.state.lock().await.stats
    }
}
