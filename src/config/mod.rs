// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for ingestion runs
//!
//! This module provides the configuration that controls where events are read
//! from, where content is fetched from, where records are written, and how
//! aggressively the pipeline talks to external services.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use vagarish::IndexerConfig;
//!
//! // Kleros mainnet, public Kleros IPFS gateway, ./files data directory
//! let config = IndexerConfig::default();
//! assert_eq!(config.evidence_concurrency, 1);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use vagarish::IndexerConfigBuilder;
//! use std::time::Duration;
//!
//! let config = IndexerConfigBuilder::with_defaults()
//!     .data_dir("/var/lib/vagarish")
//!     .start_block(7_303_699)
//!     .concurrent_split(true)
//!     .rate_limit_delay(Duration::from_millis(100))
//!     .build();
//! ```
//!
//! # Example: From the environment
//!
//! ```rust,ignore
//! use vagarish::IndexerConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = IndexerConfig::from_env()?;
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::Address;

use crate::errors::ConfigError;

pub mod constants;

use constants::{DEFAULT_DATA_DIR, DEFAULT_IPFS_GATEWAY, KLEROS_LIQUID};

/// Configuration for an ingestion run
///
/// Use [`IndexerConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Chain the root contract lives on (used for logging)
    /// Default: Ethereum mainnet
    pub chain: NamedChain,

    /// JSON-RPC endpoint. Only required by the binary; library callers
    /// construct their own [`ChainSource`](crate::ChainSource).
    pub rpc_url: Option<String>,

    /// Arbitrator whose `DisputeCreation` events seed discovery
    /// Default: [`KLEROS_LIQUID`]
    pub root_contract: Address,

    /// First block scanned for root `DisputeCreation` events
    ///
    /// Arbitrable `Dispute` and `Evidence` streams are always scanned from
    /// block 0. Default: 0
    pub start_block: u64,

    /// Base URL of the IPFS HTTP gateway
    pub ipfs_gateway: String,

    /// Root directory for records, the content cache and side-files
    pub data_dir: PathBuf,

    /// Smallest block range the range fetcher is allowed to split
    /// Default: 1 (a single-block overflow is fatal)
    pub min_split_width: u64,

    /// Fetch both halves of a split range concurrently
    /// Default: false
    pub concurrent_split: bool,

    /// Delay between log queries to avoid provider throttling
    /// Default: None
    pub rate_limit_delay: Option<Duration>,

    /// Timeout for a single gateway request
    /// Default: 30 seconds
    pub content_timeout: Duration,

    /// Extra attempts after a failed gateway request
    /// Default: 0 (one failed fetch skips the item)
    pub content_retries: u32,

    /// Evidence items resolved concurrently; store writes stay sequential
    /// Default: 1
    pub evidence_concurrency: usize,

    /// Re-run ingestion on this interval (binary only)
    /// Default: None (run once)
    pub ingest_interval: Option<Duration>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl IndexerConfig {
    /// Create config for Kleros on Ethereum mainnet with the public gateway
    pub fn with_common_defaults() -> Self {
        Self {
            chain: NamedChain::Mainnet,
            rpc_url: None,
            root_contract: KLEROS_LIQUID,
            start_block: 0,
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            min_split_width: 1,
            concurrent_split: false,
            rate_limit_delay: None,
            content_timeout: Duration::from_secs(30),
            content_retries: 0,
            evidence_concurrency: 1,
            ingest_interval: None,
        }
    }

    /// Create minimal config rooted at `data_dir`, suitable for tests
    ///
    /// # Example
    ///
    /// ```rust
    /// use vagarish::IndexerConfig;
    ///
    /// let config = IndexerConfig::minimal("/tmp/vagarish-test");
    /// assert!(config.rate_limit_delay.is_none());
    /// assert_eq!(config.records_dir(), std::path::Path::new("/tmp/vagarish-test/records"));
    /// ```
    pub fn minimal(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            content_timeout: Duration::from_secs(5),
            ..Self::with_common_defaults()
        }
    }

    /// Directory holding one JSON document per record
    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    /// Directory holding raw IPFS payloads keyed by locator hash
    pub fn content_cache_dir(&self) -> PathBuf {
        self.data_dir.join("ipfs-cache")
    }

    /// Side-file with the last dispute-count-to-subcourt mapping
    pub fn court_ids_path(&self) -> PathBuf {
        self.data_dir.join("court-ids.json")
    }

    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file. Recognized
    /// variables:
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `RPC_URL` | JSON-RPC endpoint (required) |
    /// | `CHAIN_ID` | numeric chain id (default 1) |
    /// | `ROOT_CONTRACT` | arbitrator address |
    /// | `START_BLOCK` | first block to scan |
    /// | `IPFS_GATEWAY` | gateway base URL |
    /// | `DATA_DIR` | data directory |
    /// | `CONCURRENT_SPLIT` | `true`/`false` |
    /// | `RATE_LIMIT_DELAY_MS` | delay between log queries |
    /// | `CONTENT_TIMEOUT_SECS` | gateway request timeout |
    /// | `CONTENT_RETRIES` | gateway retries |
    /// | `EVIDENCE_CONCURRENCY` | concurrent evidence resolutions |
    /// | `INGEST_INTERVAL_SECS` | periodic re-ingestion |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// [`from_env`](Self::from_env) delegates here; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = IndexerConfigBuilder::with_defaults();

        let rpc_url = lookup("RPC_URL").ok_or_else(|| ConfigError::missing("RPC_URL"))?;
        builder = builder.rpc_url(rpc_url);

        if let Some(chain_id) = parse_var::<u64, _>(&lookup, "CHAIN_ID")? {
            let chain = NamedChain::try_from(chain_id).map_err(|_| {
                ConfigError::invalid("CHAIN_ID", chain_id.to_string(), "unknown chain")
            })?;
            builder = builder.chain(chain);
        }
        if let Some(root) = parse_var::<Address, _>(&lookup, "ROOT_CONTRACT")? {
            builder = builder.root_contract(root);
        }
        if let Some(start) = parse_var::<u64, _>(&lookup, "START_BLOCK")? {
            builder = builder.start_block(start);
        }
        if let Some(gateway) = lookup("IPFS_GATEWAY") {
            url::Url::parse(&gateway)
                .map_err(|e| ConfigError::invalid("IPFS_GATEWAY", gateway.clone(), e))?;
            builder = builder.ipfs_gateway(gateway);
        }
        if let Some(dir) = lookup("DATA_DIR") {
            builder = builder.data_dir(dir);
        }
        if let Some(split) = parse_var::<bool, _>(&lookup, "CONCURRENT_SPLIT")? {
            builder = builder.concurrent_split(split);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "RATE_LIMIT_DELAY_MS")? {
            builder = builder.rate_limit_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "CONTENT_TIMEOUT_SECS")? {
            builder = builder.content_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, "CONTENT_RETRIES")? {
            builder = builder.content_retries(retries);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "EVIDENCE_CONCURRENCY")? {
            builder = builder.evidence_concurrency(n);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "INGEST_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(ConfigError::invalid(
                    "INGEST_INTERVAL_SECS",
                    "0",
                    "must be positive",
                ));
            }
            builder = builder.ingest_interval(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::invalid(key, raw.clone(), e)),
    }
}

/// Builder for [`IndexerConfig`]
///
/// # Example
///
/// ```rust
/// use vagarish::IndexerConfigBuilder;
///
/// let config = IndexerConfigBuilder::new()
///     .evidence_concurrency(4)
///     .content_retries(2)
///     .build();
/// assert_eq!(config.evidence_concurrency, 4);
/// ```
pub struct IndexerConfigBuilder {
    config: IndexerConfig,
}

impl Default for IndexerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexerConfigBuilder {
    /// Create a new builder with minimal defaults rooted at the default data dir
    pub fn new() -> Self {
        Self {
            config: IndexerConfig::minimal(DEFAULT_DATA_DIR),
        }
    }

    /// Start with common defaults
    pub fn with_defaults() -> Self {
        Self {
            config: IndexerConfig::with_common_defaults(),
        }
    }

    /// Set the chain label
    pub fn chain(mut self, chain: NamedChain) -> Self {
        self.config.chain = chain;
        self
    }

    /// Set the JSON-RPC endpoint
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.rpc_url = Some(url.into());
        self
    }

    /// Set the arbitrator whose disputes seed discovery
    pub fn root_contract(mut self, address: Address) -> Self {
        self.config.root_contract = address;
        self
    }

    /// Set the first block scanned
    pub fn start_block(mut self, block: u64) -> Self {
        self.config.start_block = block;
        self
    }

    /// Set the IPFS gateway base URL
    pub fn ipfs_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.config.ipfs_gateway = gateway.into();
        self
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the smallest splittable range (clamped to at least 1)
    pub fn min_split_width(mut self, width: u64) -> Self {
        self.config.min_split_width = width.max(1);
        self
    }

    /// Fetch split halves concurrently
    pub fn concurrent_split(mut self, enabled: bool) -> Self {
        self.config.concurrent_split = enabled;
        self
    }

    /// Set the delay between log queries
    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.config.rate_limit_delay = Some(delay);
        self
    }

    /// Set the gateway request timeout
    pub fn content_timeout(mut self, timeout: Duration) -> Self {
        self.config.content_timeout = timeout;
        self
    }

    /// Set the number of gateway retries
    pub fn content_retries(mut self, retries: u32) -> Self {
        self.config.content_retries = retries;
        self
    }

    /// Set evidence resolution concurrency (clamped to at least 1)
    pub fn evidence_concurrency(mut self, n: usize) -> Self {
        self.config.evidence_concurrency = n.max(1);
        self
    }

    /// Enable periodic re-ingestion in the binary
    ///
    /// A zero interval disables it.
    pub fn ingest_interval(mut self, interval: Duration) -> Self {
        self.config.ingest_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Build the configuration
    pub fn build(self) -> IndexerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_target_kleros_mainnet() {
        let config = IndexerConfig::default();
        assert_eq!(config.root_contract, KLEROS_LIQUID);
        assert_eq!(config.chain, NamedChain::Mainnet);
        assert_eq!(config.min_split_width, 1);
        assert_eq!(config.content_retries, 0);
        assert!(!config.concurrent_split);
    }

    #[test]
    fn test_derived_paths() {
        let config = IndexerConfig::minimal("/data");
        assert_eq!(config.records_dir(), PathBuf::from("/data/records"));
        assert_eq!(config.content_cache_dir(), PathBuf::from("/data/ipfs-cache"));
        assert_eq!(config.court_ids_path(), PathBuf::from("/data/court-ids.json"));
    }

    #[test]
    fn test_builder_clamps() {
        let config = IndexerConfigBuilder::new()
            .min_split_width(0)
            .evidence_concurrency(0)
            .build();
        assert_eq!(config.min_split_width, 1);
        assert_eq!(config.evidence_concurrency, 1);
    }

    #[test]
    fn test_from_lookup_requires_rpc_url() {
        let err = IndexerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field } if field == "RPC_URL"));
    }

    #[test]
    fn test_from_lookup_parses_values() {
        let config = IndexerConfig::from_lookup(lookup_from(&[
            ("RPC_URL", "http://localhost:8545"),
            ("START_BLOCK", "7303699"),
            ("DATA_DIR", "/tmp/v"),
            ("CONCURRENT_SPLIT", "true"),
            ("RATE_LIMIT_DELAY_MS", "250"),
            ("EVIDENCE_CONCURRENCY", "8"),
            ("INGEST_INTERVAL_SECS", "3600"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(config.start_block, 7_303_699);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/v"));
        assert!(config.concurrent_split);
        assert_eq!(config.rate_limit_delay, Some(Duration::from_millis(250)));
        assert_eq!(config.evidence_concurrency, 8);
        assert_eq!(config.ingest_interval, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = IndexerConfig::from_lookup(lookup_from(&[
            ("RPC_URL", "http://localhost:8545"),
            ("START_BLOCK", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field, .. } if field == "START_BLOCK"));
    }

    #[test]
    fn test_zero_ingest_interval_is_rejected() {
        let err = IndexerConfig::from_lookup(lookup_from(&[
            ("RPC_URL", "http://localhost:8545"),
            ("INGEST_INTERVAL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field, .. } if field == "INGEST_INTERVAL_SECS")
        );

        let config = IndexerConfigBuilder::with_defaults()
            .ingest_interval(Duration::ZERO)
            .build();
        assert_eq!(config.ingest_interval, None);
    }

    #[test]
    fn test_from_lookup_rejects_bad_gateway() {
        let err = IndexerConfig::from_lookup(lookup_from(&[
            ("RPC_URL", "http://localhost:8545"),
            ("IPFS_GATEWAY", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field, .. } if field == "IPFS_GATEWAY"));
    }
}
