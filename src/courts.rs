// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Subcourt lookup for disputes
//!
//! `DisputeCreation` does not say which subcourt handles a dispute, so each
//! dispute id is looked up with the arbitrator's `disputes(uint256)` getter.
//! That is one `eth_call` per dispute, which adds up across a full history.
//! The resulting mapping is saved to a side-file together with the number of
//! disputes it covers; a later run that discovers the same number of disputes
//! reuses it without any calls.

use std::collections::BTreeMap;
use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Instrument};

use crate::chain::ChainSource;
use crate::errors::{CourtError, StoreError};
use crate::events::definitions::disputesCall;
use crate::store::{read_json, write_json};
use crate::tracing::spans;

/// Persisted dispute-id to subcourt mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtMap {
    /// How many disputes were discovered when the map was built
    pub dispute_count: usize,
    /// Protocol dispute id to subcourt id
    pub courts: BTreeMap<String, u64>,
}

/// Outcome of [`CourtResolver::resolve_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtResolution {
    /// Protocol dispute id to subcourt id
    pub courts: BTreeMap<String, u64>,
    /// The side-file was reused and no calls were made
    pub reused: bool,
}

/// Looks up the subcourt of each dispute on the arbitrator
#[derive(Debug, Clone)]
pub struct CourtResolver<C> {
    chain: C,
    arbitrator: Address,
    side_file: Option<PathBuf>,
}

impl<C: ChainSource> CourtResolver<C> {
    /// Create a resolver without a side-file; every run makes all calls
    pub fn new(chain: C, arbitrator: Address) -> Self {
        Self {
            chain,
            arbitrator,
            side_file: None,
        }
    }

    /// Persist and reuse the mapping at `path`
    pub fn with_side_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.side_file = Some(path.into());
        self
    }

    /// Subcourt of one dispute
    ///
    /// # Errors
    ///
    /// - [`CourtError::InvalidDisputeId`] if `dispute_id` is not a decimal uint256
    /// - [`CourtError::Rpc`] if the call fails
    /// - [`CourtError::DecodeFailed`] if the return data is not a `disputes` tuple
    pub async fn court_of(&self, dispute_id: &str) -> Result<u64, CourtError> {
        let id =
            U256::from_str_radix(dispute_id, 10).map_err(|_| CourtError::InvalidDisputeId {
                dispute_id: dispute_id.to_string(),
            })?;

        let calldata = disputesCall { _disputeID: id }.abi_encode();
        let output = self.chain.call(self.arbitrator, calldata.into()).await?;
        let decoded = disputesCall::abi_decode_returns(&output)
            .map_err(|e| CourtError::decode_failed(dispute_id, e.to_string()))?;

        Ok(decoded.subcourtID.saturating_to::<u64>())
    }

    /// Subcourts of all `dispute_ids`
    ///
    /// When the side-file was built for the same number of disputes it is
    /// returned as-is. Otherwise every id is looked up in order and the
    /// side-file is rewritten.
    pub async fn resolve_all(
        &self,
        dispute_ids: &[String],
    ) -> Result<CourtResolution, CourtError> {
        let span = spans::resolve_courts(dispute_ids.len());

        async move {
            if let Some(path) = &self.side_file {
                if let Some(map) = read_json::<CourtMap>(path).await? {
                    if map.dispute_count == dispute_ids.len() {
                        info!(
                            path = %path.display(),
                            disputes = map.dispute_count,
                            "Dispute count unchanged, reusing subcourt mapping"
                        );
                        return Ok(CourtResolution {
                            courts: map.courts,
                            reused: true,
                        });
                    }
                    debug!(
                        cached = map.dispute_count,
                        discovered = dispute_ids.len(),
                        "Dispute count changed, rebuilding subcourt mapping"
                    );
                }
            }

            let mut courts = BTreeMap::new();
            for (i, dispute_id) in dispute_ids.iter().enumerate() {
                let court = self.court_of(dispute_id).await?;
                courts.insert(dispute_id.clone(), court);
                if (i + 1) % 100 == 0 {
                    debug!(resolved = i + 1, total = dispute_ids.len(), "Resolving subcourts");
                }
            }

            if let Some(path) = &self.side_file {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        StoreError::io(parent.display().to_string(), "Failed to create directory", e)
                    })?;
                }
                let map = CourtMap {
                    dispute_count: dispute_ids.len(),
                    courts: courts.clone(),
                };
                write_json(path, &map).await?;
            }

            info!(disputes = dispute_ids.len(), "Resolved subcourts");
            Ok(CourtResolution {
                courts,
                reused: false,
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::LogQuery;
    use crate::errors::RpcError;
    use alloy_primitives::Bytes;
    use alloy_rpc_types::Log;
    use alloy_sol_types::SolValue;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Subcourt of dispute `n` is `n % 3`
    #[derive(Default)]
    struct CourtChain {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChainSource for CourtChain {
        async fn get_logs(&self, _query: &LogQuery) -> Result<Vec<Log>, RpcError> {
            Ok(Vec::new())
        }

        async fn block_number(&self) -> Result<u64, RpcError> {
            Ok(0)
        }

        async fn block_timestamp(&self, _block_number: u64) -> Result<u64, RpcError> {
            Ok(0)
        }

        async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, RpcError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let call = disputesCall::abi_decode(&data).map_err(|e| {
                RpcError::call_failed("decode", std::io::Error::other(e.to_string()))
            })?;
            let court = call._disputeID % U256::from(3u64);
            let ret = (
                court,
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

    fn ids(n: u64) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[tokio::test]
    async fn test_court_of_decodes_subcourt() {
        let resolver = CourtResolver::new(CourtChain::default(), Address::ZERO);
        assert_eq!(resolver.court_of("4").await.unwrap(), 1);
        assert_eq!(resolver.court_of("5").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_invalid_dispute_id() {
        let resolver = CourtResolver::new(CourtChain::default(), Address::ZERO);
        let err = resolver.court_of("0xabc").await.unwrap_err();
        assert!(matches!(err, CourtError::InvalidDisputeId { .. }));
    }

    #[tokio::test]
    async fn test_side_file_skips_calls_when_count_matches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("court-ids.json");
        let chain = Arc::new(CourtChain::default());
        let resolver = CourtResolver::new(chain.clone(), Address::ZERO).with_side_file(&path);

        let first = resolver.resolve_all(&ids(4)).await.unwrap();
        assert!(!first.reused);
        assert_eq!(chain.calls.load(Ordering::SeqCst), 4);

        let second = resolver.resolve_all(&ids(4)).await.unwrap();
        assert!(second.reused);
        assert_eq!(second.courts, first.courts);
        assert_eq!(chain.calls.load(Ordering::SeqCst), 4);

        let third = resolver.resolve_all(&ids(5)).await.unwrap();
        assert!(!third.reused);
        assert_eq!(third.courts.get("4"), Some(&1));
        assert_eq!(chain.calls.load(Ordering::SeqCst), 9);
    }
}
