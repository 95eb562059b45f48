// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`ChainSource`] backed by an alloy [`Provider`]

use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types::{Filter, Log, TransactionInput, TransactionRequest};
use alloy_transport::TransportError;
use async_trait::async_trait;
use tracing::debug;

use super::{ChainSource, LogQuery};
use crate::config::constants::{RESULT_LIMIT_ERROR_CODE, RESULT_LIMIT_MESSAGES};
use crate::errors::RpcError;

/// Chain access through any alloy provider
///
/// # Examples
///
/// ```rust,ignore
/// use alloy_provider::ProviderBuilder;
/// use vagarish::RpcChain;
///
/// // Explicit provider
/// let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
/// let chain = RpcChain::new(provider);
///
/// // Or straight from a URL
/// let chain = RpcChain::connect_http("https://eth.llamarpc.com")?;
/// ```
#[derive(Debug, Clone)]
pub struct RpcChain<P> {
    provider: P,
}

impl<P> RpcChain<P> {
    /// Wrap an existing provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Borrow the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl RpcChain<RootProvider> {
    /// Create a chain source for an HTTP JSON-RPC endpoint
    ///
    /// Recommended fillers are disabled; this source never sends transactions.
    pub fn connect_http(rpc_url: &str) -> Result<Self, RpcError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| RpcError::ProviderUrlInvalid(format!("{e}")))?;

        Ok(Self::new(
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(url),
        ))
    }
}

/// Returns `true` if a transport error is the provider refusing a log query
/// because it matched too many results.
///
/// Providers disagree on how they say this. Infura answers code `-32005` with
/// "query returned more than 10000 results"; others only put it in the message.
/// The code alone is not enough because `-32005` also means rate limiting.
pub fn is_result_limit_error(err: &TransportError) -> bool {
    if let Some(payload) = err.as_error_resp() {
        let message = payload.message.to_lowercase();
        if payload.code == RESULT_LIMIT_ERROR_CODE && message.contains("result") {
            return true;
        }
        return message_indicates_limit(&message);
    }
    message_indicates_limit(&err.to_string().to_lowercase())
}

fn message_indicates_limit(message: &str) -> bool {
    RESULT_LIMIT_MESSAGES
        .iter()
        .any(|fragment| message.contains(fragment))
}

#[async_trait]
impl<P: Provider> ChainSource for RpcChain<P> {
    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<Log>, RpcError> {
        let mut filter = Filter::new()
            .event_signature(query.topic0)
            .from_block(query.from_block)
            .to_block(query.to_block);
        if let Some(address) = query.address {
            filter = filter.address(address);
        }

        self.provider.get_logs(&filter).await.map_err(|e| {
            if is_result_limit_error(&e) {
                debug!(
                    from_block = query.from_block,
                    to_block = query.to_block,
                    error = %e,
                    "Provider result limit hit"
                );
                RpcError::result_limit_exceeded(query.from_block, query.to_block)
            } else {
                RpcError::get_logs_failed(
                    format!(
                        "{} blocks {}-{}",
                        query.topic0, query.from_block, query.to_block
                    ),
                    e,
                )
            }
        })
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        self.provider
            .get_block_number()
            .await
            .map_err(RpcError::get_block_number_failed)
    }

    async fn block_timestamp(&self, block_number: u64) -> Result<u64, RpcError> {
        let block = self
            .provider
            .get_block_by_number(block_number.into())
            .await
            .map_err(|e| RpcError::get_block_failed(block_number, e))?
            .ok_or(RpcError::BlockNotFound { block_number })?;

        Ok(block.header.timestamp)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        let request = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(data));

        self.provider
            .call(request)
            .await
            .map_err(|e| RpcError::call_failed(format!("eth_call to {to}"), e))
    }
}
