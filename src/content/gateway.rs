// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Content network access

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::locator::ContentLocator;
use crate::errors::{ConfigError, ContentError};

/// Fetches the bytes behind a content locator
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// One fetch attempt, no caching
    async fn fetch(&self, locator: &ContentLocator) -> Result<Vec<u8>, ContentError>;
}

#[async_trait]
impl<T: ContentGateway + ?Sized> ContentGateway for std::sync::Arc<T> {
    async fn fetch(&self, locator: &ContentLocator) -> Result<Vec<u8>, ContentError> {
        (**self).fetch(locator).await
    }
}

/// An HTTP IPFS gateway such as `https://ipfs.kleros.io`
///
/// The request URL is the gateway base followed by the canonical locator,
/// with each path segment percent-encoded.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpGateway {
    /// Create a gateway client with a per-request timeout
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `base` is not an `http(s)` URL or the HTTP
    /// client cannot be constructed.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let url: url::Url = base
            .parse()
            .map_err(|e| ConfigError::invalid("IPFS_GATEWAY", base, e))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ConfigError::invalid(
                "IPFS_GATEWAY",
                base,
                "scheme must be http or https",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::invalid("IPFS_GATEWAY", base, e))?;

        Ok(Self { client, base: url })
    }

    /// Full URL for a locator
    ///
    /// Name segments are taken literally: `#`, `?` and `%` in a file name are
    /// escaped rather than read as URL syntax.
    pub fn url_for(&self, locator: &ContentLocator) -> url::Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("ipfs")
                .push(locator.cid())
                .extend(locator.name().split('/'));
        }
        url
    }
}

#[async_trait]
impl ContentGateway for HttpGateway {
    async fn fetch(&self, locator: &ContentLocator) -> Result<Vec<u8>, ContentError> {
        let url = self.url_for(locator);
        debug!(url = %url, "Fetching content");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContentError::fetch_failed(locator.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::UnexpectedStatus {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ContentError::fetch_failed(locator.as_str(), e))?;
        Ok(bytes.to_vec())
    }
}
