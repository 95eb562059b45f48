// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache-first resolution of evidence documents and their attached files

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn, Instrument};

use super::cache::{ContentCache, ContentCacheStats};
use super::document::EvidenceDocument;
use super::gateway::ContentGateway;
use super::locator::ContentLocator;
use crate::errors::ContentError;
use crate::extract::DocumentFormat;
use crate::tracing::spans;

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// An attached file that was fetched successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Canonical locator of the file
    pub locator: ContentLocator,
    /// Format the evidence document declared for it
    pub format: DocumentFormat,
    /// Raw bytes
    pub bytes: Vec<u8>,
}

/// An evidence document plus, when applicable, its attached file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    /// Canonical locator of the evidence document
    pub locator: ContentLocator,
    /// Parsed evidence document
    pub document: EvidenceDocument,
    /// The attached file, if it has a recognized format and could be fetched
    pub file: Option<ResolvedFile>,
    /// A recognized file was declared but could not be fetched
    pub file_unavailable: bool,
}

/// Resolves content locators through a cache and a gateway
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use vagarish::{ContentResolver, DiskContentCache, HttpGateway};
///
/// let gateway = HttpGateway::new("https://ipfs.kleros.io", Duration::from_secs(30))?;
/// let resolver = ContentResolver::new(
///     Arc::new(gateway),
///     Box::new(DiskContentCache::new("files/ipfs-cache")),
/// );
///
/// let content = resolver.resolve("/ipfs/Qm.../evidence.json").await?;
/// println!("{}", content.document.text_content());
/// ```
pub struct ContentResolver {
    gateway: Arc<dyn ContentGateway>,
    cache: Box<dyn ContentCache>,
    retries: u32,
}

impl std::fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentResolver")
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

impl ContentResolver {
    /// Create a resolver that never retries a failed fetch
    pub fn new(gateway: Arc<dyn ContentGateway>, cache: Box<dyn ContentCache>) -> Self {
        Self {
            gateway,
            cache,
            retries: 0,
        }
    }

    /// Retry a failed gateway fetch up to `retries` more times
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Cache usage counters
    pub async fn cache_stats(&self) -> ContentCacheStats {
        self.cache.stats().await
    }

    /// Bytes behind a locator, from the cache when present
    ///
    /// On a miss the gateway is asked and a successful answer is cached
    /// before it is returned.
    pub async fn fetch_bytes(&self, locator: &ContentLocator) -> Result<Vec<u8>, ContentError> {
        if let Some(bytes) = self.cache.get(locator).await? {
            return Ok(bytes);
        }

        let mut attempt = 0;
        let bytes = loop {
            match self.gateway.fetch(locator).await {
                Ok(bytes) => break bytes,
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        locator = %locator,
                        attempt,
                        max_retries = self.retries,
                        error = %e,
                        "Content fetch failed, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => return Err(e),
            }
        };

        self.cache.put(locator, &bytes).await?;
        Ok(bytes)
    }

    /// Resolve an evidence locator into its document and attached file
    ///
    /// The locator is canonicalized and validated before anything else; a
    /// malformed locator never reaches the cache or the network. A failure to
    /// fetch the attached file is logged and leaves `file` empty.
    ///
    /// # Errors
    ///
    /// - [`ContentError::InvalidLocator`] for a malformed evidence locator
    /// - [`ContentError::MalformedDocument`] if the document is not JSON
    /// - any fetch or cache error for the document itself
    pub async fn resolve(&self, raw_locator: &str) -> Result<ResolvedContent, ContentError> {
        let locator = ContentLocator::parse(raw_locator)?;
        let span = spans::resolve_content(locator.as_str());

        async move {
            let bytes = self.fetch_bytes(&locator).await?;
            let document: EvidenceDocument =
                serde_json::from_slice(&bytes).map_err(|source| ContentError::MalformedDocument {
                    locator: locator.to_string(),
                    source,
                })?;

            let (file, file_unavailable) = match document.text_file_format() {
                Some(format) => match self.resolve_file(&document, format).await {
                    Ok(file) => (Some(file), false),
                    Err(e) => {
                        warn!(
                            evidence = %locator,
                            file_uri = ?document.file_uri(),
                            error = %e,
                            "Attached file unavailable, keeping evidence without it"
                        );
                        (None, true)
                    }
                },
                None => (None, false),
            };

            debug!(
                has_file = file.is_some(),
                file_unavailable, "Resolved evidence document"
            );

            Ok(ResolvedContent {
                locator,
                document,
                file,
                file_unavailable,
            })
        }
        .instrument(span)
        .await
    }

    async fn resolve_file(
        &self,
        document: &EvidenceDocument,
        format: DocumentFormat,
    ) -> Result<ResolvedFile, ContentError> {
        let raw = document.file_uri().unwrap_or_default();
        let locator = ContentLocator::parse(raw)?;
        let bytes = self.fetch_bytes(&locator).await?;
        Ok(ResolvedFile {
            locator,
            format,
            bytes,
        })
    }
}
