// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Validated IPFS content locators

use std::fmt;

use alloy_primitives::{hex, keccak256};
use serde::{Deserialize, Serialize};

use crate::errors::ContentError;

const IPFS_PREFIX: &str = "/ipfs/";
const CID_LEN: usize = 46;

/// A canonical `/ipfs/<cid>/<name>` locator
///
/// Evidence events sometimes carry `ipfs/...` without the leading slash; both
/// spellings canonicalize to the same locator, so they share one cache entry.
///
/// # Examples
///
/// ```
/// use vagarish::ContentLocator;
///
/// let cid = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
/// let a = ContentLocator::parse(&format!("ipfs/{cid}/evidence.json")).unwrap();
/// let b = ContentLocator::parse(&format!("/ipfs/{cid}/evidence.json")).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), format!("/ipfs/{cid}/evidence.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentLocator(String);

impl ContentLocator {
    /// Canonicalize and validate a raw locator
    ///
    /// # Errors
    ///
    /// [`ContentError::InvalidLocator`] unless the canonical form is
    /// `/ipfs/<46 ASCII alphanumerics>/<non-empty name>`.
    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        let raw = raw.trim();
        let canonical = if raw.starts_with('/') {
            raw.to_string()
        } else {
            format!("/{raw}")
        };

        let Some(rest) = canonical.strip_prefix(IPFS_PREFIX) else {
            return Err(ContentError::invalid_locator(raw, "missing /ipfs/ prefix"));
        };
        let Some((cid, name)) = rest.split_once('/') else {
            return Err(ContentError::invalid_locator(raw, "missing file name"));
        };
        if cid.len() != CID_LEN || !cid.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ContentError::invalid_locator(
                raw,
                "content hash must be 46 ASCII alphanumeric characters",
            ));
        }
        if name.is_empty() {
            return Err(ContentError::invalid_locator(raw, "missing file name"));
        }

        Ok(Self(canonical))
    }

    /// The canonical form, always starting with `/ipfs/`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The content hash segment
    pub fn cid(&self) -> &str {
        &self.0[IPFS_PREFIX.len()..IPFS_PREFIX.len() + CID_LEN]
    }

    /// Everything after the content hash
    pub fn name(&self) -> &str {
        &self.0[IPFS_PREFIX.len() + CID_LEN + 1..]
    }

    /// Lower-cased extension of the file name, if any
    pub fn extension(&self) -> Option<String> {
        let file = self.name().rsplit('/').next()?;
        let (stem, ext) = file.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Hex keccak-256 of the canonical locator, used as the cache file name
    pub fn cache_key(&self) -> String {
        hex::encode(keccak256(self.0.as_bytes()))
    }
}

impl fmt::Display for ContentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentLocator {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentLocator> for String {
    fn from(locator: ContentLocator) -> Self {
        locator.0
    }
}
