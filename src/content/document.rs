// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The ERC-1497 evidence JSON document

use serde::{Deserialize, Serialize};

use crate::extract::DocumentFormat;

/// Evidence metadata published to IPFS by the submitting party
///
/// Every field is optional; real submissions omit fields freely and
/// sometimes send `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDocument {
    /// Short name
    #[serde(default)]
    pub name: Option<String>,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Locator of an attached file
    #[serde(default, rename = "fileURI")]
    pub file_uri: Option<String>,
    /// Declared extension of the attached file (`pdf`, `txt`, ...)
    #[serde(default)]
    pub file_type_extension: Option<String>,
    /// Multihash of the attached file
    #[serde(default)]
    pub file_hash: Option<String>,
}

impl EvidenceDocument {
    /// `name`, `title` and `description` joined by newlines
    ///
    /// Missing fields become empty lines, so the shape is always three lines.
    pub fn text_content(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.name.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
        )
    }

    /// The attached file locator, if one is set and non-empty
    pub fn file_uri(&self) -> Option<&str> {
        self.file_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }

    /// Declared file format, lower-cased
    ///
    /// `fileTypeExtension` wins; otherwise the extension of `fileURI`.
    pub fn declared_format(&self) -> Option<String> {
        let declared = self
            .file_type_extension
            .as_deref()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty());
        if declared.is_some() {
            return declared;
        }

        let uri = self.file_uri()?;
        let file = uri.rsplit('/').next()?;
        let (stem, ext) = file.rsplit_once('.')?;
        (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }

    /// The attached file's format, when there is a file and its format is one
    /// text can be extracted from
    pub fn text_file_format(&self) -> Option<DocumentFormat> {
        self.file_uri()?;
        DocumentFormat::from_extension(&self.declared_format()?)
    }

    /// Whether the document attaches a file in a recognized text-bearing format
    pub fn has_text_file(&self) -> bool {
        self.text_file_format().is_some()
    }
}
