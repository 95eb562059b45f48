// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Plain-text extraction from attached evidence files

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// File formats text can be extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Plain text
    Txt,
    /// Markdown, kept as-is
    Md,
    /// PDF, text layer only
    Pdf,
}

impl DocumentFormat {
    /// Recognize a lower- or mixed-case extension without the dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "md" => Some(Self::Md),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Canonical extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Md => "md",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Outcome of extracting text from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Extracted text
    Text(String),
    /// The declared format is not one text is extracted from
    Unsupported {
        /// The declared format, as given
        format: String,
    },
    /// The format is supported but the payload could not be parsed
    ParseFailure {
        /// Parser message
        reason: String,
    },
}

impl Extraction {
    /// The extracted text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Extraction::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Consume into the extracted text, if any
    pub fn into_text(self) -> Option<String> {
        match self {
            Extraction::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Turns raw file bytes into searchable text
///
/// Text and Markdown are decoded as UTF-8, replacing invalid sequences. PDFs
/// go through `pdf-extract` on the blocking pool; a panic inside the parser is
/// contained and reported as [`Extraction::ParseFailure`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract text from `bytes` declared to be `format`
    pub async fn extract(&self, bytes: &[u8], format: &str) -> Extraction {
        match DocumentFormat::from_extension(format) {
            Some(known) => self.extract_known(bytes, known).await,
            None => Extraction::Unsupported {
                format: format.to_string(),
            },
        }
    }

    /// Extract text from `bytes` of a recognized format
    pub async fn extract_known(&self, bytes: &[u8], format: DocumentFormat) -> Extraction {
        match format {
            DocumentFormat::Txt | DocumentFormat::Md => {
                Extraction::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            DocumentFormat::Pdf => extract_pdf(bytes.to_vec()).await,
        }
    }
}

async fn extract_pdf(bytes: Vec<u8>) -> Extraction {
    let size = bytes.len();
    let joined =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match joined {
        Ok(Ok(text)) => {
            debug!(bytes = size, chars = text.len(), "Extracted PDF text");
            Extraction::Text(text)
        }
        Ok(Err(e)) => {
            warn!(bytes = size, error = %e, "PDF could not be parsed");
            Extraction::ParseFailure {
                reason: e.to_string(),
            }
        }
        Err(e) => {
            warn!(bytes = size, error = %e, "PDF parser panicked");
            Extraction::ParseFailure {
                reason: format!("parser aborted: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-page PDF whose text layer is `text` in Helvetica
    fn minimal_pdf(text: &str) -> Vec<u8> {
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

    #[test]
    fn test_format_recognition() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension(".md"), Some(DocumentFormat::Md));
        assert_eq!(DocumentFormat::from_extension("txt"), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_extension("docx"), None);
        assert_eq!(DocumentFormat::from_extension(""), None);
    }

    #[tokio::test]
    async fn test_text_is_lossy_utf8() {
        let extraction = DocumentExtractor::new()
            .extract(b"caf\xc3\xa9 \xff end", "txt")
            .await;
        assert_eq!(extraction.text(), Some("café \u{FFFD} end"));
    }

    #[tokio::test]
    async fn test_markdown_is_kept_verbatim() {
        let extraction = DocumentExtractor::new().extract(b"# Title\n*x*", "md").await;
        assert_eq!(extraction.into_text().as_deref(), Some("# Title\n*x*"));
    }

    #[tokio::test]
    async fn test_unknown_format_is_unsupported() {
        let extraction = DocumentExtractor::new().extract(b"\x89PNG", "png").await;
        assert_eq!(
            extraction,
            Extraction::Unsupported {
                format: "png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_pdf_text_layer_is_extracted() {
        let extraction = DocumentExtractor::new()
            .extract(&minimal_pdf("hello pdf world"), "pdf")
            .await;
        let text = extraction.text().unwrap_or_default();
        assert!(text.contains("hello pdf world"), "got {extraction:?}");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_parse_failure() {
        let extraction = DocumentExtractor::new()
            .extract(b"%PDF-1.4 this is not really a pdf", "pdf")
            .await;
        assert!(matches!(extraction, Extraction::ParseFailure { .. }));
        assert_eq!(extraction.text(), None);
    }
}
