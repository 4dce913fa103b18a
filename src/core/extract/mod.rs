//! Text extraction and normalization for meeting documents.
//!
//! Raw document bytes (PDF or plain text) become cleaned UTF-8 text
//! independent of where they were stored. Normalization collapses
//! newline runs with three fixed substitutions applied once, in
//! order — deliberately not iterated to a fixed point, so longer
//! runs than the patterns cover can survive a pass.

mod pdf;

use std::path::Path;

use crate::core::error::{GavelError, Result};

/// Declared document format, inferred from the filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
}

impl DocumentFormat {
    /// Infer the format from a filename's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") => Ok(DocumentFormat::Text),
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some(other) => Err(GavelError::Extraction(format!(
                "Unsupported document format: .{other}"
            ))),
            None => Err(GavelError::Extraction(format!(
                "Cannot infer format of {filename}: no extension"
            ))),
        }
    }
}

/// Extract normalized text from raw document bytes
pub fn extract(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    let raw = match format {
        DocumentFormat::Text => String::from_utf8(bytes.to_vec())
            .map_err(|e| GavelError::Extraction(format!("Document is not valid UTF-8: {e}")))?,
        DocumentFormat::Pdf => pdf::extract_pdf_text(bytes)?,
    };

    Ok(normalize(&raw))
}

/// Collapse newline runs: three substitutions, fixed order, one pass each
pub fn normalize(text: &str) -> String {
    text.replace("\n\n\n", "\n")
        .replace("\n\n", "\n")
        .replace("\n \n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            DocumentFormat::from_filename("minutes.txt").unwrap(),
            DocumentFormat::Text
        );
        assert_eq!(
            DocumentFormat::from_filename("2024-03-12_1830.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert!(DocumentFormat::from_filename("scan.docx").is_err());
        assert!(DocumentFormat::from_filename("noextension").is_err());
    }

    #[test]
    fn test_normalize_reference_input() {
        assert_eq!(normalize("a\n\n\nb\n\nc\n \nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_normalize_is_single_pass() {
        // Seven newlines: the 3->1 pass leaves three, the 2->1 pass
        // leaves two. Runs beyond the covered patterns survive; this
        // pins the reference behavior.
        assert_eq!(normalize("a\n\n\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_leaves_single_newlines() {
        assert_eq!(normalize("a\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn test_extract_plain_text() {
        let text = extract(b"line one\n\n\nline two", DocumentFormat::Text).unwrap();
        assert_eq!(text, "line one\nline two");
    }

    #[test]
    fn test_extract_invalid_utf8_is_extraction_error() {
        let err = extract(&[0xff, 0xfe, 0x00], DocumentFormat::Text).unwrap_err();
        assert!(matches!(err, GavelError::Extraction(_)));
    }
}
