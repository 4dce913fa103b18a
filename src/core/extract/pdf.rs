//! PDF text extraction via Pdfium.
//!
//! Pages are extracted in document order and joined with a single
//! newline. A document with zero extractable pages yields empty
//! text, not an error. The Pdfium library is bound per call; the
//! binding honors `PDFIUM_DYNAMIC_LIB_PATH` before falling back to
//! the system library.

use pdfium_render::prelude::{Pdfium, PdfiumError};

use crate::core::error::{GavelError, Result};

/// Extract UTF-8 text from a PDF byte slice, one page per line group
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let pdfium = load_pdfium()
        .map_err(|e| GavelError::Extraction(format!("Failed to load Pdfium runtime: {e}")))?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| GavelError::Extraction(format!("Failed to load PDF document: {e}")))?;

    let mut buffer = String::new();

    for (page_index, page) in document.pages().iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| {
                GavelError::Extraction(format!(
                    "Failed to extract text for page {page_index}: {e}"
                ))
            })?
            .all();

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&page_text);
    }

    Ok(buffer)
}

fn load_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        return Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&path))
            .map(Pdfium::new);
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}
