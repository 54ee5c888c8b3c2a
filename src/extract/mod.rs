//! Text extraction
//!
//! Turns an uploaded file into a tagged, page-delimited text payload.
//! Dispatch is by file extension; only PDF is currently enabled. TXT and CSV
//! are recognized but explicitly disabled, everything else is rejected
//! outright so nothing passes through the pipeline unparsed.

pub mod pdf;

use crate::types::{AppError, AppResult};

/// Extracted text plus the source format it came from.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtractedText {
    pub format: String,
    pub content: String,
    pub page_count: usize,
}

/// Uppercased extension of a filename; the whole name when there is no dot.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_ascii_uppercase()
}

pub fn process_file(filename: &str, content: &[u8]) -> AppResult<ExtractedText> {
    match file_extension(filename).as_str() {
        "PDF" => pdf::parse_pdf(content),
        "TXT" => Err(AppError::UnsupportedType(
            "TXT file support is currently disabled".to_string(),
        )),
        "CSV" => Err(AppError::UnsupportedType(
            "CSV file support is currently disabled".to_string(),
        )),
        other => Err(AppError::UnsupportedType(format!(
            "Unsupported file type: {}. Currently supported types: PDF",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_is_uppercased() {
        assert_eq!(file_extension("report.pdf"), "PDF");
        assert_eq!(file_extension("archive.tar.GZ"), "GZ");
        assert_eq!(file_extension("no_extension"), "NO_EXTENSION");
    }

    #[test]
    fn test_txt_and_csv_are_explicitly_disabled() {
        let err = process_file("notes.txt", b"hello").unwrap_err();
        assert!(err.to_string().contains("TXT file support is currently disabled"));

        let err = process_file("data.csv", b"a,b,c").unwrap_err();
        assert!(err.to_string().contains("CSV file support is currently disabled"));
    }

    #[test]
    fn test_unknown_extensions_are_rejected() {
        let err = process_file("slides.pptx", b"...").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedType(_)));
        assert!(err
            .to_string()
            .contains("Unsupported file type: PPTX. Currently supported types: PDF"));
    }

    #[test]
    fn test_empty_pdf_is_rejected() {
        let err = process_file("empty.pdf", b"").unwrap_err();
        assert!(matches!(err, AppError::EmptyInput));
    }
}
