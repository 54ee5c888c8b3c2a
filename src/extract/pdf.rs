use crate::extract::ExtractedText;
use crate::types::{AppError, AppResult};
use tracing::debug;

/// Extract readable text from PDF bytes, one `=== Page N ===` block per
/// non-empty page. Zero-page documents and documents yielding no text at all
/// are rejected rather than passed downstream as blank input.
pub fn parse_pdf(content: &[u8]) -> AppResult<ExtractedText> {
    if content.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let doc = lopdf::Document::load_mem(content)
        .map_err(|e| AppError::Extraction(format!("Could not open PDF file: {}", e)))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(AppError::Extraction("The PDF file has no pages".to_string()));
    }

    let mut final_text = String::new();
    for (page_number, _) in &pages {
        let page_text = doc.extract_text(&[*page_number]).map_err(|e| {
            AppError::Extraction(format!("Could not read page {}: {}", page_number, e))
        })?;

        if page_text.trim().is_empty() {
            continue;
        }

        final_text.push_str(&format!(
            "\n=== Page {} ===\n\n{}\n\n",
            page_number,
            page_text.trim_end()
        ));
    }

    if final_text.trim().is_empty() {
        return Err(AppError::Extraction(
            "Could not extract any text from the PDF".to_string(),
        ));
    }

    debug!(pages = pages.len(), chars = final_text.len(), "PDF text extracted");

    Ok(ExtractedText {
        format: "pdf".to_string(),
        content: final_text.trim().to_string(),
        page_count: pages.len(),
    })
}

/// Build a minimal single-page PDF carrying the given text. Test fixture for
/// the extractor and the pipeline.
#[cfg(test)]
pub(crate) fn build_test_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content stream"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize test pdf");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pdf_produces_page_delimited_text() {
        let bytes = build_test_pdf("Request for quotation: 20 laptops");
        let extracted = parse_pdf(&bytes).expect("parse test pdf");

        assert_eq!(extracted.format, "pdf");
        assert_eq!(extracted.page_count, 1);
        assert!(extracted.content.contains("=== Page 1 ==="));
        assert!(extracted.content.contains("Request for quotation: 20 laptops"));
    }

    #[test]
    fn test_parse_pdf_rejects_empty_input() {
        assert!(matches!(parse_pdf(b""), Err(AppError::EmptyInput)));
    }

    #[test]
    fn test_parse_pdf_rejects_garbage_bytes() {
        let err = parse_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(err.to_string().contains("Could not open PDF file"));
    }
}
