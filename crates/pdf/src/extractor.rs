//! PDF text extraction.

use blockcopy_core::{DocumentFormat, Error, ExtractorConfig, PageExtractor, Result};
use lopdf::Document;
use std::fmt;

/// Extractor for PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    config: ExtractorConfig,
}

impl PdfExtractor {
    /// Create a PDF extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Load the document structure from memory.
    fn load(&self, data: &[u8]) -> Result<Document> {
        Document::load_mem(data).map_err(|e| Error::PdfParseError(e.to_string()))
    }

    /// Extract one page, applying the skip policy on failure.
    fn extract_page(&self, doc: &Document, page_number: u32) -> Result<String> {
        doc.extract_text(&[page_number])
            .or_else(|e| self.page_failure(page_number, doc.is_encrypted(), &e))
    }

    /// Decide what a page that could not be read turns into.
    fn page_failure(&self, page_number: u32, encrypted: bool, reason: &dyn fmt::Display) -> Result<String> {
        if encrypted {
            log::debug!("page {} unreadable in encrypted document: {}", page_number, reason);
            return Err(Error::EncryptedDocument);
        }
        if self.config.skip_unreadable_pages {
            log::warn!("skipping page {}: {}", page_number, reason);
            return Ok(String::new());
        }
        Err(Error::ExtractionError(format!(
            "page {}: {}",
            page_number, reason
        )))
    }
}

impl PageExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>> {
        let doc = self.load(data)?;

        // BTreeMap keyed by 1-based page number, so iteration is page order.
        let pages = doc.get_pages();
        log::debug!("PDF has {} pages", pages.len());

        pages
            .keys()
            .map(|&page_number| self.extract_page(&doc, page_number))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a PDF with one page per entry; each entry's lines are drawn
    /// as separate text-showing operations.
    fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
            ];
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
                }
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let data = build_pdf(&[&["Hello World!"], &["Second page"]]);
        let pages = PdfExtractor::new().extract_pages(&data).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Hello World!"));
        assert!(pages[1].contains("Second page"));
    }

    #[test]
    fn test_extract_document_sets_format_and_name() {
        let data = build_pdf(&[&["Only page"]]);
        let doc = PdfExtractor::new()
            .extract_document(&data, "only.pdf")
            .unwrap();

        assert_eq!(doc.format, DocumentFormat::Pdf);
        assert_eq!(doc.filename, "only.pdf");
        assert_eq!(doc.page_count(), 1);
        assert!(doc.raw_text().as_str().ends_with('\n'));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = PdfExtractor::new()
            .extract_pages(b"%PDF-1.4\nthis is not a pdf")
            .unwrap_err();
        assert!(matches!(err, Error::PdfParseError(_)));
    }

    #[test]
    fn test_unreadable_page_fails_document_by_default() {
        let err = PdfExtractor::new()
            .page_failure(3, false, &"missing content stream")
            .unwrap_err();
        assert!(matches!(err, Error::ExtractionError(ref msg) if msg == "page 3: missing content stream"));
    }

    #[test]
    fn test_unreadable_page_skipped_when_configured() {
        let extractor =
            PdfExtractor::with_config(ExtractorConfig::new().with_skip_unreadable_pages(true));
        assert_eq!(
            extractor.page_failure(2, false, &"bad stream").unwrap(),
            ""
        );
    }

    #[test]
    fn test_encrypted_page_never_skipped() {
        let extractor =
            PdfExtractor::with_config(ExtractorConfig::new().with_skip_unreadable_pages(true));
        assert!(matches!(
            extractor.page_failure(1, true, &"cannot decrypt"),
            Err(Error::EncryptedDocument)
        ));
    }

    #[test]
    fn test_size_limit_checked_before_parsing() {
        let data = build_pdf(&[&["Hello"]]);
        let extractor = PdfExtractor::with_config(
            ExtractorConfig::new().with_max_document_bytes(Some(16)),
        );
        assert!(matches!(
            extractor.extract_document(&data, "big.pdf"),
            Err(Error::DocumentTooLarge { limit: 16, .. })
        ));
    }
}
