//! Extractor seam between document parsers and block splitting.

use crate::types::{DocumentFormat, ExtractedDocument};
use crate::{Error, Result};

/// Runtime configuration shared by every [`PageExtractor`].
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    /// Refuse documents larger than this many bytes.
    pub max_document_bytes: Option<usize>,

    /// Keep going with an empty page when one page cannot be read,
    /// instead of failing the whole document.
    pub skip_unreadable_pages: bool,
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_document_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_document_bytes = limit;
        self
    }

    pub fn with_skip_unreadable_pages(mut self, skip: bool) -> Self {
        self.skip_unreadable_pages = skip;
        self
    }

    /// Reject input that is empty or above the size limit.
    pub fn check_input(&self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyDocument);
        }
        if let Some(limit) = self.max_document_bytes {
            if data.len() > limit {
                return Err(Error::DocumentTooLarge {
                    size: data.len(),
                    limit,
                });
            }
        }
        Ok(())
    }
}

/// A document parser that yields one string per page, in page order.
pub trait PageExtractor {
    /// The format this extractor reads.
    fn format(&self) -> DocumentFormat;

    fn config(&self) -> &ExtractorConfig;

    /// Text of every page, in page order.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>>;

    /// Check the input against the config, extract and wrap the pages.
    fn extract_document(&self, data: &[u8], filename: &str) -> Result<ExtractedDocument> {
        self.config().check_input(data)?;
        let pages = self.extract_pages(data)?;
        log::debug!("{}: extracted {} pages as {}", filename, pages.len(), self.format());
        Ok(ExtractedDocument::from_pages(filename, self.format(), pages))
    }
}
