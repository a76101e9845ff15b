//! Domain types for representing extracted document content.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The format of the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Modern PowerPoint (Office Open XML).
    Pptx,
}

impl DocumentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        if bytes.starts_with(b"%PDF-") {
            return Some(Self::Pdf);
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        None
    }

    /// Detect format from magic bytes, falling back to the filename's extension.
    pub fn detect(bytes: &[u8], filename: &str) -> Option<Self> {
        Self::from_magic(bytes).or_else(|| {
            filename
                .rsplit_once('.')
                .and_then(|(_, ext)| Self::from_extension(ext))
        })
    }

    /// Like [`detect`](Self::detect), but an unrecognized input is an
    /// [`Error::UnsupportedFormat`] naming the file.
    pub fn require(bytes: &[u8], filename: &str) -> Result<Self> {
        Self::detect(bytes, filename).ok_or_else(|| Error::UnsupportedFormat(filename.to_string()))
    }

    /// Lowercase name used in output and file extensions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Pptx => "pptx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text of a single page (or slide) of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// 1-based page number.
    pub number: usize,

    /// Page text as produced by the extractor.
    pub text: String,
}

impl ExtractedPage {
    /// Create a new page.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// An entire document with its extracted pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Original filename (without path).
    pub filename: String,

    /// Detected format of the source file.
    pub format: DocumentFormat,

    /// Pages in document order.
    pub pages: Vec<ExtractedPage>,
}

impl ExtractedDocument {
    /// Create an empty document with the given filename and format.
    pub fn new(filename: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            filename: filename.into(),
            format,
            pages: Vec::new(),
        }
    }

    /// Build a document from per-page texts, numbering pages from 1.
    pub fn from_pages<I, S>(filename: impl Into<String>, format: DocumentFormat, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc = Self::new(filename, format);
        for text in pages {
            doc.add_page(text);
        }
        doc
    }

    /// Append a page, numbered after the last one.
    pub fn add_page(&mut self, text: impl Into<String>) {
        let number = self.pages.len() + 1;
        self.pages.push(ExtractedPage::new(number, text));
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Join all pages into the document's raw text.
    pub fn raw_text(&self) -> RawText {
        RawText::from_pages(self.pages.iter().map(|p| p.text.as_str()))
    }
}

/// The full text of a document: every page followed by a newline.
///
/// Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawText(String);

impl RawText {
    /// Wrap an arbitrary string.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Concatenate page texts, appending `\n` after each page.
    pub fn from_pages<'a, I>(pages: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut text = String::new();
        for page in pages {
            text.push_str(page);
            text.push('\n');
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into blocks on blank-line boundaries, in document order.
    pub fn blocks(&self) -> Vec<TextBlock> {
        crate::split::split_blocks(&self.0)
            .into_iter()
            .enumerate()
            .map(|(index, text)| TextBlock { index, text })
            .collect()
    }

    /// The whole text with every line break collapsed to a space.
    pub fn collapsed(&self) -> String {
        crate::normalize::collapse_newlines(&self.0)
    }
}

impl fmt::Display for RawText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trimmed, non-empty run of text delimited by blank lines.
///
/// Only [`RawText::blocks`] creates these, so the text is never empty and
/// never starts or ends with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    index: usize,
    text: String,
}

impl TextBlock {
    /// 0-based position in document order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of line feeds inside the block.
    pub fn newline_count(&self) -> usize {
        self.text.matches('\n').count()
    }

    /// The block with every line break collapsed to a space.
    pub fn collapsed(&self) -> String {
        crate::normalize::collapse_newlines(&self.text)
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
