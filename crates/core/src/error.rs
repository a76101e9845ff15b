//! Error types for document text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or copying document text.
///
/// Splitting and newline collapsing never fail; every variant here comes from
/// a document parser, a limit check or a clipboard.
#[derive(Error, Debug)]
pub enum Error {
    /// The file format is not supported or could not be detected.
    /// Holds the filename.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// The input contained no bytes at all.
    #[error("Document is empty")]
    EmptyDocument,

    /// The input is larger than the configured limit.
    #[error("Document is {size} bytes, larger than the {limit} byte limit")]
    DocumentTooLarge { size: usize, limit: usize },

    /// Failed to parse the PDF file structure.
    #[error("PDF parsing error: {0}")]
    PdfParseError(String),

    /// The PDF is encrypted and its text could not be read.
    #[error("Document is encrypted and its text cannot be extracted")]
    EncryptedDocument,

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Failed to extract text from a page.
    #[error("Text extraction error: {0}")]
    ExtractionError(String),

    /// Failed to serialize blocks as JSON.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Writing to a clipboard failed.
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}
