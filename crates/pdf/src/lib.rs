//! PDF extractor backend.
//!
//! Reads a PDF with `lopdf` and yields the text of each page in page order.

pub mod extractor;

pub use extractor::PdfExtractor;
