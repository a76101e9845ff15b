//! PPTX (Office Open XML) extractor backend.
//!
//! Reads .pptx files, which are ZIP archives of XML parts, and yields one
//! page of text per slide.

pub mod extractor;

pub use extractor::PptxExtractor;
