//! Core domain types, blank-line block splitting and newline collapsing
//! for text extracted from documents.

pub mod clipboard;
pub mod error;
pub mod extract;
pub mod format;
pub mod html;
pub mod normalize;
pub mod session;
pub mod split;
pub mod types;
pub mod view;

pub use clipboard::{Clipboard, CopyOutcome, MemoryClipboard};
pub use error::{Error, Result};
pub use extract::{ExtractorConfig, PageExtractor};
pub use format::{BlockFormatter, OutputFormat};
pub use html::escape_html;
pub use normalize::collapse_newlines;
pub use session::BlockSession;
pub use split::split_blocks;
pub use types::{DocumentFormat, ExtractedDocument, ExtractedPage, RawText, TextBlock};
pub use view::{BlockView, DisplayMode};
