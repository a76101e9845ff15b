//! Clipboard seam used when a block is copied or toggled.

use crate::Result;

/// A destination for copied text.
///
/// Implementations report failures as [`crate::Error::Clipboard`]; callers in
/// this crate log them and carry on.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard that keeps every written text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    history: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently written text.
    pub fn contents(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Every written text, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_string());
        Ok(())
    }
}

/// Result of a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard rejected the write; holds the reason.
    Failed(String),
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied)
    }
}

/// Write `text`, logging instead of propagating a failure.
pub(crate) fn copy_or_warn<C: Clipboard + ?Sized>(clipboard: &mut C, text: &str) -> CopyOutcome {
    match clipboard.write_text(text) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => {
            log::warn!("copy failed: {}", e);
            CopyOutcome::Failed(e.to_string())
        }
    }
}
