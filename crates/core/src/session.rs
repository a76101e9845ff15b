//! All block views for one loaded document.

use crate::types::{DocumentFormat, ExtractedDocument, RawText};
use crate::view::BlockView;

/// Blocks of a single document, each with its own display state.
///
/// Built once when a document is loaded and dropped when another one replaces
/// it; nothing is shared between sessions.
#[derive(Debug, Clone)]
pub struct BlockSession {
    filename: Option<String>,
    format: Option<DocumentFormat>,
    page_count: usize,
    raw: RawText,
    views: Vec<BlockView>,
}

impl BlockSession {
    /// Split an extracted document into blocks.
    pub fn from_document(doc: &ExtractedDocument) -> Self {
        let mut session = Self::from_raw(doc.raw_text());
        session.filename = Some(doc.filename.clone());
        session.format = Some(doc.format);
        session.page_count = doc.page_count();
        log::debug!(
            "{}: {} pages, {} blocks",
            doc.filename,
            session.page_count,
            session.views.len()
        );
        session
    }

    /// Split text that did not come from a document parser.
    pub fn from_raw(raw: RawText) -> Self {
        let views = raw.blocks().into_iter().map(BlockView::new).collect();
        Self {
            filename: None,
            format: None,
            page_count: 0,
            raw,
            views,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        self.format
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn raw_text(&self) -> &RawText {
        &self.raw
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn views(&self) -> &[BlockView] {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut [BlockView] {
        &mut self.views
    }

    pub fn view(&self, index: usize) -> Option<&BlockView> {
        self.views.get(index)
    }

    pub fn view_mut(&mut self, index: usize) -> Option<&mut BlockView> {
        self.views.get_mut(index)
    }

    /// Toggle one block and return its new display text.
    pub fn toggle(&mut self, index: usize) -> Option<&str> {
        self.views.get_mut(index).map(|v| v.toggle())
    }

    /// Current display text of every block, in order.
    pub fn display_texts(&self) -> Vec<&str> {
        self.views.iter().map(BlockView::display_text).collect()
    }

    /// The whole raw text with line breaks collapsed.
    pub fn collapsed_all(&self) -> String {
        self.raw.collapsed()
    }
}
