//! Per-block display state.
//!
//! Each displayed block owns a [`BlockView`] that flips between the block's
//! original text and its newline-collapsed variant. The collapsed variant is
//! computed on the first collapse and cached for the life of the view.

use crate::clipboard::{copy_or_warn, Clipboard, CopyOutcome};
use crate::types::TextBlock;
use serde::Serialize;
use std::cell::OnceCell;

/// Which variant of a block is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Original,
    /// Line breaks replaced by spaces.
    Collapsed,
}

impl DisplayMode {
    pub fn flipped(self) -> Self {
        match self {
            Self::Original => Self::Collapsed,
            Self::Collapsed => Self::Original,
        }
    }

    /// Lowercase name, the same string serde writes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Collapsed => "collapsed",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum text-area height in pixels.
const MIN_HEIGHT_PX: usize = 80;
/// Height of an empty text area before per-line growth.
const BASE_HEIGHT_PX: usize = 30;
/// Extra height per line break.
const LINE_HEIGHT_PX: usize = 20;

/// Display state of one block.
#[derive(Debug, Clone)]
pub struct BlockView {
    block: TextBlock,
    mode: DisplayMode,
    collapsed: OnceCell<String>,
}

impl BlockView {
    /// Start in [`DisplayMode::Original`].
    pub fn new(block: TextBlock) -> Self {
        Self {
            block,
            mode: DisplayMode::Original,
            collapsed: OnceCell::new(),
        }
    }

    pub fn block(&self) -> &TextBlock {
        &self.block
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_collapsed(&self) -> bool {
        self.mode == DisplayMode::Collapsed
    }

    /// The original block text, whatever the current mode.
    pub fn original(&self) -> &str {
        self.block.text()
    }

    /// The newline-collapsed variant, computed on first use.
    pub fn collapsed_text(&self) -> &str {
        self.collapsed.get_or_init(|| self.block.collapsed())
    }

    /// Text for the current mode.
    pub fn display_text(&self) -> &str {
        match self.mode {
            DisplayMode::Original => self.original(),
            DisplayMode::Collapsed => self.collapsed_text(),
        }
    }

    /// Switch to the collapsed variant.
    pub fn collapse(&mut self) -> &str {
        self.mode = DisplayMode::Collapsed;
        self.display_text()
    }

    /// Switch back to the original text.
    pub fn restore(&mut self) -> &str {
        self.mode = DisplayMode::Original;
        self.display_text()
    }

    /// Flip the mode and return the new display text.
    pub fn toggle(&mut self) -> &str {
        self.mode = self.mode.flipped();
        self.display_text()
    }

    /// Flip the mode, then copy the new display text.
    ///
    /// The mode change stands even when the copy fails.
    pub fn toggle_and_copy<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> CopyOutcome {
        self.mode = self.mode.flipped();
        log::debug!("block {} now {:?}", self.block.index(), self.mode);
        copy_or_warn(clipboard, self.display_text())
    }

    /// Copy the current display text without changing mode.
    pub fn copy<C: Clipboard + ?Sized>(&self, clipboard: &mut C) -> CopyOutcome {
        copy_or_warn(clipboard, self.display_text())
    }

    /// Suggested text-area height in pixels for the original text.
    pub fn display_height(&self) -> usize {
        MIN_HEIGHT_PX.max(BASE_HEIGHT_PX + LINE_HEIGHT_PX * self.block.newline_count())
    }
}
