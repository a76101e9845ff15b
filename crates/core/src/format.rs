//! Rendering a block session as text, JSON or an HTML fragment.

use crate::html::escape_html;
use crate::session::BlockSession;
use crate::view::{BlockView, DisplayMode};
use crate::Result;
use serde::Serialize;
use std::fmt::Write as _;

/// Output flavour produced by [`BlockFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Blocks separated by a blank line.
    #[default]
    Text,
    Json,
    /// A fragment with one `<textarea>` per block.
    Html,
}

impl OutputFormat {
    /// File extension for written output.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

/// Formatter for a session's blocks in their current display mode.
#[derive(Debug, Clone, Default)]
pub struct BlockFormatter {
    format: OutputFormat,
    /// Prefix each block with `--- block i/n ---` in text output.
    headers: bool,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    filename: Option<&'a str>,
    format: Option<&'static str>,
    page_count: usize,
    block_count: usize,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
struct JsonBlock<'a> {
    index: usize,
    mode: DisplayMode,
    text: &'a str,
    original: &'a str,
    collapsed: &'a str,
}

impl BlockFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    /// Render every block of the session.
    pub fn format(&self, session: &BlockSession) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.format_text(session)),
            OutputFormat::Json => self.format_json(session),
            OutputFormat::Html => Ok(self.format_html(session)),
        }
    }

    /// Blocks joined by blank lines, with a trailing newline.
    ///
    /// # Example output
    /// ```text
    /// --- block 1/2 ---
    /// Intro line.
    ///
    /// --- block 2/2 ---
    /// Paragraph one, line one. Paragraph one, line two.
    /// ```
    fn format_text(&self, session: &BlockSession) -> String {
        if session.is_empty() {
            return String::new();
        }

        let total = session.len();
        let blocks: Vec<String> = session
            .views()
            .iter()
            .map(|view| {
                if self.headers {
                    format!(
                        "--- block {}/{} ---\n{}",
                        view.block().index() + 1,
                        total,
                        view.display_text()
                    )
                } else {
                    view.display_text().to_string()
                }
            })
            .collect();

        format!("{}\n", blocks.join("\n\n"))
    }

    fn format_json(&self, session: &BlockSession) -> Result<String> {
        let doc = JsonDocument {
            filename: session.filename(),
            format: session.format().map(|f| f.as_str()),
            page_count: session.page_count(),
            block_count: session.len(),
            blocks: session.views().iter().map(json_block).collect(),
        };
        let mut out = serde_json::to_string_pretty(&doc)?;
        out.push('\n');
        Ok(out)
    }

    fn format_html(&self, session: &BlockSession) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<section class=\"text-blocks\" data-count=\"{}\">",
            session.len()
        );
        for view in session.views() {
            let index = view.block().index();
            let _ = writeln!(
                out,
                "  <div class=\"text-block\">\n    <textarea id=\"text_block_{}\" data-mode=\"{}\" data-collapsed=\"{}\" style=\"height: {}px;\">{}</textarea>\n  </div>",
                index,
                view.mode().as_str(),
                escape_html(view.collapsed_text()),
                view.display_height(),
                escape_html(view.display_text()),
            );
        }
        out.push_str("</section>\n");
        out
    }
}

fn json_block(view: &BlockView) -> JsonBlock<'_> {
    JsonBlock {
        index: view.block().index(),
        mode: view.mode(),
        text: view.display_text(),
        original: view.original(),
        collapsed: view.collapsed_text(),
    }
}
