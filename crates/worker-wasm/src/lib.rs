//! WASM bindings for splitting uploaded documents into copyable text blocks.
//!
//! The page hands over the uploaded bytes and gets back block data, or keeps a
//! [`BlockDocument`] around to drive per-block toggling. Block text must be
//! assigned with DOM text APIs (`value`, `textContent`), never as markup.

use blockcopy_core::{
    BlockSession, Clipboard, CopyOutcome, DocumentFormat, Error, ExtractedDocument,
    ExtractorConfig, PageExtractor,
};
use blockcopy_pdf::PdfExtractor;
use blockcopy_pptx::PptxExtractor;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of extracting a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Detected format of the source file.
    pub format: String,
    /// Number of pages (or slides) found in the source.
    pub page_count: usize,
    /// Full extracted text, pages joined by newlines.
    pub text: String,
    /// Blocks in document order.
    pub blocks: Vec<BlockData>,
}

/// One block as handed to the page.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockData {
    pub index: usize,
    /// Original block text.
    pub text: String,
    /// Text with line breaks collapsed to spaces.
    pub collapsed: String,
    /// Suggested text-area height in pixels.
    pub display_height: usize,
}

/// Extract a document and split it into blocks.
///
/// # Arguments
/// * `data` - The raw bytes of the PDF or PPTX file
/// * `filename` - The original filename (used for format detection)
///
/// # Returns
/// A JavaScript object with the extraction result, or throws a single
/// readable message on error.
#[wasm_bindgen]
pub fn extract_blocks(data: &[u8], filename: &str) -> Result<JsValue, JsValue> {
    let doc = extract_document_impl(data, filename).map_err(|e| JsValue::from_str(&e))?;
    let result = extraction_result(&BlockSession::from_document(&doc));

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Split already-extracted text into blocks.
#[wasm_bindgen]
pub fn split_blocks(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&blockcopy_core::split_blocks(text))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Replace every line break with a single space.
#[wasm_bindgen]
pub fn collapse_newlines(text: &str) -> String {
    blockcopy_core::collapse_newlines(text)
}

fn extract_document_impl(data: &[u8], filename: &str) -> Result<ExtractedDocument, String> {
    let config = ExtractorConfig::new();

    let doc = DocumentFormat::require(data, filename).and_then(|format| match format {
        DocumentFormat::Pdf => PdfExtractor::with_config(config).extract_document(data, filename),
        DocumentFormat::Pptx => PptxExtractor::with_config(config).extract_document(data, filename),
    });

    doc.map_err(|e| format!("An error occurred: {}", e))
}

fn extraction_result(session: &BlockSession) -> ExtractionResult {
    ExtractionResult {
        format: session
            .format()
            .map(|f| f.as_str().to_string())
            .unwrap_or_default(),
        page_count: session.page_count(),
        text: session.raw_text().as_str().to_string(),
        blocks: session
            .views()
            .iter()
            .map(|view| BlockData {
                index: view.block().index(),
                text: view.original().to_string(),
                collapsed: view.collapsed_text().to_string(),
                display_height: view.display_height(),
            })
            .collect(),
    }
}

/// Most recent copy failure, shared with pending clipboard promises.
type CopyErrorSlot = Rc<RefCell<Option<String>>>;

/// Clipboard backed by a page-supplied callback, e.g.
/// `text => navigator.clipboard.writeText(text)`.
///
/// A throw fails the copy at once. When the callback returns a promise, a
/// later rejection is written to `failures`.
struct CallbackClipboard<'a> {
    callback: &'a js_sys::Function,
    failures: CopyErrorSlot,
}

impl Clipboard for CallbackClipboard<'_> {
    fn write_text(&mut self, text: &str) -> blockcopy_core::Result<()> {
        let returned = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_str(text))
            .map_err(|e| Error::Clipboard(describe_js_error(&e)))?;

        if let Some(promise) = returned.dyn_ref::<js_sys::Promise>() {
            watch_rejection(promise, Rc::clone(&self.failures));
        }
        Ok(())
    }
}

/// Attach a rejection handler so a failed asynchronous write is not lost.
fn watch_rejection(promise: &js_sys::Promise, failures: CopyErrorSlot) {
    let on_reject = Closure::once(move |reason: JsValue| {
        record_rejection(&failures, describe_js_error(&reason));
    });
    // The handler runs at most once, after this call has returned.
    let _ = promise.catch(&on_reject);
    on_reject.forget();
}

fn record_rejection(failures: &CopyErrorSlot, reason: String) {
    log::warn!("copy failed: {}", reason);
    *failures.borrow_mut() = Some(reason);
}

fn describe_js_error(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => "clipboard callback failed".to_string(),
    }
}

/// Blocks of one uploaded document with per-block toggle state.
///
/// Create a new one for every upload; state is not carried over.
#[wasm_bindgen]
pub struct BlockDocument {
    session: BlockSession,
    last_copy_error: CopyErrorSlot,
}

#[wasm_bindgen]
impl BlockDocument {
    /// Extract and split an uploaded document.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8], filename: &str) -> Result<BlockDocument, JsValue> {
        let doc = extract_document_impl(data, filename).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self::from_session(BlockSession::from_document(&doc)))
    }

    /// Split text that was extracted elsewhere.
    #[wasm_bindgen(js_name = fromText)]
    pub fn from_text(text: &str) -> BlockDocument {
        Self::from_session(BlockSession::from_raw(blockcopy_core::RawText::new(text)))
    }

    fn from_session(session: BlockSession) -> Self {
        Self {
            session,
            last_copy_error: Rc::new(RefCell::new(None)),
        }
    }

    /// Number of blocks.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.session.len()
    }

    #[wasm_bindgen(js_name = displayText)]
    pub fn display_text(&self, index: usize) -> Option<String> {
        self.session.view(index).map(|v| v.display_text().to_string())
    }

    #[wasm_bindgen(js_name = isCollapsed)]
    pub fn is_collapsed(&self, index: usize) -> Option<bool> {
        self.session.view(index).map(|v| v.is_collapsed())
    }

    #[wasm_bindgen(js_name = displayHeight)]
    pub fn display_height(&self, index: usize) -> Option<usize> {
        self.session.view(index).map(|v| v.display_height())
    }

    /// Flip a block between original and collapsed text and return the new
    /// text. When `copy` is given it is called with the new text; a throw or
    /// a rejected promise is kept in `lastCopyError` and does not undo the flip.
    pub fn toggle(&mut self, index: usize, copy: Option<js_sys::Function>) -> Option<String> {
        let failures = Rc::clone(&self.last_copy_error);
        let view = self.session.view_mut(index)?;
        let outcome = match copy.as_ref() {
            Some(callback) => Some(view.toggle_and_copy(&mut CallbackClipboard { callback, failures })),
            None => {
                view.toggle();
                None
            }
        };
        let text = view.display_text().to_string();
        self.record(outcome);
        Some(text)
    }

    /// Copy a block's current text through `copy`. Returns `false` when the
    /// callback throws; a promise that rejects later shows up in
    /// `lastCopyError` instead.
    pub fn copy(&mut self, index: usize, copy: js_sys::Function) -> bool {
        let Some(view) = self.session.view(index) else {
            return false;
        };
        let outcome = view.copy(&mut CallbackClipboard {
            callback: &copy,
            failures: Rc::clone(&self.last_copy_error),
        });
        let copied = outcome.is_copied();
        self.record(Some(outcome));
        copied
    }

    /// The whole document text with line breaks collapsed.
    #[wasm_bindgen(js_name = collapsedAll)]
    pub fn collapsed_all(&self) -> String {
        self.session.collapsed_all()
    }

    /// Reason the most recent copy failed, if it did.
    #[wasm_bindgen(getter, js_name = lastCopyError)]
    pub fn last_copy_error(&self) -> Option<String> {
        self.last_copy_error.borrow().clone()
    }

    fn record(&mut self, outcome: Option<CopyOutcome>) {
        *self.last_copy_error.borrow_mut() = match outcome {
            Some(CopyOutcome::Failed(reason)) => Some(reason),
            _ => None,
        };
    }
}
