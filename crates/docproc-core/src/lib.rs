use std::io::Write;
use std::path::Path;

use thiserror::Error;

pub mod chunking;
pub mod content;
pub mod processor;
pub mod structure;

// Re-export for convenience
pub use chunking::{Chunk, ChunkKind, DEFAULT_CHUNK_SIZE, create_llm_chunks};
pub use content::{ContentMetadata, DocumentContent, extract_content, page_count};
pub use processor::{
    ChunkType, DocumentChunk, DocumentProcessor, PAGE_CHUNK_SIZE, ProcessingResult,
    ProcessingStatus,
};
pub use structure::{DocumentStructure, SectionEntry, TableEntry, extract_structure, heading_level};

/// A structured document produced by a [`DocumentConverter`].
///
/// Converters that cannot report a given collection leave it empty
/// (`pages` is `None` when the backend has no page inventory at all).
/// One instance is created per request, consumed by the extraction
/// transform, and dropped at the end of the request.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub title: Option<String>,
    pub texts: Vec<TextItem>,
    pub tables: Vec<Table>,
    pub pictures: Vec<Picture>,
    pub pages: Option<Vec<Page>>,
    markdown: String,
}

impl ParsedDocument {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Self::default()
        }
    }

    /// Full markdown rendering of the document.
    pub fn export_to_markdown(&self) -> &str {
        &self.markdown
    }
}

/// A single labeled text element, in document order.
#[derive(Debug, Clone)]
pub struct TextItem {
    pub text: String,
    /// Free-form element label from the converter, e.g. "title",
    /// "section_header", "paragraph".
    pub label: String,
    /// 1-based page number, when the converter tracks one.
    pub page_no: Option<usize>,
}

impl TextItem {
    pub fn new(text: impl Into<String>, label: impl Into<String>, page_no: Option<usize>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            page_no,
        }
    }
}

/// A detected table with whatever renderings the converter produced.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub markdown: Option<String>,
    pub html: Option<String>,
    pub page_no: Option<usize>,
    pub caption: Option<String>,
}

impl Table {
    /// Markdown rendering, falling back to the HTML export or a
    /// placeholder when the converter produced neither.
    pub fn export_to_markdown(&self) -> String {
        self.markdown
            .clone()
            .or_else(|| self.html.clone())
            .unwrap_or_else(|| "<table>".to_string())
    }

    /// HTML rendering with the symmetric fallback.
    pub fn export_to_html(&self) -> String {
        self.html
            .clone()
            .or_else(|| self.markdown.clone())
            .unwrap_or_else(|| "<table>".to_string())
    }
}

/// An embedded image. Only its presence matters to the transform.
#[derive(Debug, Clone)]
pub struct Picture {
    pub page_no: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub page_no: usize,
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("failed to extract document content: {0}")]
    Extraction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document conversion backends.
///
/// Implementors provide the PDF-to-structured-document step; the
/// extraction transform (outline, chunking, metadata) lives in this
/// crate and is backend-agnostic. A converter is constructed once at
/// startup and shared read-only across requests; `convert` must not
/// keep per-request state.
pub trait DocumentConverter: Send + Sync {
    /// Parse the document at `path` into a [`ParsedDocument`].
    fn convert(&self, path: &Path) -> Result<ParsedDocument, ConvertError>;
}

/// Write uploaded bytes to an exclusively-owned temp file and run the
/// converter on it.
///
/// The temp file carries a `.pdf` suffix and is removed when this
/// function returns, on every path: success, converter error, or IO
/// error while writing.
pub fn convert_bytes(
    converter: &dyn DocumentConverter,
    bytes: &[u8],
) -> Result<ParsedDocument, ProcessError> {
    let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    converter.convert(tmp.path()).map_err(ProcessError::from)
}
