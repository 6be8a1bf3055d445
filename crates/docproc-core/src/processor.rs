use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::structure::{self, DocumentStructure};
use crate::{DocumentConverter, ParsedDocument, convert_bytes};

/// Default maximum chunk size, in characters, for the page-aware path.
pub const PAGE_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    Text,
    Table,
}

/// A chunk with identity, produced by the page-aware chunker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentChunk {
    pub id: String,
    pub content: String,
    pub page_number: Option<usize>,
    pub chunk_index: usize,
    pub chunk_type: ChunkType,
}

/// Outcome of processing one document, success or failure. Never
/// persisted; exists for the duration of one request.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub document_id: String,
    pub status: ProcessingStatus,
    pub raw_text: String,
    pub structured_data: DocumentStructure,
    pub chunks: Vec<DocumentChunk>,
    /// Wall-clock processing duration in seconds.
    pub processing_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn joined_len(parts: &[&str]) -> usize {
    if parts.is_empty() {
        return 0;
    }
    parts.iter().map(|p| p.chars().count()).sum::<usize>() + parts.len() - 1
}

/// Chunk a document by walking its text items in order.
///
/// A running chunk is flushed when the current item sits on a different
/// page than the chunk, or when the space-joined running content has
/// grown past `max_size`. One additional `table` chunk per document
/// table is appended after all text chunks. Items with empty text are
/// skipped.
pub fn page_chunks(doc: &ParsedDocument, document_id: &str, max_size: usize) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_page: Option<usize> = None;
    let mut chunk_index = 0usize;

    for item in &doc.texts {
        let text = item.text.trim();
        if text.is_empty() {
            continue;
        }

        if !current.is_empty()
            && (item.page_no != current_page || joined_len(&current) > max_size)
        {
            chunks.push(DocumentChunk {
                id: format!("{document_id}_chunk_{chunk_index}"),
                content: current.join(" "),
                page_number: current_page,
                chunk_index,
                chunk_type: ChunkType::Text,
            });
            chunk_index += 1;
            current.clear();
        }

        if current.is_empty() {
            current_page = item.page_no;
        }
        current.push(text);
    }

    if !current.is_empty() {
        chunks.push(DocumentChunk {
            id: format!("{document_id}_chunk_{chunk_index}"),
            content: current.join(" "),
            page_number: current_page,
            chunk_index,
            chunk_type: ChunkType::Text,
        });
    }

    for (i, table) in doc.tables.iter().enumerate() {
        chunks.push(DocumentChunk {
            id: format!("{document_id}_table_{i}"),
            content: table.export_to_html(),
            page_number: table.page_no,
            chunk_index: i,
            chunk_type: ChunkType::Table,
        });
    }

    chunks
}

/// Per-document processing pipeline over a shared converter.
///
/// The converter is constructed once at startup and injected; the
/// processor itself holds no mutable state and is safe to share across
/// requests.
pub struct DocumentProcessor {
    converter: Arc<dyn DocumentConverter>,
}

impl DocumentProcessor {
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self { converter }
    }

    /// Process one document end to end: temp file, conversion, outline,
    /// page-aware chunks.
    ///
    /// Never propagates an error past this boundary: on failure the
    /// returned result is structurally valid but empty, carries the
    /// error message, and still records the elapsed time.
    pub fn process(&self, bytes: &[u8], document_id: &str, filename: &str) -> ProcessingResult {
        let start = Instant::now();
        tracing::info!(document_id, filename, "starting document processing");

        match convert_bytes(self.converter.as_ref(), bytes) {
            Ok(doc) => {
                let raw_text = doc.export_to_markdown().to_string();
                let structured_data = structure::extract_structure(&doc);
                let chunks = page_chunks(&doc, document_id, PAGE_CHUNK_SIZE);
                let processing_time = start.elapsed().as_secs_f64();
                tracing::info!(document_id, processing_time, "document processing completed");

                ProcessingResult {
                    document_id: document_id.to_string(),
                    status: ProcessingStatus::Completed,
                    raw_text,
                    structured_data,
                    chunks,
                    processing_time,
                    error_message: None,
                }
            }
            Err(err) => {
                let processing_time = start.elapsed().as_secs_f64();
                tracing::error!(document_id, error = %err, "document processing failed");

                ProcessingResult {
                    document_id: document_id.to_string(),
                    status: ProcessingStatus::Failed,
                    raw_text: String::new(),
                    structured_data: DocumentStructure::default(),
                    chunks: Vec::new(),
                    processing_time,
                    error_message: Some(err.to_string()),
                }
            }
        }
    }
}
