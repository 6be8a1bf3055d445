use serde::Serialize;

use crate::chunking::{self, Chunk};
use crate::structure::{self, DocumentStructure};
use crate::ParsedDocument;

/// The content block of a successful extraction: everything a
/// downstream LLM pipeline needs from one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentContent {
    pub markdown: String,
    pub structure: DocumentStructure,
    pub text_chunks: Vec<Chunk>,
    pub metadata: ContentMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentMetadata {
    pub page_count: usize,
    pub has_tables: bool,
    pub has_images: bool,
    pub processing_method: &'static str,
}

/// Page count for a document. Defaults to 1 when the converter
/// reported no page inventory; never 0.
pub fn page_count(doc: &ParsedDocument) -> usize {
    match &doc.pages {
        Some(pages) if !pages.is_empty() => pages.len(),
        _ => 1,
    }
}

/// Run the full extraction transform on a parsed document.
///
/// Every substructure degrades independently (empty outline, error
/// chunk) rather than failing; this function itself cannot fail.
pub fn extract_content(doc: &ParsedDocument) -> DocumentContent {
    let markdown = doc.export_to_markdown().to_string();
    DocumentContent {
        structure: structure::extract_structure(doc),
        text_chunks: chunking::create_llm_chunks(&markdown, chunking::DEFAULT_CHUNK_SIZE),
        metadata: ContentMetadata {
            page_count: page_count(doc),
            has_tables: !doc.tables.is_empty(),
            has_images: !doc.pictures.is_empty(),
            processing_method: "docling",
        },
        markdown,
    }
}
