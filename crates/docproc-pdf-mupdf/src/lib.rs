use std::path::Path;

use mupdf::{Document, TextPageFlags};

use docproc_core::{ConvertError, DocumentConverter, Page, ParsedDocument, TextItem};

/// MuPDF-based implementation of [`DocumentConverter`].
///
/// This crate is the sole AGPL island — it isolates the mupdf
/// dependency so the transform and web crates do not transitively
/// depend on it.
///
/// Extraction is deliberately shallow: each text block becomes one
/// labeled text item, the first block of the first page is treated as
/// the document title, and tables/pictures are not detected. Rich
/// document understanding belongs to heavier converter backends behind
/// the same trait.
#[derive(Debug, Default)]
pub struct MupdfConverter;

impl MupdfConverter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for MupdfConverter {
    fn convert(&self, path: &Path) -> Result<ParsedDocument, ConvertError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ConvertError::Open("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| ConvertError::Open(e.to_string()))?;

        let mut texts: Vec<TextItem> = Vec::new();
        let mut pages = Vec::new();
        let mut title: Option<String> = None;

        for (page_index, page_result) in document
            .pages()
            .map_err(|e| ConvertError::Extraction(e.to_string()))?
            .enumerate()
        {
            let page = page_result.map_err(|e| ConvertError::Extraction(e.to_string()))?;
            let page_no = page_index + 1;
            pages.push(Page { page_no });

            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| ConvertError::Extraction(e.to_string()))?;

            for block in text_page.blocks() {
                let mut block_text = String::new();
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    if !block_text.is_empty() {
                        block_text.push('\n');
                    }
                    block_text.push_str(line_text.trim_end());
                }

                let block_text = block_text.trim().to_string();
                if block_text.is_empty() {
                    continue;
                }

                // First block of the first page doubles as the title.
                let label = if title.is_none() && page_no == 1 {
                    title = Some(block_text.clone());
                    "title"
                } else {
                    "text"
                };

                texts.push(TextItem::new(block_text, label, Some(page_no)));
            }
        }

        let markdown = render_markdown(&texts);
        let mut doc = ParsedDocument::new(markdown);
        doc.title = title;
        doc.texts = texts;
        doc.pages = Some(pages);
        Ok(doc)
    }
}

/// Markdown export: the title as an H1 heading, then block texts joined
/// with blank lines.
fn render_markdown(texts: &[TextItem]) -> String {
    texts
        .iter()
        .map(|item| {
            if item.label == "title" {
                format!("# {}", item.text)
            } else {
                item.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
