use serde::Serialize;

use crate::ParsedDocument;

/// Flat structural outline of a document: headings plus tables, in
/// document order. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DocumentStructure {
    pub title: Option<String>,
    pub sections: Vec<SectionEntry>,
    pub tables: Vec<TableEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SectionEntry {
    pub level: u8,
    pub text: String,
    /// The converter's original element label.
    #[serde(rename = "type")]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableEntry {
    pub index: usize,
    pub content: String,
    pub description: String,
}

/// Heading level for a free-form element label.
///
/// Checked in fixed precedence order; "title" wins over any "hN"
/// substring also present, and unrecognized labels default to 2.
pub fn heading_level(label: &str) -> u8 {
    let label = label.to_lowercase();
    if label.contains("title") {
        1
    } else if label.contains("h1") {
        1
    } else if label.contains("h2") {
        2
    } else if label.contains("h3") {
        3
    } else if label.contains("h4") {
        4
    } else {
        2
    }
}

/// Build the structural outline for a document.
///
/// A text item is a heading candidate when its label contains "title"
/// or "heading" (case-insensitively). Entries preserve document order.
/// With the typed document model this extractor is total; callers still
/// treat the outline as best-effort and never fail a request over it.
pub fn extract_structure(doc: &ParsedDocument) -> DocumentStructure {
    let mut sections = Vec::new();
    for item in &doc.texts {
        let label = item.label.to_lowercase();
        if label.contains("title") || label.contains("heading") {
            sections.push(SectionEntry {
                level: heading_level(&item.label),
                text: item.text.trim().to_string(),
                label: item.label.clone(),
            });
        }
    }

    let tables = doc
        .tables
        .iter()
        .enumerate()
        .map(|(i, table)| TableEntry {
            index: i,
            content: table.export_to_markdown(),
            description: format!("Table {} from document", i + 1),
        })
        .collect();

    DocumentStructure {
        title: doc.title.clone(),
        sections,
        tables,
    }
}
