use serde::Serialize;
use thiserror::Error;

/// Default maximum chunk size, in characters, for the markdown path.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// A bounded-size slice of extracted text, ready for LLM consumption.
/// Chunks have no identity beyond their position in the output sequence.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Character count, excluding the joining separators.
    pub size: usize,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    ParagraphGroup,
    WordSplit,
    Error,
}

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("max chunk size must be non-zero")]
    ZeroMaxSize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split markdown into chunks along paragraph boundaries.
///
/// Paragraphs (separated by blank lines) are trimmed and greedily
/// accumulated; a running chunk is flushed before a paragraph that
/// would push it past `max_size`. A single paragraph longer than
/// `max_size` still becomes its own oversized chunk. Joining all chunk
/// texts back with blank lines reproduces the non-empty paragraphs in
/// order.
pub fn paragraph_chunks(markdown: &str, max_size: usize) -> Result<Vec<Chunk>, ChunkError> {
    if max_size == 0 {
        return Err(ChunkError::ZeroMaxSize);
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize;

    for paragraph in markdown.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        let len = char_len(paragraph);
        if current_size + len > max_size && !current.is_empty() {
            chunks.push(Chunk {
                text: current.join("\n\n"),
                size: current_size,
                kind: ChunkKind::ParagraphGroup,
            });
            current.clear();
            current_size = 0;
        }

        current.push(paragraph);
        current_size += len;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            text: current.join("\n\n"),
            size: current_size,
            kind: ChunkKind::ParagraphGroup,
        });
    }

    Ok(chunks)
}

/// Fallback splitter that ignores paragraph structure entirely:
/// whitespace-split words are accumulated and flushed whenever the
/// space-joined text exceeds `max_size`, restarting from the word that
/// crossed the boundary.
pub fn word_chunks(markdown: &str, max_size: usize) -> Result<Vec<Chunk>, ChunkError> {
    if max_size == 0 {
        return Err(ChunkError::ZeroMaxSize);
    }

    let mut chunks = Vec::new();
    let mut words: Vec<&str> = Vec::new();

    for word in markdown.split_whitespace() {
        words.push(word);
        let joined_len = words.iter().map(|w| char_len(w)).sum::<usize>() + words.len() - 1;
        if joined_len > max_size {
            let text = words[..words.len() - 1].join(" ");
            let size = char_len(&text);
            chunks.push(Chunk {
                text,
                size,
                kind: ChunkKind::WordSplit,
            });
            let carried = words[words.len() - 1];
            words.clear();
            words.push(carried);
        }
    }

    if !words.is_empty() {
        let text = words.join(" ");
        let size = char_len(&text);
        chunks.push(Chunk {
            text,
            size,
            kind: ChunkKind::WordSplit,
        });
    }

    Ok(chunks)
}

/// Chunk a markdown export, degrading instead of failing: paragraph
/// splitting first, word splitting if that errors, and a single error
/// chunk as the last resort. Never returns an error to the caller.
pub fn create_llm_chunks(markdown: &str, max_size: usize) -> Vec<Chunk> {
    match paragraph_chunks(markdown, max_size) {
        Ok(chunks) => chunks,
        Err(err) => {
            tracing::warn!(error = %err, "paragraph chunking failed, falling back to word splitting");
            match word_chunks(markdown, max_size) {
                Ok(chunks) => chunks,
                Err(err) => {
                    tracing::warn!(error = %err, "word chunking failed");
                    vec![Chunk {
                        text: "Error creating chunks".to_string(),
                        size: 0,
                        kind: ChunkKind::Error,
                    }]
                }
            }
        }
    }
}
