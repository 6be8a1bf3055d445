use docproc_core::DocumentContent;
use serde::Serialize;

/// Synchronous response body for `/extract`.
///
/// Processing failures keep HTTP 200 and are modeled as data: callers
/// inspect `success`, not the status code.
#[derive(Serialize)]
pub struct ExtractionResponse {
    pub filename: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub content: Option<DocumentContent>,
}

impl ExtractionResponse {
    pub fn success(filename: String, content: DocumentContent) -> Self {
        Self {
            filename,
            success: true,
            error: None,
            content: Some(content),
        }
    }

    pub fn failure(filename: String, error: String) -> Self {
        Self {
            filename,
            success: false,
            error: Some(error),
            content: None,
        }
    }
}

/// Payload POSTed to a caller-supplied callback URL.
#[derive(Serialize)]
pub struct CallbackPayload<'a> {
    pub resource_id: &'a str,
    pub success: bool,
    pub extraction_method: &'static str,
    /// The markdown export.
    pub content: &'a str,
    pub structured_data: &'a DocumentContent,
    pub characters_extracted: usize,
}

/// Returned when callback delivery succeeded in place of the full
/// extraction result.
#[derive(Serialize)]
pub struct CallbackAck {
    pub success: bool,
    pub message: &'static str,
    pub resource_id: String,
}
