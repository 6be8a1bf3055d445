use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use docproc_core::{DocumentContent, convert_bytes, extract_content};

use crate::models::{CallbackAck, CallbackPayload, ExtractionResponse};
use crate::state::AppState;
use crate::{auth, callback, upload};

#[derive(Deserialize, Default)]
pub struct ExtractParams {
    pub callback_url: Option<String>,
    pub resource_id: Option<String>,
}

/// `POST /extract`: multipart PDF upload → extraction result.
///
/// Only auth and validation failures use HTTP error status codes;
/// every processing failure is reported as `success: false` in a 200
/// body.
pub async fn extract(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtractParams>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if !auth::verify_api_key(&headers, &state.api_key) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Invalid API key" })),
        )
            .into_response();
    }

    let form = match upload::parse_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e })),
            )
                .into_response();
        }
    };

    // Reject before any temp file is created or conversion attempted.
    if !form.file.filename.to_lowercase().ends_with(".pdf") {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Only PDF files are supported" })),
        )
            .into_response();
    }

    let filename = form.file.filename.clone();
    tracing::info!(filename = %filename, "processing document");

    // Conversion is CPU-bound; keep it off the request-handling threads.
    let converter = state.converter.clone();
    let data = form.file.data;
    let converted =
        tokio::task::spawn_blocking(move || convert_bytes(converter.as_ref(), &data)).await;

    let doc = match converted {
        Ok(Ok(doc)) => doc,
        Ok(Err(err)) => {
            tracing::error!(filename = %filename, error = %err, "error processing document");
            return Json(ExtractionResponse::failure(filename, err.to_string())).into_response();
        }
        Err(err) => {
            tracing::error!(filename = %filename, error = %err, "conversion task panicked");
            return Json(ExtractionResponse::failure(filename, err.to_string())).into_response();
        }
    };

    let content = extract_content(&doc);
    tracing::info!(filename = %filename, "successfully processed document");

    // Query parameters win over form fields when both are present.
    let callback_url = params
        .callback_url
        .or(form.callback_url)
        .filter(|s| !s.is_empty());
    let resource_id = params
        .resource_id
        .or(form.resource_id)
        .filter(|s| !s.is_empty());

    if let (Some(url), Some(resource_id)) = (callback_url, resource_id) {
        match send_callback(&state, &url, &resource_id, &content).await {
            Ok(status) => {
                tracing::info!(status = %status, "callback sent successfully");
                return Json(CallbackAck {
                    success: true,
                    message: "Results sent to callback URL",
                    resource_id,
                })
                .into_response();
            }
            Err(err) => {
                // Still return the extraction result even if callback fails.
                tracing::error!(url = %url, error = %err, "failed to send callback");
            }
        }
    }

    Json(ExtractionResponse::success(filename, content)).into_response()
}

async fn send_callback(
    state: &AppState,
    url: &str,
    resource_id: &str,
    content: &DocumentContent,
) -> Result<reqwest::StatusCode, reqwest::Error> {
    tracing::info!(url = %url, resource_id = %resource_id, "sending results to callback URL");
    let payload = CallbackPayload {
        resource_id,
        success: true,
        extraction_method: "docling",
        content: &content.markdown,
        structured_data: content,
        characters_extracted: content.markdown.chars().count(),
    };
    callback::deliver(&state.http, url, &payload).await
}
