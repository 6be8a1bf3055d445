use axum::http::{HeaderMap, header};

/// Check the `Authorization: Bearer <token>` header against the
/// configured API key. Plain equality; no rotation, scoping, or expiry.
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}
