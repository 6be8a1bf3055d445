use axum::extract::Multipart;

/// An uploaded file with its original filename.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload. `callback_url` and
/// `resource_id` may arrive here or as query parameters; the handler
/// merges both sources.
pub struct ExtractForm {
    pub file: UploadedFile,
    pub callback_url: Option<String>,
    pub resource_id: Option<String>,
}

/// Parse a multipart form upload into structured form fields.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<ExtractForm, String> {
    let mut file: Option<UploadedFile> = None;
    let mut callback_url: Option<String> = None;
    let mut resource_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                file = Some(UploadedFile { filename, data });
            }
            "callback_url" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read callback_url: {}", e))?;
                if !val.is_empty() {
                    callback_url = Some(val);
                }
            }
            "resource_id" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read resource_id: {}", e))?;
                if !val.is_empty() {
                    resource_id = Some(val);
                }
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or("No file uploaded")?;

    Ok(ExtractForm {
        file,
        callback_url,
        resource_id,
    })
}
