use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
const RECEIPT_URL_TTL_SECS: u64 = 7 * 24 * 3600;

#[derive(Debug, Serialize)]
pub struct UploadReceiptResponse {
    pub success: bool,
    pub key: String,
    pub url: String,
    pub message: String,
}

#[instrument(skip(state, multipart))]
pub async fn upload_receipt(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReceiptResponse>), ApiError> {
    let mut file: Option<(String, String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Malformed multipart body".into()))?
    {
        if field.name() == Some("receipt") {
            let filename = field.file_name().unwrap_or("receipt").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::Validation("Failed to read receipt file".into()))?;
            file = Some((filename, content_type, data));
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| ApiError::Validation("No receipt file provided".into()))?;
    validate_receipt(&content_type, data.len())?;

    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let key = format!(
        "{}/receipts/{}-{}",
        user_id,
        millis,
        sanitize_filename(&filename)
    );

    state
        .storage
        .put_object(&key, data, &content_type)
        .await
        .map_err(ApiError::Internal)?;
    let url = state
        .storage
        .presign_get(&key, RECEIPT_URL_TTL_SECS)
        .await
        .map_err(ApiError::Internal)?;

    info!(user_id = %user_id, key = %key, "receipt uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadReceiptResponse {
            success: true,
            key,
            url,
            message: "Receipt uploaded successfully".into(),
        }),
    ))
}

fn validate_receipt(content_type: &str, size: usize) -> Result<(), ApiError> {
    if !content_type.starts_with("image/") {
        return Err(ApiError::Validation("Only image files are allowed".into()));
    }
    if size > MAX_FILE_SIZE {
        return Err(ApiError::Validation(
            "File size must be less than 5MB".into(),
        ));
    }
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_within_the_size_cap() {
        assert!(validate_receipt("image/png", 1024).is_ok());
        assert!(validate_receipt("image/jpeg", MAX_FILE_SIZE).is_ok());
    }

    #[test]
    fn rejects_non_image_content_types() {
        assert!(validate_receipt("application/pdf", 1024).is_err());
        assert!(validate_receipt("text/plain", 10).is_err());
    }

    #[test]
    fn rejects_oversized_files() {
        assert!(validate_receipt("image/png", MAX_FILE_SIZE + 1).is_err());
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("receipt (1).png"), "receipt__1_.png");
        assert_eq!(sanitize_filename("квитанция.jpg"), "_________.jpg");
        assert_eq!(sanitize_filename("ok-file.JPG"), "ok-file.JPG");
    }
}
