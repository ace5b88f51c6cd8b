use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use tracing::{error, info};
use uuid::Uuid;

use postcraft_types::api::{Claims, UploadImageResponse};

use crate::auth::AppState;
use crate::error::{ApiError, Result, UploadError};

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// POST /uploadImage: stores the `image` field as-is under the upload
/// directory and returns its public path. No format checks beyond presence.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadImageResponse>> {
    // A body that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|_| UploadError::NoFileProvided)?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let extension = field.file_name().and_then(file_extension);
        let bytes = field.bytes().await.map_err(UploadError::from)?;
        if !bytes.is_empty() {
            upload = Some((extension, bytes));
        }
        break;
    }

    let (extension, bytes) = upload.ok_or(UploadError::NoFileProvided)?;

    let file_name = match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    };

    // Ensure uploads directory exists
    tokio::fs::create_dir_all(&state.upload_dir).await.map_err(|e| {
        error!("Failed to create upload directory {}: {}", state.upload_dir.display(), e);
        ApiError::Internal(e.into())
    })?;

    let file_path = state.upload_dir.join(&file_name);
    tokio::fs::write(&file_path, &bytes).await.map_err(|e| {
        error!("Failed to write file {}: {}", file_path.display(), e);
        ApiError::Internal(e.into())
    })?;

    info!(
        "Image {} uploaded by {} ({}): {} bytes",
        file_name,
        claims.username,
        claims.sub,
        bytes.len()
    );

    Ok(Json(UploadImageResponse {
        image_url: format!("/uploads/{}", file_name),
    }))
}

/// Lower-cased extension of the client's file name, if it is short and alphanumeric.
fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}
