use axum::extract::{Multipart, Path};

use super::{mutation_denied, parse_id};
use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequirePublisher};
use crate::services::storage;

/// PUT /bootcamps/:id/photo - Upload a photo for a bootcamp
///
/// Expects a multipart field named `file`. The stored name is
/// deterministic (`photo_<id><ext>`); the record's photo column is only
/// updated once the file is safely on disk, and the response waits for
/// both.
pub async fn upload_photo(
    RequirePublisher(user): RequirePublisher,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<String> {
    let id = parse_id(&id)?;

    let bootcamp = BootcampRepository::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id {}", id)))?;

    if !user.can_mutate(bootcamp.user_id) {
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to update this bootcamp",
            user.id
        )));
    }

    let mut upload: Option<(String, Option<String>, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(|mime| mime.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?;
            upload = Some((original_name, content_type, bytes));
            break;
        }
    }

    let (original_name, content_type, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("Please upload a file"))?;

    storage::validate_photo(content_type.as_deref(), bytes.len())?;

    let filename = storage::photo_filename(id, &original_name);
    storage::store_photo(&filename, &bytes).await?;

    if !BootcampRepository::update_photo_if_permitted(id, &filename, &user).await? {
        return Err(mutation_denied(id, &user, "update").await);
    }

    Ok(ApiResponse::success(filename))
}
