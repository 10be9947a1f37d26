use axum::extract::Path;

use super::parse_id;
use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Bootcamp;

/// GET /bootcamps/:id - Get a single bootcamp
pub async fn show(Path(id): Path<String>) -> ApiResult<Bootcamp> {
    let id = parse_id(&id)?;

    let bootcamp = BootcampRepository::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id {}", id)))?;

    Ok(ApiResponse::success(bootcamp))
}
