use axum::{extract::Path, response::Json};

use super::{mutation_denied, parse_id};
use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequirePublisher};
use crate::models::{Bootcamp, UpdateBootcamp};

/// PUT /bootcamps/:id - Update a bootcamp
///
/// Field validation is re-run on every present field, then the partial
/// payload is applied as one conditional statement gated on ownership
/// (or the admin role).
pub async fn update(
    RequirePublisher(user): RequirePublisher,
    Path(id): Path<String>,
    Json(changes): Json<UpdateBootcamp>,
) -> ApiResult<Bootcamp> {
    let id = parse_id(&id)?;

    changes
        .validate()
        .map_err(|errors| ApiError::validation_error("Invalid bootcamp payload", Some(errors)))?;

    match BootcampRepository::update_if_permitted(id, &changes, &user).await? {
        Some(bootcamp) => Ok(ApiResponse::success(bootcamp)),
        None => Err(mutation_denied(id, &user, "update").await),
    }
}
