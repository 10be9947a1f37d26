use axum::response::Json;

use crate::auth::Role;
use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequirePublisher};
use crate::models::{Bootcamp, CreateBootcamp};
use crate::services::geocoder::Geocoder;

/// POST /bootcamps - Create a bootcamp
///
/// The owner is always the authenticated user; whatever the payload
/// claims about ownership never reaches the store. Non-admin publishers
/// are limited to a single bootcamp.
pub async fn create(
    RequirePublisher(user): RequirePublisher,
    Json(payload): Json<CreateBootcamp>,
) -> ApiResult<Bootcamp> {
    payload
        .validate()
        .map_err(|errors| ApiError::validation_error("Invalid bootcamp payload", Some(errors)))?;

    if user.role != Role::Admin && BootcampRepository::owner_has_bootcamp(user.id).await? {
        return Err(ApiError::bad_request(format!(
            "The user with id {} has already published a bootcamp",
            user.id
        )));
    }

    let location = match payload.address.as_deref() {
        Some(address) => Some(Geocoder::from_config()?.geocode_address(address).await?),
        None => None,
    };

    let bootcamp = BootcampRepository::insert(&payload, user.id, location).await?;

    Ok(ApiResponse::created(bootcamp))
}
