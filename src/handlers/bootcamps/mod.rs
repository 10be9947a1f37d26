mod create;
mod delete;
mod list;
mod photo;
mod radius;
mod show;
mod update;

pub use create::create;
pub use delete::destroy;
pub use list::list;
pub use photo::upload_photo;
pub use radius::radius;
pub use show::show;
pub use update::update;

use uuid::Uuid;

use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Parse a path id, keeping the error envelope uniform instead of
/// falling through to the framework's plain-text rejection
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid bootcamp id {}", raw)))
}

/// A conditional mutation matched no row: either the record is gone (404)
/// or it exists but belongs to someone else (403).
pub(crate) async fn mutation_denied(id: Uuid, user: &AuthUser, action: &str) -> ApiError {
    match BootcampRepository::exists(id).await {
        Ok(true) => ApiError::forbidden(format!(
            "User {} is not authorized to {} this bootcamp",
            user.id, action
        )),
        Ok(false) => ApiError::not_found(format!("Bootcamp not found with id {}", id)),
        Err(e) => e.into(),
    }
}
