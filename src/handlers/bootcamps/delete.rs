use axum::extract::Path;
use serde_json::{json, Value};

use super::{mutation_denied, parse_id};
use crate::database::BootcampRepository;
use crate::middleware::{ApiResponse, ApiResult, RequirePublisher};

/// DELETE /bootcamps/:id - Delete a bootcamp
///
/// Removal is permanent; dependent courses and reviews cascade at the
/// store level. Repeating the delete yields 404, never a crash.
pub async fn destroy(
    RequirePublisher(user): RequirePublisher,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;

    if BootcampRepository::delete_if_permitted(id, &user).await? {
        Ok(ApiResponse::success(json!({})))
    } else {
        Err(mutation_denied(id, &user, "delete").await)
    }
}
