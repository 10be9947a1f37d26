use axum::{extract::Query, response::Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::BootcampRepository;
use crate::error::ApiError;
use crate::filter::{ListParams, Pagination};

/// GET /bootcamps - List bootcamps
///
/// Filtering, projection, sorting and pagination are resolved from the
/// query string before the store is touched; the handler only forwards
/// the already-shaped result set.
pub async fn list(Query(raw): Query<HashMap<String, String>>) -> Result<Json<Value>, ApiError> {
    let params = ListParams::from_query(&raw)?;
    let (page, limit) = (params.page, params.limit);

    let (bootcamps, total) = BootcampRepository::list(params).await?;
    let pagination = Pagination::compute(page, limit, total);

    Ok(Json(json!({
        "success": true,
        "count": bootcamps.len(),
        "pagination": pagination,
        "data": bootcamps,
    })))
}
