use axum::{routing::get, routing::put, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::bootcamps;

/// Build the full application router.
///
/// Route hierarchy:
///
/// ```text
/// /                                    service info (public)
/// /health                              liveness + database ping (public)
///
/// /bootcamps                           list (public), create (publisher|admin)
/// /bootcamps/:id                       show (public), update/delete (owner or admin)
/// /bootcamps/:id/photo                 photo upload (owner or admin)
/// /bootcamps/radius/:zipcode/:distance geo radius search (public)
/// ```
pub fn app() -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .merge(bootcamp_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn bootcamp_routes() -> Router {
    Router::new()
        .route(
            "/bootcamps",
            get(bootcamps::list).post(bootcamps::create),
        )
        .route(
            "/bootcamps/:id",
            get(bootcamps::show)
                .put(bootcamps::update)
                .delete(bootcamps::destroy),
        )
        .route("/bootcamps/:id/photo", put(bootcamps::upload_photo))
        .route(
            "/bootcamps/radius/:zipcode/:distance",
            get(bootcamps::radius),
        )
}

async fn service_info() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Campdir API",
            "version": version,
            "description": "Bootcamp directory REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "bootcamps": "/bootcamps[/:id] (reads public, writes require publisher or admin)",
                "radius": "/bootcamps/radius/:zipcode/:distance (public)",
                "photo": "/bootcamps/:id/photo (owner or admin)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
