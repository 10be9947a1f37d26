//! Authentication and role-gate behaviour on the protected bootcamp
//! routes. These paths reject before any store access, so the whole
//! suite runs against the bare router.

mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use campdir_api::auth::Role;
use serde_json::json;

#[tokio::test]
async fn create_requires_a_token() -> Result<()> {
    let response = common::send(
        common::app(),
        Method::POST,
        "/bootcamps",
        None,
        Some(json!({"name": "Devworks", "description": "desc"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");

    Ok(())
}

#[tokio::test]
async fn create_rejects_non_bearer_header() -> Result<()> {
    let app = common::app();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/bootcamps")
        .header("authorization", "Token abc")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{}"))?;

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn create_rejects_garbage_token() -> Result<()> {
    let response = common::send(
        common::app(),
        Method::POST,
        "/bootcamps",
        Some("not.a.jwt"),
        Some(json!({"name": "Devworks", "description": "desc"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn create_rejects_plain_user_role() -> Result<()> {
    let token = common::token_for(Role::User);
    let response = common::send(
        common::app(),
        Method::POST,
        "/bootcamps",
        Some(&token),
        Some(json!({"name": "Devworks", "description": "desc"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = common::body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(
        body["error"],
        "The user role user is not authorized to access this route"
    );

    Ok(())
}

#[tokio::test]
async fn update_and_delete_require_a_token() -> Result<()> {
    let id = "6f2b8c0a-9d4e-4f63-8c1a-2f9e5d7b0c11";

    let response = common::send(
        common::app(),
        Method::PUT,
        &format!("/bootcamps/{}", id),
        None,
        Some(json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::send(
        common::app(),
        Method::DELETE,
        &format!("/bootcamps/{}", id),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn photo_route_rejects_plain_user_role() -> Result<()> {
    let token = common::token_for(Role::User);
    let response = common::send(
        common::app(),
        Method::PUT,
        "/bootcamps/6f2b8c0a-9d4e-4f63-8c1a-2f9e5d7b0c11/photo",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn update_rejects_malformed_id_before_store_access() -> Result<()> {
    let token = common::token_for(Role::Publisher);
    let response = common::send(
        common::app(),
        Method::PUT,
        "/bootcamps/not-a-uuid",
        Some(&token),
        Some(json!({})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Invalid bootcamp id not-a-uuid");

    Ok(())
}

#[tokio::test]
async fn delete_rejects_malformed_id_before_store_access() -> Result<()> {
    let token = common::token_for(Role::Admin);
    let response = common::send(
        common::app(),
        Method::DELETE,
        "/bootcamps/42",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn update_rejects_invalid_fields_before_store_access() -> Result<()> {
    let token = common::token_for(Role::Publisher);
    let response = common::send(
        common::app(),
        Method::PUT,
        "/bootcamps/6f2b8c0a-9d4e-4f63-8c1a-2f9e5d7b0c11",
        Some(&token),
        Some(json!({"name": ""})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["name"], "Please add a name");

    Ok(())
}
