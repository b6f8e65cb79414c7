//! Integration tests for organizer login, refresh and logout.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_organizer, delete_request_with_auth, get_request, get_request_with_auth, json_request,
    login, parse_response_body, TestApp,
};
use serde_json::json;

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new();
    let organizer = create_organizer(&app.gateway).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/token",
            json!({ "email": organizer.email, "password": organizer.password }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    let organizer = create_organizer(&app.gateway).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/token",
            json!({
                "email": organizer.email.to_uppercase(),
                "password": organizer.password
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    let organizer = create_organizer(&app.gateway).await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/token",
            json!({ "email": organizer.email, "password": "not the password" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_login_unknown_email_looks_like_wrong_password() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/token",
            json!({ "email": "nobody@example.com", "password": "whatever" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Authentication failed");
}

#[tokio::test]
async fn test_login_invalid_email() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/token",
            json!({ "email": "not-an-email", "password": "whatever" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_refresh_issues_new_token() {
    let app = TestApp::new();
    let organizer = create_organizer(&app.gateway).await;
    let token = login(&app, &organizer).await;

    let response = app
        .send(get_request_with_auth("/api/v1/token", &token))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_refresh_without_token() {
    let app = TestApp::new();

    let response = app.send(get_request("/api/v1/token")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let app = TestApp::new();

    let response = app
        .send(get_request_with_auth("/api/v1/token", "not.a.jwt"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::new();
    let organizer = create_organizer(&app.gateway).await;
    let token = login(&app, &organizer).await;

    let response = app
        .send(delete_request_with_auth("/api/v1/token", &token))
        .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
