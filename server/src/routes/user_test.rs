use serde_json::{Value, json};

use super::*;
use crate::state::test_helpers::{STRONG_PASSWORD, signed_in, test_server};

#[tokio::test]
async fn me_returns_profile() {
    let (server, mailer) = test_server().await;
    let token = signed_in(&server, &mailer, "me@example.com").await;

    let response = server.get("/api/user/me").authorization_bearer(&token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let user = response.json::<Value>()["data"].clone();
    assert_eq!(user["email"], "me@example.com");
    assert_eq!(user["first_name"], "Ada");
    assert_eq!(user["email_verified"], true);
}

#[tokio::test]
async fn change_password_requires_correct_current() {
    let (server, mailer) = test_server().await;
    let token = signed_in(&server, &mailer, "cp@example.com").await;

    let response = server
        .post("/api/user/change-password")
        .authorization_bearer(&token)
        .json(&json!({"current_password": "Wr0ng!Password", "new_password": "Tk4$wQn8&HbZ3p"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_rejects_reuse() {
    let (server, mailer) = test_server().await;
    let token = signed_in(&server, &mailer, "reuse@example.com").await;

    let response = server
        .post("/api/user/change-password")
        .authorization_bearer(&token)
        .json(&json!({"current_password": STRONG_PASSWORD, "new_password": STRONG_PASSWORD}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>(), json!({"errors": ["can't reuse current password"]}));
}

#[tokio::test]
async fn change_password_validates_new_password() {
    let (server, mailer) = test_server().await;
    let token = signed_in(&server, &mailer, "short@example.com").await;

    let response = server
        .post("/api/user/change-password")
        .authorization_bearer(&token)
        .json(&json!({"current_password": STRONG_PASSWORD, "new_password": "Ab1!"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"][0],
        json!({"field": "new_password", "message": "new_password must be at least 8 characters long"})
    );
}

#[tokio::test]
async fn change_password_then_login_with_new() {
    let (server, mailer) = test_server().await;
    let token = signed_in(&server, &mailer, "rotate@example.com").await;

    let response = server
        .post("/api/user/change-password")
        .authorization_bearer(&token)
        .json(&json!({"current_password": STRONG_PASSWORD, "new_password": "Tk4$wQn8&HbZ3p"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"data": {}}));

    let login = server
        .post("/api/auth/login")
        .json(&json!({"email": "rotate@example.com", "password": "Tk4$wQn8&HbZ3p"}))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
}
