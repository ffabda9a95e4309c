mod common;

use axum::http::StatusCode;
use issue_board::models::{Label, User};

#[tokio::test]
async fn list_users_returns_seeded_rows() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    common::create_test_user(&pool, "Alice").await;
    common::create_test_user(&pool, "Bob").await;

    let response = server.get("/api/users").add_header(name, value).await;
    response.assert_status(StatusCode::OK);
    let users: Vec<User> = response.json();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn list_labels_returns_seeded_rows() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    common::create_test_label(&pool, "bug", "#e53e3e").await;

    let response = server.get("/api/labels").add_header(name, value).await;
    response.assert_status(StatusCode::OK);
    let labels: Vec<Label> = response.json();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].name, "bug");
}

#[tokio::test]
async fn users_and_labels_are_empty_arrays_when_unseeded() {
    let (server, _pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    let users = server.get("/api/users").add_header(name, value).await;
    assert_eq!(users.text(), "[]");

    let labels = server.get("/api/labels").add_header(name, value).await;
    assert_eq!(labels.text(), "[]");
}
