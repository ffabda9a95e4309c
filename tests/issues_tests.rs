mod common;

use axum::http::StatusCode;
use issue_board::models::Issue;
use serde_json::json;

fn create_payload(title: &str, status: &str, priority: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "",
        "status": status,
        "priority": priority,
        "label_ids": [],
    })
}

#[tokio::test]
async fn create_then_list_returns_the_new_issue() {
    let (server, _pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/issues")
        .add_header(name, value)
        .json(&create_payload("T", "Todo", "Low"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Issue = response.json();
    assert_eq!(created.title, "T");
    assert_eq!(created.order_index, 0.0);

    let listed = server
        .get("/api/issues?status=Todo")
        .add_header(name, value)
        .await;
    listed.assert_status(StatusCode::OK);
    let issues: Vec<Issue> = listed.json();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].title, "T");
}

#[tokio::test]
async fn create_places_new_issue_at_top_of_column() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    common::create_test_issue(&pool, "Existing low", "Todo", "Low", 0.0).await;
    common::create_test_issue(&pool, "Existing high", "Todo", "Low", 5.0).await;

    let response = server
        .post("/api/issues")
        .add_header(name, value)
        .json(&create_payload("New on top", "Todo", "Low"))
        .await;
    response.assert_status(StatusCode::CREATED);

    let listed = server
        .get("/api/issues?status=Todo")
        .add_header(name, value)
        .await;
    let issues: Vec<Issue> = listed.json();
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].title, "New on top");
    assert_eq!(issues[0].order_index, -1.0);
}

#[tokio::test]
async fn get_missing_issue_is_404() {
    let (server, _pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let response = server
        .get("/api/issues/does-not-exist")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_invalid_payload() {
    let (server, _pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/issues")
        .add_header(name, value)
        .json(&create_payload("", "Nope", "Nope"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["details"]["errors"]
        .as_str()
        .unwrap()
        .contains("title"));
}

#[tokio::test]
async fn move_across_columns_updates_status_and_order() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let id = common::create_test_issue(&pool, "Movable", "Todo", "Low", 0.0).await;

    let response = server
        .patch(&format!("/api/issues/{id}/move"))
        .add_header(name, value)
        .json(&json!({ "status": "Done", "order_index": 5.5 }))
        .await;
    response.assert_status(StatusCode::OK);

    let fetched = server
        .get(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .await;
    let issue: Issue = fetched.json();
    assert_eq!(issue.status.as_str(), "Done");
    assert_eq!(issue.order_index, 5.5);
}

#[tokio::test]
async fn no_op_move_preserves_position() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let id = common::create_test_issue(&pool, "Stays put", "Todo", "Low", 3.25).await;

    let response = server
        .patch(&format!("/api/issues/{id}/move"))
        .add_header(name, value)
        .json(&json!({ "status": "Todo", "order_index": 3.25 }))
        .await;
    response.assert_status(StatusCode::OK);

    let fetched = server
        .get(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .await;
    let issue: Issue = fetched.json();
    assert_eq!(issue.status.as_str(), "Todo");
    assert_eq!(issue.order_index, 3.25);
}

#[tokio::test]
async fn patch_replaces_label_set() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    let label_a = common::create_test_label(&pool, "A", "#111111").await;
    let label_b = common::create_test_label(&pool, "B", "#222222").await;
    let label_c = common::create_test_label(&pool, "C", "#333333").await;

    let create = server
        .post("/api/issues")
        .add_header(name, value)
        .json(&json!({
            "title": "Labeled",
            "description": "",
            "status": "Todo",
            "priority": "Low",
            "label_ids": [label_a, label_b],
        }))
        .await;
    let created: Issue = create.json();
    let mut names: Vec<_> = created.labels.iter().map(|l| l.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["A", "B"]);

    let patched = server
        .patch(&format!("/api/issues/{}", created.id))
        .add_header(name, value)
        .json(&json!({ "label_ids": [label_b, label_c] }))
        .await;
    patched.assert_status(StatusCode::OK);
    let updated: Issue = patched.json();
    let mut names: Vec<_> = updated.labels.iter().map(|l| l.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["B", "C"]);
}

#[tokio::test]
async fn replacing_labels_collapses_duplicates() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let label_a = common::create_test_label(&pool, "Dup", "#111111").await;
    let id = common::create_test_issue(&pool, "Dup target", "Todo", "Low", 0.0).await;

    let response = server
        .patch(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .json(&json!({ "label_ids": [label_a.clone(), label_a.clone(), label_a] }))
        .await;
    response.assert_status(StatusCode::OK);
    let issue: Issue = response.json();
    assert_eq!(issue.labels.len(), 1);
}

#[tokio::test]
async fn filter_intersection_matches_status_and_priority() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    common::create_test_issue(&pool, "Todo High", "Todo", "High", 0.0).await;
    common::create_test_issue(&pool, "InProgress Medium", "In Progress", "Medium", 0.0).await;
    common::create_test_issue(&pool, "Done High", "Done", "High", 0.0).await;

    let response = server
        .get("/api/issues?status=Todo&priority=High")
        .add_header(name, value)
        .await;
    let issues: Vec<Issue> = response.json();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].title, "Todo High");
}

#[tokio::test]
async fn empty_list_serializes_as_empty_array_not_null() {
    let (server, _pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();

    let response = server
        .get("/api/issues?status=Backlog")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "[]");
}

#[tokio::test]
async fn delete_cascades_to_issue_labels() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let label_id = common::create_test_label(&pool, "Cascading", "#abcabc").await;

    let create = server
        .post("/api/issues")
        .add_header(name, value)
        .json(&json!({
            "title": "To delete",
            "description": "",
            "status": "Todo",
            "priority": "Low",
            "label_ids": [label_id],
        }))
        .await;
    let created: Issue = create.json();

    let delete = server
        .delete(&format!("/api/issues/{}", created.id))
        .add_header(name, value)
        .await;
    delete.assert_status(StatusCode::NO_CONTENT);

    let remaining: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM issue_labels WHERE issue_id = ?")
            .bind(&created.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining.0, 0);
}

#[tokio::test]
async fn delete_unknown_issue_surfaces_as_server_error() {
    // Documented asymmetry (see DESIGN.md): the repository reports a
    // missing row as a generic error, not a 404, on update/delete.
    let (server, _pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let response = server
        .delete("/api/issues/does-not-exist")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn explicit_null_assignee_clears_it_but_absent_key_leaves_it_alone() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let user_id = common::create_test_user(&pool, "Alice").await;
    let id = common::create_test_issue(&pool, "Assignable", "Todo", "Low", 0.0).await;

    let assigned = server
        .patch(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .json(&json!({ "assignee_id": user_id }))
        .await;
    let assigned: Issue = assigned.json();
    assert_eq!(assigned.assignee.unwrap().id, user_id);

    let untouched = server
        .patch(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .json(&json!({ "title": "Still assigned" }))
        .await;
    let untouched: Issue = untouched.json();
    assert_eq!(untouched.assignee.unwrap().id, user_id);

    let cleared = server
        .patch(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .json(&json!({ "assignee_id": null }))
        .await;
    let cleared: Issue = cleared.json();
    assert!(cleared.assignee.is_none());
}

#[tokio::test]
async fn applying_the_same_update_twice_is_idempotent() {
    let (server, pool) = common::spawn_app().await;
    let (name, value) = common::auth_header();
    let id = common::create_test_issue(&pool, "Idempotent", "Todo", "Low", 0.0).await;

    let payload = json!({ "title": "Renamed", "priority": "High" });

    let first = server
        .patch(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .json(&payload)
        .await;
    let second = server
        .patch(&format!("/api/issues/{id}"))
        .add_header(name, value)
        .json(&payload)
        .await;

    let first_issue: Issue = first.json();
    let second_issue: Issue = second.json();
    assert_eq!(first_issue.title, second_issue.title);
    assert_eq!(first_issue.priority.as_str(), second_issue.priority.as_str());
    assert_eq!(first_issue.status.as_str(), second_issue.status.as_str());
    assert_eq!(first_issue.order_index, second_issue.order_index);
}
