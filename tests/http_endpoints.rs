//! Request-level tests for the JSON API over in-memory state.

#![expect(
    clippy::expect_used,
    reason = "Test helpers use expect for assertion clarity"
)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use taskboard::http::{extract::USER_ID_HEADER, router, state::AppState};
use tower::ServiceExt;

#[fixture]
fn app() -> Router {
    router(AppState::in_memory())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }
    if body.is_some() {
        builder = builder.header(CONTENT_TYPE, "application/json");
    }
    let payload = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
    let request = builder.body(payload).expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response should be JSON")
    };
    (status, value)
}

/// Sends a request as `user` and asserts the response status.
async fn expect_status(
    app: &Router,
    method: Method,
    uri: &str,
    user: i64,
    body: Option<Value>,
    expected: StatusCode,
) -> Value {
    let (status, value) = send(app, method, uri, Some(user), body).await;
    assert_eq!(status, expected, "unexpected status for {uri}: {value}");
    value
}

/// Creates a workspace and project owned by user 1 and returns the project id.
async fn seed_project(app: &Router) -> i64 {
    let workspace = expect_status(
        app,
        Method::POST,
        "/json/workspace/create",
        1,
        Some(json!({"name": "Core"})),
        StatusCode::CREATED,
    )
    .await;
    let project = expect_status(
        app,
        Method::POST,
        "/json/project/create",
        1,
        Some(json!({"workspace_id": workspace["id"], "title": "Board"})),
        StatusCode::CREATED,
    )
    .await;
    project["id"].as_i64().expect("project id")
}

/// Creates a list holding the named tasks and returns the list id.
async fn add_list(app: &Router, project_id: i64, title: &str, tasks: &[&str]) -> i64 {
    let list = expect_status(
        app,
        Method::POST,
        &format!("/json/project/{project_id}/lists"),
        1,
        Some(json!({"title": title})),
        StatusCode::CREATED,
    )
    .await;
    let list_id = list["id"].as_i64().expect("list id");
    for task in tasks {
        expect_status(
            app,
            Method::POST,
            "/json/task/create",
            1,
            Some(json!({"project_id": project_id, "list_id": list_id, "title": task})),
            StatusCode::CREATED,
        )
        .await;
    }
    list_id
}

async fn tasks_of(app: &Router, project_id: i64, list_id: i64) -> Value {
    expect_status(
        app,
        Method::GET,
        &format!("/json/project/{project_id}/lists/{list_id}/tasks"),
        1,
        None,
        StatusCode::OK,
    )
    .await
}

async fn titles(app: &Router, project_id: i64, list_id: i64) -> Vec<String> {
    tasks_of(app, project_id, list_id)
        .await
        .as_array()
        .expect("task array")
        .iter()
        .map(|task| format!("{}:{}", task["title"].as_str().unwrap_or(""), task["order"]))
        .collect()
}

#[rstest]
#[tokio::test]
async fn health_needs_no_identity(app: Router) {
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[rstest]
#[tokio::test]
async fn missing_identity_is_rejected(app: Router) {
    let (status, body) = send(&app, Method::GET, "/json/workspaces/mine", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[rstest]
#[tokio::test]
async fn created_tasks_are_appended(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["Write docs", "Cut release"]).await;
    assert_eq!(
        titles(&app, project_id, list_id).await,
        ["Write docs:1", "Cut release:2"]
    );

    let count = expect_status(
        &app,
        Method::GET,
        &format!("/json/list/{list_id}/count"),
        1,
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(count["count"], 2);
}

#[rstest]
#[tokio::test]
async fn numeric_strings_are_accepted(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &[]).await;
    let task = expect_status(
        &app,
        Method::POST,
        "/json/task/create",
        1,
        Some(json!({
            "project_id": project_id.to_string(),
            "list_id": list_id.to_string(),
            "title": "From a form",
        })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(task["order"], 1);
}

#[rstest]
#[tokio::test]
async fn reorder_within_a_list_reports_rows(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["A", "B", "C"]).await;
    let body = expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/task-list"),
        1,
        Some(json!({"new_list": list_id, "from": 3, "to": 1})),
        StatusCode::OK,
    )
    .await;

    assert_eq!(body, json!({"success": true, "updated": 3}));
    assert_eq!(titles(&app, project_id, list_id).await, ["C:1", "A:2", "B:3"]);
}

#[rstest]
#[tokio::test]
async fn reorder_across_lists_moves_the_task(app: Router) {
    let project_id = seed_project(&app).await;
    let doing = add_list(&app, project_id, "Doing", &["A", "B"]).await;
    let done = add_list(&app, project_id, "Done", &["X"]).await;
    let task_id = tasks_of(&app, project_id, doing).await[0]["id"].clone();

    let body = expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/task-list"),
        1,
        Some(json!({
            "is_move": true,
            "task_id": task_id,
            "previous_list": doing,
            "new_list": done,
            "to": 2,
        })),
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["updated"], 3);
    assert_eq!(titles(&app, project_id, doing).await, ["B:1"]);
    assert_eq!(titles(&app, project_id, done).await, ["X:1", "A:2"]);
}

#[rstest]
#[tokio::test]
async fn moving_an_unknown_task_is_not_found(app: Router) {
    let project_id = seed_project(&app).await;
    let doing = add_list(&app, project_id, "Doing", &["A"]).await;
    let done = add_list(&app, project_id, "Done", &[]).await;
    let body = expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/task-list"),
        1,
        Some(json!({
            "is_move": true,
            "task_id": 9_999,
            "previous_list": doing,
            "new_list": done,
            "to": 1,
        })),
        StatusCode::NOT_FOUND,
    )
    .await;

    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(titles(&app, project_id, doing).await, ["A:1"]);
}

#[rstest]
#[tokio::test]
async fn moving_into_an_unknown_list_is_not_found(app: Router) {
    let project_id = seed_project(&app).await;
    let doing = add_list(&app, project_id, "Doing", &["A", "B"]).await;
    let task = tasks_of(&app, project_id, doing).await[0].clone();

    let body = expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/task-list"),
        1,
        Some(json!({
            "is_move": true,
            "task_id": task["id"],
            "previous_list": doing,
            "new_list": 999,
            "to": 1,
        })),
        StatusCode::NOT_FOUND,
    )
    .await;

    assert_eq!(body["code"], "NOT_FOUND");
    let reloaded = expect_status(
        &app,
        Method::GET,
        &format!("/json/task/{}", task["id"]),
        1,
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(reloaded["list_id"], doing);
    assert_eq!(titles(&app, project_id, doing).await, ["A:1", "B:2"]);
}

#[rstest]
#[tokio::test]
async fn moving_into_another_projects_list_is_not_found(app: Router) {
    let project_id = seed_project(&app).await;
    let other_project = seed_project(&app).await;
    let doing = add_list(&app, project_id, "Doing", &["A", "B"]).await;
    let foreign = add_list(&app, other_project, "Elsewhere", &["Z"]).await;
    let task_id = tasks_of(&app, project_id, doing).await[0]["id"].clone();

    expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/task-list"),
        1,
        Some(json!({
            "is_move": true,
            "task_id": task_id,
            "previous_list": doing,
            "new_list": foreign,
            "to": 1,
        })),
        StatusCode::NOT_FOUND,
    )
    .await;

    assert_eq!(titles(&app, project_id, doing).await, ["A:1", "B:2"]);
    assert_eq!(titles(&app, other_project, foreign).await, ["Z:1"]);
}

#[rstest]
#[case(json!({"new_list": "abc", "from": 1, "to": 1}), "new_list")]
#[case(json!({"is_move": true, "new_list": 1, "to": 1}), "task_id")]
#[case(json!({"new_list": 1, "to": 1}), "from")]
#[case(json!({"new_list": 1, "from": 1}), "to")]
#[case(json!({"from": 1, "to": 1}), "new_list")]
#[case(json!({"new_list": 1, "from": 1, "to": 1.5}), "to")]
#[case(json!({"new_list": true, "from": 1, "to": 1}), "new_list")]
#[tokio::test]
async fn malformed_moves_name_the_field(
    app: Router,
    #[case] payload: Value,
    #[case] field: &str,
) {
    let project_id = seed_project(&app).await;
    add_list(&app, project_id, "To do", &["A"]).await;
    let body = expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/task-list"),
        1,
        Some(payload),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], field);
}

#[rstest]
#[tokio::test]
async fn unreadable_bodies_are_json_validation_errors(app: Router) {
    let project_id = seed_project(&app).await;
    let body = expect_status(
        &app,
        Method::POST,
        &format!("/json/project/{project_id}/lists"),
        1,
        Some(json!({"name": "no title"})),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().is_some_and(|message| message.contains("title")));
}

#[rstest]
#[tokio::test]
async fn bulk_orders_name_each_malformed_entry(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["A", "B"]).await;
    let body = expect_status(
        &app,
        Method::POST,
        "/json/tasks/order",
        1,
        Some(json!([{"id": 1, "order": "first"}, {"id": "x", "order": 1}])),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(body["details"][0]["field"], "[0].order");
    assert_eq!(body["details"][1]["field"], "[1].id");
    assert_eq!(titles(&app, project_id, list_id).await, ["A:1", "B:2"]);
}

#[rstest]
#[tokio::test]
async fn bulk_orders_reject_non_positive_values(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["A", "B"]).await;
    let tasks = tasks_of(&app, project_id, list_id).await;
    let body = expect_status(
        &app,
        Method::POST,
        "/json/tasks/order",
        1,
        Some(json!([
            {"id": tasks[0]["id"], "order": 2},
            {"id": tasks[1]["id"], "order": 0},
        ])),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(titles(&app, project_id, list_id).await, ["A:1", "B:2"]);
}

#[rstest]
#[tokio::test]
async fn private_projects_are_forbidden_to_other_members(app: Router) {
    let workspace = expect_status(
        &app,
        Method::POST,
        "/json/workspace/create",
        1,
        Some(json!({"name": "Core"})),
        StatusCode::CREATED,
    )
    .await;
    let membership = expect_status(
        &app,
        Method::POST,
        "/json/workspace/member/add",
        1,
        Some(json!({"workspace_id": workspace["id"], "user_id": 2})),
        StatusCode::OK,
    )
    .await;
    assert_eq!(membership["status"], "added");

    let project = expect_status(
        &app,
        Method::POST,
        "/json/project/create",
        1,
        Some(json!({"workspace_id": workspace["id"], "title": "Secret", "is_private": true})),
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/json/project/{}", project["id"]);

    let denied = expect_status(&app, Method::GET, &uri, 2, None, StatusCode::FORBIDDEN).await;
    assert_eq!(denied["code"], "FORBIDDEN");
    expect_status(&app, Method::GET, &uri, 3, None, StatusCode::NOT_FOUND).await;
}

#[rstest]
#[tokio::test]
async fn deleted_tasks_disappear(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["A"]).await;
    let uri = format!("/json/task/{}", tasks_of(&app, project_id, list_id).await[0]["id"]);

    let body = expect_status(&app, Method::DELETE, &uri, 1, None, StatusCode::OK).await;
    assert_eq!(body["deleted"], true);
    expect_status(&app, Method::GET, &uri, 1, None, StatusCode::NOT_FOUND).await;
}

#[rstest]
#[tokio::test]
async fn deleting_a_project_removes_its_board(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["A"]).await;
    let task_uri = format!("/json/task/{}", tasks_of(&app, project_id, list_id).await[0]["id"]);
    let uri = format!("/project/destroy/{project_id}");

    expect_status(&app, Method::DELETE, &uri, 2, None, StatusCode::FORBIDDEN).await;
    let body = expect_status(&app, Method::DELETE, &uri, 1, None, StatusCode::OK).await;

    assert_eq!(body["deleted"], true);
    expect_status(
        &app,
        Method::GET,
        &format!("/json/project/{project_id}"),
        1,
        None,
        StatusCode::NOT_FOUND,
    )
    .await;
    expect_status(&app, Method::GET, &task_uri, 1, None, StatusCode::NOT_FOUND).await;
    expect_status(&app, Method::DELETE, &uri, 1, None, StatusCode::NOT_FOUND).await;
}

#[rstest]
#[tokio::test]
async fn deleting_a_workspace_removes_its_projects(app: Router) {
    let project_id = seed_project(&app).await;
    let list_id = add_list(&app, project_id, "To do", &["A"]).await;
    let task_uri = format!("/json/task/{}", tasks_of(&app, project_id, list_id).await[0]["id"]);
    let project = expect_status(
        &app,
        Method::GET,
        &format!("/json/project/{project_id}"),
        1,
        None,
        StatusCode::OK,
    )
    .await;
    let workspace_id = project["workspace_id"].as_i64().expect("workspace id");
    let uri = format!("/workspace/destroy/{workspace_id}");

    expect_status(&app, Method::DELETE, &uri, 2, None, StatusCode::FORBIDDEN).await;
    let body = expect_status(&app, Method::DELETE, &uri, 1, None, StatusCode::OK).await;

    assert_eq!(body["deleted"], true);
    expect_status(
        &app,
        Method::GET,
        &format!("/json/workspace/{workspace_id}"),
        1,
        None,
        StatusCode::NOT_FOUND,
    )
    .await;
    expect_status(
        &app,
        Method::GET,
        &format!("/json/project/{project_id}"),
        1,
        None,
        StatusCode::NOT_FOUND,
    )
    .await;
    expect_status(&app, Method::GET, &task_uri, 1, None, StatusCode::NOT_FOUND).await;
    let recent = expect_status(
        &app,
        Method::GET,
        "/json/projects/recent",
        1,
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(recent, json!([]));
}

#[rstest]
#[tokio::test]
async fn opened_projects_are_listed_as_recent(app: Router) {
    let first = seed_project(&app).await;
    let second = seed_project(&app).await;
    let never_opened = seed_project(&app).await;
    for project_id in [first, second] {
        expect_status(
            &app,
            Method::GET,
            &format!("/json/project/{project_id}"),
            1,
            None,
            StatusCode::OK,
        )
        .await;
    }

    let recent = expect_status(
        &app,
        Method::GET,
        "/json/projects/recent",
        1,
        None,
        StatusCode::OK,
    )
    .await;
    let mut ids: Vec<i64> = recent
        .as_array()
        .expect("recent projects array")
        .iter()
        .filter_map(|project| project["id"].as_i64())
        .collect();
    ids.sort_unstable();

    assert_eq!(ids, [first, second]);
    assert!(!ids.contains(&never_opened));
    let others = expect_status(
        &app,
        Method::GET,
        "/json/projects/recent",
        2,
        None,
        StatusCode::OK,
    )
    .await;
    assert_eq!(others, json!([]));
}

#[rstest]
#[tokio::test]
async fn the_last_admin_cannot_leave(app: Router) {
    let workspace = expect_status(
        &app,
        Method::POST,
        "/json/workspace/create",
        1,
        Some(json!({"name": "Solo"})),
        StatusCode::CREATED,
    )
    .await;

    let body = expect_status(
        &app,
        Method::POST,
        "/json/workspace/member/add",
        1,
        Some(json!({"workspace_id": workspace["id"], "user_id": 1})),
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(body["code"], "VALIDATION_ERROR");
}
