//! HTTP-level tests for `HttpTaskApi` against a mock server

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use todosync_api::{
    ApiConfig, ApiError, ApiTaskModel, HttpTaskApi, Task, TaskApi, TaskId, TaskStatus,
    TodolistId, UpdateTaskModel,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> HttpTaskApi {
    HttpTaskApi::new(ApiConfig::new(server.uri()).with_api_key("test-key")).unwrap()
}

fn task_json(id: &str, list: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "todoListId": list,
        "title": title,
        "description": null,
        "status": 0,
        "priority": 1,
        "startDate": null,
        "deadline": null,
        "order": 0,
        "addedDate": "2026-10-17T09:00:00"
    })
}

#[tokio::test]
async fn get_tasks_sends_api_key_and_decodes_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todo-lists/l1/tasks"))
        .and(header("API-KEY", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [task_json("t1", "l1", "Buy milk"), task_json("t2", "l1", "Bake bread")],
            "totalCount": 2,
            "error": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = api(&server).get_tasks(&TodolistId::new("l1")).await.unwrap();

    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Buy milk");
}

#[tokio::test]
async fn create_task_returns_envelope_with_item() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todo-lists/l1/tasks"))
        .and(body_json(json!({ "title": "Buy milk" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0,
            "messages": [],
            "data": { "item": task_json("t9", "l1", "Buy milk") }
        })))
        .mount(&server)
        .await;

    let envelope = api(&server)
        .create_task(&TodolistId::new("l1"), "Buy milk")
        .await
        .unwrap();

    assert!(envelope.is_success());
    assert_eq!(envelope.data.item.unwrap().id, TaskId::new("t9"));
}

#[tokio::test]
async fn rejected_create_with_empty_data_is_not_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todo-lists/l1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 1,
            "messages": ["title is required"],
            "data": {}
        })))
        .mount(&server)
        .await;

    let envelope = api(&server).create_task(&TodolistId::new("l1"), "").await.unwrap();

    assert!(!envelope.is_success());
    assert_eq!(envelope.messages, vec!["title is required".to_string()]);
    assert!(envelope.data.item.is_none());
}

#[tokio::test]
async fn rejected_create_todolist_without_data_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todo-lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 1,
            "messages": ["title is too long"]
        })))
        .mount(&server)
        .await;

    let envelope = api(&server).create_todolist("x".repeat(200).as_str()).await.unwrap();

    assert_eq!(envelope.result_code, 1);
    assert!(envelope.data.item.is_none());
}

#[tokio::test]
async fn delete_task_accepts_bare_result_code() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todo-lists/l1/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultCode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = api(&server)
        .delete_task(&TodolistId::new("l1"), &TaskId::new("t1"))
        .await
        .unwrap();

    assert!(envelope.is_success());
    assert!(envelope.messages.is_empty());
}

#[tokio::test]
async fn ids_with_reserved_characters_stay_in_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todo-lists/a%2Fb/tasks/t%3F1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resultCode": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = api(&server)
        .delete_task(&TodolistId::new("a/b"), &TaskId::new("t?1"))
        .await
        .unwrap();

    assert!(envelope.is_success());
}

#[tokio::test]
async fn update_task_puts_full_record() {
    let server = MockServer::start().await;
    let task = Task::new(TaskId::new("t1"), TodolistId::new("l1"), "Buy milk");
    let model = ApiTaskModel::merged(&task, &UpdateTaskModel::status(TaskStatus::Completed));

    Mock::given(method("PUT"))
        .and(path("/todo-lists/l1/tasks/t1"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": null,
            "status": 2,
            "priority": 0,
            "startDate": null,
            "deadline": null,
            "completed": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0, "messages": [], "data": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = api(&server)
        .update_task(&TodolistId::new("l1"), &TaskId::new("t1"), &model)
        .await
        .unwrap();
    assert!(envelope.is_success());
}

#[tokio::test]
async fn delete_and_rename_todolist() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todo-lists/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0, "messages": [], "data": {}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/todo-lists/l1"))
        .and(body_json(json!({ "title": "Groceries" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0, "messages": []
        })))
        .mount(&server)
        .await;

    let api = api(&server);
    let list = TodolistId::new("l1");
    assert!(api.update_todolist_title(&list, "Groceries").await.unwrap().is_success());
    assert!(api.delete_todolist(&list).await.unwrap().is_success());
}

#[tokio::test]
async fn non_2xx_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todo-lists/l1/tasks/t1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = api(&server)
        .delete_task(&TodolistId::new("l1"), &TaskId::new("t1"))
        .await;

    match result {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        },
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todo-lists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = api(&server).get_todolists().await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn unreachable_service_is_request_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let api = HttpTaskApi::new(ApiConfig::new(uri)).unwrap();
    let result = api.get_todolists().await;
    assert!(matches!(result, Err(ApiError::Request(_))));
}
