//! End-to-end synchronization tests against the in-memory service.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use std::time::Duration;
use todosync::mocks::{Endpoint, MockFailure, MockTaskApi};
use todosync::{
    ErrorKind, Filter, RequestStatus, SyncError, Task, TaskId, TaskStatus, TodoApp, TodolistId,
    UpdateTaskModel,
};

fn list1() -> TodolistId {
    TodolistId::new("list1")
}

/// App with `list1` already fetched from the service
async fn app_with_list(api: &MockTaskApi) -> TodoApp<MockTaskApi> {
    let app = TodoApp::new(api.clone());
    let status = app.fetch_todolists().await.unwrap();
    assert!(status.is_succeeded());
    app
}

#[tokio::test]
async fn add_task_success_applies_task() {
    let api = MockTaskApi::new().with_list("list1", "Groceries");
    let app = app_with_list(&api).await;

    let status = app.add_task(list1(), "Buy milk").await.unwrap();

    assert_eq!(status.status, RequestStatus::Succeeded);
    let tasks = app.tasks(&list1()).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].todo_list_id, list1());
    assert_eq!(app.status().await.status, RequestStatus::Succeeded);
}

#[tokio::test]
async fn add_task_rejected_leaves_store_unchanged() {
    let api = MockTaskApi::new().with_list("list1", "Groceries");
    let app = app_with_list(&api).await;
    api.fail(Endpoint::CreateTask, MockFailure::Rejected(vec!["title is required".into()]));

    let status = app.add_task(list1(), "").await.unwrap();

    assert_eq!(status.status, RequestStatus::Failed);
    assert_eq!(status.error.as_deref(), Some("title is required"));
    assert!(app.tasks(&list1()).await.is_empty());

    let app_status = app.status().await;
    assert_eq!(app_status.status, RequestStatus::Failed);
    assert_eq!(app_status.error.as_deref(), Some("title is required"));
}

#[tokio::test]
async fn remove_task_network_error_leaves_store_unchanged() {
    let api = MockTaskApi::new()
        .with_list("list1", "Groceries")
        .with_task(Task::new(TaskId::new("t1"), list1(), "Buy milk"));
    let app = app_with_list(&api).await;
    api.fail(Endpoint::DeleteTask, MockFailure::Network("connection refused".into()));

    let status = app.remove_task(list1(), TaskId::new("t1")).await.unwrap();

    assert_eq!(status.status, RequestStatus::Failed);
    assert!(status.error.as_deref().unwrap().starts_with("Network error:"));
    assert_eq!(app.tasks(&list1()).await.len(), 1);
}

#[tokio::test]
async fn update_unknown_task_fails_without_request() {
    let api = MockTaskApi::new().with_list("list1", "Groceries");
    let app = app_with_list(&api).await;

    let status = app
        .update_task(list1(), TaskId::new("ghost"), UpdateTaskModel::title("x"))
        .await
        .unwrap();

    assert_eq!(status.status, RequestStatus::Failed);
    let expected = SyncError::TaskNotFound {
        list_id: list1(),
        task_id: TaskId::new("ghost"),
    };
    assert_eq!(expected.kind(), ErrorKind::NotFound);
    assert_eq!(status.error, Some(expected.to_string()));
    assert_eq!(api.call_count(Endpoint::UpdateTask), 0);
}

#[tokio::test]
async fn update_task_sends_full_record_and_merges() {
    let mut task = Task::new(TaskId::new("t1"), list1(), "Buy milk");
    task.description = Some("2 litres".into());
    let api = MockTaskApi::new().with_list("list1", "Groceries").with_task(task);
    let app = app_with_list(&api).await;

    let status = app
        .update_task(list1(), TaskId::new("t1"), UpdateTaskModel::status(TaskStatus::Completed))
        .await
        .unwrap();

    assert!(status.is_succeeded());
    let sent = api.received_updates();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Buy milk");
    assert_eq!(sent[0].description.as_deref(), Some("2 litres"));
    assert!(sent[0].completed);

    let local = &app.tasks(&list1()).await[0];
    assert_eq!(local.status, TaskStatus::Completed);
    assert_eq!(local.description.as_deref(), Some("2 litres"));
    assert_eq!(local.id, TaskId::new("t1"));
}

#[tokio::test]
async fn concurrent_operations_are_attributed_independently() {
    let api = MockTaskApi::new()
        .with_list("list1", "Groceries")
        .with_task(Task::new(TaskId::new("t1"), list1(), "Bake bread"));
    let app = app_with_list(&api).await;
    api.delay(Endpoint::CreateTask, Duration::from_millis(50));
    api.fail(Endpoint::DeleteTask, MockFailure::Network("offline".into()));

    let (added, removed) = tokio::join!(
        app.add_task(list1(), "Buy milk"),
        app.remove_task(list1(), TaskId::new("t1")),
    );
    let (added, removed) = (added.unwrap(), removed.unwrap());

    assert_ne!(added.id, removed.id);
    assert_eq!(added.status, RequestStatus::Succeeded);
    assert_eq!(removed.status, RequestStatus::Failed);
    assert!(added.error.is_none());

    let status = app.status().await;
    assert_eq!(status.in_flight(), 0);
    // The slower add finished last
    assert_eq!(status.last, Some(added.id));

    let titles: Vec<_> = app.tasks(&list1()).await.into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["Buy milk".to_string(), "Bake bread".to_string()]);
}

#[tokio::test]
async fn fetch_todolists_loads_every_list_and_its_tasks() {
    let api = MockTaskApi::new()
        .with_list("list1", "Groceries")
        .with_list("list2", "Work")
        .with_task(Task::new(TaskId::new("t1"), list1(), "Buy milk"))
        .with_task(Task::new(TaskId::new("t2"), TodolistId::new("list2"), "Write report"));
    let app = TodoApp::new(api.clone());

    let status = app.fetch_todolists().await.unwrap();

    assert!(status.is_succeeded());
    assert_eq!(app.todolists().await.len(), 2);
    assert_eq!(app.tasks(&list1()).await[0].title, "Buy milk");
    assert_eq!(app.tasks(&TodolistId::new("list2")).await[0].title, "Write report");
    assert_eq!(api.call_count(Endpoint::GetTasks), 2);

    // One list fetch plus one task fetch per list
    let app_status = app.status().await;
    assert_eq!(app_status.operations.len(), 3);
    assert!(app_status.operations.values().all(|o| o.is_succeeded()));
}

#[tokio::test]
async fn fetch_todolists_failure_skips_task_fetches() {
    let api = MockTaskApi::new().with_list("list1", "Groceries");
    api.fail(Endpoint::GetTodolists, MockFailure::Network("offline".into()));
    let app = TodoApp::new(api.clone());

    let status = app.fetch_todolists().await.unwrap();

    assert!(status.is_failed());
    assert!(app.todolists().await.is_empty());
    assert_eq!(api.call_count(Endpoint::GetTasks), 0);
}

#[tokio::test]
async fn remove_todolist_clears_both_stores() {
    let api = MockTaskApi::new()
        .with_list("list1", "Groceries")
        .with_task(Task::new(TaskId::new("t1"), list1(), "Buy milk"));
    let app = app_with_list(&api).await;

    let status = app.remove_todolist(list1()).await.unwrap();

    assert!(status.is_succeeded());
    assert!(app.todolists().await.is_empty());
    assert!(app.tasks(&list1()).await.is_empty());
    let state = app.store().state(Clone::clone).await;
    assert!(!state.tasks.has_list(&list1()));
}

#[tokio::test]
async fn filter_and_clear_data_are_local() {
    let mut done = Task::new(TaskId::new("t2"), list1(), "Done already");
    done.status = TaskStatus::Completed;
    let api = MockTaskApi::new()
        .with_list("list1", "Groceries")
        .with_task(Task::new(TaskId::new("t1"), list1(), "Buy milk"))
        .with_task(done);
    let app = app_with_list(&api).await;
    let calls_before = api.calls().len();

    app.change_filter(list1(), Filter::Active).await.unwrap();
    let visible = app.visible_tasks(&list1()).await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Buy milk");

    app.clear_data().await.unwrap();
    assert!(app.todolists().await.is_empty());
    assert!(app.tasks(&list1()).await.is_empty());

    let local = app.add_local_todolist("Scratch").await.unwrap();
    assert_eq!(app.todolists().await[0].id, local);

    assert_eq!(api.calls().len(), calls_before);
}
