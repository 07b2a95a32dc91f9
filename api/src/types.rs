//! Wire types for the todo-list service
//!
//! Field names follow the service's camelCase JSON. Task status and priority
//! travel as integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a todolist
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodolistId(String);

impl TodolistId {
    /// Creates a new id from an existing string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh client-side id (uuid v4)
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodolistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodolistId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a task, unique within its todolist
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new id from an existing string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Error for integer codes outside an enum's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    kind: &'static str,
    code: u8,
}

/// Progress of a task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Not started
    #[default]
    New,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
    /// Not yet committed to
    Draft,
}

impl TryFrom<u8> for TaskStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::New),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Draft),
            code => Err(UnknownCode { kind: "status", code }),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::New => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Draft => 3,
        }
    }
}

/// Urgency of a task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Low
    #[default]
    Low,
    /// Middle
    Middle,
    /// High
    High,
    /// Urgent
    Urgent,
    /// Deferred
    Later,
}

impl TryFrom<u8> for TaskPriority {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Low),
            1 => Ok(Self::Middle),
            2 => Ok(Self::High),
            3 => Ok(Self::Urgent),
            4 => Ok(Self::Later),
            code => Err(UnknownCode { kind: "priority", code }),
        }
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => 0,
            TaskPriority::Middle => 1,
            TaskPriority::High => 2,
            TaskPriority::Urgent => 3,
            TaskPriority::Later => 4,
        }
    }
}

/// A task as stored by the service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task id
    pub id: TaskId,
    /// Owning todolist
    pub todo_list_id: TodolistId,
    /// Title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Progress
    #[serde(default)]
    pub status: TaskStatus,
    /// Urgency
    #[serde(default)]
    pub priority: TaskPriority,
    /// Planned start, as sent by the service
    #[serde(default)]
    pub start_date: Option<String>,
    /// Deadline, as sent by the service
    #[serde(default)]
    pub deadline: Option<String>,
    /// Server-side ordering hint
    #[serde(default)]
    pub order: i32,
    /// Creation timestamp, as sent by the service
    #[serde(default)]
    pub added_date: Option<String>,
}

impl Task {
    /// Creates a task with default status, priority and no scheduling
    #[must_use]
    pub fn new(id: TaskId, todo_list_id: TodolistId, title: impl Into<String>) -> Self {
        Self {
            id,
            todo_list_id,
            title: title.into(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: None,
        }
    }

    /// Whether the task is done
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Shallow-merges `model` onto this task
    ///
    /// Only fields present in `model` change; `id` and `todo_list_id` are
    /// never touched.
    pub fn apply(&mut self, model: &UpdateTaskModel) {
        if let Some(title) = &model.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &model.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = model.status {
            self.status = status;
        }
        if let Some(priority) = model.priority {
            self.priority = priority;
        }
        if let Some(start_date) = &model.start_date {
            self.start_date = Some(start_date.clone());
        }
        if let Some(deadline) = &model.deadline {
            self.deadline = Some(deadline.clone());
        }
    }
}

/// Partial update of a task; absent fields keep their current value
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// New deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl UpdateTaskModel {
    /// Update that only changes the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Update that only changes the status
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Full task record sent with `PUT`; the service does not accept patches
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTaskModel {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Progress
    pub status: TaskStatus,
    /// Urgency
    pub priority: TaskPriority,
    /// Planned start
    pub start_date: Option<String>,
    /// Deadline
    pub deadline: Option<String>,
    /// Always `status == Completed`
    ///
    /// Tasks carry no completion flag of their own, so the flag sent to the
    /// service is derived from `status` and the two never disagree.
    pub completed: bool,
}

impl ApiTaskModel {
    /// Current task with `model` merged on top
    #[must_use]
    pub fn merged(task: &Task, model: &UpdateTaskModel) -> Self {
        let mut merged = task.clone();
        merged.apply(model);
        Self::from(&merged)
    }
}

impl From<&Task> for ApiTaskModel {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date.clone(),
            deadline: task.deadline.clone(),
            completed: task.is_completed(),
        }
    }
}

/// A todolist as stored by the service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodolistDto {
    /// List id
    pub id: TodolistId,
    /// Title
    pub title: String,
    /// Creation timestamp
    #[serde(default)]
    pub added_date: Option<String>,
    /// Server-side ordering hint
    #[serde(default)]
    pub order: i32,
}

/// Envelope around every mutating response
///
/// `result_code == 0` is success; anything else is an application error
/// described by `messages`. The service omits `data` on deletes and sends
/// `"data": {}` on rejections, so a missing payload decodes to `D::default()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<D> {
    /// Application-level result
    pub result_code: i32,
    /// Human-readable messages, usually set on failure
    #[serde(default)]
    pub messages: Vec<String>,
    /// Payload
    #[serde(default)]
    pub data: D,
}

impl<D> ResponseEnvelope<D> {
    /// Successful envelope around `data`
    #[must_use]
    pub const fn ok(data: D) -> Self {
        Self {
            result_code: 0,
            messages: Vec::new(),
            data,
        }
    }

    /// Whether the service accepted the request
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result_code == 0
    }
}

impl<D: Default> ResponseEnvelope<D> {
    /// Failed envelope carrying `messages` and an empty payload
    #[must_use]
    pub fn rejected(result_code: i32, messages: Vec<String>) -> Self {
        Self {
            result_code,
            messages,
            data: D::default(),
        }
    }
}

/// `data` payload holding a single created item
///
/// `item` is only present on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData<T> {
    /// The created item
    #[serde(default = "Option::default")]
    pub item: Option<T>,
}

impl<T> ItemData<T> {
    /// Payload around a created item
    #[must_use]
    pub const fn new(item: T) -> Self {
        Self { item: Some(item) }
    }
}

impl<T> Default for ItemData<T> {
    fn default() -> Self {
        Self { item: None }
    }
}

/// `data` payload of responses that return nothing (`"data": {}`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Body of `GET /todo-lists/{id}/tasks`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksPage {
    /// Tasks of the list
    #[serde(default)]
    pub items: Vec<Task>,
    /// Total number of tasks on the server
    #[serde(default)]
    pub total_count: u32,
    /// Error text, if the service reported one
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task() -> Task {
        Task::new(TaskId::new("t1"), TodolistId::new("l1"), "Buy milk")
    }

    #[test]
    fn task_decodes_from_service_json() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "todoListId": "l1",
            "title": "Buy milk",
            "description": null,
            "status": 2,
            "priority": 3,
            "startDate": null,
            "deadline": "2026-10-20T00:00:00",
            "order": -1,
            "addedDate": "2026-10-17T10:00:00"
        }))
        .unwrap();

        assert_eq!(task.id, TaskId::new("t1"));
        assert_eq!(task.todo_list_id, TodolistId::new("l1"));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.priority, TaskPriority::Urgent);
        assert_eq!(task.deadline.as_deref(), Some("2026-10-20T00:00:00"));
        assert!(task.is_completed());
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let result = serde_json::from_value::<Task>(json!({
            "id": "t1", "todoListId": "l1", "title": "x", "status": 9
        }));
        assert!(result.is_err());
        assert_eq!(
            TaskStatus::try_from(9).unwrap_err().to_string(),
            "unknown status code 9"
        );
    }

    #[test]
    fn apply_keeps_identity_and_unset_fields() {
        let mut task = task();
        task.description = Some("2 litres".into());

        task.apply(&UpdateTaskModel {
            title: Some("Buy oat milk".into()),
            priority: Some(TaskPriority::High),
            ..UpdateTaskModel::default()
        });

        assert_eq!(task.id, TaskId::new("t1"));
        assert_eq!(task.todo_list_id, TodolistId::new("l1"));
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.description.as_deref(), Some("2 litres"));
        assert_eq!(task.status, TaskStatus::New);
    }

    #[test]
    fn merged_model_is_full_record() {
        let mut task = task();
        task.deadline = Some("2026-12-01".into());

        let model = ApiTaskModel::merged(&task, &UpdateTaskModel::status(TaskStatus::Completed));
        let body = serde_json::to_value(&model).unwrap();

        assert_eq!(
            body,
            json!({
                "title": "Buy milk",
                "description": null,
                "status": 2,
                "priority": 0,
                "startDate": null,
                "deadline": "2026-12-01",
                "completed": true
            })
        );
    }

    #[test]
    fn completed_flag_follows_status() {
        let mut task = task();
        task.status = TaskStatus::Completed;
        assert!(ApiTaskModel::from(&task).completed);

        let reopened = ApiTaskModel::merged(&task, &UpdateTaskModel::status(TaskStatus::InProgress));
        assert!(!reopened.completed);
        assert_eq!(reopened.status, TaskStatus::InProgress);
    }

    #[test]
    fn envelope_with_error_messages() {
        let envelope: ResponseEnvelope<Empty> = serde_json::from_value(json!({
            "resultCode": 1,
            "messages": ["title is required"],
            "data": {}
        }))
        .unwrap();

        assert!(!envelope.is_success());
        assert_eq!(envelope.messages, vec!["title is required"]);
    }

    #[test]
    fn envelope_without_data_decodes() {
        let envelope: ResponseEnvelope<Empty> =
            serde_json::from_value(json!({ "resultCode": 0 })).unwrap();

        assert!(envelope.is_success());
        assert!(envelope.messages.is_empty());
    }

    #[test]
    fn rejected_create_has_no_item() {
        let envelope: ResponseEnvelope<ItemData<Task>> = serde_json::from_value(json!({
            "resultCode": 1,
            "messages": ["title is required"],
            "data": {}
        }))
        .unwrap();

        assert!(!envelope.is_success());
        assert!(envelope.data.item.is_none());
    }

    #[test]
    fn generated_list_ids_are_unique() {
        assert_ne!(TodolistId::generate(), TodolistId::generate());
    }
}
