//! In-memory todo-list service for tests.
//!
//! [`MockTaskApi`] behaves like a small server: created lists and tasks get
//! sequential ids and are remembered, so later calls see them. Individual
//! endpoints can be made to fail or to answer slowly, and every call is
//! recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use todosync_api::{
    ApiError, ApiResult, ApiTaskModel, Empty, ItemData, ResponseEnvelope, Task, TaskApi, TaskId,
    TasksPage, TodolistDto, TodolistId,
};

/// Endpoints of the service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /todo-lists`
    GetTodolists,
    /// `POST /todo-lists`
    CreateTodolist,
    /// `DELETE /todo-lists/{id}`
    DeleteTodolist,
    /// `PUT /todo-lists/{id}`
    UpdateTodolistTitle,
    /// `GET /todo-lists/{id}/tasks`
    GetTasks,
    /// `POST /todo-lists/{id}/tasks`
    CreateTask,
    /// `PUT /todo-lists/{id}/tasks/{task}`
    UpdateTask,
    /// `DELETE /todo-lists/{id}/tasks/{task}`
    DeleteTask,
}

/// How a failing endpoint answers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockFailure {
    /// Transport failure with this detail
    Network(String),
    /// `resultCode` 1 with these messages
    Rejected(Vec<String>),
}

#[derive(Debug, Default)]
struct MockServer {
    lists: Vec<TodolistDto>,
    tasks: HashMap<TodolistId, Vec<Task>>,
    failures: HashMap<Endpoint, MockFailure>,
    delays: HashMap<Endpoint, Duration>,
    calls: Vec<Endpoint>,
    updates: Vec<ApiTaskModel>,
    next_id: u64,
}

impl MockServer {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// Mock todo-list service
#[derive(Debug, Clone, Default)]
pub struct MockTaskApi {
    server: Arc<Mutex<MockServer>>,
}

impl MockTaskApi {
    /// Create an empty mock service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a list the service already knows.
    #[must_use]
    pub fn with_list(self, id: &str, title: &str) -> Self {
        {
            let mut server = self.lock();
            let id = TodolistId::new(id);
            server.tasks.entry(id.clone()).or_default();
            server.lists.push(TodolistDto {
                id,
                title: title.to_string(),
                added_date: None,
                order: 0,
            });
        }
        self
    }

    /// Add a task the service already knows.
    #[must_use]
    pub fn with_task(self, task: Task) -> Self {
        self.lock().tasks.entry(task.todo_list_id.clone()).or_default().push(task);
        self
    }

    /// Make every call to `endpoint` fail.
    pub fn fail(&self, endpoint: Endpoint, failure: MockFailure) {
        self.lock().failures.insert(endpoint, failure);
    }

    /// Make calls to `endpoint` succeed again.
    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().failures.remove(&endpoint);
    }

    /// Delay every answer of `endpoint`.
    pub fn delay(&self, endpoint: Endpoint, delay: Duration) {
        self.lock().delays.insert(endpoint, delay);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Endpoint> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `endpoint`.
    #[must_use]
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.iter().filter(|c| **c == endpoint).count()
    }

    /// Full records received by `update_task`, in order.
    #[must_use]
    pub fn received_updates(&self) -> Vec<ApiTaskModel> {
        self.lock().updates.clone()
    }

    /// Tasks the service holds for a list.
    #[must_use]
    pub fn server_tasks(&self, list_id: &TodolistId) -> Vec<Task> {
        self.lock().tasks.get(list_id).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, MockServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call, waits the configured delay, and returns the
    /// configured failure, if any
    async fn enter(&self, endpoint: Endpoint) -> Option<MockFailure> {
        let (delay, failure) = {
            let mut server = self.lock();
            server.calls.push(endpoint);
            (
                server.delays.get(&endpoint).copied(),
                server.failures.get(&endpoint).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure
    }

    async fn mutate<D: Default>(
        &self,
        endpoint: Endpoint,
        apply: impl FnOnce(&mut MockServer) -> D,
    ) -> ApiResult<D> {
        match self.enter(endpoint).await {
            Some(MockFailure::Network(detail)) => Err(ApiError::Request(detail)),
            Some(MockFailure::Rejected(messages)) => Ok(ResponseEnvelope::rejected(1, messages)),
            None => Ok(ResponseEnvelope::ok(apply(&mut self.lock()))),
        }
    }

    async fn query<T>(
        &self,
        endpoint: Endpoint,
        read: impl FnOnce(&MockServer) -> T,
    ) -> Result<T, ApiError> {
        match self.enter(endpoint).await {
            Some(MockFailure::Network(detail)) => Err(ApiError::Request(detail)),
            Some(MockFailure::Rejected(messages)) => Err(ApiError::Status {
                status: 400,
                body: messages.join("; "),
            }),
            None => Ok(read(&self.lock())),
        }
    }
}

impl TaskApi for MockTaskApi {
    async fn get_todolists(&self) -> Result<Vec<TodolistDto>, ApiError> {
        self.query(Endpoint::GetTodolists, |server| server.lists.clone()).await
    }

    async fn create_todolist(&self, title: &str) -> ApiResult<ItemData<TodolistDto>> {
        self.mutate(Endpoint::CreateTodolist, |server| {
            let list = TodolistDto {
                id: TodolistId::new(server.next_id("list")),
                title: title.to_string(),
                added_date: None,
                order: 0,
            };
            server.lists.push(list.clone());
            server.tasks.insert(list.id.clone(), Vec::new());
            ItemData::new(list)
        })
        .await
    }

    async fn delete_todolist(&self, id: &TodolistId) -> ApiResult<Empty> {
        self.mutate(Endpoint::DeleteTodolist, |server| {
            server.lists.retain(|l| &l.id != id);
            server.tasks.remove(id);
            Empty {}
        })
        .await
    }

    async fn update_todolist_title(&self, id: &TodolistId, title: &str) -> ApiResult<Empty> {
        self.mutate(Endpoint::UpdateTodolistTitle, |server| {
            if let Some(list) = server.lists.iter_mut().find(|l| &l.id == id) {
                list.title = title.to_string();
            }
            Empty {}
        })
        .await
    }

    async fn get_tasks(&self, list_id: &TodolistId) -> Result<TasksPage, ApiError> {
        self.query(Endpoint::GetTasks, |server| {
            let items = server.tasks.get(list_id).cloned().unwrap_or_default();
            TasksPage {
                total_count: u32::try_from(items.len()).unwrap_or(u32::MAX),
                items,
                error: None,
            }
        })
        .await
    }

    async fn create_task(&self, list_id: &TodolistId, title: &str) -> ApiResult<ItemData<Task>> {
        self.mutate(Endpoint::CreateTask, |server| {
            let task = Task::new(TaskId::new(server.next_id("task")), list_id.clone(), title);
            server.tasks.entry(list_id.clone()).or_default().insert(0, task.clone());
            ItemData::new(task)
        })
        .await
    }

    async fn update_task(
        &self,
        list_id: &TodolistId,
        task_id: &TaskId,
        model: &ApiTaskModel,
    ) -> ApiResult<Empty> {
        self.mutate(Endpoint::UpdateTask, |server| {
            server.updates.push(model.clone());
            let task = server
                .tasks
                .get_mut(list_id)
                .and_then(|tasks| tasks.iter_mut().find(|t| &t.id == task_id));
            if let Some(task) = task {
                task.title.clone_from(&model.title);
                task.description.clone_from(&model.description);
                task.status = model.status;
                task.priority = model.priority;
                task.start_date.clone_from(&model.start_date);
                task.deadline.clone_from(&model.deadline);
            }
            Empty {}
        })
        .await
    }

    async fn delete_task(&self, list_id: &TodolistId, task_id: &TaskId) -> ApiResult<Empty> {
        self.mutate(Endpoint::DeleteTask, |server| {
            if let Some(tasks) = server.tasks.get_mut(list_id) {
                tasks.retain(|t| &t.id != task_id);
            }
            Empty {}
        })
        .await
    }
}
