//! The remote service as seen by the synchronization layer.

use crate::error::ApiError;
use crate::types::{
    ApiTaskModel, Empty, ItemData, ResponseEnvelope, TaskId, TasksPage, Task, TodolistDto,
    TodolistId,
};
use std::future::Future;

/// Result of a mutating call: transport succeeded, application result inside
pub type ApiResult<D> = Result<ResponseEnvelope<D>, ApiError>;

/// CRUD operations of the todo-list service.
///
/// `Err` always means a transport-level failure. Mutating calls that reached
/// the service return its envelope even when it rejected the request; the
/// caller decides what a non-zero `result_code` means.
pub trait TaskApi: Send + Sync + 'static {
    /// `GET /todo-lists`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn get_todolists(&self) -> impl Future<Output = Result<Vec<TodolistDto>, ApiError>> + Send;

    /// `POST /todo-lists`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn create_todolist(
        &self,
        title: &str,
    ) -> impl Future<Output = ApiResult<ItemData<TodolistDto>>> + Send;

    /// `DELETE /todo-lists/{id}`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn delete_todolist(&self, id: &TodolistId) -> impl Future<Output = ApiResult<Empty>> + Send;

    /// `PUT /todo-lists/{id}`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn update_todolist_title(
        &self,
        id: &TodolistId,
        title: &str,
    ) -> impl Future<Output = ApiResult<Empty>> + Send;

    /// `GET /todo-lists/{list_id}/tasks`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn get_tasks(
        &self,
        list_id: &TodolistId,
    ) -> impl Future<Output = Result<TasksPage, ApiError>> + Send;

    /// `POST /todo-lists/{list_id}/tasks`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn create_task(
        &self,
        list_id: &TodolistId,
        title: &str,
    ) -> impl Future<Output = ApiResult<ItemData<Task>>> + Send;

    /// `PUT /todo-lists/{list_id}/tasks/{task_id}` with the full record
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn update_task(
        &self,
        list_id: &TodolistId,
        task_id: &TaskId,
        model: &ApiTaskModel,
    ) -> impl Future<Output = ApiResult<Empty>> + Send;

    /// `DELETE /todo-lists/{list_id}/tasks/{task_id}`
    ///
    /// # Errors
    ///
    /// Transport or decoding failure.
    fn delete_task(
        &self,
        list_id: &TodolistId,
        task_id: &TaskId,
    ) -> impl Future<Output = ApiResult<Empty>> + Send;
}
