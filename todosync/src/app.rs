//! Application facade.
//!
//! [`TodoApp`] wraps the [`Store`] and exposes one async method per
//! operation. Remote operations generate an [`OperationId`], send the command
//! and wait until the store has applied the matching response, then return
//! the operation's finished status.

use crate::status::{AppStatus, OperationId, OperationStatus};
use crate::sync::{AppAction, AppReducer, AppState, SyncEnvironment};
use crate::todolists::{Filter, Todolist};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;
use todosync_api::{Task, TaskApi, TaskId, TodolistId, UpdateTaskModel};
use todosync_runtime::{Store, StoreConfig, StoreError};

/// Errors returned by [`TodoApp`]
///
/// These describe problems with the local runtime. A remote call that fails
/// is not an error here: it comes back as an [`OperationStatus`] with status
/// `Failed`.
#[derive(Error, Debug)]
pub enum AppError {
    /// The store rejected the command or the wait timed out
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The operation was acknowledged or evicted before its result was read
    #[error("Operation {0} was acknowledged before its result was read")]
    Acknowledged(OperationId),
}

/// Configuration for [`TodoApp`]
#[derive(Debug, Clone)]
pub struct TodoAppConfig {
    /// How long a remote operation may take before the facade gives up
    /// waiting for it
    ///
    /// The effect itself is not cancelled; its result is still applied when
    /// it arrives. Keep this above the HTTP client timeout.
    ///
    /// Default: 30 seconds
    pub operation_timeout: Duration,

    /// Actions buffered per waiting caller
    ///
    /// Default: 256
    pub broadcast_capacity: usize,
}

impl TodoAppConfig {
    /// Set the operation timeout
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Set the broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for TodoAppConfig {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(30),
            broadcast_capacity: 256,
        }
    }
}

/// Store type behind [`TodoApp`]
pub type AppStore<A> = Store<AppState, AppAction, SyncEnvironment<A>, AppReducer<A>>;

/// Todo-list client kept in sync with the remote service
pub struct TodoApp<A: TaskApi> {
    store: AppStore<A>,
    config: TodoAppConfig,
}

impl<A: TaskApi> TodoApp<A> {
    /// Creates an app with default configuration
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_config(api, TodoAppConfig::default())
    }

    /// Creates an app with custom configuration
    #[must_use]
    pub fn with_config(api: A, config: TodoAppConfig) -> Self {
        let store_config =
            StoreConfig::default().with_broadcast_capacity(config.broadcast_capacity);
        let store = Store::with_config(
            AppState::new(),
            AppReducer::new(),
            SyncEnvironment::new(Arc::new(api)),
            &store_config,
        );
        Self { store, config }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &AppStore<A> {
        &self.store
    }

    // ========== Remote operations ==========

    /// Loads every list, then the tasks of each list concurrently
    ///
    /// Returns the status of the list fetch. Each task fetch is tracked as
    /// its own operation in [`TodoApp::status`].
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn fetch_todolists(&self) -> Result<OperationStatus, AppError> {
        let status = self.run(|op| AppAction::FetchTodolists { op }).await?;
        if !status.is_succeeded() {
            return Ok(status);
        }

        let list_ids = self.store.state(|s| s.todolists.ids()).await;
        let fetches = list_ids.into_iter().map(|list_id| self.fetch_tasks(list_id));
        for result in join_all(fetches).await {
            result?;
        }

        Ok(status)
    }

    /// Creates a list on the service
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn create_todolist(&self, title: impl Into<String>) -> Result<OperationStatus, AppError> {
        let title = title.into();
        self.run(|op| AppAction::CreateTodolist { op, title }).await
    }

    /// Deletes a list on the service
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn remove_todolist(&self, id: TodolistId) -> Result<OperationStatus, AppError> {
        self.run(|op| AppAction::RemoveTodolist { op, id }).await
    }

    /// Renames a list on the service
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn rename_todolist(
        &self,
        id: TodolistId,
        title: impl Into<String>,
    ) -> Result<OperationStatus, AppError> {
        let title = title.into();
        self.run(|op| AppAction::RenameTodolist { op, id, title }).await
    }

    /// Loads the tasks of one list
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn fetch_tasks(&self, list_id: TodolistId) -> Result<OperationStatus, AppError> {
        self.run(|op| AppAction::FetchTasks { op, list_id }).await
    }

    /// Creates a task on the service
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn add_task(
        &self,
        list_id: TodolistId,
        title: impl Into<String>,
    ) -> Result<OperationStatus, AppError> {
        let title = title.into();
        self.run(|op| AppAction::AddTask { op, list_id, title }).await
    }

    /// Deletes a task on the service
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn remove_task(
        &self,
        list_id: TodolistId,
        task_id: TaskId,
    ) -> Result<OperationStatus, AppError> {
        self.run(|op| AppAction::RemoveTask {
            op,
            list_id,
            task_id,
        })
        .await
    }

    /// Changes fields of a task on the service
    ///
    /// The task must be in the local store; otherwise the operation fails
    /// with [`crate::SyncError::TaskNotFound`] and nothing is sent.
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub async fn update_task(
        &self,
        list_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> Result<OperationStatus, AppError> {
        self.run(|op| AppAction::UpdateTask {
            op,
            list_id,
            task_id,
            model,
        })
        .await
    }

    // ========== Local operations ==========

    /// Adds a list locally only, returning its generated id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn add_local_todolist(&self, title: impl Into<String>) -> Result<TodolistId, AppError> {
        let id = TodolistId::generate();
        self.store
            .send(AppAction::AddLocalTodolist {
                id: id.clone(),
                title: title.into(),
            })
            .await?;
        Ok(id)
    }

    /// Changes which tasks a list shows
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn change_filter(&self, id: TodolistId, filter: Filter) -> Result<(), AppError> {
        self.store.send(AppAction::ChangeFilter { id, filter }).await?;
        Ok(())
    }

    /// Drops every list and task
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn clear_data(&self) -> Result<(), AppError> {
        self.store.send(AppAction::ClearData).await?;
        Ok(())
    }

    /// Forgets a finished operation's status
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn acknowledge(&self, op: OperationId) -> Result<(), AppError> {
        self.store.send(AppAction::AcknowledgeOperation { op }).await?;
        Ok(())
    }

    // ========== Reads ==========

    /// Every list, in display order
    pub async fn todolists(&self) -> Vec<Todolist> {
        self.store.state(|s| s.todolists.lists.clone()).await
    }

    /// Every task of a list, newest first
    pub async fn tasks(&self, list_id: &TodolistId) -> Vec<Task> {
        self.store.state(|s| s.tasks.tasks_for(list_id).to_vec()).await
    }

    /// Tasks of a list that pass its filter
    pub async fn visible_tasks(&self, list_id: &TodolistId) -> Vec<Task> {
        self.store.state(|s| s.visible_tasks(list_id)).await
    }

    /// Request status of the whole app
    pub async fn status(&self) -> AppStatus {
        self.store.state(|s| s.status.clone()).await
    }

    /// Waits for running effects, then stops accepting commands
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), AppError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    async fn run(
        &self,
        command: impl FnOnce(OperationId) -> AppAction,
    ) -> Result<OperationStatus, AppError> {
        let op = OperationId::new();
        let action = command(op);

        self.store
            .send_and_wait_for(
                action,
                move |action| action.completes(op),
                self.config.operation_timeout,
            )
            .instrument(tracing::debug_span!("operation", %op))
            .await?;

        self.store
            .state(|s| s.status.operation(op).cloned())
            .await
            .ok_or(AppError::Acknowledged(op))
    }
}
