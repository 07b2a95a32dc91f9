//! # todosync
//!
//! Client-side todolists and tasks, kept in sync with a remote todo-list
//! service.
//!
//! State lives in one [`AppState`] behind a [`todosync_runtime::Store`]. Every
//! change goes through [`AppReducer`]: local changes apply at once, remote
//! ones are confirm-then-apply. The store changes only after the service
//! accepts the request.
//!
//! ## Example
//!
//! ```no_run
//! use todosync::{HttpTaskApi, TodoApp};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = TodoApp::new(HttpTaskApi::from_env()?);
//!
//!     app.fetch_todolists().await?;
//!     for list in app.todolists().await {
//!         let status = app.add_task(list.id.clone(), "Buy milk").await?;
//!         println!("{}: {:?}", list.title, status.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`todolists`]: todolist store and filters
//! - [`tasks`]: task store
//! - [`status`]: per-operation request status
//! - [`sync`]: the reducer that talks to the service
//! - [`app`]: async facade over the store

pub mod app;
pub mod error;
pub mod status;
pub mod sync;
pub mod tasks;
pub mod todolists;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use app::{AppError, AppStore, TodoApp, TodoAppConfig};
pub use error::{ErrorKind, SyncError};
pub use status::{
    AppStatus, MAX_FINISHED_OPERATIONS, OperationId, OperationKind, OperationStatus,
    RequestStatus,
};
pub use sync::{AppAction, AppReducer, AppState, SyncEnvironment};
pub use tasks::{TaskAction, TaskStoreError, TasksReducer, TasksState};
pub use todolists::{Filter, Todolist, TodolistAction, TodolistsReducer, TodolistsState};

// Service types callers need alongside the store
pub use todosync_api::{
    ApiConfig, ApiError, HttpTaskApi, Task, TaskApi, TaskId, TaskPriority, TaskStatus,
    TodolistId, UpdateTaskModel,
};
