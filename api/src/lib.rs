//! # todo-list service client
//!
//! Typed access to the REST service that stores todolists and tasks.
//!
//! ## Example
//!
//! ```no_run
//! use todosync_api::{ApiConfig, HttpTaskApi, TaskApi, TodolistId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpTaskApi::new(
//!         ApiConfig::new("https://todo.example.com/api/1.1").with_api_key("secret"),
//!     )?;
//!
//!     let created = api.create_task(&TodolistId::new("list-1"), "Buy milk").await?;
//!     match created.data.item {
//!         Some(task) if created.is_success() => println!("created {}", task.id),
//!         _ => println!("rejected: {:?}", created.messages),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error model
//!
//! - `Err(ApiError)`: the transport failed (no response, non-2xx status,
//!   malformed body)
//! - `Ok(envelope)` with `result_code != 0`: the service rejected the request

pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod types;

// Re-export main types for convenience
pub use client::HttpTaskApi;
pub use config::ApiConfig;
pub use error::ApiError;
pub use service::{ApiResult, TaskApi};
pub use types::{
    ApiTaskModel, Empty, ItemData, ResponseEnvelope, Task, TaskId, TaskPriority, TaskStatus,
    TasksPage, TodolistDto, TodolistId, UnknownCode, UpdateTaskModel,
};
