//! Error types for the synchronization layer

use thiserror::Error;
use todosync_api::{ApiError, TaskId, TodolistId};

/// Message shown when the service rejects a request without saying why
pub const GENERIC_APPLICATION_ERROR: &str = "Some error occurred";

/// Why a synchronization operation failed
///
/// The `Display` output is the user-facing message stored in the request
/// status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The request never completed (transport, HTTP status, decoding)
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-zero result code
    #[error("{}", application_message(.messages))]
    Application {
        /// Messages returned by the service, possibly empty
        messages: Vec<String>,
    },

    /// The task to update is not in the local store
    #[error("Task {task_id} not found in todolist {list_id}")]
    TaskNotFound {
        /// List that was searched
        list_id: TodolistId,
        /// Task that was requested
        task_id: TaskId,
    },

    /// The local store contradicted the service's answer
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
}

/// Coarse classification of a [`SyncError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport-level failure
    Network,
    /// Rejected by the service
    Application,
    /// Referenced entity missing locally
    NotFound,
    /// Local store out of step with the service
    InconsistentState,
}

impl SyncError {
    /// Application error carrying the service's messages
    #[must_use]
    pub const fn application(messages: Vec<String>) -> Self {
        Self::Application { messages }
    }

    /// Classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Application { .. } => ErrorKind::Application,
            Self::TaskNotFound { .. } => ErrorKind::NotFound,
            Self::InconsistentState(_) => ErrorKind::InconsistentState,
        }
    }
}

impl From<ApiError> for SyncError {
    fn from(error: ApiError) -> Self {
        Self::Network(error.to_string())
    }
}

fn application_message(messages: &[String]) -> String {
    if messages.is_empty() {
        GENERIC_APPLICATION_ERROR.to_string()
    } else {
        messages.join("; ")
    }
}
