//! Request status tracking.
//!
//! Every synchronization command carries an [`OperationId`] and gets its own
//! entry in [`AppStatus::operations`], so concurrent operations never
//! overwrite each other's outcome. The union flag ([`AppStatus::status`] and
//! [`AppStatus::error`]) mirrors whichever operation changed state last.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use uuid::Uuid;

/// Correlation token for one synchronization command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    /// Creates a new random `OperationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an `OperationId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which remote call an operation performs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// `GET /todo-lists`
    FetchTodolists,
    /// `POST /todo-lists`
    CreateTodolist,
    /// `DELETE /todo-lists/{id}`
    RemoveTodolist,
    /// `PUT /todo-lists/{id}`
    RenameTodolist,
    /// `GET /todo-lists/{id}/tasks`
    FetchTasks,
    /// `POST /todo-lists/{id}/tasks`
    AddTask,
    /// `DELETE /todo-lists/{id}/tasks/{task}`
    RemoveTask,
    /// `PUT /todo-lists/{id}/tasks/{task}`
    UpdateTask,
}

impl OperationKind {
    /// Stable lowercase name, used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchTodolists => "fetch_todolists",
            Self::CreateTodolist => "create_todolist",
            Self::RemoveTodolist => "remove_todolist",
            Self::RenameTodolist => "rename_todolist",
            Self::FetchTasks => "fetch_tasks",
            Self::AddTask => "add_task",
            Self::RemoveTask => "remove_task",
            Self::UpdateTask => "update_task",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a remote request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Nothing happening
    #[default]
    Idle,
    /// Request sent, no answer yet
    Loading,
    /// The service accepted the request and the store was updated
    Succeeded,
    /// Transport or application failure; the store was not changed
    Failed,
}

impl RequestStatus {
    /// Whether the request has an outcome
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Status of a single operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Correlation token
    pub id: OperationId,
    /// Remote call being performed
    pub kind: OperationKind,
    /// Current lifecycle state
    pub status: RequestStatus,
    /// User-facing error message when `status` is `Failed`
    pub error: Option<String>,
}

impl OperationStatus {
    /// Whether the operation succeeded
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.status == RequestStatus::Succeeded
    }

    /// Whether the operation failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == RequestStatus::Failed
    }
}

/// Finished operations kept in [`AppStatus::operations`] before the oldest
/// are evicted
pub const MAX_FINISHED_OPERATIONS: usize = 64;

/// Request status of the whole application
///
/// Operations still `Loading` are always tracked. At most
/// [`MAX_FINISHED_OPERATIONS`] finished ones are kept; beyond that the
/// oldest finished entry is dropped. Eviction leaves the union flag alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    /// Union flag: status of the operation that changed state last
    pub status: RequestStatus,
    /// Union error message, set when `status` is `Failed`
    pub error: Option<String>,
    /// Operation the union flag describes
    pub last: Option<OperationId>,
    /// Per-operation statuses
    pub operations: HashMap<OperationId, OperationStatus>,
    /// Finished operations, oldest first
    #[serde(skip)]
    finished: VecDeque<OperationId>,
}

impl AppStatus {
    /// Creates an idle status
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `op` as `Loading`
    pub fn begin(&mut self, op: OperationId, kind: OperationKind) {
        self.operations.insert(
            op,
            OperationStatus {
                id: op,
                kind,
                status: RequestStatus::Loading,
                error: None,
            },
        );
        self.set_union(op, RequestStatus::Loading, None);
    }

    /// Marks `op` as `Succeeded`
    pub fn succeed(&mut self, op: OperationId) {
        self.finish(op, RequestStatus::Succeeded, None);
    }

    /// Marks `op` as `Failed` with the error's user-facing message
    pub fn fail(&mut self, op: OperationId, error: &SyncError) {
        self.finish(op, RequestStatus::Failed, Some(error.to_string()));
    }

    /// Forgets a finished operation
    ///
    /// Operations still `Loading` are kept. If the union flag described `op`
    /// it is reset to `Idle`. Returns the removed status.
    pub fn acknowledge(&mut self, op: OperationId) -> Option<OperationStatus> {
        if !self.operations.get(&op)?.status.is_finished() {
            return None;
        }

        if self.last == Some(op) {
            self.status = RequestStatus::Idle;
            self.error = None;
            self.last = None;
        }

        self.finished.retain(|id| *id != op);
        self.operations.remove(&op)
    }

    /// Status of `op`, if it is tracked
    #[must_use]
    pub fn operation(&self, op: OperationId) -> Option<&OperationStatus> {
        self.operations.get(&op)
    }

    /// Number of operations still waiting for the service
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.operations
            .values()
            .filter(|o| o.status == RequestStatus::Loading)
            .count()
    }

    fn finish(&mut self, op: OperationId, status: RequestStatus, error: Option<String>) {
        if let Some(entry) = self.operations.get_mut(&op) {
            if !entry.status.is_finished() {
                self.finished.push_back(op);
            }
            entry.status = status;
            entry.error.clone_from(&error);
        } else {
            tracing::warn!(%op, "finished an operation that was never started");
        }
        self.set_union(op, status, error);
        self.evict_finished();
    }

    fn evict_finished(&mut self) {
        while self.finished.len() > MAX_FINISHED_OPERATIONS {
            if let Some(oldest) = self.finished.pop_front() {
                self.operations.remove(&oldest);
            }
        }
    }

    fn set_union(&mut self, op: OperationId, status: RequestStatus, error: Option<String>) {
        self.status = status;
        self.error = error;
        self.last = Some(op);
    }
}
