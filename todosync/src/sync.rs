//! Synchronization layer.
//!
//! [`AppReducer`] owns the combined [`AppState`] and turns intent into remote
//! calls. Updates are confirm-then-apply: a command marks its operation
//! `Loading` and returns an effect that calls the service; the store changes
//! only when the effect feeds back a response action for an accepted request.
//!
//! ```text
//! AddTask{op}  ──► status[op] = Loading, Effect::Future(create_task)
//!                        │
//!           ┌────────────┴─────────────┐
//!     resultCode == 0           transport error / resultCode != 0
//!           │                          │
//!  TaskAdded{op, task}      OperationFailed{op, error}
//!  tasks[list].prepend      status[op] = Failed
//!  status[op] = Succeeded   (store unchanged)
//! ```

use crate::error::SyncError;
use crate::status::{AppStatus, OperationId, OperationKind};
use crate::tasks::{TaskAction, TasksReducer, TasksState};
use crate::todolists::{Filter, Todolist, TodolistAction, TodolistsReducer, TodolistsState};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use todosync_api::{
    ApiError, ApiResult, ApiTaskModel, ItemData, Task, TaskApi, TaskId, TodolistDto, TodolistId,
    UpdateTaskModel,
};
use todosync_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Combined application state
///
/// Todolists and tasks live side by side so that adding or removing a list
/// updates both in one reducer call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Todolist store
    pub todolists: TodolistsState,
    /// Task store
    pub tasks: TasksState,
    /// Request status
    pub status: AppStatus,
}

impl AppState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks of `list_id` that pass the list's filter
    ///
    /// Empty if the list is unknown.
    #[must_use]
    pub fn visible_tasks(&self, list_id: &TodolistId) -> Vec<Task> {
        self.todolists.get(list_id).map_or_else(Vec::new, |list| {
            crate::todolists::visible_tasks(list, self.tasks.tasks_for(list_id))
                .into_iter()
                .cloned()
                .collect()
        })
    }
}

/// Everything that can happen to the application
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    // ========== Commands ==========
    /// Load every todolist from the service
    FetchTodolists {
        /// Correlation token
        op: OperationId,
    },
    /// Create a todolist on the service
    CreateTodolist {
        /// Correlation token
        op: OperationId,
        /// Title
        title: String,
    },
    /// Delete a todolist on the service
    RemoveTodolist {
        /// Correlation token
        op: OperationId,
        /// List to delete
        id: TodolistId,
    },
    /// Rename a todolist on the service
    RenameTodolist {
        /// Correlation token
        op: OperationId,
        /// List to rename
        id: TodolistId,
        /// New title
        title: String,
    },
    /// Load the tasks of one list
    FetchTasks {
        /// Correlation token
        op: OperationId,
        /// List to load
        list_id: TodolistId,
    },
    /// Create a task on the service
    AddTask {
        /// Correlation token
        op: OperationId,
        /// Owning list
        list_id: TodolistId,
        /// Title
        title: String,
    },
    /// Delete a task on the service
    RemoveTask {
        /// Correlation token
        op: OperationId,
        /// Owning list
        list_id: TodolistId,
        /// Task to delete
        task_id: TaskId,
    },
    /// Change fields of a task on the service
    UpdateTask {
        /// Correlation token
        op: OperationId,
        /// Owning list
        list_id: TodolistId,
        /// Task to change
        task_id: TaskId,
        /// Fields to change
        model: UpdateTaskModel,
    },

    // ========== Local ==========
    /// Change a list's filter (never sent to the service)
    ChangeFilter {
        /// List to change
        id: TodolistId,
        /// New filter
        filter: Filter,
    },
    /// Add a list locally only
    AddLocalTodolist {
        /// Locally generated id
        id: TodolistId,
        /// Title
        title: String,
    },
    /// Drop all lists and tasks (logout)
    ClearData,
    /// Forget a finished operation's status
    AcknowledgeOperation {
        /// Operation to forget
        op: OperationId,
    },

    // ========== Responses ==========
    /// Lists fetched
    TodolistsFetched {
        /// Correlation token
        op: OperationId,
        /// Lists as returned by the service
        lists: Vec<TodolistDto>,
    },
    /// List created
    TodolistCreated {
        /// Correlation token
        op: OperationId,
        /// List as returned by the service
        list: TodolistDto,
    },
    /// List deleted
    TodolistRemoved {
        /// Correlation token
        op: OperationId,
        /// Deleted list
        id: TodolistId,
    },
    /// List renamed
    TodolistRenamed {
        /// Correlation token
        op: OperationId,
        /// Renamed list
        id: TodolistId,
        /// New title
        title: String,
    },
    /// Tasks of one list fetched
    TasksFetched {
        /// Correlation token
        op: OperationId,
        /// List the tasks belong to
        list_id: TodolistId,
        /// Tasks as returned by the service
        tasks: Vec<Task>,
    },
    /// Task created
    TaskAdded {
        /// Correlation token
        op: OperationId,
        /// Task as returned by the service
        task: Task,
    },
    /// Task deleted
    TaskRemoved {
        /// Correlation token
        op: OperationId,
        /// Owning list
        list_id: TodolistId,
        /// Deleted task
        task_id: TaskId,
    },
    /// Task changed
    TaskUpdated {
        /// Correlation token
        op: OperationId,
        /// Owning list
        list_id: TodolistId,
        /// Changed task
        task_id: TaskId,
        /// Fields that changed
        model: UpdateTaskModel,
    },
    /// The operation failed; nothing was applied
    OperationFailed {
        /// Correlation token
        op: OperationId,
        /// Why
        error: SyncError,
    },
}

impl AppAction {
    /// The operation this action finishes, if it is a response
    #[must_use]
    pub const fn completed_operation(&self) -> Option<OperationId> {
        match self {
            Self::TodolistsFetched { op, .. }
            | Self::TodolistCreated { op, .. }
            | Self::TodolistRemoved { op, .. }
            | Self::TodolistRenamed { op, .. }
            | Self::TasksFetched { op, .. }
            | Self::TaskAdded { op, .. }
            | Self::TaskRemoved { op, .. }
            | Self::TaskUpdated { op, .. }
            | Self::OperationFailed { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Whether this action finishes `op`
    #[must_use]
    pub fn completes(&self, op: OperationId) -> bool {
        self.completed_operation() == Some(op)
    }
}

/// Dependencies of the synchronization layer
pub struct SyncEnvironment<A> {
    /// The remote service
    pub api: Arc<A>,
}

impl<A> SyncEnvironment<A> {
    /// Creates an environment around a shared service client
    #[must_use]
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A> Clone for SyncEnvironment<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

/// Reducer for the whole application
pub struct AppReducer<A> {
    _api: PhantomData<fn() -> A>,
}

impl<A> AppReducer<A> {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self { _api: PhantomData }
    }
}

impl<A> Default for AppReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for AppReducer<A> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for AppReducer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppReducer").finish()
    }
}

/// Unwraps an accepted envelope; transport errors and rejections become
/// [`SyncError`]s
fn accepted<D>(result: ApiResult<D>) -> Result<D, SyncError> {
    let envelope = result?;
    if envelope.is_success() {
        Ok(envelope.data)
    } else {
        Err(SyncError::application(envelope.messages))
    }
}

/// Unwraps the item of an accepted create; an accepted envelope without an
/// item is a malformed response
fn created<T>(result: ApiResult<ItemData<T>>) -> Result<T, SyncError> {
    accepted(result)?.item.ok_or_else(|| {
        SyncError::from(ApiError::Decode("accepted response carries no item".to_string()))
    })
}

/// Response action for `op`: `on_success` for `Ok`, `OperationFailed` otherwise
fn respond<T>(
    op: OperationId,
    outcome: Result<T, SyncError>,
    on_success: impl FnOnce(T) -> AppAction,
) -> Option<AppAction> {
    Some(match outcome {
        Ok(value) => on_success(value),
        Err(error) => AppAction::OperationFailed { op, error },
    })
}

impl<A: TaskApi> AppReducer<A> {
    fn begin(state: &mut AppState, op: OperationId, kind: OperationKind) {
        tracing::debug!(%op, %kind, "operation started");
        state.status.begin(op, kind);
    }

    fn succeed(state: &mut AppState, op: OperationId) {
        tracing::debug!(%op, "operation succeeded");
        state.status.succeed(op);
    }

    fn fail(state: &mut AppState, op: OperationId, error: &SyncError) {
        tracing::warn!(%op, kind = ?error.kind(), %error, "operation failed");
        state.status.fail(op, error);
    }

    fn apply_lists(state: &mut AppState, action: TodolistAction) {
        TodolistsReducer::apply(&mut state.todolists, action);
    }

    /// Applies a task action inside operation `op`, failing the operation if
    /// the task store reports an inconsistency
    fn apply_tasks(state: &mut AppState, op: OperationId, action: TaskAction) {
        TasksReducer::apply(&mut state.tasks, action);
        match state.tasks.last_error.clone() {
            None => Self::succeed(state, op),
            Some(error) => {
                Self::fail(state, op, &SyncError::InconsistentState(error.to_string()));
            },
        }
    }

    fn handle_command(
        state: &mut AppState,
        action: AppAction,
        env: &SyncEnvironment<A>,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        let api = Arc::clone(&env.api);

        match action {
            AppAction::FetchTodolists { op } => {
                Self::begin(state, op, OperationKind::FetchTodolists);
                smallvec![Effect::future(async move {
                    let outcome = api.get_todolists().await.map_err(SyncError::from);
                    respond(op, outcome, |lists| AppAction::TodolistsFetched { op, lists })
                })]
            },
            AppAction::CreateTodolist { op, title } => {
                Self::begin(state, op, OperationKind::CreateTodolist);
                smallvec![Effect::future(async move {
                    let outcome = created(api.create_todolist(&title).await);
                    respond(op, outcome, |list| AppAction::TodolistCreated { op, list })
                })]
            },
            AppAction::RemoveTodolist { op, id } => {
                Self::begin(state, op, OperationKind::RemoveTodolist);
                smallvec![Effect::future(async move {
                    let outcome = accepted(api.delete_todolist(&id).await);
                    respond(op, outcome, |_| AppAction::TodolistRemoved { op, id })
                })]
            },
            AppAction::RenameTodolist { op, id, title } => {
                Self::begin(state, op, OperationKind::RenameTodolist);
                smallvec![Effect::future(async move {
                    let outcome = accepted(api.update_todolist_title(&id, &title).await);
                    respond(op, outcome, |_| AppAction::TodolistRenamed { op, id, title })
                })]
            },
            AppAction::FetchTasks { op, list_id } => {
                Self::begin(state, op, OperationKind::FetchTasks);
                smallvec![Effect::future(async move {
                    let outcome = match api.get_tasks(&list_id).await {
                        Ok(page) => match page.error {
                            Some(message) => Err(SyncError::application(vec![message])),
                            None => Ok(page.items),
                        },
                        Err(error) => Err(SyncError::from(error)),
                    };
                    respond(op, outcome, |tasks| AppAction::TasksFetched {
                        op,
                        list_id,
                        tasks,
                    })
                })]
            },
            AppAction::AddTask { op, list_id, title } => {
                Self::begin(state, op, OperationKind::AddTask);
                smallvec![Effect::future(async move {
                    let outcome = created(api.create_task(&list_id, &title).await);
                    respond(op, outcome, |task| AppAction::TaskAdded { op, task })
                })]
            },
            AppAction::RemoveTask {
                op,
                list_id,
                task_id,
            } => {
                Self::begin(state, op, OperationKind::RemoveTask);
                smallvec![Effect::future(async move {
                    let outcome = accepted(api.delete_task(&list_id, &task_id).await);
                    respond(op, outcome, |_| AppAction::TaskRemoved {
                        op,
                        list_id,
                        task_id,
                    })
                })]
            },
            AppAction::UpdateTask {
                op,
                list_id,
                task_id,
                model,
            } => {
                Self::begin(state, op, OperationKind::UpdateTask);

                // The service only accepts full records
                let Some(current) = state.tasks.get(&list_id, &task_id) else {
                    let error = SyncError::TaskNotFound { list_id, task_id };
                    return smallvec![Effect::future(async move {
                        Some(AppAction::OperationFailed { op, error })
                    })];
                };
                let full = ApiTaskModel::merged(current, &model);

                smallvec![Effect::future(async move {
                    let outcome = accepted(api.update_task(&list_id, &task_id, &full).await);
                    respond(op, outcome, |_| AppAction::TaskUpdated {
                        op,
                        list_id,
                        task_id,
                        model,
                    })
                })]
            },
            _ => SmallVec::new(),
        }
    }

    fn handle_local(state: &mut AppState, action: AppAction) {
        match action {
            AppAction::ChangeFilter { id, filter } => {
                Self::apply_lists(state, TodolistAction::ChangeTodolistFilter { id, filter });
            },
            AppAction::AddLocalTodolist { id, title } => {
                Self::apply_lists(state, TodolistAction::AddTodolist {
                    id: id.clone(),
                    title,
                });
                TasksReducer::apply(&mut state.tasks, TaskAction::AddTodoList { list_id: id });
            },
            AppAction::ClearData => {
                Self::apply_lists(state, TodolistAction::ClearData);
                TasksReducer::apply(&mut state.tasks, TaskAction::ClearData);
            },
            AppAction::AcknowledgeOperation { op } => {
                state.status.acknowledge(op);
            },
            _ => {},
        }
    }

    fn handle_response(state: &mut AppState, action: AppAction) {
        match action {
            AppAction::TodolistsFetched { op, lists } => {
                let lists: Vec<Todolist> = lists.into_iter().map(Todolist::from).collect();
                let list_ids = lists.iter().map(|l| l.id.clone()).collect();
                Self::apply_lists(state, TodolistAction::SetTodolists { lists });
                Self::apply_tasks(state, op, TaskAction::SetTodoLists { list_ids });
            },
            AppAction::TodolistCreated { op, list } => {
                let list_id = list.id.clone();
                Self::apply_lists(state, TodolistAction::AddTodolist {
                    id: list.id,
                    title: list.title,
                });
                Self::apply_tasks(state, op, TaskAction::AddTodoList { list_id });
            },
            AppAction::TodolistRemoved { op, id } => {
                Self::apply_lists(state, TodolistAction::RemoveTodolist { id: id.clone() });
                Self::apply_tasks(state, op, TaskAction::RemoveTodoList { list_id: id });
            },
            AppAction::TodolistRenamed { op, id, title } => {
                Self::apply_lists(state, TodolistAction::ChangeTodolistTitle { id, title });
                Self::succeed(state, op);
            },
            AppAction::TasksFetched { op, list_id, tasks } => {
                Self::apply_tasks(state, op, TaskAction::SetTasks { list_id, tasks });
            },
            AppAction::TaskAdded { op, task } => {
                Self::apply_tasks(state, op, TaskAction::AddTask { task });
            },
            AppAction::TaskRemoved {
                op,
                list_id,
                task_id,
            } => {
                Self::apply_tasks(state, op, TaskAction::RemoveTask { list_id, task_id });
            },
            AppAction::TaskUpdated {
                op,
                list_id,
                task_id,
                model,
            } => {
                Self::apply_tasks(state, op, TaskAction::UpdateTask {
                    list_id,
                    task_id,
                    model,
                });
            },
            AppAction::OperationFailed { op, error } => Self::fail(state, op, &error),
            _ => {},
        }
    }
}

impl<A: TaskApi> Reducer for AppReducer<A> {
    type State = AppState;
    type Action = AppAction;
    type Environment = SyncEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::FetchTodolists { .. }
            | AppAction::CreateTodolist { .. }
            | AppAction::RemoveTodolist { .. }
            | AppAction::RenameTodolist { .. }
            | AppAction::FetchTasks { .. }
            | AppAction::AddTask { .. }
            | AppAction::RemoveTask { .. }
            | AppAction::UpdateTask { .. } => Self::handle_command(state, action, env),

            AppAction::ChangeFilter { .. }
            | AppAction::AddLocalTodolist { .. }
            | AppAction::ClearData
            | AppAction::AcknowledgeOperation { .. } => {
                Self::handle_local(state, action);
                SmallVec::new()
            },

            AppAction::TodolistsFetched { .. }
            | AppAction::TodolistCreated { .. }
            | AppAction::TodolistRemoved { .. }
            | AppAction::TodolistRenamed { .. }
            | AppAction::TasksFetched { .. }
            | AppAction::TaskAdded { .. }
            | AppAction::TaskRemoved { .. }
            | AppAction::TaskUpdated { .. }
            | AppAction::OperationFailed { .. } => {
                Self::handle_response(state, action);
                SmallVec::new()
            },
        }
    }
}
