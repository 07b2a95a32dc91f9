//! Task store.
//!
//! Maps each todolist to its ordered tasks, newest first. Every list known
//! to the todolist store has an entry here, possibly empty, and no task
//! exists without its list's entry. Actions that would break that rule leave
//! the state untouched and record a [`TaskStoreError`] instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use todosync_api::{Task, TaskId, TodolistId, UpdateTaskModel};
use todosync_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Problems detected while applying a task action
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStoreError {
    /// The action referenced a list with no task entry
    #[error("No task entry for todolist {list_id}")]
    InconsistentState {
        /// List that was missing
        list_id: TodolistId,
    },
}

/// State of the task store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksState {
    /// Tasks per list, newest first
    pub tasks: HashMap<TodolistId, Vec<Task>>,
    /// Error recorded by the last action, cleared by the next one
    pub last_error: Option<TaskStoreError>,
}

impl TasksState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks of a list; empty if the list has no entry
    #[must_use]
    pub fn tasks_for(&self, list_id: &TodolistId) -> &[Task] {
        self.tasks.get(list_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns a task by list and ID
    #[must_use]
    pub fn get(&self, list_id: &TodolistId, task_id: &TaskId) -> Option<&Task> {
        self.tasks.get(list_id)?.iter().find(|t| &t.id == task_id)
    }

    /// Returns true if the list has an entry
    #[must_use]
    pub fn has_list(&self, list_id: &TodolistId) -> bool {
        self.tasks.contains_key(list_id)
    }

    /// Number of tasks across all lists
    #[must_use]
    pub fn total(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }
}

/// Actions of the task store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskAction {
    /// Replace a list's tasks wholesale
    ///
    /// The list must already have an entry, so a fetch that lands after its
    /// list was removed cannot bring the entry back.
    SetTasks {
        /// List to fill
        list_id: TodolistId,
        /// Tasks as fetched
        tasks: Vec<Task>,
    },
    /// Prepend a task to its list
    AddTask {
        /// The new task; its `todo_list_id` selects the list
        task: Task,
    },
    /// Remove a task
    RemoveTask {
        /// Owning list
        list_id: TodolistId,
        /// Task to remove
        task_id: TaskId,
    },
    /// Merge a partial model into a task
    UpdateTask {
        /// Owning list
        list_id: TodolistId,
        /// Task to update
        task_id: TaskId,
        /// Fields to change
        model: UpdateTaskModel,
    },
    /// A list was added: create its empty entry
    AddTodoList {
        /// The new list
        list_id: TodolistId,
    },
    /// A list was removed: drop its entry
    RemoveTodoList {
        /// The removed list
        list_id: TodolistId,
    },
    /// Lists were fetched: keep exactly these entries
    SetTodoLists {
        /// IDs of every fetched list
        list_ids: Vec<TodolistId>,
    },
    /// Drop everything (logout)
    ClearData,
}

/// Reducer for the task store
#[derive(Clone, Copy, Debug, Default)]
pub struct TasksReducer;

impl TasksReducer {
    /// Creates a new `TasksReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an action to state
    pub fn apply(state: &mut TasksState, action: TaskAction) {
        state.last_error = None;

        match action {
            TaskAction::SetTasks { list_id, tasks } => match state.tasks.get_mut(&list_id) {
                Some(entry) => *entry = tasks,
                None => Self::missing_list(state, list_id),
            },
            TaskAction::AddTask { task } => {
                match state.tasks.get_mut(&task.todo_list_id) {
                    Some(tasks) => tasks.insert(0, task),
                    None => Self::missing_list(state, task.todo_list_id),
                }
            },
            TaskAction::RemoveTask { list_id, task_id } => match state.tasks.get_mut(&list_id) {
                Some(tasks) => tasks.retain(|t| t.id != task_id),
                None => Self::missing_list(state, list_id),
            },
            TaskAction::UpdateTask {
                list_id,
                task_id,
                model,
            } => match state.tasks.get_mut(&list_id) {
                Some(tasks) => {
                    if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
                        task.apply(&model);
                    }
                },
                None => Self::missing_list(state, list_id),
            },
            TaskAction::AddTodoList { list_id } => {
                state.tasks.insert(list_id, Vec::new());
            },
            TaskAction::RemoveTodoList { list_id } => {
                state.tasks.remove(&list_id);
            },
            TaskAction::SetTodoLists { list_ids } => {
                state.tasks.retain(|id, _| list_ids.contains(id));
                for list_id in list_ids {
                    state.tasks.entry(list_id).or_default();
                }
            },
            TaskAction::ClearData => state.tasks.clear(),
        }
    }

    fn missing_list(state: &mut TasksState, list_id: TodolistId) {
        tracing::warn!(%list_id, "task action for a list with no task entry");
        state.last_error = Some(TaskStoreError::InconsistentState { list_id });
    }
}

impl Reducer for TasksReducer {
    type State = TasksState;
    type Action = TaskAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        Self::apply(state, action);
        SmallVec::new()
    }
}
