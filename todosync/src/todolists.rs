//! Todolist store.
//!
//! An ordered collection of list metadata. The reducer is pure: it never
//! performs I/O and never returns effects.

use serde::{Deserialize, Serialize};
use todosync_api::{Task, TodolistDto, TodolistId};
use todosync_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Which tasks of a list are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Filter {
    /// Whether `task` passes this filter
    #[must_use]
    pub fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_completed(),
            Self::Completed => task.is_completed(),
        }
    }
}

/// A named list of tasks
///
/// The filter is local UI state and is never sent to the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todolist {
    /// Unique identifier
    pub id: TodolistId,
    /// Title
    pub title: String,
    /// Visible subset of tasks
    pub filter: Filter,
}

impl Todolist {
    /// Creates a list showing all tasks
    #[must_use]
    pub fn new(id: TodolistId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            filter: Filter::All,
        }
    }
}

impl From<TodolistDto> for Todolist {
    fn from(dto: TodolistDto) -> Self {
        Self::new(dto.id, dto.title)
    }
}

/// Tasks of `list` that pass its filter, in store order
#[must_use]
pub fn visible_tasks<'a>(list: &Todolist, tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks.iter().filter(|t| list.filter.accepts(t)).collect()
}

/// State of the todolist store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodolistsState {
    /// Lists in display order, oldest first
    pub lists: Vec<Todolist>,
}

impl TodolistsState {
    /// Creates an empty state
    #[must_use]
    pub const fn new() -> Self {
        Self { lists: Vec::new() }
    }

    /// Returns a list by ID
    #[must_use]
    pub fn get(&self, id: &TodolistId) -> Option<&Todolist> {
        self.lists.iter().find(|l| &l.id == id)
    }

    /// Returns true if a list with this ID exists
    #[must_use]
    pub fn exists(&self, id: &TodolistId) -> bool {
        self.get(id).is_some()
    }

    /// Number of lists
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns true if there are no lists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// IDs of every list, in order
    #[must_use]
    pub fn ids(&self) -> Vec<TodolistId> {
        self.lists.iter().map(|l| l.id.clone()).collect()
    }

    fn get_mut(&mut self, id: &TodolistId) -> Option<&mut Todolist> {
        self.lists.iter_mut().find(|l| &l.id == id)
    }
}

/// Actions of the todolist store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodolistAction {
    /// Append a new list with filter `All`
    AddTodolist {
        /// ID, generated locally or assigned by the service
        id: TodolistId,
        /// Title
        title: String,
    },
    /// Remove a list; no-op if absent
    RemoveTodolist {
        /// List to remove
        id: TodolistId,
    },
    /// Rename a list; no-op if absent
    ChangeTodolistTitle {
        /// List to rename
        id: TodolistId,
        /// New title
        title: String,
    },
    /// Change which tasks a list shows; no-op if absent
    ChangeTodolistFilter {
        /// List to change
        id: TodolistId,
        /// New filter
        filter: Filter,
    },
    /// Replace every list, keeping the filter of lists already known
    SetTodolists {
        /// Lists as fetched from the service
        lists: Vec<Todolist>,
    },
    /// Drop everything (logout)
    ClearData,
}

/// Reducer for the todolist store
#[derive(Clone, Copy, Debug, Default)]
pub struct TodolistsReducer;

impl TodolistsReducer {
    /// Creates a new `TodolistsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an action to state
    pub fn apply(state: &mut TodolistsState, action: TodolistAction) {
        match action {
            TodolistAction::AddTodolist { id, title } => {
                state.lists.push(Todolist::new(id, title));
            },
            TodolistAction::RemoveTodolist { id } => {
                state.lists.retain(|l| l.id != id);
            },
            TodolistAction::ChangeTodolistTitle { id, title } => {
                if let Some(list) = state.get_mut(&id) {
                    list.title = title;
                }
            },
            TodolistAction::ChangeTodolistFilter { id, filter } => {
                if let Some(list) = state.get_mut(&id) {
                    list.filter = filter;
                }
            },
            TodolistAction::SetTodolists { lists } => {
                let lists = lists
                    .into_iter()
                    .map(|mut list| {
                        if let Some(known) = state.get(&list.id) {
                            list.filter = known.filter;
                        }
                        list
                    })
                    .collect();
                state.lists = lists;
            },
            TodolistAction::ClearData => state.lists.clear(),
        }
    }
}

impl Reducer for TodolistsReducer {
    type State = TodolistsState;
    type Action = TodolistAction;
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
