//! # todosync testing
//!
//! Helpers for testing reducers without a running store.
//!
//! - [`ReducerTest`]: Given-When-Then harness over a single reducer call or a
//!   sequence of actions
//! - [`assertions`]: checks over the effects a reducer returned
//!
//! ## Example
//!
//! ```ignore
//! use todosync_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodolistsReducer::new())
//!     .with_env(())
//!     .given_state(TodolistsState::default())
//!     .when_action(TodolistAction::AddTodolist { id, title })
//!     .then_state(|state| assert_eq!(state.len(), 1))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};
