//! # todosync core
//!
//! The two abstractions every todosync store is built from.
//!
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: description of asynchronous work (a remote call, a fan-out of
//!   calls). Effects are values; the runtime executes them and feeds the
//!   action they produce back into the reducer.
//!
//! Reducers never perform I/O themselves. A synchronization command such as
//! "add a task" is reduced into a status change plus an [`effect::Effect::Future`]
//! that calls the remote service; the outcome of that call comes back as a
//! separate response action.
//!
//! ## Example
//!
//! ```
//! use todosync_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Titles {
//!     items: Vec<String>,
//! }
//!
//! enum TitleAction {
//!     Add(String),
//!     Clear,
//! }
//!
//! struct TitleReducer;
//!
//! impl Reducer for TitleReducer {
//!     type State = Titles;
//!     type Action = TitleAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Titles,
//!         action: TitleAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<TitleAction>; 4]> {
//!         match action {
//!             TitleAction::Add(title) => state.items.push(title),
//!             TitleAction::Clear => state.items.clear(),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = Titles::default();
//! let _ = TitleReducer.reduce(&mut state, TitleAction::Add("Buy milk".into()), &());
//! assert_eq!(state.items, vec!["Buy milk".to_string()]);
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the trait holding all state transitions
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer owns
    /// - `Action`: The closed set of inputs it accepts
    /// - `Environment`: Injected dependencies (remote service clients)
    ///
    /// Implementations must be deterministic: the same state and action always
    /// produce the same new state and the same effect descriptions.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns the effects the runtime must
        /// execute. An empty vector or a lone [`Effect::None`] means there is
        /// nothing to run.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future produced by [`Effect::Future`]
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed by the reducer. They are returned to the store,
    /// which runs them and sends any resulting action back through the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is fed back into
        /// the reducer.
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an effect
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        ///
        /// Empty input collapses to [`Effect::None`].
        #[must_use]
        pub fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            if effects.is_empty() {
                Effect::None
            } else {
                Effect::Parallel(effects)
            }
        }

        /// Whether this effect has nothing to execute
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}
