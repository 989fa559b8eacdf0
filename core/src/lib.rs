//! # Composable Todo Core
//!
//! Core traits and types for reducer-driven state containers.
//!
//! This crate provides the fundamental abstractions shared by the runtime and
//! by applications built on it.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use composable_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!             CounterAction::Reset => state.count = 0,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// The reducer mutates the state it is handed. Callers that need every
    /// transition to yield a fresh value (the runtime `Store` does) reduce
    /// into a copy and swap it in afterwards.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;
        /// The action type this reducer processes
        type Action;
        /// The environment type (injected dependencies)
        type Environment;

        /// Apply an action to the state and describe follow-up effects
        ///
        /// Effects are returned as values; executing them is the runtime's job.
        /// Most reducers produce zero or one effect, which fits inline in the
        /// `SmallVec` without allocating.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap an async block that may produce a follow-up action
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Dispatch `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of unique identifiers
    ///
    /// Implementations must never hand out the same value twice for the
    /// lifetime of the generator. Once no fresh value is left they return
    /// `None` instead of reusing one.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier, or `None` if the id space is used up
        fn next_id(&self) -> Option<u64>;
    }

    /// Monotonic counter id source
    ///
    /// Unlike timestamp-derived ids, two calls in the same clock tick still
    /// yield distinct values. Ids are never 0, and the counter stops after
    /// handing out `u64::MAX` rather than wrapping.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_core::environment::{IdGenerator, SequentialIdGenerator};
    ///
    /// let ids = SequentialIdGenerator::starting_at(10);
    /// assert_eq!(ids.next_id(), Some(10));
    /// assert_eq!(ids.next_id(), Some(11));
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        // Next id to hand out; 0 once exhausted.
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Create a generator whose first id is `first` (0 is taken as 1)
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(if first == 0 { 1 } else { first }),
            }
        }

        /// The id the next call to [`IdGenerator::next_id`] will return
        #[must_use]
        pub fn peek(&self) -> Option<u64> {
            match self.next.load(Ordering::SeqCst) {
                0 => None,
                next => Some(next),
            }
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Option<u64> {
            self.next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                    (next != 0).then(|| next.wrapping_add(1))
                })
                .ok()
        }
    }
}
