//! # Composable Todo Runtime
//!
//! The [`Store`]: an explicit state container that owns the current state,
//! runs the reducer for every action, notifies subscribers and executes the
//! effects reducers describe.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment
//! - **Subscriptions**: `watch` channel of state snapshots, `broadcast` channel of actions
//! - **Effect Executor**: Runs effect descriptions and feeds produced actions back
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Apply an action and get the new state value back
//! let next = store.apply(Action::DoSomething).await?;
//!
//! // Re-render whenever the state changes
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     render(&rx.borrow_and_update());
//! }
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reducers themselves cannot fail; these errors only describe the
    /// Store's own lifecycle.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timed out waiting for effects to complete
        #[error("Timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use composable_todo_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(1));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of actions buffered for slow action subscribers
    pub broadcast_capacity: usize,
    /// Timeout used by [`Store::close`]
    pub shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Largest action broadcast capacity a store allocates
    pub const MAX_BROADCAST_CAPACITY: usize = 1 << 16;

    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    ///
    /// Clamped to `1..=MAX_BROADCAST_CAPACITY`.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = if capacity == 0 {
            1
        } else if capacity > Self::MAX_BROADCAST_CAPACITY {
            Self::MAX_BROADCAST_CAPACITY
        } else {
            capacity
        };
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Guard that decrements an atomic counter on drop
///
/// Keeps the pending-effect count right even if the effect panics.
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl AtomicCounterGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, Duration, Effect, Ordering, Reducer,
        RwLock, StoreConfig, StoreError,
    };
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;
    use tokio::sync::{broadcast, watch};

    /// The Store - state container for a reducer
    ///
    /// The Store manages:
    /// 1. State (an `Arc<S>` snapshot behind a `RwLock`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Subscribers (state snapshots and applied actions)
    /// 5. Effect execution (with feedback loop)
    ///
    /// Every transition produces a new state value. The reducer runs against
    /// a copy of the current state and the copy replaces the current state
    /// wholesale, so snapshots handed out earlier never change.
    ///
    /// `Store` is a cheap handle; clones share the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        inner: Arc<Inner<S, A, E, R>>,
    }

    struct Inner<S, A, E, R> {
        state: RwLock<Arc<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        shutdown: AtomicBool,
        pending_effects: Arc<AtomicUsize>,
        state_tx: watch::Sender<Arc<S>>,
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Clone + std::fmt::Debug + Send + Sync + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let capacity = config.broadcast_capacity;
            let config = config.with_broadcast_capacity(capacity);
            let initial = Arc::new(initial_state);
            let (state_tx, _) = watch::channel(Arc::clone(&initial));
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity);

            Self {
                inner: Arc::new(Inner {
                    state: RwLock::new(initial),
                    reducer,
                    environment,
                    config,
                    shutdown: AtomicBool::new(false),
                    pending_effects: Arc::new(AtomicUsize::new(0)),
                    state_tx,
                    action_broadcast,
                }),
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.inner.config
        }

        /// Apply an action and return the resulting state value
        ///
        /// 1. Acquires the write lock (reducer calls are serialised)
        /// 2. Runs the reducer against a copy of the current state
        /// 3. Replaces the current state with the copy
        /// 4. Notifies state and action subscribers
        /// 5. Starts the returned effects
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_apply")]
        pub async fn apply(&self, action: A) -> Result<Arc<S>, StoreError> {
            if self.inner.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(action = ?action, "Applying action");
            metrics::counter!("store.actions.total").increment(1);

            let (next, effects) = {
                let mut current = self.inner.state.write().await;

                let start = std::time::Instant::now();
                let mut next = S::clone(&**current);
                let effects =
                    self.inner
                        .reducer
                        .reduce(&mut next, action.clone(), &self.inner.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                let next = Arc::new(next);
                *current = Arc::clone(&next);

                // Notify while still holding the lock so subscribers observe
                // states and actions in the order they were applied.
                self.inner.state_tx.send_replace(Arc::clone(&next));
                let _ = self.inner.action_broadcast.send(action);

                (next, effects)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(next)
        }

        /// Apply an action, discarding the resulting state
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            self.apply(action).await.map(|_| ())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.inner.state.read().await;
            f(&**state)
        }

        /// The current state value
        pub async fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.inner.state.read().await)
        }

        /// Subscribe to state changes
        ///
        /// The receiver starts at the current state and is marked changed
        /// after every applied action. Slow receivers skip straight to the
        /// latest state, which is all a re-render needs.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
            self.inner.state_tx.subscribe()
        }

        /// Subscribe to every applied action
        ///
        /// Actions arrive in application order, including actions fed back by
        /// effects. A receiver that falls more than the configured broadcast
        /// capacity behind gets [`broadcast::error::RecvError::Lagged`].
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.inner.action_broadcast.subscribe()
        }

        /// Number of effects currently running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.inner.pending_effects.load(Ordering::Acquire)
        }

        /// Wait until no effects are running
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// when `timeout` elapses.
        pub async fn settle(&self, timeout: Duration) -> Result<(), StoreError> {
            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(5);

            loop {
                let pending = self.pending_effects();
                if pending == 0 {
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::trace!(pending_effects = pending, "Waiting for effects to complete");
                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions) and waits for
        /// in-flight effects. Actions fed back by those effects are dropped.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
        /// all pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.inner.shutdown.store(true, Ordering::Release);

            match self.settle(timeout).await {
                Ok(()) => {
                    tracing::info!("All effects completed, shutdown successful");
                    Ok(())
                },
                Err(error) => {
                    tracing::error!(%error, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    Err(error)
                },
            }
        }

        /// Shut down using the configured timeout
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects outlive the
        /// configured `shutdown_timeout`.
        pub async fn close(&self) -> Result<(), StoreError> {
            self.shutdown(self.inner.config.shutdown_timeout).await
        }

        /// Feed an action produced by an effect back into the store
        async fn feed_back(&self, action: A) {
            if let Err(error) = self.apply(action).await {
                tracing::debug!(%error, "Dropped action produced by effect");
            }
        }

        /// Execute an effect
        ///
        /// `Future` and `Delay` run on spawned tasks; their actions go back
        /// through [`Store::apply`]. A panicking effect is logged and does not
        /// affect the store.
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guard = AtomicCounterGuard::enter(&self.inner.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        match AssertUnwindSafe(fut).catch_unwind().await {
                            Ok(Some(action)) => store.feed_back(action).await,
                            Ok(None) => tracing::trace!("Effect::Future completed with no action"),
                            Err(_) => {
                                tracing::error!("Effect::Future panicked");
                                metrics::counter!("store.effects.panicked").increment(1);
                            },
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let guard = AtomicCounterGuard::enter(&self.inner.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
