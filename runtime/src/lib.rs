//! # Showtime Runtime
//!
//! Runtime implementation for the Showtime reducer architecture.
//!
//! This crate provides the [`Store`] that owns a feature's state, runs its
//! reducer, executes the returned effects and feeds resulting actions back.
//!
//! ## Execution Model
//!
//! Showtime is single-threaded and event driven. Every user interaction is
//! one [`Store::send`] call, and everything it triggers (including actions
//! fed back by effects) completes before `send` returns. There is no
//! background work and no locking: the store is owned by the UI session and
//! mutated through `&mut self`.
//!
//! ## Example
//!
//! ```ignore
//! use showtime_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! store.send(Action::DoSomething)?;
//!
//! let value = store.state(|s| s.some_field);
//! ```

use showtime_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::marker::PhantomData;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured limit
        ///
        /// State changes made by the actions already reduced are kept.
        #[error("Feedback limit exceeded: {limit} actions reduced in a single send")]
        FeedbackLimitExceeded {
            /// The configured `max_actions_per_send`
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Configuration for [`Store`] behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on actions reduced by a single `send`, including the
    /// initial action and everything fed back by effects
    pub max_actions_per_send: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_actions_per_send: usize) -> Self {
        Self {
            max_actions_per_send,
        }
    }

    /// Set the feedback limit
    #[must_use]
    pub const fn with_max_actions_per_send(mut self, limit: usize) -> Self {
        self.max_actions_per_send = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_actions_per_send: 64,
        }
    }
}

/// The Store - owns state and drives the reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    config: StoreConfig,
    _action: PhantomData<fn(A)>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new store with custom configuration
    #[must_use]
    pub const fn with_config(
        initial_state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
    ) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            config,
            _action: PhantomData,
        }
    }

    /// Send an action through the reducer and execute its effects
    ///
    /// Actions fed back by effects are queued and reduced in FIFO order
    /// before this call returns.
    ///
    /// # Returns
    ///
    /// The number of actions reduced (the initial action plus feedback).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] when effects keep feeding
    /// actions back beyond `StoreConfig::max_actions_per_send`.
    pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
        let mut queue = VecDeque::from([action]);
        let mut reduced = 0;

        while let Some(action) = queue.pop_front() {
            if reduced >= self.config.max_actions_per_send {
                tracing::warn!(
                    limit = self.config.max_actions_per_send,
                    dropped = queue.len() + 1,
                    "Feedback limit exceeded, dropping remaining actions"
                );
                metrics::counter!("store.feedback_limit.exceeded").increment(1);
                return Err(StoreError::FeedbackLimitExceeded {
                    limit: self.config.max_actions_per_send,
                });
            }

            let span = tracing::debug_span!("reducer_execution", sequence = reduced);
            let _enter = span.enter();

            metrics::counter!("store.actions.total").increment(1);

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());
            reduced += 1;

            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            for effect in effects {
                Self::execute_effect(effect, &mut queue);
            }
        }

        tracing::debug!(reduced, "Action processing completed");
        Ok(reduced)
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let open = store.state(|s| s.seat_map.is_open());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Borrow the injected environment
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// Consume the store and return its state
    pub fn into_state(self) -> S {
        self.state
    }

    fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Sequential(effects) => {
                tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                for effect in effects {
                    Self::execute_effect(effect, queue);
                }
            },
            Effect::Dispatch(action) => {
                tracing::trace!("Executing Effect::Dispatch");
                metrics::counter!("store.effects.executed", "type" => "dispatch").increment(1);
                queue.push_back(*action);
            },
            Effect::Run(run) => {
                tracing::trace!("Executing Effect::Run");
                metrics::counter!("store.effects.executed", "type" => "run").increment(1);
                if let Some(action) = run() {
                    tracing::trace!("Effect::Run produced an action, queueing");
                    queue.push_back(action);
                }
            },
        }
    }
}

impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showtime_core::{SmallVec, smallvec};

    #[derive(Debug, Default)]
    struct TallyState {
        seen: Vec<u32>,
    }

    #[derive(Debug)]
    enum TallyAction {
        Record(u32),
        RecordThenEcho(u32),
        Loop,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Record(n) => {
                    state.seen.push(n);
                    smallvec![Effect::None]
                },
                TallyAction::RecordThenEcho(n) => {
                    state.seen.push(n);
                    smallvec![Effect::chain(vec![
                        Effect::Run(Box::new(move || Some(TallyAction::Record(n + 1)))),
                        Effect::Dispatch(Box::new(TallyAction::Record(n + 2))),
                    ])]
                },
                TallyAction::Loop => smallvec![Effect::Dispatch(Box::new(TallyAction::Loop))],
            }
        }
    }

    #[test]
    fn send_reduces_single_action() {
        let mut store = Store::new(TallyState::default(), TallyReducer, ());
        assert_eq!(store.send(TallyAction::Record(3)), Ok(1));
        assert_eq!(store.state(|s| s.seen.clone()), vec![3]);
    }

    #[test]
    fn feedback_is_processed_in_order_before_send_returns() {
        let mut store = Store::new(TallyState::default(), TallyReducer, ());
        assert_eq!(store.send(TallyAction::RecordThenEcho(10)), Ok(3));
        assert_eq!(store.into_state().seen, vec![10, 11, 12]);
    }

    #[test]
    fn runaway_feedback_is_bounded() {
        let config = StoreConfig::default().with_max_actions_per_send(5);
        let mut store = Store::with_config(TallyState::default(), TallyReducer, (), config);
        assert_eq!(
            store.send(TallyAction::Loop),
            Err(StoreError::FeedbackLimitExceeded { limit: 5 })
        );
        // Store stays usable afterwards
        assert_eq!(store.send(TallyAction::Record(1)), Ok(1));
    }
}
