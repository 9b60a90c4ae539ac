//! # Showtime Core
//!
//! Core traits and types for the Showtime seat-selection engine.
//!
//! Every piece of interactive state in Showtime (the selected date, the open
//! showing, the seats a user has picked) is driven by a reducer: a pure
//! function that takes the current state and an input and mutates the state
//! in place, returning descriptions of any side effects.
//!
//! ## Core Concepts
//!
//! - **State**: Owned UI/session state for a feature
//! - **Action**: All possible inputs to a reducer (user commands and fed-back events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected collaborators via traits (clock, catalogs, booking desk)
//!
//! ## Example
//!
//! ```
//! use showtime_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct PickerState {
//!     picked: Vec<u32>,
//! }
//!
//! enum PickerAction {
//!     Pick(u32),
//!     Clear,
//! }
//!
//! struct PickerReducer;
//!
//! impl Reducer for PickerReducer {
//!     type State = PickerState;
//!     type Action = PickerAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PickerState,
//!         action: PickerAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<PickerAction>; 4]> {
//!         match action {
//!             PickerAction::Pick(n) => state.picked.push(n),
//!             PickerAction::Clear => state.picked.clear(),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = PickerState::default();
//! PickerReducer.reduce(&mut state, PickerAction::Pick(7), &());
//! assert_eq!(state.picked, vec![7]);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all selection logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Guards the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the store
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
/// Effects describe work for the store to perform after a reducer returns.
/// They are values, never executed by the reducer itself.
pub mod effect {
    /// Boxed synchronous call into an external collaborator.
    ///
    /// The returned action, if any, is fed back into the reducer.
    pub type RunFn<Action> = Box<dyn FnOnce() -> Option<Action>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action straight back into the reducer
        Dispatch(Box<Action>),

        /// Call an external collaborator synchronously
        Run(RunFn<Action>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Dispatch(action) => {
                    f.debug_tuple("Effect::Dispatch").field(action).finish()
                },
                Effect::Run(_) => write!(f, "Effect::Run(<closure>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Lift this effect into a parent action type.
        ///
        /// Used when a parent reducer delegates to a child reducer and needs
        /// the child's fed-back actions wrapped in the parent's action enum.
        #[must_use]
        pub fn map<Parent>(self, lift: fn(Action) -> Parent) -> Effect<Parent>
        where
            Action: 'static,
            Parent: 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(lift)).collect())
                },
                Effect::Dispatch(action) => Effect::Dispatch(Box::new(lift(*action))),
                Effect::Run(run) => Effect::Run(Box::new(move || run().map(lift))),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external collaborators are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// The "today" anchor of the date picker is derived from this clock, so
    /// tests pin it with a fixed clock instead of depending on the wall clock.
    pub trait Clock {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;

        /// Calendar date of [`Clock::now`] in UTC
        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::Clock;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, PartialEq)]
    enum Child {
        Done(u8),
    }

    #[derive(Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    struct Frozen(DateTime<Utc>);

    impl Clock for Frozen {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn map_lifts_dispatched_actions() {
        let effect = Effect::Dispatch(Box::new(Child::Done(1))).map(Parent::Child);
        match effect {
            Effect::Dispatch(action) => assert_eq!(*action, Parent::Child(Child::Done(1))),
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn map_lifts_run_results() {
        let effect: Effect<Child> = Effect::Run(Box::new(|| Some(Child::Done(2))));
        let Effect::Run(run) = effect.map(Parent::Child) else {
            unreachable!("map must preserve the variant");
        };
        assert_eq!(run(), Some(Parent::Child(Child::Done(2))));
    }

    #[test]
    fn map_preserves_sequence_order() {
        let effect = Effect::chain(vec![
            Effect::Dispatch(Box::new(Child::Done(1))),
            Effect::None,
            Effect::Dispatch(Box::new(Child::Done(2))),
        ])
        .map(Parent::Child);

        let Effect::Sequential(effects) = effect else {
            unreachable!("map must preserve the variant");
        };
        assert_eq!(effects.len(), 3);
        assert!(effects[1].is_none());
    }

    #[test]
    fn today_is_utc_calendar_date() {
        let late_evening = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).single();
        let clock = Frozen(late_evening.unwrap_or_default());
        assert_eq!(clock.today().to_string(), "2024-05-01");
    }
}
