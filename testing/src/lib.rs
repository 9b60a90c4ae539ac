//! # Showtime Testing
//!
//! Testing utilities and helpers for Showtime reducers.
//!
//! This crate provides:
//! - A fixed clock so the "today" anchor is deterministic
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use showtime_testing::test_clock;
//! use showtime_runtime::Store;
//!
//! let env = browse_environment(test_clock());
//! let mut store = Store::new(BrowseState::default(), BrowseReducer::new(), env);
//!
//! store.send(BrowseAction::Initialize)?;
//! assert_eq!(store.state(|s| s.selected_date), Some(may_first));
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use showtime_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, NaiveTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making the date picker's "today"
    /// reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use showtime_testing::mocks::FixedClock;
    /// use showtime_core::environment::Clock;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap_or_default();
    /// let clock = FixedClock::on_date(date);
    /// assert_eq!(clock.today(), date);
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Fixed clock at midday UTC on `date`
        #[must_use]
        pub fn on_date(date: NaiveDate) -> Self {
            Self::new(date.and_time(NaiveTime::default() + chrono::Duration::hours(12)).and_utc())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2024-05-01 12:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a test-friendly tracing subscriber (idempotent)
///
/// Honors `RUST_LOG`; output goes through the test harness so it is only
/// shown for failing tests.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
