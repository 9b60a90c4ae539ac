//! Browsing session: the selected date plus the seat map.
//!
//! `BrowseReducer` owns the session-wide state and delegates seat
//! selection to [`SeatMapReducer`], lifting its effects with
//! [`Effect::map`].

use crate::seat_map::{SeatMapAction, SeatMapEnvironment, SeatMapReducer, SeatMapState};
use crate::types::{MovieId, ShowDate, ShowTime, ShowingRequest, TheatreId};
use serde::{Deserialize, Serialize};
use showtime_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Session state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseState {
    /// Date the listing is filtered by; `None` until initialised
    pub selected_date: Option<ShowDate>,
    /// Seat selection
    pub seat_map: SeatMapState,
}

/// Actions for the browsing session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseAction {
    /// Select today's date
    Initialize,
    /// Select a date from the picker
    SelectDate(ShowDate),
    /// Open the seat map for a listed showtime on the selected date
    SelectShowtime {
        /// Movie
        movie: MovieId,
        /// Theatre
        theatre: TheatreId,
        /// Time slot
        time: ShowTime,
    },
    /// Seat map action
    SeatMap(SeatMapAction),
}

/// Environment dependencies for the browsing session
#[derive(Clone)]
pub struct BrowseEnvironment {
    /// Source of the "today" anchor
    pub clock: Arc<dyn Clock>,
    /// Seat map dependencies
    pub seat_map: SeatMapEnvironment,
}

impl BrowseEnvironment {
    /// Creates a new `BrowseEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, seat_map: SeatMapEnvironment) -> Self {
        Self { clock, seat_map }
    }
}

impl std::fmt::Debug for BrowseEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowseEnvironment")
            .field("now", &self.clock.now())
            .field("seat_map", &self.seat_map)
            .finish()
    }
}

/// Reducer for the browsing session
#[derive(Clone, Debug, Default)]
pub struct BrowseReducer {
    seat_map: SeatMapReducer,
}

impl BrowseReducer {
    /// Creates a new `BrowseReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seat_map: SeatMapReducer::new(),
        }
    }

    fn delegate(
        &self,
        state: &mut BrowseState,
        action: SeatMapAction,
        env: &BrowseEnvironment,
    ) -> SmallVec<[Effect<BrowseAction>; 4]> {
        self.seat_map
            .reduce(&mut state.seat_map, action, &env.seat_map)
            .into_iter()
            .map(|effect| effect.map(BrowseAction::SeatMap))
            .collect()
    }
}

impl Reducer for BrowseReducer {
    type State = BrowseState;
    type Action = BrowseAction;
    type Environment = BrowseEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BrowseAction::Initialize => {
                let today = ShowDate::new(env.clock.today());
                tracing::info!(%today, "Session initialised");
                state.selected_date = Some(today);
                smallvec![Effect::None]
            },

            BrowseAction::SelectDate(date) => {
                if state.selected_date == Some(date) {
                    return smallvec![Effect::None];
                }
                tracing::debug!(%date, "Date selected");
                state.selected_date = Some(date);

                // Showtimes listed for another date no longer apply.
                if state.seat_map.is_open() {
                    return self.delegate(state, SeatMapAction::Close, env);
                }
                smallvec![Effect::None]
            },

            BrowseAction::SelectShowtime {
                movie,
                theatre,
                time,
            } => {
                let request = ShowingRequest {
                    movie: Some(movie),
                    theatre: Some(theatre),
                    time: Some(time),
                    date: state.selected_date,
                };
                self.delegate(state, SeatMapAction::OpenShowing(request), env)
            },

            BrowseAction::SeatMap(action) => self.delegate(state, action, env),
        }
    }
}
