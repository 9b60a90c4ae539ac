//! Seat selection state machine.
//!
//! The seat map is either `Closed` or `Open` for exactly one showing. While
//! open it tracks the seats already booked (resolved once, when the showing
//! opens) and the seats the user has picked. The two sets never intersect:
//! the toggle guard runs before any mutation.
//!
//! Opening a showing always starts from scratch. A selection made for one
//! showing is never carried over into another.

use crate::catalog::Catalog;
use crate::occupancy::OccupancyLookup;
use crate::types::{
    BookingRequest, OccupiedSeats, SEAT_ROWS, SEATS_PER_ROW, SeatCell, SeatId, SeatRow, Showing,
    ShowingRequest, seat_grid,
};
use serde::{Deserialize, Serialize};
use showtime_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::collections::BTreeSet;
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Seat map state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatMapState {
    /// No showing is open
    #[default]
    Closed,
    /// A showing is open for seat selection
    Open(OpenSeatMap),
}

/// An open seat map
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSeatMap {
    showing: Showing,
    occupied: OccupiedSeats,
    selected: BTreeSet<SeatId>,
}

impl OpenSeatMap {
    /// Open `showing` with its occupied seats and nothing selected
    #[must_use]
    pub const fn new(showing: Showing, occupied: OccupiedSeats) -> Self {
        Self {
            showing,
            occupied,
            selected: BTreeSet::new(),
        }
    }

    /// The open showing
    #[must_use]
    pub const fn showing(&self) -> &Showing {
        &self.showing
    }

    /// Seats already booked
    #[must_use]
    pub const fn occupied(&self) -> &OccupiedSeats {
        &self.occupied
    }

    /// Seats picked by the user, row-major
    #[must_use]
    pub const fn selected(&self) -> &BTreeSet<SeatId> {
        &self.selected
    }

    /// Whether `seat` is booked
    #[must_use]
    pub fn is_occupied(&self, seat: &SeatId) -> bool {
        self.occupied.contains(seat)
    }

    /// Whether `seat` is picked
    #[must_use]
    pub fn is_selected(&self, seat: &SeatId) -> bool {
        self.selected.contains(seat)
    }

    /// Render data for one seat
    #[must_use]
    pub fn cell(&self, seat: SeatId) -> SeatCell {
        SeatCell {
            seat,
            is_selected: self.is_selected(&seat),
            is_occupied: self.is_occupied(&seat),
        }
    }

    /// The committed seat list for this showing
    #[must_use]
    pub fn booking(&self) -> BookingRequest {
        BookingRequest {
            showing: self.showing.clone(),
            seats: self.selected.iter().copied().collect(),
        }
    }
}

impl SeatMapState {
    /// Whether a showing is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The open showing, if any
    #[must_use]
    pub const fn showing(&self) -> Option<&Showing> {
        match self {
            Self::Open(open) => Some(&open.showing),
            Self::Closed => None,
        }
    }

    /// The open seat map, if any
    #[must_use]
    pub const fn open(&self) -> Option<&OpenSeatMap> {
        match self {
            Self::Open(open) => Some(open),
            Self::Closed => None,
        }
    }

    /// Render data for all 160 seats, row-major
    ///
    /// Empty while closed.
    #[must_use]
    pub fn grid(&self) -> Vec<SeatCell> {
        self.open()
            .map(|open| seat_grid().map(|seat| open.cell(seat)).collect())
            .unwrap_or_default()
    }

    /// Render data grouped by row, front to back
    ///
    /// Empty while closed.
    #[must_use]
    pub fn rows(&self) -> Vec<SeatRow> {
        let grid = self.grid();
        grid.chunks(usize::from(SEATS_PER_ROW))
            .zip(SEAT_ROWS)
            .map(|(cells, row)| SeatRow {
                row,
                cells: cells.to_vec(),
            })
            .collect()
    }

    /// Picked seats, row-major; empty while closed
    #[must_use]
    pub fn selected_seats(&self) -> Vec<SeatId> {
        self.open()
            .map(|open| open.selected.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the book action is enabled
    #[must_use]
    pub fn can_book(&self) -> bool {
        self.open().is_some_and(|open| !open.selected.is_empty())
    }

    /// Picked seats as `A1, B5`, or `None` when nothing is picked
    #[must_use]
    pub fn selection_summary(&self) -> String {
        let seats = self.selected_seats();
        if seats.is_empty() {
            "None".to_string()
        } else {
            seats
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the seat map
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatMapAction {
    /// Open the seat map for a showing
    OpenShowing(ShowingRequest),
    /// Pick or unpick a seat
    ToggleSeat {
        /// Seat clicked
        seat: SeatId,
    },
    /// Close the seat map, discarding the selection
    Close,
    /// Hand the picked seats to the booking desk
    Book,
    /// The booking desk accepted a seat list
    BookingSubmitted {
        /// What was handed over
        booking: BookingRequest,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Receives committed seat lists
///
/// Persisting the booking and taking payment happen behind this trait.
pub trait BookingDesk: Send + Sync {
    /// Accept a committed seat list
    fn submit(&self, booking: &BookingRequest);
}

/// Booking desk that only logs what it receives
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBookingDesk;

impl BookingDesk for LoggingBookingDesk {
    fn submit(&self, booking: &BookingRequest) {
        let seats: Vec<String> = booking.seats.iter().map(ToString::to_string).collect();
        tracing::info!(
            showing = %booking.showing.key(),
            theatre = %booking.showing.theatre_id,
            seats = %seats.join(","),
            "Booking submitted"
        );
    }
}

/// Environment dependencies for the seat map
#[derive(Clone)]
pub struct SeatMapEnvironment {
    /// Movies and theatres a showing must refer to
    pub catalog: Arc<Catalog>,
    /// Occupied seats per showing
    pub occupancy: Arc<dyn OccupancyLookup>,
    /// Receives committed seat lists
    pub booking_desk: Arc<dyn BookingDesk>,
}

impl SeatMapEnvironment {
    /// Creates a new `SeatMapEnvironment`
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        occupancy: Arc<dyn OccupancyLookup>,
        booking_desk: Arc<dyn BookingDesk>,
    ) -> Self {
        Self {
            catalog,
            occupancy,
            booking_desk,
        }
    }

    /// Environment resolving occupancy from the catalog itself
    #[must_use]
    pub fn from_catalog(catalog: Arc<Catalog>, booking_desk: Arc<dyn BookingDesk>) -> Self {
        let occupancy: Arc<dyn OccupancyLookup> = Arc::<Catalog>::clone(&catalog);
        Self::new(catalog, occupancy, booking_desk)
    }
}

impl std::fmt::Debug for SeatMapEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatMapEnvironment")
            .field("movies", &self.catalog.movies().len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the seat map
#[derive(Clone, Debug, Default)]
pub struct SeatMapReducer;

impl SeatMapReducer {
    /// Creates a new `SeatMapReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve a request against the catalog
    ///
    /// Only a showing the catalog actually lists resolves: the theatre must
    /// screen the movie at that time and the movie must play on that date.
    fn resolve(request: ShowingRequest, env: &SeatMapEnvironment) -> Option<Showing> {
        let Some((movie_id, theatre_id, time, date)) = request.complete() else {
            tracing::debug!("Incomplete showing request, seat map stays as is");
            crate::metrics::record_showing_rejected("incomplete");
            return None;
        };

        let Some(movie) = env.catalog.movie(&movie_id) else {
            tracing::warn!(%movie_id, "Showing requested for unknown movie");
            crate::metrics::record_showing_rejected("unknown_movie");
            return None;
        };

        let Some(theatre) = movie.theatre(&theatre_id) else {
            tracing::warn!(%movie_id, %theatre_id, "Showing requested for theatre not screening the movie");
            crate::metrics::record_showing_rejected("unknown_theatre");
            return None;
        };

        if !theatre.offers(&time) {
            tracing::warn!(%movie_id, %theatre_id, %time, "Showing requested at a time the theatre does not screen");
            crate::metrics::record_showing_rejected("unknown_time");
            return None;
        }

        if !movie.plays_on(&date) {
            tracing::warn!(%movie_id, %date, "Showing requested on a date the movie does not play");
            crate::metrics::record_showing_rejected("not_playing");
            return None;
        }

        Some(Showing {
            movie_id,
            movie_title: movie.title.clone(),
            theatre_id,
            theatre_name: theatre.name.clone(),
            time,
            date,
        })
    }
}

impl Reducer for SeatMapReducer {
    type State = SeatMapState;
    type Action = SeatMapAction;
    type Environment = SeatMapEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SeatMapAction::OpenShowing(request) => {
                let Some(showing) = Self::resolve(request, env) else {
                    return smallvec![Effect::None];
                };

                let occupied = env.occupancy.occupied_seats(&showing.key());
                tracing::info!(
                    showing = %showing.key(),
                    theatre = %showing.theatre_id,
                    occupied = occupied.len(),
                    replaced = state.is_open(),
                    "Seat map opened"
                );
                crate::metrics::record_showing_opened();

                *state = SeatMapState::Open(OpenSeatMap::new(showing, occupied));
                smallvec![Effect::None]
            },

            SeatMapAction::ToggleSeat { seat } => {
                let SeatMapState::Open(open) = state else {
                    tracing::debug!(%seat, "Seat toggled with no showing open");
                    crate::metrics::record_seat_toggle("rejected");
                    return smallvec![Effect::None];
                };

                if open.is_occupied(&seat) {
                    tracing::debug!(%seat, "Occupied seat is not selectable");
                    crate::metrics::record_seat_toggle("rejected");
                } else if open.selected.remove(&seat) {
                    tracing::debug!(%seat, "Seat deselected");
                    crate::metrics::record_seat_toggle("deselected");
                } else {
                    open.selected.insert(seat);
                    tracing::debug!(%seat, "Seat selected");
                    crate::metrics::record_seat_toggle("selected");
                }
                smallvec![Effect::None]
            },

            SeatMapAction::Close => {
                if let Some(showing) = state.showing() {
                    tracing::info!(showing = %showing.key(), "Seat map closed");
                }
                *state = SeatMapState::Closed;
                smallvec![Effect::None]
            },

            SeatMapAction::Book => {
                let Some(open) = state.open() else {
                    tracing::debug!("Book requested with no showing open");
                    return smallvec![Effect::None];
                };
                if open.selected.is_empty() {
                    tracing::debug!(showing = %open.showing.key(), "Book requested with no seats picked");
                    return smallvec![Effect::None];
                }

                let booking = open.booking();
                let desk = Arc::clone(&env.booking_desk);
                smallvec![Effect::Run(Box::new(move || {
                    desk.submit(&booking);
                    Some(SeatMapAction::BookingSubmitted { booking })
                }))]
            },

            SeatMapAction::BookingSubmitted { booking } => {
                if state.showing() == Some(&booking.showing) {
                    tracing::info!(
                        showing = %booking.showing.key(),
                        seats = booking.seats.len(),
                        "Booking handed off, seat map closed"
                    );
                    crate::metrics::record_booking_committed(booking.seats.len());
                    *state = SeatMapState::Closed;
                } else {
                    tracing::debug!(showing = %booking.showing.key(), "Booking for a showing no longer open");
                }
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{MovieId, ShowDate, ShowTime, TheatreId};
    use showtime_testing::{ReducerTest, assertions};
    use std::sync::Mutex;

    const MOVIES: &str = r#"{
        "movies": [
            {
                "id": "M1",
                "title": "Midnight Run",
                "showDates": ["2024-05-01", "2024-05-02"],
                "theatres": [{"id": "T1", "name": "Grand", "showTimings": ["18:00"]}]
            },
            {
                "id": "M2",
                "title": "Second Feature",
                "showDates": ["2024-05-01"],
                "theatres": [{"id": "T2", "name": "Annex", "showTimings": ["20:00"]}]
            }
        ]
    }"#;

    const SEATS: &str = r#"{
        "seats": [
            {"movieId": "M1", "date": "2024-05-01", "showTime": "18:00", "occupiedSeats": ["A1", "A2"]}
        ]
    }"#;

    #[derive(Default)]
    struct RecordingDesk {
        received: Mutex<Vec<BookingRequest>>,
    }

    impl BookingDesk for RecordingDesk {
        fn submit(&self, booking: &BookingRequest) {
            self.received.lock().unwrap().push(booking.clone());
        }
    }

    fn env_with(desk: Arc<RecordingDesk>) -> SeatMapEnvironment {
        let catalog = Arc::new(Catalog::from_json(MOVIES, SEATS).unwrap());
        SeatMapEnvironment::from_catalog(catalog, desk)
    }

    fn env() -> SeatMapEnvironment {
        env_with(Arc::new(RecordingDesk::default()))
    }

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    fn request(movie: &str, theatre: &str, time: &str, date: &str) -> ShowingRequest {
        ShowingRequest::new(
            MovieId::new(movie),
            TheatreId::new(theatre),
            ShowTime::new(time),
            date.parse::<ShowDate>().unwrap(),
        )
    }

    fn open_m1() -> SeatMapState {
        let mut state = SeatMapState::Closed;
        SeatMapReducer::new().reduce(
            &mut state,
            SeatMapAction::OpenShowing(request("M1", "T1", "18:00", "2024-05-01")),
            &env(),
        );
        state
    }

    fn toggle(s: &str) -> SeatMapAction {
        SeatMapAction::ToggleSeat { seat: seat(s) }
    }

    #[test]
    fn open_resolves_showing_and_occupancy() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(SeatMapState::Closed)
            .when_action(SeatMapAction::OpenShowing(request("M1", "T1", "18:00", "2024-05-01")))
            .then_state(|state| {
                let open = state.open().unwrap();
                assert_eq!(open.showing().movie_title, "Midnight Run");
                assert_eq!(open.showing().theatre_name, "Grand");
                assert_eq!(open.occupied().len(), 2);
                assert!(open.selected().is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn incomplete_request_keeps_map_closed() {
        let mut partial = request("M1", "T1", "18:00", "2024-05-01");
        partial.time = None;

        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(SeatMapState::Closed)
            .when_action(SeatMapAction::OpenShowing(partial))
            .then_state(|state| assert_eq!(*state, SeatMapState::Closed))
            .run();
    }

    #[test]
    fn incomplete_request_leaves_open_map_untouched() {
        let mut state = open_m1();
        SeatMapReducer::new().reduce(&mut state, toggle("B5"), &env());
        let before = state.clone();

        SeatMapReducer::new().reduce(
            &mut state,
            SeatMapAction::OpenShowing(ShowingRequest::default()),
            &env(),
        );
        assert_eq!(state, before);
    }

    #[test]
    fn unknown_movie_or_theatre_is_rejected() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(SeatMapState::Closed)
            .when_actions([
                SeatMapAction::OpenShowing(request("M9", "T1", "18:00", "2024-05-01")),
                SeatMapAction::OpenShowing(request("M1", "T2", "18:00", "2024-05-01")),
            ])
            .then_state(|state| assert!(!state.is_open()))
            .run();
    }

    #[test]
    fn unlisted_time_is_rejected() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(SeatMapState::Closed)
            .when_action(SeatMapAction::OpenShowing(request("M1", "T1", "03:17", "2024-05-01")))
            .then_state(|state| assert_eq!(*state, SeatMapState::Closed))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn date_the_movie_does_not_play_is_rejected() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(SeatMapState::Closed)
            .when_action(SeatMapAction::OpenShowing(request("M1", "T1", "18:00", "2024-05-09")))
            .then_state(|state| assert_eq!(*state, SeatMapState::Closed))
            .run();
    }

    #[test]
    fn rejected_request_leaves_open_map_untouched() {
        let mut state = open_m1();
        SeatMapReducer::new().reduce(&mut state, toggle("B5"), &env());
        let before = state.clone();

        for rejected in [
            request("M1", "T1", "21:00", "2024-05-01"),
            request("M2", "T2", "20:00", "2024-05-02"),
        ] {
            SeatMapReducer::new().reduce(&mut state, SeatMapAction::OpenShowing(rejected), &env());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn occupied_seat_toggle_is_a_noop() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_action(toggle("A1"))
            .then_state(|state| assert!(state.selected_seats().is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn toggle_twice_restores_selection() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_action(toggle("B5"))
            .then_state(|state| assert_eq!(state.selected_seats(), vec![seat("B5")]))
            .run();

        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_actions([toggle("B5"), toggle("B5")])
            .then_state(|state| assert!(state.selected_seats().is_empty()))
            .run();
    }

    #[test]
    fn toggle_on_closed_map_is_ignored() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(SeatMapState::Closed)
            .when_action(toggle("B5"))
            .then_state(|state| assert_eq!(*state, SeatMapState::Closed))
            .run();
    }

    #[test]
    fn reopening_discards_previous_selection() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_actions([
                toggle("B5"),
                SeatMapAction::OpenShowing(request("M2", "T2", "20:00", "2024-05-01")),
            ])
            .then_state(|state| {
                let open = state.open().unwrap();
                assert_eq!(open.showing().movie_id, MovieId::new("M2"));
                assert!(open.selected().is_empty());
                assert!(open.occupied().is_empty());
            })
            .run();
    }

    #[test]
    fn reopening_same_showing_also_resets() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_actions([
                toggle("C3"),
                SeatMapAction::OpenShowing(request("M1", "T1", "18:00", "2024-05-01")),
            ])
            .then_state(|state| assert!(state.selected_seats().is_empty()))
            .run();
    }

    #[test]
    fn close_resets_everything() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_actions([toggle("B5"), SeatMapAction::Close])
            .then_state(|state| {
                assert_eq!(*state, SeatMapState::Closed);
                assert!(state.grid().is_empty());
                assert!(state.selected_seats().is_empty());
                assert!(!state.can_book());
            })
            .run();
    }

    #[test]
    fn book_with_empty_selection_does_nothing() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_action(SeatMapAction::Book)
            .then_state(|state| assert!(state.is_open()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn book_returns_run_effect() {
        ReducerTest::new(SeatMapReducer::new())
            .with_env(env())
            .given_state(open_m1())
            .when_actions([toggle("C4"), toggle("B5"), SeatMapAction::Book])
            .then_state(|state| assert!(state.is_open()))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 3);
                assertions::assert_has_run_effect(effects);
            })
            .run();
    }

    #[test]
    fn booking_effect_submits_seats_in_row_major_order() {
        let desk = Arc::new(RecordingDesk::default());
        let env = env_with(Arc::clone(&desk));
        let reducer = SeatMapReducer::new();
        let mut state = open_m1();

        reducer.reduce(&mut state, toggle("C4"), &env);
        reducer.reduce(&mut state, toggle("B5"), &env);
        let mut effects = reducer.reduce(&mut state, SeatMapAction::Book, &env);

        let Some(Effect::Run(run)) = effects.pop() else {
            unreachable!("book must produce a run effect");
        };
        let Some(SeatMapAction::BookingSubmitted { booking }) = run() else {
            unreachable!("run must feed back BookingSubmitted");
        };

        assert_eq!(booking.seats, vec![seat("B5"), seat("C4")]);
        assert_eq!(desk.received.lock().unwrap().as_slice(), [booking.clone()]);

        reducer.reduce(&mut state, SeatMapAction::BookingSubmitted { booking }, &env);
        assert_eq!(state, SeatMapState::Closed);
    }

    #[test]
    fn stale_booking_does_not_close_other_showing() {
        let env = env();
        let reducer = SeatMapReducer::new();
        let mut state = open_m1();
        reducer.reduce(&mut state, toggle("B5"), &env);
        let booking = state.open().unwrap().booking();

        reducer.reduce(
            &mut state,
            SeatMapAction::OpenShowing(request("M2", "T2", "20:00", "2024-05-01")),
            &env,
        );
        reducer.reduce(&mut state, SeatMapAction::BookingSubmitted { booking }, &env);
        assert!(state.is_open());
    }

    #[test]
    fn grid_marks_occupied_and_selected() {
        let mut state = open_m1();
        SeatMapReducer::new().reduce(&mut state, toggle("B5"), &env());

        let grid = state.grid();
        assert_eq!(grid.len(), 160);
        assert!(grid[0].is_occupied && !grid[0].is_selected);
        assert!(grid.iter().all(|c| !(c.is_occupied && c.is_selected)));
        assert_eq!(grid.iter().filter(|c| c.is_selected).count(), 1);

        let rows = state.rows();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[1].row, 'B');
        assert!(rows[1].cells[4].is_selected);
        assert!(rows.iter().all(|r| r.cells.len() == 20));
    }

    #[test]
    fn selection_summary_lists_seats() {
        let mut state = open_m1();
        assert_eq!(state.selection_summary(), "None");
        assert!(!state.can_book());

        SeatMapReducer::new().reduce(&mut state, toggle("C4"), &env());
        SeatMapReducer::new().reduce(&mut state, toggle("B5"), &env());
        assert_eq!(state.selection_summary(), "B5, C4");
        assert!(state.can_book());
    }
}
