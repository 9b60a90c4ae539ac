//! `ShowtimeApp`: the façade presentation layers talk to.
//!
//! Owns the shared catalog, the date index and the session store. Every
//! derived view (listing, seat grid, picked seats) is recomputed from the
//! current state when asked for; nothing is cached between calls.

use crate::browse::{BrowseAction, BrowseEnvironment, BrowseReducer, BrowseState};
use crate::catalog::Catalog;
use crate::dates::{DateEntry, DateIndex};
use crate::listing::{self, Listing};
use crate::seat_map::{BookingDesk, SeatMapEnvironment};
use crate::types::{
    Movie, MovieId, SeatCell, SeatId, SeatRow, ShowDate, ShowTime, Showing, TheatreId,
};
use showtime_core::environment::Clock;
use showtime_runtime::{Store, StoreError};
use std::sync::Arc;

/// The session store type
pub type ShowtimeStore = Store<BrowseState, BrowseAction, BrowseEnvironment, BrowseReducer>;

/// One user's browsing session over a shared catalog
#[derive(Debug)]
pub struct ShowtimeApp {
    catalog: Arc<Catalog>,
    dates: DateIndex,
    store: ShowtimeStore,
}

impl ShowtimeApp {
    /// Start a session: index the dates and select today
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if initialisation trips the store's feedback limit.
    pub fn new(
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        booking_desk: Arc<dyn BookingDesk>,
    ) -> Result<Self, StoreError> {
        let seat_map = SeatMapEnvironment::from_catalog(Arc::clone(&catalog), booking_desk);
        Self::with_environment(catalog, BrowseEnvironment::new(clock, seat_map))
    }

    /// Start a session with a fully custom environment
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if initialisation trips the store's feedback limit.
    pub fn with_environment(
        catalog: Arc<Catalog>,
        environment: BrowseEnvironment,
    ) -> Result<Self, StoreError> {
        let mut store = Store::new(BrowseState::default(), BrowseReducer::new(), environment);
        store.send(BrowseAction::Initialize)?;

        // The picker's "today" is the date `Initialize` selected.
        let today = store
            .state(|s| s.selected_date)
            .unwrap_or_else(|| ShowDate::new(store.environment().clock.today()));
        let dates = DateIndex::new(catalog.movies(), today);

        Ok(Self {
            catalog,
            dates,
            store,
        })
    }

    /// Dispatch a user action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if effects keep feeding actions back.
    pub fn send(&mut self, action: BrowseAction) -> Result<usize, StoreError> {
        self.store.send(action)
    }

    /// The shared catalog
    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The date index
    #[must_use]
    pub const fn date_index(&self) -> &DateIndex {
        &self.dates
    }

    /// Date picker entries
    #[must_use]
    pub fn dates(&self) -> Vec<DateEntry> {
        self.dates.entries(self.selected_date().as_ref())
    }

    /// Currently selected date
    #[must_use]
    pub fn selected_date(&self) -> Option<ShowDate> {
        self.store.state(|s| s.selected_date)
    }

    /// Movies for the selected date
    #[must_use]
    pub fn listing(&self) -> Listing<'_> {
        Listing::for_date(self.catalog.movies(), self.selected_date().as_ref())
    }

    /// Recommended movies, independent of the date
    #[must_use]
    pub fn recommended(&self) -> Vec<&Movie> {
        listing::recommended(self.catalog.movies())
    }

    /// The open showing, if any
    #[must_use]
    pub fn showing(&self) -> Option<Showing> {
        self.store.state(|s| s.seat_map.showing().cloned())
    }

    /// Whether the seat map is open for this showtime on the selected date
    ///
    /// A rejected request leaves any earlier seat map open, so callers check
    /// this rather than [`ShowtimeApp::showing`] after asking for a showtime.
    #[must_use]
    pub fn is_showing_open(&self, movie: &MovieId, theatre: &TheatreId, time: &ShowTime) -> bool {
        self.showing().is_some_and(|showing| {
            &showing.movie_id == movie && &showing.theatre_id == theatre && &showing.time == time
        })
    }

    /// Seat render data; empty while the seat map is closed
    #[must_use]
    pub fn seat_grid(&self) -> Vec<SeatCell> {
        self.store.state(|s| s.seat_map.grid())
    }

    /// Seat render data grouped by row
    #[must_use]
    pub fn seat_rows(&self) -> Vec<SeatRow> {
        self.store.state(|s| s.seat_map.rows())
    }

    /// Picked seats, row-major
    #[must_use]
    pub fn selected_seats(&self) -> Vec<SeatId> {
        self.store.state(|s| s.seat_map.selected_seats())
    }

    /// Picked seats for display (`A1, B5` or `None`)
    #[must_use]
    pub fn selection_summary(&self) -> String {
        self.store.state(|s| s.seat_map.selection_summary())
    }

    /// Whether the book action is enabled
    #[must_use]
    pub fn can_book(&self) -> bool {
        self.store.state(|s| s.seat_map.can_book())
    }

    /// Snapshot of the session state
    #[must_use]
    pub fn state(&self) -> BrowseState {
        self.store.state(BrowseState::clone)
    }
}
