//! Showtime - movie showtime selection and seat-map engine
//!
//! Showtime drives the interactive part of a movie ticketing front end: which
//! dates have shows, which movies play on the selected date, which seats are
//! already taken for a showing, and which seats the user is picking.
//!
//! - **Date index**: every show date across the catalog, sorted, with picker labels
//! - **Movie filter**: the movies playing on the selected date
//! - **Occupancy resolver**: the booked seats of a (movie, date, time) showing
//! - **Seat selection**: an open/closed state machine over an 8 × 20 seat grid
//!
//! # Architecture
//!
//! ```text
//!   movies.json ─┐                 ┌──────────────┐
//!                ├──► Catalog ───► │  DateIndex   │ ──► date picker
//! seatmap.json ──┘   (Arc, r/o)    │  listing     │ ──► movie list
//!                        │         └──────────────┘
//!                        ▼
//!               ┌─────────────────┐   Effect::Run   ┌─────────────┐
//!  actions ───► │ BrowseReducer   │ ──────────────► │ BookingDesk │
//!               │  └ SeatMap      │ ◄────────────── │             │
//!               └─────────────────┘ BookingSubmitted└─────────────┘
//! ```
//!
//! Catalogs are loaded once and shared read-only. Session state lives in a
//! synchronous [`Store`](showtime_runtime::Store) and is only changed by
//! reducers; every view is a pure function of catalog and state.
//!
//! # Usage
//!
//! ```no_run
//! use showtime::{BrowseAction, Catalog, CatalogConfig, LoggingBookingDesk, ShowtimeApp};
//! use showtime_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = Arc::new(Catalog::load(&CatalogConfig::default())?);
//! let mut app = ShowtimeApp::new(catalog, Arc::new(SystemClock), Arc::new(LoggingBookingDesk))?;
//!
//! for movie in app.listing().movies() {
//!     println!("{}", movie.title);
//! }
//! app.send(BrowseAction::SelectDate("2024-05-02".parse()?))?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod browse;
pub mod catalog;
pub mod command;
pub mod config;
pub mod dates;
pub mod error;
pub mod listing;
pub mod metrics;
pub mod occupancy;
pub mod seat_map;
pub mod types;

pub use app::{ShowtimeApp, ShowtimeStore};
pub use browse::{BrowseAction, BrowseEnvironment, BrowseReducer, BrowseState};
pub use catalog::{Catalog, MovieCatalog, OccupancyCatalog};
pub use command::Command;
pub use config::{CatalogConfig, Config};
pub use dates::{DateEntry, DateIndex, unique_dates};
pub use error::{CatalogError, CommandError, ConfigError, SeatIdError};
pub use listing::{Listing, NO_SHOWS_MESSAGE, movies_on_date, recommended};
pub use occupancy::{OccupancyIndex, OccupancyLookup};
pub use seat_map::{
    BookingDesk, LoggingBookingDesk, OpenSeatMap, SeatMapAction, SeatMapEnvironment,
    SeatMapReducer, SeatMapState,
};
pub use types::{
    BookingRequest, DateLabel, Movie, MovieId, OccupancyRecord, OccupiedSeats, SEAT_COUNT,
    SEAT_ROWS, SEATS_PER_ROW, SeatCell, SeatId, SeatRow, ShowDate, ShowTime, Showing, ShowingKey,
    ShowingRequest, Theatre, TheatreId, seat_grid,
};
