//! Domain types for the Showtime engine.
//!
//! This module contains the catalog entities (movies, theatres, occupancy
//! records), the value objects used as lookup keys (dates, times, seat ids),
//! and the read models handed to the presentation layer.

use crate::error::SeatIdError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Catalog identifiers arrive as JSON strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Unique identifier for a movie
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct MovieId(String);

impl MovieId {
    /// Create a `MovieId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawId> for MovieId {
    fn from(raw: RawId) -> Self {
        Self(raw.into())
    }
}

impl From<MovieId> for String {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a theatre, unique within one movie's theatre list
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct TheatreId(String);

impl TheatreId {
    /// Create a `TheatreId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawId> for TheatreId {
    fn from(raw: RawId) -> Self {
        Self(raw.into())
    }
}

impl From<TheatreId> for String {
    fn from(id: TheatreId) -> Self {
        id.0
    }
}

impl From<&str> for TheatreId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for TheatreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Dates and times
// ============================================================================

/// Calendar date a movie is shown on (`YYYY-MM-DD` on the wire)
///
/// Ordering is chronological, which for ISO-8601 dates is also the
/// lexicographic order of their string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowDate(NaiveDate);

impl ShowDate {
    /// Wrap a calendar date
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year, month and day, `None` when the date does not exist
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The underlying calendar date
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Date-picker label (`Wed` / `1` / `May`)
    ///
    /// Always English abbreviations: the label never depends on the host
    /// locale or timezone.
    #[must_use]
    pub fn label(&self) -> DateLabel {
        DateLabel {
            weekday: self.0.format("%a").to_string(),
            day: self.0.day(),
            month: self.0.format("%b").to_string(),
        }
    }
}

impl From<NaiveDate> for ShowDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for ShowDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

impl fmt::Display for ShowDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Three-part display record for a date in the picker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateLabel {
    /// Short weekday name, e.g. `Wed`
    pub weekday: String,
    /// Day of month, e.g. `1`
    pub day: u32,
    /// Short month name, e.g. `May`
    pub month: String,
}

/// Time of day a theatre screens a movie, e.g. `18:30`
///
/// Treated as an opaque key: lookups are exact string matches.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowTime(String);

impl ShowTime {
    /// Create a `ShowTime` from any string-like value
    #[must_use]
    pub fn new(time: impl Into<String>) -> Self {
        Self(time.into())
    }

    /// Borrow the time string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShowTime {
    fn from(time: &str) -> Self {
        Self::new(time)
    }
}

impl fmt::Display for ShowTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Seats
// ============================================================================

/// Row letters of the auditorium, front to back
pub const SEAT_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Seats in every row, numbered from 1
pub const SEATS_PER_ROW: u8 = 20;

/// Total seats in the grid
pub const SEAT_COUNT: usize = SEAT_ROWS.len() * SEATS_PER_ROW as usize;

/// A seat in the 8 × 20 grid, written `{row}{number}` (e.g. `C14`)
///
/// Only constructible for seats that exist in the grid. Ordering is
/// row-major: `A1 < A2 < … < A20 < B1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: u8,
    number: u8,
}

impl SeatId {
    /// Seat at `row` letter and 1-based `number`
    ///
    /// # Errors
    ///
    /// Returns [`SeatIdError`] when the row letter or number is outside the
    /// grid. Row letters are uppercase.
    pub fn new(row: char, number: u8) -> Result<Self, SeatIdError> {
        let row_index = SEAT_ROWS
            .iter()
            .position(|r| *r == row)
            .ok_or(SeatIdError::UnknownRow(row))?;

        if !(1..=SEATS_PER_ROW).contains(&number) {
            return Err(SeatIdError::NumberOutOfRange(number.into()));
        }

        #[allow(clippy::cast_possible_truncation)] // at most 8 rows
        let row = row_index as u8;

        Ok(Self { row, number })
    }

    /// Row letter
    #[must_use]
    pub const fn row(&self) -> char {
        SEAT_ROWS[self.row as usize]
    }

    /// 1-based seat number within the row
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }
}

impl SeatId {
    /// Parse a seat typed by a person: surrounding whitespace, a lowercase
    /// row and leading zeros are accepted (`" b05 "` is `B5`)
    ///
    /// Catalog data goes through [`FromStr`], which only accepts the
    /// canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`SeatIdError`] when the input still does not name a grid seat.
    pub fn parse_typed(input: &str) -> Result<Self, SeatIdError> {
        let input = input.trim();
        let mut chars = input.chars();
        let Some(row) = chars.next() else {
            return Err(SeatIdError::Malformed(input.to_string()));
        };

        let digits = chars.as_str().trim_start_matches('0');
        let digits = if digits.is_empty() && !chars.as_str().is_empty() {
            "0"
        } else {
            digits
        };

        format!("{}{digits}", row.to_ascii_uppercase()).parse()
    }
}

impl FromStr for SeatId {
    type Err = SeatIdError;

    /// Canonical form only: uppercase row, no leading zero, no padding
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(row) = chars.next() else {
            return Err(SeatIdError::Malformed(s.to_string()));
        };

        let digits = chars.as_str();
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return Err(SeatIdError::Malformed(s.to_string()));
        }

        let number: u32 = digits
            .parse()
            .map_err(|_| SeatIdError::Malformed(s.to_string()))?;
        let number = u8::try_from(number).map_err(|_| SeatIdError::NumberOutOfRange(number))?;

        Self::new(row, number)
    }
}

impl TryFrom<String> for SeatId {
    type Error = SeatIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row(), self.number)
    }
}

/// Every seat in the grid, row by row, front to back
///
/// This is the only place seat ids are generated; rendering and occupancy
/// checks both go through it.
pub fn seat_grid() -> impl Iterator<Item = SeatId> {
    #[allow(clippy::cast_possible_truncation)] // at most 8 rows
    let rows = SEAT_ROWS.len() as u8;

    (0..rows).flat_map(|row| (1..=SEATS_PER_ROW).map(move |number| SeatId { row, number }))
}

/// Seats already booked for one showing
pub type OccupiedSeats = BTreeSet<SeatId>;

// ============================================================================
// Catalog entities
// ============================================================================

/// A theatre screening a movie
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theatre {
    /// Identifier, unique within the owning movie
    pub id: TheatreId,
    /// Display name
    pub name: String,
    /// Human-readable location
    #[serde(default)]
    pub location: String,
    /// Screening times, in display order
    #[serde(default)]
    pub show_timings: Vec<ShowTime>,
}

impl Theatre {
    /// Whether this theatre screens at `time`
    #[must_use]
    pub fn offers(&self, time: &ShowTime) -> bool {
        self.show_timings.contains(time)
    }
}

/// A movie in the catalog
///
/// Every theatre's `show_timings` apply to every date in `show_dates`; the
/// catalog cannot express per-date showtimes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Unique identifier
    pub id: MovieId,
    /// Title
    pub title: String,
    /// Spoken language
    #[serde(default)]
    pub language: String,
    /// Projection format, e.g. `2D`, `IMAX`
    #[serde(default)]
    pub format: String,
    /// Running time as displayed, e.g. `2h 28m`
    #[serde(default)]
    pub duration: String,
    /// Genre tags in display order
    #[serde(default)]
    pub genre: Vec<String>,
    /// Shown in the recommendations strip
    #[serde(default)]
    pub recommended: bool,
    /// Dates the movie plays on; `None` when the catalog omits the field
    #[serde(default)]
    pub show_dates: Option<BTreeSet<ShowDate>>,
    /// Theatres screening the movie, in display order
    #[serde(default)]
    pub theatres: Vec<Theatre>,
}

impl Movie {
    /// Whether the movie plays on `date`
    ///
    /// A movie without `show_dates` plays on no date at all.
    #[must_use]
    pub fn plays_on(&self, date: &ShowDate) -> bool {
        self.show_dates
            .as_ref()
            .is_some_and(|dates| dates.contains(date))
    }

    /// Look up one of this movie's theatres
    #[must_use]
    pub fn theatre(&self, id: &TheatreId) -> Option<&Theatre> {
        self.theatres.iter().find(|theatre| &theatre.id == id)
    }

    /// Genre tags joined for display (`Action • Drama`)
    #[must_use]
    pub fn genre_line(&self) -> String {
        self.genre.join(" • ")
    }
}

/// Seats already taken for one showing, as stored in the occupancy catalog
///
/// Seat strings are kept raw here; they are validated when the occupancy
/// index is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyRecord {
    /// Movie the record belongs to
    pub movie_id: MovieId,
    /// Show date
    pub date: ShowDate,
    /// Show time
    pub show_time: ShowTime,
    /// Booked seat identifiers
    #[serde(default)]
    pub occupied_seats: Vec<String>,
}

impl OccupancyRecord {
    /// Lookup key of this record
    #[must_use]
    pub fn key(&self) -> ShowingKey {
        ShowingKey::new(self.movie_id.clone(), self.date, self.show_time.clone())
    }
}

// ============================================================================
// Showings and selection
// ============================================================================

/// The (movie, date, time) triple occupancy is keyed by
///
/// The theatre is not part of the key: occupancy is per movie screening
/// time, matching the occupancy catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShowingKey {
    /// Movie
    pub movie_id: MovieId,
    /// Show date
    pub date: ShowDate,
    /// Show time
    pub show_time: ShowTime,
}

impl ShowingKey {
    /// Create a key
    #[must_use]
    pub const fn new(movie_id: MovieId, date: ShowDate, show_time: ShowTime) -> Self {
        Self {
            movie_id,
            date,
            show_time,
        }
    }
}

impl fmt::Display for ShowingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {}", self.movie_id, self.date, self.show_time)
    }
}

/// A request to open the seat map, possibly incomplete
///
/// Built from whatever the UI currently has selected. The seat map only
/// opens when all four parts are present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowingRequest {
    /// Selected movie
    pub movie: Option<MovieId>,
    /// Selected theatre
    pub theatre: Option<TheatreId>,
    /// Selected time slot
    pub time: Option<ShowTime>,
    /// Selected date
    pub date: Option<ShowDate>,
}

impl ShowingRequest {
    /// A request with every part present
    #[must_use]
    pub fn new(movie: MovieId, theatre: TheatreId, time: ShowTime, date: ShowDate) -> Self {
        Self {
            movie: Some(movie),
            theatre: Some(theatre),
            time: Some(time),
            date: Some(date),
        }
    }

    /// All four parts, or `None` if any is missing
    #[must_use]
    pub fn complete(self) -> Option<(MovieId, TheatreId, ShowTime, ShowDate)> {
        Some((self.movie?, self.theatre?, self.time?, self.date?))
    }
}

/// The showing currently open in the seat map
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    /// Movie
    pub movie_id: MovieId,
    /// Movie title, for the seat-map header
    pub movie_title: String,
    /// Theatre
    pub theatre_id: TheatreId,
    /// Theatre name, for the seat-map header
    pub theatre_name: String,
    /// Show time
    pub time: ShowTime,
    /// Show date
    pub date: ShowDate,
}

impl Showing {
    /// Occupancy key of this showing
    #[must_use]
    pub fn key(&self) -> ShowingKey {
        ShowingKey::new(self.movie_id.clone(), self.date, self.time.clone())
    }
}

// ============================================================================
// Read models
// ============================================================================

/// Render data for one seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCell {
    /// Seat
    pub seat: SeatId,
    /// Picked by the user
    pub is_selected: bool,
    /// Already booked; not interactive
    pub is_occupied: bool,
}

/// Render data for one row of seats
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRow {
    /// Row letter
    pub row: char,
    /// Seats in the row, numbered 1..=20
    pub cells: Vec<SeatCell>,
}

/// The committed seat list handed to the booking system
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Showing being booked
    pub showing: Showing,
    /// Seats, in row-major order
    pub seats: Vec<SeatId>,
}
