//! Movie filter: which movies to list for the selected date.

use crate::types::{Movie, ShowDate};

/// Message shown when no movie plays on the selected date
pub const NO_SHOWS_MESSAGE: &str = "No movies found for the selected date.";

/// Movies playing on `date`, in catalog order
///
/// With no date selected yet every movie is returned. Movies without
/// `show_dates` never match a date.
#[must_use]
pub fn movies_on_date<'a>(movies: &'a [Movie], date: Option<&ShowDate>) -> Vec<&'a Movie> {
    match date {
        None => movies.iter().collect(),
        Some(date) => movies.iter().filter(|movie| movie.plays_on(date)).collect(),
    }
}

/// Movies flagged as recommended, in catalog order, regardless of date
#[must_use]
pub fn recommended(movies: &[Movie]) -> Vec<&Movie> {
    movies.iter().filter(|movie| movie.recommended).collect()
}

/// What the movie list shows for a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<'a> {
    /// At least one movie plays
    Movies(Vec<&'a Movie>),
    /// Nothing plays; show [`NO_SHOWS_MESSAGE`]
    NoShows,
}

impl<'a> Listing<'a> {
    /// Filter `movies` for `date`
    #[must_use]
    pub fn for_date(movies: &'a [Movie], date: Option<&ShowDate>) -> Self {
        let movies = movies_on_date(movies, date);
        if movies.is_empty() {
            Self::NoShows
        } else {
            Self::Movies(movies)
        }
    }

    /// Listed movies; empty for [`Listing::NoShows`]
    #[must_use]
    pub fn movies(&self) -> &[&'a Movie] {
        match self {
            Self::Movies(movies) => movies,
            Self::NoShows => &[],
        }
    }

    /// Whether nothing plays
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::NoShows)
    }
}
