//! Date index: the selectable dates of the date picker.

use crate::types::{DateLabel, Movie, ShowDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every date any movie plays on, deduplicated, ascending
///
/// Movies without `show_dates` contribute nothing.
#[must_use]
pub fn unique_dates(movies: &[Movie]) -> Vec<ShowDate> {
    movies
        .iter()
        .filter_map(|movie| movie.show_dates.as_ref())
        .flatten()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One button of the date picker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    /// The date
    pub date: ShowDate,
    /// Weekday / day / month label
    pub label: DateLabel,
    /// Highlighted as today
    pub is_today: bool,
    /// Currently selected
    pub is_selected: bool,
}

/// The date picker's data, computed once per catalog
///
/// `today` is the anchor used to initialise the selected date. It does not
/// have to be one of `dates`: if nothing plays today the initial listing
/// is simply empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateIndex {
    dates: Vec<ShowDate>,
    today: ShowDate,
}

impl DateIndex {
    /// Index the dates of `movies`
    #[must_use]
    pub fn new(movies: &[Movie], today: ShowDate) -> Self {
        let dates = unique_dates(movies);
        tracing::debug!(dates = dates.len(), %today, "Date index built");
        Self { dates, today }
    }

    /// Selectable dates, ascending
    #[must_use]
    pub fn dates(&self) -> &[ShowDate] {
        &self.dates
    }

    /// The "today" anchor
    #[must_use]
    pub const fn today(&self) -> ShowDate {
        self.today
    }

    /// Picker entries with today / selected flags
    #[must_use]
    pub fn entries(&self, selected: Option<&ShowDate>) -> Vec<DateEntry> {
        self.dates
            .iter()
            .map(|date| DateEntry {
                date: *date,
                label: date.label(),
                is_today: *date == self.today,
                is_selected: selected == Some(date),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieId;

    fn movie(id: &str, dates: Option<&[&str]>) -> Movie {
        Movie {
            id: MovieId::new(id),
            title: id.to_string(),
            language: String::new(),
            format: String::new(),
            duration: String::new(),
            genre: vec![],
            recommended: false,
            show_dates: dates.map(|dates| {
                dates
                    .iter()
                    .map(|d| d.parse().unwrap_or_else(|e| unreachable!("{e}")))
                    .collect()
            }),
            theatres: vec![],
        }
    }

    fn date(s: &str) -> ShowDate {
        s.parse().unwrap_or_else(|e| unreachable!("{e}"))
    }

    #[test]
    fn dates_are_deduplicated_and_sorted() {
        let movies = [
            movie("M1", Some(&["2024-05-03", "2024-05-01"])),
            movie("M2", Some(&["2024-05-01", "2024-04-30"])),
            movie("M3", None),
        ];
        let dates: Vec<String> = unique_dates(&movies).iter().map(ToString::to_string).collect();
        assert_eq!(dates, ["2024-04-30", "2024-05-01", "2024-05-03"]);
    }

    #[test]
    fn year_boundary_sorts_chronologically() {
        let movies = [movie("M1", Some(&["2025-01-01", "2024-12-31"]))];
        assert_eq!(unique_dates(&movies), vec![date("2024-12-31"), date("2025-01-01")]);
    }

    #[test]
    fn no_movies_no_dates() {
        assert!(unique_dates(&[]).is_empty());
    }

    #[test]
    fn entries_flag_today_and_selection() {
        let movies = [movie("M1", Some(&["2024-05-01", "2024-05-02"]))];
        let index = DateIndex::new(&movies, date("2024-05-01"));
        let entries = index.entries(Some(&date("2024-05-02")));

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_today && !entries[0].is_selected);
        assert!(!entries[1].is_today && entries[1].is_selected);
        assert_eq!(entries[1].label.weekday, "Thu");
        assert_eq!(entries[1].label.day, 2);
        assert_eq!(entries[1].label.month, "May");
    }

    #[test]
    fn today_need_not_be_listed() {
        let movies = [movie("M1", Some(&["2024-05-02"]))];
        let index = DateIndex::new(&movies, date("2024-05-01"));
        assert_eq!(index.today(), date("2024-05-01"));
        assert!(index.entries(None).iter().all(|e| !e.is_today));
    }
}
