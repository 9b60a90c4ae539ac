//! Property tests for the date index, movie filter and seat selection.
//!
//! Run with: `cargo test --test properties_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use showtime::{
    Catalog, LoggingBookingDesk, Movie, MovieCatalog, MovieId, OccupancyCatalog, OccupancyIndex,
    OccupancyLookup, OccupancyRecord, SEAT_COUNT, SeatId, SeatMapAction, SeatMapEnvironment,
    SeatMapReducer, SeatMapState, ShowDate, ShowTime, ShowingKey, ShowingRequest, TheatreId,
    Theatre, movies_on_date, seat_grid, unique_dates,
};
use showtime_core::reducer::Reducer;
use std::collections::BTreeSet;
use std::sync::Arc;

fn show_date() -> impl Strategy<Value = ShowDate> {
    (0i64..60).prop_map(|offset| {
        let base = ShowDate::from_ymd(2024, 12, 1).unwrap().date();
        ShowDate::new(base + chrono::Duration::days(offset))
    })
}

fn seat() -> impl Strategy<Value = SeatId> {
    (0..SEAT_COUNT).prop_map(|i| seat_grid().nth(i).unwrap())
}

fn movie(index: usize, dates: Option<BTreeSet<ShowDate>>) -> Movie {
    Movie {
        id: MovieId::new(format!("M{index}")),
        title: format!("Movie {index}"),
        language: String::new(),
        format: String::new(),
        duration: String::new(),
        genre: vec![],
        recommended: false,
        show_dates: dates,
        theatres: vec![Theatre {
            id: TheatreId::new("T1"),
            name: "Hall".to_string(),
            location: String::new(),
            show_timings: vec![ShowTime::new("18:00")],
        }],
    }
}

fn movies() -> impl Strategy<Value = Vec<Movie>> {
    prop::collection::vec(
        prop::option::weighted(0.8, prop::collection::btree_set(show_date(), 0..6)),
        0..8,
    )
    .prop_map(|all| {
        all.into_iter()
            .enumerate()
            .map(|(i, dates)| movie(i, dates))
            .collect()
    })
}

fn actions() -> impl Strategy<Value = Vec<SeatMapAction>> {
    prop::collection::vec(
        prop_oneof![
            8 => seat().prop_map(|seat| SeatMapAction::ToggleSeat { seat }),
            1 => Just(SeatMapAction::Close),
            1 => Just(SeatMapAction::OpenShowing(open_request())),
        ],
        0..40,
    )
}

fn open_request() -> ShowingRequest {
    ShowingRequest::new(
        MovieId::new("M0"),
        TheatreId::new("T1"),
        ShowTime::new("18:00"),
        ShowDate::from_ymd(2024, 12, 1).unwrap(),
    )
}

fn seat_map_env(occupied: &BTreeSet<SeatId>) -> SeatMapEnvironment {
    let date = ShowDate::from_ymd(2024, 12, 1).unwrap();
    let record = OccupancyRecord {
        movie_id: MovieId::new("M0"),
        date,
        show_time: ShowTime::new("18:00"),
        occupied_seats: occupied.iter().map(ToString::to_string).collect(),
    };
    let catalog = Catalog::new(
        MovieCatalog {
            movies: vec![movie(0, Some(BTreeSet::from([date])))],
        },
        &OccupancyCatalog {
            seats: vec![record],
        },
    );
    SeatMapEnvironment::from_catalog(Arc::new(catalog), Arc::new(LoggingBookingDesk))
}

proptest! {
    #[test]
    fn unique_dates_are_sorted_and_distinct(movies in movies()) {
        let dates = unique_dates(&movies);
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));

        let expected: BTreeSet<ShowDate> = movies
            .iter()
            .filter_map(|m| m.show_dates.as_ref())
            .flatten()
            .copied()
            .collect();
        prop_assert_eq!(dates.len(), expected.len());
    }

    #[test]
    fn filter_keeps_exactly_the_movies_playing(movies in movies(), date in show_date()) {
        let listed = movies_on_date(&movies, Some(&date));
        let listed_ids: BTreeSet<&MovieId> = listed.iter().map(|m| &m.id).collect();

        for movie in &movies {
            let plays = movie.show_dates.as_ref().is_some_and(|d| d.contains(&date));
            prop_assert_eq!(listed_ids.contains(&movie.id), plays);
        }

        // Catalog order is preserved.
        let positions: Vec<usize> = listed
            .iter()
            .map(|m| movies.iter().position(|c| c.id == m.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unmatched_showing_has_no_occupied_seats(
        seats in prop::collection::vec(seat(), 0..10),
        date in show_date(),
    ) {
        let record = OccupancyRecord {
            movie_id: MovieId::new("M1"),
            date,
            show_time: ShowTime::new("18:00"),
            occupied_seats: seats.iter().map(ToString::to_string).collect(),
        };
        let index = OccupancyIndex::from_records(&[record]);

        let other_time = ShowingKey::new(MovieId::new("M1"), date, ShowTime::new("21:00"));
        let other_movie = ShowingKey::new(MovieId::new("M2"), date, ShowTime::new("18:00"));
        prop_assert!(index.occupied_seats(&other_time).is_empty());
        prop_assert!(index.occupied_seats(&other_movie).is_empty());
    }

    #[test]
    fn selection_never_overlaps_occupancy(
        occupied in prop::collection::btree_set(seat(), 0..30),
        actions in actions(),
    ) {
        let env = seat_map_env(&occupied);
        let reducer = SeatMapReducer::new();
        let mut state = SeatMapState::Closed;
        reducer.reduce(&mut state, SeatMapAction::OpenShowing(open_request()), &env);

        for action in actions {
            reducer.reduce(&mut state, action, &env);
            if let Some(open) = state.open() {
                prop_assert!(open.selected().is_disjoint(open.occupied()));
            }
            prop_assert!(state.grid().iter().all(|c| !(c.is_selected && c.is_occupied)));
        }
    }

    #[test]
    fn toggling_twice_is_identity(
        occupied in prop::collection::btree_set(seat(), 0..30),
        prefix in prop::collection::vec(seat(), 0..20),
        target in seat(),
    ) {
        let env = seat_map_env(&occupied);
        let reducer = SeatMapReducer::new();
        let mut state = SeatMapState::Closed;
        reducer.reduce(&mut state, SeatMapAction::OpenShowing(open_request()), &env);
        for seat in prefix {
            reducer.reduce(&mut state, SeatMapAction::ToggleSeat { seat }, &env);
        }

        let before = state.clone();
        reducer.reduce(&mut state, SeatMapAction::ToggleSeat { seat: target }, &env);
        reducer.reduce(&mut state, SeatMapAction::ToggleSeat { seat: target }, &env);
        prop_assert_eq!(state, before);
    }

    #[test]
    fn close_always_yields_closed(
        occupied in prop::collection::btree_set(seat(), 0..30),
        actions in actions(),
    ) {
        let env = seat_map_env(&occupied);
        let reducer = SeatMapReducer::new();
        let mut state = SeatMapState::Closed;
        for action in actions {
            reducer.reduce(&mut state, action, &env);
        }

        reducer.reduce(&mut state, SeatMapAction::Close, &env);
        prop_assert_eq!(&state, &SeatMapState::Closed);
        prop_assert!(state.showing().is_none());
        prop_assert!(state.selected_seats().is_empty());
        prop_assert!(state.grid().is_empty());
    }
}
