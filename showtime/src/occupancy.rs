//! Occupancy resolver: which seats are already taken for a showing.
//!
//! Occupancy is keyed by the exact (movie, date, time) triple. A showing with
//! no record has no occupied seats; that is the normal case for an
//! unbooked showing, not an error.

use crate::catalog::Catalog;
use crate::types::{OccupancyRecord, OccupiedSeats, SeatId, ShowingKey};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Resolves the occupied seats of a showing.
///
/// Injected into the seat map's environment so tests can substitute their
/// own occupancy data.
pub trait OccupancyLookup {
    /// Occupied seats for `key`; empty when the showing has no record
    fn occupied_seats(&self, key: &ShowingKey) -> OccupiedSeats;
}

/// Exact-match index over the occupancy catalog
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    by_key: HashMap<ShowingKey, OccupiedSeats>,
    ambiguous_keys: usize,
    skipped_seats: usize,
}

impl OccupancyIndex {
    /// Index `records` by their key
    ///
    /// When several records share a key the first one wins and the rest are
    /// reported. Seat strings that do not name a grid seat are skipped.
    #[must_use]
    pub fn from_records(records: &[OccupancyRecord]) -> Self {
        let mut index = Self::default();

        for record in records {
            let key = record.key();
            match index.by_key.entry(key) {
                Entry::Occupied(existing) => {
                    index.ambiguous_keys += 1;
                    tracing::warn!(
                        showing = %existing.key(),
                        "Multiple occupancy records for one showing; using the first"
                    );
                },
                Entry::Vacant(slot) => {
                    let mut seats = OccupiedSeats::new();
                    for raw in &record.occupied_seats {
                        match raw.parse::<SeatId>() {
                            Ok(seat) => {
                                seats.insert(seat);
                            },
                            Err(error) => {
                                index.skipped_seats += 1;
                                tracing::warn!(
                                    showing = %slot.key(),
                                    seat = %raw,
                                    %error,
                                    "Skipping occupied seat outside the grid"
                                );
                            },
                        }
                    }
                    slot.insert(seats);
                },
            }
        }

        index
    }

    /// Number of showings with an occupancy record
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether no showing has an occupancy record
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Records ignored because an earlier record had the same key
    #[must_use]
    pub const fn ambiguous_keys(&self) -> usize {
        self.ambiguous_keys
    }

    /// Seat strings ignored because they are not grid seats
    #[must_use]
    pub const fn skipped_seats(&self) -> usize {
        self.skipped_seats
    }
}

impl OccupancyLookup for OccupancyIndex {
    fn occupied_seats(&self, key: &ShowingKey) -> OccupiedSeats {
        if let Some(seats) = self.by_key.get(key) {
            crate::metrics::record_occupancy_lookup(true);
            seats.clone()
        } else {
            crate::metrics::record_occupancy_lookup(false);
            tracing::debug!(showing = %key, "No occupancy record; all seats free");
            OccupiedSeats::new()
        }
    }
}

impl OccupancyLookup for Catalog {
    fn occupied_seats(&self, key: &ShowingKey) -> OccupiedSeats {
        self.occupancy().occupied_seats(key)
    }
}
