//! Catalog store: the static movie and occupancy catalogs.
//!
//! Both catalogs are loaded once at startup and never written afterwards.
//! They are shared read-only (`Arc<Catalog>`) by every consumer.
//!
//! Loading reports data-quality problems through `tracing` but never repairs
//! data: a movie without show dates simply never appears in a listing. A
//! malformed entry (an unparsable date, a missing id) is dropped on its own;
//! only a document that is not of the expected shape fails the load.

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::occupancy::OccupancyIndex;
use crate::types::{Movie, MovieId, OccupancyRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// The movie catalog document (`{"movies": [...]}`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCatalog {
    /// Movies in display order
    #[serde(default)]
    pub movies: Vec<Movie>,
}

impl MovieCatalog {
    /// Look up a movie by id
    #[must_use]
    pub fn movie(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| &movie.id == id)
    }
}

/// The occupancy catalog document (`{"seats": [...]}`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyCatalog {
    /// One record per showing with booked seats
    #[serde(default)]
    pub seats: Vec<OccupancyRecord>,
}

/// Movie catalog as read from disk, entries not yet checked
#[derive(Deserialize)]
struct RawMovieCatalog {
    #[serde(default)]
    movies: Vec<Value>,
}

/// Occupancy catalog as read from disk, entries not yet checked
#[derive(Deserialize)]
struct RawOccupancyCatalog {
    #[serde(default)]
    seats: Vec<Value>,
}

/// Both catalogs, loaded and indexed
#[derive(Debug, Default)]
pub struct Catalog {
    movies: MovieCatalog,
    occupancy: OccupancyIndex,
}

impl Catalog {
    /// Build a catalog from already-parsed documents
    #[must_use]
    pub fn new(movies: MovieCatalog, occupancy: &OccupancyCatalog) -> Self {
        report_movie_quality(&movies);

        let occupancy = OccupancyIndex::from_records(&occupancy.seats);

        tracing::info!(
            movies = movies.movies.len(),
            showings_with_occupancy = occupancy.len(),
            "Catalog loaded"
        );

        Self { movies, occupancy }
    }

    /// Parse both catalogs from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if either document is malformed.
    pub fn from_json(movies_json: &str, occupancy_json: &str) -> Result<Self, CatalogError> {
        let movies: RawMovieCatalog =
            serde_json::from_str(movies_json).map_err(|source| CatalogError::Parse {
                what: "movie catalog",
                source,
            })?;
        let occupancy: RawOccupancyCatalog =
            serde_json::from_str(occupancy_json).map_err(|source| CatalogError::Parse {
                what: "occupancy catalog",
                source,
            })?;

        let movies = MovieCatalog {
            movies: keep_valid_entries("movie catalog", movies.movies),
        };
        let occupancy = OccupancyCatalog {
            seats: keep_valid_entries("occupancy catalog", occupancy.seats),
        };

        Ok(Self::new(movies, &occupancy))
    }

    /// Read and parse both catalog files
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Read`] if a file cannot be read and
    /// [`CatalogError::Parse`] if its content is malformed.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let movies_json = read_file(&config.movie_catalog)?;
        let occupancy_json = read_file(&config.occupancy_catalog)?;
        Self::from_json(&movies_json, &occupancy_json)
    }

    /// All movies, in catalog order
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies.movies
    }

    /// Look up a movie by id
    #[must_use]
    pub fn movie(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.movie(id)
    }

    /// The occupancy index
    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    tracing::debug!(path = %path.display(), "Reading catalog file");
    std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize each entry on its own, dropping the ones that do not parse
fn keep_valid_entries<T: DeserializeOwned>(what: &'static str, entries: Vec<Value>) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let id = entry
                .get("id")
                .or_else(|| entry.get("movieId"))
                .and_then(Value::as_str)
                .map(str::to_owned);

            match serde_json::from_value(entry) {
                Ok(parsed) => Some(parsed),
                Err(error) => {
                    tracing::warn!(what, position, id = ?id, %error, "Skipping malformed catalog entry");
                    None
                },
            }
        })
        .collect()
}

fn report_movie_quality(catalog: &MovieCatalog) {
    let mut seen_movies = HashSet::new();

    for movie in &catalog.movies {
        if !seen_movies.insert(&movie.id) {
            tracing::warn!(movie_id = %movie.id, "Duplicate movie id; lookups use the first entry");
        }

        match &movie.show_dates {
            None => {
                tracing::warn!(movie_id = %movie.id, "Movie has no showDates and will never be listed");
            },
            Some(dates) if dates.is_empty() => {
                tracing::warn!(movie_id = %movie.id, "Movie has empty showDates and will never be listed");
            },
            Some(_) => {},
        }

        let mut seen_theatres = HashSet::new();
        for theatre in &movie.theatres {
            if !seen_theatres.insert(&theatre.id) {
                tracing::warn!(
                    movie_id = %movie.id,
                    theatre_id = %theatre.id,
                    "Duplicate theatre id within movie; lookups use the first entry"
                );
            }
        }
    }
}
