//! Error types for the Showtime engine.
//!
//! The seat-selection core itself never fails: guarded transitions are
//! silent no-ops. Errors only exist at the edges, where catalogs, seat ids
//! and configuration come in from outside.

use std::path::PathBuf;
use thiserror::Error;

/// A seat identifier that does not name a seat in the grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeatIdError {
    /// Not of the form `{row letter}{number}`
    #[error("Malformed seat id '{0}'")]
    Malformed(String),

    /// Row letter outside `A..=H`
    #[error("Unknown seat row '{0}'")]
    UnknownRow(char),

    /// Seat number outside `1..=20`
    #[error("Seat number {0} is outside the row")]
    NumberOutOfRange(u32),
}

/// Errors loading the movie or occupancy catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not valid JSON of the expected shape
    #[error("Failed to parse {what}: {source}")]
    Parse {
        /// Which catalog failed (`movie catalog` / `occupancy catalog`)
        what: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {variable}: '{value}' ({reason})")]
    InvalidValue {
        /// Environment variable name
        variable: &'static str,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// A demo shell line that is not a known command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line
    #[error("Empty command")]
    Empty,

    /// First word is not a command
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    /// A required argument is missing
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// Command word
        command: &'static str,
        /// Description of the missing argument
        argument: &'static str,
    },

    /// More words than the command takes
    #[error("'{0}' takes fewer arguments")]
    TooManyArguments(&'static str),

    /// Date argument is not `YYYY-MM-DD`
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Seat argument is not a grid seat
    #[error(transparent)]
    InvalidSeat(#[from] SeatIdError),
}
