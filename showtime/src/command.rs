//! Line commands of the demo shell.

use crate::browse::BrowseAction;
use crate::error::CommandError;
use crate::seat_map::SeatMapAction;
use crate::types::{MovieId, SeatId, ShowDate, ShowTime, TheatreId};
use std::str::FromStr;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  dates                          list show dates
  date YYYY-MM-DD                select a date
  movies                         movies on the selected date
  recommended                    recommended movies
  open <movie> <theatre> <time>  open the seat map
  toggle <seat>                  pick or unpick a seat, e.g. toggle B5
  seats                          show the seat map
  book                           book the picked seats
  close                          close the seat map
  help                           this text
  quit                           exit";

/// A parsed shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the date picker
    Dates,
    /// Select a date
    Date(ShowDate),
    /// List movies for the selected date
    Movies,
    /// List recommended movies
    Recommended,
    /// Open the seat map for a showtime on the selected date
    Open {
        /// Movie
        movie: MovieId,
        /// Theatre
        theatre: TheatreId,
        /// Time slot
        time: ShowTime,
    },
    /// Pick or unpick a seat
    Toggle(SeatId),
    /// Print the seat map
    Seats,
    /// Book the picked seats
    Book,
    /// Close the seat map
    Close,
    /// Print help
    Help,
    /// Exit
    Quit,
}

impl Command {
    /// The session action this command sends, if any
    ///
    /// Listing commands only read state and return `None`.
    #[must_use]
    pub fn action(&self) -> Option<BrowseAction> {
        match self {
            Self::Date(date) => Some(BrowseAction::SelectDate(*date)),
            Self::Open {
                movie,
                theatre,
                time,
            } => Some(BrowseAction::SelectShowtime {
                movie: movie.clone(),
                theatre: theatre.clone(),
                time: time.clone(),
            }),
            Self::Toggle(seat) => Some(BrowseAction::SeatMap(SeatMapAction::ToggleSeat { seat: *seat })),
            Self::Book => Some(BrowseAction::SeatMap(SeatMapAction::Book)),
            Self::Close => Some(BrowseAction::SeatMap(SeatMapAction::Close)),
            Self::Dates | Self::Movies | Self::Recommended | Self::Seats | Self::Help | Self::Quit => {
                None
            },
        }
    }
}

fn no_arguments(command: Command, name: &'static str, rest: &[&str]) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::TooManyArguments(name))
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, rest)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        match name.to_ascii_lowercase().as_str() {
            "dates" => no_arguments(Self::Dates, "dates", rest),
            "movies" => no_arguments(Self::Movies, "movies", rest),
            "recommended" => no_arguments(Self::Recommended, "recommended", rest),
            "seats" => no_arguments(Self::Seats, "seats", rest),
            "book" => no_arguments(Self::Book, "book", rest),
            "close" => no_arguments(Self::Close, "close", rest),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "date" => match rest {
                [] => Err(CommandError::MissingArgument {
                    command: "date",
                    argument: "a date (YYYY-MM-DD)",
                }),
                [raw] => raw
                    .parse()
                    .map(Self::Date)
                    .map_err(|_| CommandError::InvalidDate((*raw).to_string())),
                _ => Err(CommandError::TooManyArguments("date")),
            },
            "toggle" => match rest {
                [] => Err(CommandError::MissingArgument {
                    command: "toggle",
                    argument: "a seat (e.g. B5)",
                }),
                [raw] => Ok(Self::Toggle(SeatId::parse_typed(raw)?)),
                _ => Err(CommandError::TooManyArguments("toggle")),
            },
            "open" => match rest {
                [movie, theatre, time] => Ok(Self::Open {
                    movie: MovieId::new(*movie),
                    theatre: TheatreId::new(*theatre),
                    time: ShowTime::new(*time),
                }),
                [_, _, _, ..] => Err(CommandError::TooManyArguments("open")),
                _ => Err(CommandError::MissingArgument {
                    command: "open",
                    argument: "<movie> <theatre> <time>",
                }),
            },
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}
