//! Showtime demo shell
//!
//! Loads the catalogs and drives one browsing session from stdin, one
//! command per line. Type `help` for the command list.

use anyhow::Context;
use showtime::command::HELP;
use showtime::{
    Catalog, Command, Config, LoggingBookingDesk, NO_SHOWS_MESSAGE, ShowtimeApp,
    metrics::register_business_metrics,
};
use showtime_core::environment::{Clock, SystemClock};
use showtime_testing::FixedClock;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!(
        movie_catalog = %config.catalog.movie_catalog.display(),
        occupancy_catalog = %config.catalog.occupancy_catalog.display(),
        today = ?config.today,
        "Starting Showtime"
    );

    register_business_metrics();

    let catalog = Arc::new(Catalog::load(&config.catalog).context("Failed to load catalogs")?);

    let clock: Arc<dyn Clock> = match config.today {
        Some(today) => Arc::new(FixedClock::on_date(today.date())),
        None => Arc::new(SystemClock),
    };

    let mut app = ShowtimeApp::new(catalog, clock, Arc::new(LoggingBookingDesk))?;

    println!("=== Showtime ===");
    print_dates(&app);
    print_movies(&app);
    println!("\nType 'help' for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            },
        };

        // Booking closes the seat map, so capture the pick first.
        let pending_booking = app.can_book().then(|| app.selection_summary());

        if let Some(action) = command.action() {
            app.send(action)?;
        }

        match command {
            Command::Dates => print_dates(&app),
            Command::Date(_) | Command::Movies => print_movies(&app),
            Command::Recommended => print_recommended(&app),
            Command::Open {
                movie,
                theatre,
                time,
            } => {
                if app.is_showing_open(&movie, &theatre, &time) {
                    print_seats(&app);
                } else {
                    println!("Showing not available (select a date and a listed showtime).");
                    if app.showing().is_some() {
                        println!("The previous seat map is still open.");
                    }
                }
            },
            Command::Toggle(_) | Command::Seats => print_seats(&app),
            Command::Book => match pending_booking {
                Some(seats) if app.showing().is_none() => println!("Booked seats: {seats}"),
                _ if app.showing().is_none() => println!("No seat map open."),
                _ => println!("Pick at least one seat before booking."),
            },
            Command::Close => println!("Seat map closed."),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    info!("Showtime stopped");
    Ok(())
}

fn print_dates(app: &ShowtimeApp) {
    println!("\nDates:");
    for entry in app.dates() {
        let marker = match (entry.is_selected, entry.is_today) {
            (true, true) => "*today",
            (true, false) => "*",
            (false, true) => " today",
            (false, false) => "",
        };
        println!(
            "  {}  {} {:>2} {}  {marker}",
            entry.date, entry.label.weekday, entry.label.day, entry.label.month
        );
    }
}

fn print_movies(app: &ShowtimeApp) {
    match app.selected_date() {
        Some(date) => println!("\nMovies on {date}:"),
        None => println!("\nMovies:"),
    }

    let listing = app.listing();
    if listing.is_empty() {
        println!("  {NO_SHOWS_MESSAGE}");
        return;
    }

    for movie in listing.movies() {
        println!(
            "  [{}] {} ({}, {}, {}) {}",
            movie.id,
            movie.title,
            movie.language,
            movie.format,
            movie.duration,
            movie.genre_line()
        );
        for theatre in &movie.theatres {
            let times: Vec<&str> = theatre.show_timings.iter().map(showtime::ShowTime::as_str).collect();
            println!(
                "      [{}] {} - {}: {}",
                theatre.id,
                theatre.name,
                theatre.location,
                times.join("  ")
            );
        }
    }
}

fn print_recommended(app: &ShowtimeApp) {
    println!("\nRecommended:");
    for movie in app.recommended() {
        println!("  [{}] {} - {}", movie.id, movie.title, movie.genre_line());
    }
}

fn print_seats(app: &ShowtimeApp) {
    let Some(showing) = app.showing() else {
        println!("No seat map open.");
        return;
    };

    println!(
        "\n{} - {} - {} {}",
        showing.movie_title, showing.theatre_name, showing.date, showing.time
    );
    println!("            ---------- SCREEN ----------");
    for row in app.seat_rows() {
        let cells: String = row
            .cells
            .iter()
            .map(|cell| {
                if cell.is_occupied {
                    'x'
                } else if cell.is_selected {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        println!("  {}  {cells}", row.row);
    }
    println!("  (. free  # picked  x taken)");
    println!("Selected seats: {}", app.selection_summary());
    if app.can_book() {
        println!("Type 'book' to book.");
    }
}
