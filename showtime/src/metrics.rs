//! Business metrics for seat selection.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `showtime_showings_total{status}` - Seat maps opened / rejected
//! - `showtime_seat_toggles_total{result}` - Seat clicks (selected, deselected, rejected)
//! - `showtime_bookings_total` - Seat lists handed to the booking system
//! - `showtime_seats_booked_total` - Seats in those lists
//! - `showtime_occupancy_lookups_total{result}` - Occupancy lookups (hit, miss)
//!
//! Without an installed recorder every call is a no-op.

use metrics::describe_counter;

/// Register all business metric descriptions.
///
/// Call once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "showtime_showings_total",
        "Seat maps opened or rejected, by status"
    );
    describe_counter!(
        "showtime_seat_toggles_total",
        "Seat clicks by result (selected, deselected, rejected)"
    );
    describe_counter!(
        "showtime_bookings_total",
        "Seat lists handed to the booking system"
    );
    describe_counter!(
        "showtime_seats_booked_total",
        "Seats included in handed-off bookings"
    );
    describe_counter!(
        "showtime_occupancy_lookups_total",
        "Occupancy lookups by result (hit, miss)"
    );

    tracing::info!("Business metrics registered");
}

/// Record a seat map opening for a showing.
pub fn record_showing_opened() {
    metrics::counter!("showtime_showings_total", "status" => "opened").increment(1);
}

/// Record an open request that was guarded out.
///
/// # Arguments
///
/// * `reason` - Why it was rejected (`incomplete`, `unknown_movie`,
///   `unknown_theatre`, `unknown_time`, `not_playing`)
pub fn record_showing_rejected(reason: &'static str) {
    metrics::counter!("showtime_showings_total", "status" => "rejected", "reason" => reason)
        .increment(1);
}

/// Record a seat click.
///
/// # Arguments
///
/// * `result` - `selected`, `deselected` or `rejected`
pub fn record_seat_toggle(result: &'static str) {
    metrics::counter!("showtime_seat_toggles_total", "result" => result).increment(1);
}

/// Record a booking hand-off.
///
/// # Arguments
///
/// * `seats` - Number of seats in the committed list
pub fn record_booking_committed(seats: usize) {
    metrics::counter!("showtime_bookings_total").increment(1);
    metrics::counter!("showtime_seats_booked_total").increment(seats as u64);
    tracing::debug!(seats, "Recorded booking_committed metric");
}

/// Record an occupancy lookup.
pub fn record_occupancy_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("showtime_occupancy_lookups_total", "result" => result).increment(1);
}
