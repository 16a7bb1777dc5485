//! Reservation result types.

use std::fmt;

use chrono::{DateTime, Utc};

/// Absolute-time rendering used in notifications, e.g. `2024-10-15 18:30:00 +0000 UTC`.
pub const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z UTC";

/// The class a reservation is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDetails {
    /// Program name as printed on the page (not trimmed).
    pub program: String,
    /// Scheduled start, minute precision.
    pub starts_at: DateTime<Utc>,
}

/// What the confirmation page says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationResult {
    /// Free-form status headline, e.g. "You're in!".
    pub status: String,
    pub class: ClassDetails,
}

impl fmt::Display for ReservationResult {
    /// `<status> (<program>, <timestamp>)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.status,
            self.class.program,
            self.class.starts_at.format(INSTANT_FORMAT)
        )
    }
}
