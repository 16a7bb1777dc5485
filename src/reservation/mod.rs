//! Accepting a reservation: fetching the acceptance URL and reading the
//! confirmation page it returns.

pub mod confirmation;
pub mod fetch;
pub mod types;

pub use confirmation::ConfirmationParser;
pub use fetch::{HttpFetcher, PageFetcher};
pub use types::{ClassDetails, ReservationResult};
