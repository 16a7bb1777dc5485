//! Email → acceptance pipeline.
//!
//! Every file event flows through:
//! 1. `read_message()` — load and parse the RFC 5322 file
//! 2. `is_invitation()` — subject filter
//! 3. `find_accept_url()` — quoted-printable decode + URL match
//! 4. `PageFetcher::fetch()` — GET the URL (this is the acceptance)
//! 5. `ConfirmationParser::parse()` — status + class details
//!
//! **Exactly one notification per event**, success or failure.

pub mod processor;
pub mod worker;

pub use processor::{NOT_INVITATION_TEXT, Outcome, Pipeline};
pub use worker::spawn_pipeline;
