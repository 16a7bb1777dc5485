//! wod-accept — accepts class-reservation invitations delivered by email.
//!
//! A new file in the watched directory is parsed as an email; if it is an
//! invitation, its one-click Accept URL is fetched, the confirmation page is
//! scraped and a summary is pushed to the operator.

pub mod config;
pub mod error;
pub mod mail;
pub mod notifier;
pub mod pipeline;
pub mod reservation;
pub mod watcher;
