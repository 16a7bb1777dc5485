//! Inbound invitation emails: reading, classification, URL extraction.

pub mod invitation;
pub mod message;
pub mod quoted_printable;

pub use invitation::{find_accept_url, is_invitation};
pub use message::{MailMessage, parse_message, read_message};
