//! Subject classifier and acceptance-URL extractor.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::error::AcceptError;
use crate::mail::message::MailMessage;
use crate::mail::quoted_printable;

/// Subject fragment that marks an invitation (case-sensitive).
pub const SUBJECT_FRAGMENT: &str = "open for reservation";

/// The Accept button is an anchor wrapping the mailer's click-tracking URL.
pub const ACCEPT_URL_PATTERN: &str = r#"(http://mandrillapp[^"\s]*)">Accept"#;

static ACCEPT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ACCEPT_URL_PATTERN).expect("accept URL pattern compiles"));

/// Whether the message is a reservation invitation.
///
/// A missing `Subject` is simply not an invitation.
pub fn is_invitation(message: &MailMessage) -> bool {
    message
        .subject()
        .is_some_and(|subject| subject.contains(SUBJECT_FRAGMENT))
}

/// Decode the body as quoted-printable and return the first acceptance URL.
pub fn find_accept_url(message: &MailMessage) -> Result<String, AcceptError> {
    let decoded = quoted_printable::decode(message.body());
    let caps = ACCEPT_URL_RE
        .captures(&decoded)
        .ok_or(AcceptError::UrlNotFound)?;
    Ok(String::from_utf8_lossy(&caps[1]).into_owned())
}
