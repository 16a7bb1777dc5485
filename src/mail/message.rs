//! Mail reader: loads a file as an RFC 5322 message.
//!
//! `mail_parser` does the parsing. Header values are kept raw (unfolded) in
//! arrival order, the subject is RFC 2047 decoded, and the body is kept
//! undecoded so callers pick the transfer decoding they need.
//!
//! `mail_parser` is best-effort and accepts nearly any byte string, so the
//! header block it found is checked for RFC 5322 field syntax first.

use std::path::Path;

use mail_parser::{Message, MessageParser};

use crate::error::AcceptError;

/// A parsed email: header mapping plus the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    headers: Vec<(String, String)>,
    subject: Option<String>,
    body: Vec<u8>,
}

impl MailMessage {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a header, in order of appearance.
    pub fn header_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded `Subject`, if the message has one.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().or_else(|| self.header("Subject"))
    }

    /// Raw (transfer-encoded) body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Read and parse the message stored at `path`.
pub async fn read_message(path: &Path) -> Result<MailMessage, AcceptError> {
    let raw = tokio::fs::read(path).await.map_err(|source| AcceptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_message(&raw)
}

/// Parse raw RFC 5322 bytes.
///
/// A message may have no header fields at all (it starts with a blank line);
/// an empty input is an error.
pub fn parse_message(raw: &[u8]) -> Result<MailMessage, AcceptError> {
    if raw.is_empty() {
        return Err(AcceptError::Parse("empty message".into()));
    }

    let parsed = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| AcceptError::Parse("no header block found".into()))?;

    let body_offset = (parsed.root_part().raw_body_offset() as usize).min(raw.len());
    check_header_block(&raw[..body_offset])?;

    Ok(MailMessage {
        headers: raw_headers(&parsed, raw),
        subject: parsed.subject().map(str::to_string),
        body: raw[body_offset..].to_vec(),
    })
}

/// Top-level header fields with their raw values unfolded.
fn raw_headers(parsed: &Message<'_>, raw: &[u8]) -> Vec<(String, String)> {
    parsed
        .headers()
        .iter()
        .map(|header| {
            let value = raw
                .get(header.offset_start() as usize..header.offset_end() as usize)
                .unwrap_or_default();
            (header.name().to_string(), unfold(value))
        })
        .collect()
}

fn unfold(value: &[u8]) -> String {
    String::from_utf8_lossy(value)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every line up to the blank separator must be a field or a continuation of one.
fn check_header_block(block: &[u8]) -> Result<(), AcceptError> {
    let text = String::from_utf8_lossy(block);
    let mut seen_field = false;

    for line in text.lines() {
        if line.trim().is_empty() && !line.starts_with([' ', '\t']) {
            break;
        }
        if line.starts_with([' ', '\t']) {
            if !seen_field {
                return Err(AcceptError::Parse(format!(
                    "continuation before first header: {line:?}"
                )));
            }
            continue;
        }
        line.split_once(':')
            .filter(|(name, _)| is_field_name(name))
            .ok_or_else(|| AcceptError::Parse(format!("malformed header line: {line:?}")))?;
        seen_field = true;
    }
    Ok(())
}

/// RFC 5322 field-name: printable US-ASCII except colon.
fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b) && b != b':')
}
