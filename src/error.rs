//! Error types for wod-accept.
//!
//! The `Display` text of an [`AcceptError`] is what ends up in the push
//! notification, so the messages are written for the operator's phone.

use std::path::PathBuf;

/// Failure of one step of the email → acceptance pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AcceptError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed message: {0}")]
    Parse(String),

    #[error("URL not found")]
    UrlNotFound,

    #[error("{0}")]
    Fetch(String),

    #[error("Class status node not found")]
    StatusMissing,

    #[error("Class details node not found")]
    DetailsMissing,

    #[error("Class details not found")]
    DetailsUnparsed,

    #[error("failed to parse class time {input:?}: {source}")]
    TimeUnparsed {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl AcceptError {
    /// Whether the failure happened once the acceptance URL was known.
    ///
    /// The controller appends the URL to these so the operator can retry by hand.
    pub fn is_post_fetch(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_)
                | Self::StatusMissing
                | Self::DetailsMissing
                | Self::DetailsUnparsed
                | Self::TimeUnparsed { .. }
        )
    }
}

impl From<reqwest::Error> for AcceptError {
    /// Flattens the cause chain into the message, e.g. `...: Connection refused`.
    fn from(e: reqwest::Error) -> Self {
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Fetch(message)
    }
}

/// Push notification errors. Logged only, never propagated into the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Push request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Push rejected by {provider} ({status}): {reason}")]
    Rejected {
        provider: String,
        status: u16,
        reason: String,
    },
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Filesystem watcher setup errors. These abort startup.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Cannot watch {path}: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot watch {0}: not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to create watcher: {0}")]
    Create(#[source] notify::Error),

    #[error("Failed to watch {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_visible_messages() {
        assert_eq!(AcceptError::UrlNotFound.to_string(), "URL not found");
        assert_eq!(AcceptError::DetailsUnparsed.to_string(), "Class details not found");
        assert_eq!(
            AcceptError::StatusMissing.to_string(),
            "Class status node not found"
        );
        assert_eq!(
            AcceptError::Fetch("connection refused".into()).to_string(),
            "connection refused"
        );
    }

    #[test]
    fn only_fetch_and_later_carry_url() {
        assert!(!AcceptError::UrlNotFound.is_post_fetch());
        assert!(!AcceptError::Parse("x".into()).is_post_fetch());
        assert!(AcceptError::Fetch("x".into()).is_post_fetch());
        assert!(AcceptError::DetailsMissing.is_post_fetch());
        assert!(AcceptError::DetailsUnparsed.is_post_fetch());
    }
}
