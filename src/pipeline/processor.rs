//! Per-event pipeline controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::AcceptError;
use crate::mail::{find_accept_url, is_invitation, read_message};
use crate::notifier::Notifier;
use crate::reservation::{ConfirmationParser, PageFetcher, ReservationResult};
use crate::watcher::FileEvent;

/// Notification sent for a message that is not an invitation.
pub const NOT_INVITATION_TEXT: &str = "Not an 'open for reservation' message";

/// How one file event ended.
#[derive(Debug)]
pub enum Outcome {
    /// The invitation was accepted and the confirmation page parsed.
    Accepted(ReservationResult),
    /// Valid message, but not an invitation. Nothing was fetched.
    NotInvitation,
    /// A step failed. `url` is set once the acceptance URL was known.
    Failed {
        error: AcceptError,
        url: Option<String>,
    },
}

impl Outcome {
    /// The push text for this outcome.
    ///
    /// Failures at or after the fetch carry the URL on a second line so the
    /// operator can accept by hand.
    pub fn notification_text(&self) -> String {
        match self {
            Self::Accepted(result) => result.to_string(),
            Self::NotInvitation => NOT_INVITATION_TEXT.to_string(),
            Self::Failed {
                error,
                url: Some(url),
            } if error.is_post_fetch() => format!("{error}\n{url}"),
            Self::Failed { error, .. } => error.to_string(),
        }
    }
}

/// Runs reader → classifier → extractor → fetcher → parser for one file and
/// reports the outcome through the notifier.
pub struct Pipeline {
    watch_dir: PathBuf,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    parser: ConfirmationParser,
}

impl Pipeline {
    pub fn new(
        watch_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
        parser: ConfirmationParser,
    ) -> Self {
        Self {
            watch_dir: watch_dir.into(),
            fetcher,
            notifier,
            parser,
        }
    }

    /// The event's file name joined onto the watched directory.
    pub fn event_path(&self, event: &FileEvent) -> PathBuf {
        match event.path.file_name() {
            Some(name) => self.watch_dir.join(name),
            None => event.path.clone(),
        }
    }

    /// Process one event to completion and send exactly one notification.
    pub async fn handle(&self, event: &FileEvent) -> Outcome {
        let path = self.event_path(event);
        info!("{}", path.display());

        let outcome = self.process(&path).await;
        let text = outcome.notification_text();

        match &outcome {
            Outcome::Accepted(_) => info!("{text}"),
            Outcome::NotInvitation => info!(path = %path.display(), "{text}"),
            Outcome::Failed { .. } => error!(path = %path.display(), "{text}"),
        }

        self.notifier.notify(&text).await;
        outcome
    }

    /// Run the steps for the file at `path`.
    pub async fn process(&self, path: &Path) -> Outcome {
        let message = match read_message(path).await {
            Ok(message) => message,
            Err(error) => return Outcome::Failed { error, url: None },
        };

        if !is_invitation(&message) {
            return Outcome::NotInvitation;
        }

        let url = match find_accept_url(&message) {
            Ok(url) => url,
            Err(error) => return Outcome::Failed { error, url: None },
        };
        debug!(url = %url, "Found acceptance URL");

        match self.accept(&url).await {
            Ok(result) => Outcome::Accepted(result),
            Err(error) => Outcome::Failed {
                error,
                url: Some(url),
            },
        }
    }

    async fn accept(&self, url: &str) -> Result<ReservationResult, AcceptError> {
        let page = self.fetcher.fetch(url).await?;
        self.parser.parse(&page)
    }
}
