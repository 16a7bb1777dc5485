//! Filesystem watcher for the invitation drop directory.
//!
//! Polls the directory (non-recursively) and forwards one [`FileEvent`] per
//! newly created entry into a tokio channel. Everything except creation is
//! discarded. Watcher errors are logged and the stream keeps going.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::error::WatchError;

/// A file appeared in the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
}

/// Keep only creation events, one [`FileEvent`] per path.
fn created_files(event: Event) -> Vec<FileEvent> {
    if !matches!(event.kind, EventKind::Create(_)) {
        return Vec::new();
    }
    event
        .paths
        .into_iter()
        .map(|path| FileEvent { path })
        .collect()
}

/// Start polling `dir` every `poll_interval`, sending creations to `events`.
///
/// The returned watcher must be kept alive; dropping it stops the polling.
pub fn watch_directory(
    dir: &Path,
    poll_interval: Duration,
    events: UnboundedSender<FileEvent>,
) -> Result<PollWatcher, WatchError> {
    // The poll backend reports a missing root through the event handler
    // instead of failing `watch`, so check up front.
    let metadata = std::fs::metadata(dir).map_err(|source| WatchError::Missing {
        path: dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(WatchError::NotADirectory(dir.to_path_buf()));
    }

    let config = notify::Config::default().with_poll_interval(poll_interval);

    let mut watcher = PollWatcher::new(
        move |result: notify::Result<Event>| match result {
            Ok(event) => {
                for file in created_files(event) {
                    debug!(path = %file.path.display(), "File created");
                    if events.send(file).is_err() {
                        debug!("Event receiver closed, dropping file event");
                    }
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        },
        config,
    )
    .map_err(WatchError::Create)?;

    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(|source| WatchError::Register {
            path: dir.to_path_buf(),
            source,
        })?;

    info!(
        "Watching {} (polling every {}ms)",
        dir.display(),
        poll_interval.as_millis()
    );
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[test]
    fn only_create_events_pass() {
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path("/in/a.eml".into());
        let modified = Event::new(EventKind::Modify(ModifyKind::Any)).add_path("/in/a.eml".into());
        let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path("/in/a.eml".into());

        assert_eq!(
            created_files(created),
            vec![FileEvent {
                path: "/in/a.eml".into()
            }]
        );
        assert!(created_files(modified).is_empty());
        assert!(created_files(removed).is_empty());
    }

    #[test]
    fn missing_directory_fails_registration() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = watch_directory(&missing, Duration::from_millis(100), tx).unwrap_err();
        assert!(matches!(err, WatchError::Missing { .. }));
    }

    #[test]
    fn plain_file_fails_registration() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mail.eml");
        std::fs::write(&file, b"x").unwrap();
        let err = watch_directory(&file, Duration::from_millis(100), tx).unwrap_err();
        assert!(matches!(err, WatchError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn new_file_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _watcher = watch_directory(dir.path(), Duration::from_millis(50), tx).unwrap();

        // Let the first scan record the empty directory.
        tokio::time::sleep(Duration::from_millis(150)).await;
        std::fs::write(dir.path().join("invite.eml"), b"Subject: hi\r\n\r\n").unwrap();

        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event within 5s")
            .unwrap();
        assert_eq!(event.path.file_name().unwrap(), "invite.eml");

        // Later writes to the same file are modifications, not creations.
        std::fs::write(dir.path().join("invite.eml"), b"Subject: changed\r\n\r\n").unwrap();
        assert!(timeout(Duration::from_millis(400), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn subdirectory_contents_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _watcher = watch_directory(dir.path(), Duration::from_millis(50), tx).unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        std::fs::write(dir.path().join("sub").join("nested.eml"), b"x").unwrap();
        assert!(timeout(Duration::from_millis(400), rx.recv()).await.is_err());
    }
}
