use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use wod_accept::config::{Config, PushoverCredentials};
use wod_accept::notifier::{Notifier, PushoverNotifier};
use wod_accept::pipeline::{Pipeline, spawn_pipeline};
use wod_accept::reservation::{ConfirmationParser, HttpFetcher, PageFetcher};
use wod_accept::watcher::watch_directory;

/// Watch a directory for reservation invitation emails and accept them.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// Directory where new invitation emails are delivered.
    watch_dir: PathBuf,
    /// Pushover application token.
    pushover_token: String,
    /// Pushover user key.
    pushover_user: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::new(
        args.watch_dir,
        PushoverCredentials::new(args.pushover_token, args.pushover_user),
    );

    eprintln!("📬 wod-accept v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Watching: {}", config.watch_dir.display());
    eprintln!("   Poll interval: {}ms\n", config.poll_interval.as_millis());

    let parser = ConfirmationParser::new(&config.layouts)?;
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new());
    let notifier: Arc<dyn Notifier> = Arc::new(PushoverNotifier::new(config.credentials.clone()));
    let pipeline = Arc::new(Pipeline::new(
        config.watch_dir.clone(),
        fetcher,
        notifier,
        parser,
    ));

    // The drain loop is running before polling starts.
    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let worker = spawn_pipeline(pipeline, events_rx);

    let _watcher = watch_directory(&config.watch_dir, config.poll_interval, events_tx)?;

    worker.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn takes_three_positional_arguments() {
        Args::command().debug_assert();
        let args = Args::try_parse_from(["wod-accept", "/var/mail/in", "tok", "usr"]).unwrap();
        assert_eq!(args.watch_dir, PathBuf::from("/var/mail/in"));
        assert_eq!(args.pushover_token, "tok");
        assert_eq!(args.pushover_user, "usr");
    }

    #[test]
    fn has_no_version_flag() {
        assert!(Args::try_parse_from(["wod-accept", "--version"]).is_err());
        assert!(Args::try_parse_from(["wod-accept", "/var/mail/in", "tok"]).is_err());
    }
}
