//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// How often the watched directory is polled for new files.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pushover application token and user key.
///
/// Read once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct PushoverCredentials {
    pub token: SecretString,
    pub user: SecretString,
}

impl PushoverCredentials {
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user: SecretString::from(user.into()),
        }
    }
}

/// Where the status headline and class details live on a confirmation page.
///
/// The provider generates its element ids from the theme name, so more than
/// one layout has been seen in the wild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// CSS selector of the element whose text is the status sentence.
    pub status_selector: String,
    /// CSS selector of the element whose text holds the class details.
    pub details_selector: String,
}

impl PageLayout {
    pub fn new(status_selector: impl Into<String>, details_selector: impl Into<String>) -> Self {
        Self {
            status_selector: status_selector.into(),
            details_selector: details_selector.into(),
        }
    }

    /// Layout for a theme prefix, e.g. `AthleteTheme` → `div[id='AthleteTheme_wt12_block_wtTitle']`.
    pub fn for_theme(theme: &str) -> Self {
        Self::new(
            format!("div[id='{theme}_wt12_block_wtTitle']"),
            format!("div[id='{theme}_wt12_block_wtMainContent']"),
        )
    }

    /// Known layouts, tried in order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::for_theme("AthleteTheme"), Self::for_theme("W_Theme_UI")]
    }
}

/// Immutable process-wide configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where new invitation emails appear.
    pub watch_dir: PathBuf,
    /// Push credentials.
    pub credentials: PushoverCredentials,
    /// Watcher polling cadence.
    pub poll_interval: Duration,
    /// Confirmation page layouts, tried in order.
    pub layouts: Vec<PageLayout>,
}

impl Config {
    pub fn new(watch_dir: impl Into<PathBuf>, credentials: PushoverCredentials) -> Self {
        Self {
            watch_dir: watch_dir.into(),
            credentials,
            poll_interval: POLL_INTERVAL,
            layouts: PageLayout::defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn default_layouts_in_order() {
        let layouts = PageLayout::defaults();
        assert_eq!(layouts.len(), 2);
        assert_eq!(
            layouts[0].status_selector,
            "div[id='AthleteTheme_wt12_block_wtTitle']"
        );
        assert_eq!(
            layouts[1].details_selector,
            "div[id='W_Theme_UI_wt12_block_wtMainContent']"
        );
    }

    #[test]
    fn config_defaults() {
        let config = Config::new("/tmp/mail", PushoverCredentials::new("tok", "usr"));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.credentials.token.expose_secret(), "tok");
        assert_eq!(config.credentials.user.expose_secret(), "usr");
    }
}
