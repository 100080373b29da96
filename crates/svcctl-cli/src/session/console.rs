//! Everything a command needs: the session, the API client, and the
//! terminal stand-ins for navigation and notifications.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use svcctl_client::{ApiClient, ClientConfig, RefreshCheck};
use svcctl_core::{
    ApiUrl, Bootstrap, NotificationCenter, NotificationKind, Notifier, Navigator, Route,
    SessionStore, bootstrap,
};

use super::storage;
use crate::cli::Cli;
use crate::output;

/// Remembers where the core asked to send the user.
#[derive(Default)]
struct TerminalNavigator {
    last: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    fn last(&self) -> Option<Route> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "Navigation requested");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

/// Prints notifications to stderr and keeps them in the feed.
struct TerminalNotifier {
    feed: NotificationCenter,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        output::notification(kind, message);
        self.feed.notify(kind, message);
    }
}

/// A bootstrapped session and a client bound to it.
pub struct Console {
    client: ApiClient,
    navigator: Arc<TerminalNavigator>,
    feed: NotificationCenter,
}

impl Console {
    /// Load the stored session and build the client.
    pub fn open(cli: &Cli) -> Result<Self> {
        let api_url = if cli.allow_insecure {
            ApiUrl::new_insecure(&cli.api_url)
        } else {
            ApiUrl::new(&cli.api_url)
        }
        .context("Invalid API URL")?;
        if api_url.is_plaintext() && cli.allow_insecure {
            warn!(url = %api_url, "Bearer tokens will be sent over plain HTTP");
        }
        let config =
            ClientConfig::new(api_url).with_timeout(Duration::from_secs(cli.timeout_secs));

        let store = SessionStore::new(storage::open()?);
        match bootstrap(&store) {
            Bootstrap::Restored(user) => debug!(user = %user.username, "Using stored session"),
            Bootstrap::Empty => debug!("No stored session"),
            Bootstrap::Corrupted => output::hint("Stored session was unreadable and has been removed."),
        }

        let navigator = Arc::new(TerminalNavigator::default());
        let feed = NotificationCenter::new();
        let client = ApiClient::builder(store)
            .config(config)
            .navigator(navigator.clone())
            .notifier(Arc::new(TerminalNotifier { feed: feed.clone() }))
            .build()
            .context("Failed to build API client")?;

        Ok(Self {
            client,
            navigator,
            feed,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &SessionStore {
        self.client.store()
    }

    /// Make sure a usable session exists, refreshing an expired token.
    pub async fn require_session(&self) -> Result<()> {
        match self.client.auth().check_and_maybe_refresh().await {
            RefreshCheck::Fresh => Ok(()),
            RefreshCheck::Refreshed => {
                debug!("Access token refreshed");
                Ok(())
            }
            RefreshCheck::NoSession => bail!("Not logged in. Run `svcctl login` first."),
            RefreshCheck::LoggedOut => bail!("Your session has expired."),
        }
    }

    /// True when an error has already been shown to the user.
    pub fn reported(&self) -> bool {
        self.feed.unread_count() > 0
    }

    /// True when the session was lost during this run.
    pub fn sent_to_login(&self) -> bool {
        self.navigator.last() == Some(Route::Login)
    }
}
