use std::sync::Arc;

use crate::alert::{AlarmSink, DesktopSink, Thresholds};
use crate::config::Config;
use crate::domain::Coordinate;
use crate::fetcher::HttpClient;
use crate::location;

/// Wires together everything the commands and the TUI share.
pub struct AppContext {
    pub config: Config,
    pub user: Option<Coordinate>,
    pub client: HttpClient,
    pub sink: Arc<dyn AlarmSink>,
}

impl AppContext {
    /// Build the context: construct the HTTP client, resolve the user
    /// coordinate once, and pick the alarm sink.
    pub async fn new(config: Config, quiet: bool) -> Self {
        let client = HttpClient::new();
        let user = Some(location::resolve(&config, &client).await);
        let quiet = quiet || config.quiet;
        let sink: Arc<dyn AlarmSink> = Arc::new(DesktopSink::new(quiet));

        Self {
            config,
            user,
            client,
            sink,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            magnitude: self.config.alert.magnitude,
            distance_km: self.config.alert.distance_km,
        }
    }
}
