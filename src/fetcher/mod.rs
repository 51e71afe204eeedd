pub mod emsc;
pub mod http;
pub mod kandilli;
pub mod usgs;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Earthquake, Source};

pub use http::HttpClient;

/// Cap applied to every adapter's output after standardization.
pub const MAX_RECORDS: usize = 20;

/// One implementation per data source: fetch the provider's native JSON
/// and normalize it into standardized [`Earthquake`] records.
#[async_trait]
pub trait FeedAdapter: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch(&self) -> Result<Vec<Earthquake>>;
}

/// Build the adapter for a source.
pub fn adapter_for(source: Source, client: HttpClient) -> Box<dyn FeedAdapter> {
    match source {
        Source::Usgs => Box::new(usgs::UsgsAdapter::new(client)),
        Source::Kandilli => Box::new(kandilli::KandilliAdapter::new(client)),
        Source::Emsc => Box::new(emsc::EmscAdapter::new(client)),
    }
}

/// The endpoint an adapter polls, for display in `temblor sources`.
pub fn endpoint(source: Source) -> &'static str {
    match source {
        Source::Usgs => usgs::ENDPOINT,
        Source::Kandilli => kandilli::ENDPOINT,
        Source::Emsc => emsc::EMSC_BASE,
    }
}

/// Newest-first order, capped to the [`MAX_RECORDS`] most recent.
pub(crate) fn newest_first(mut events: Vec<Earthquake>) -> Vec<Earthquake> {
    events.sort_by(|a, b| b.time.cmp(&a.time));
    events.truncate(MAX_RECORDS);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn quake(id: &str, hours_ago: i64) -> Earthquake {
        Earthquake {
            id: id.into(),
            magnitude: 3.0,
            place: "test".into(),
            time: Utc.with_ymd_and_hms(2025, 8, 7, 12, 0, 0).unwrap()
                - chrono::Duration::hours(hours_ago),
            depth_km: 10.0,
            lat: 39.0,
            lon: 32.0,
            source: Source::Usgs,
        }
    }

    #[test]
    fn test_newest_first_sorts_and_caps() {
        let events: Vec<_> = (0..30).map(|i| quake(&format!("q{i}"), i)).collect();
        let out = newest_first(events);
        assert_eq!(out.len(), MAX_RECORDS);
        assert_eq!(out[0].id, "q0");
        assert!(out.windows(2).all(|w| w[0].time >= w[1].time));
    }
}
