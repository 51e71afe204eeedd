use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::app::{Result, TemblorError};
use crate::domain::{Earthquake, Source};
use crate::fetcher::{newest_first, FeedAdapter, HttpClient};

/// Kandilli's official feed is plain text, so a community JSON wrapper is
/// polled instead.
pub const ENDPOINT: &str = "https://api.orhanaydogdu.com.tr/deprem/kandilli/live?limit=20";

/// The wrapper has no geographic filter of its own, so records are kept
/// only inside this bounding box (roughly Turkey).
const LAT_RANGE: (f64, f64) = (35.5, 42.5);
const LON_RANGE: (f64, f64) = (25.5, 45.0);

const DATE_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

pub struct KandilliAdapter {
    client: HttpClient,
}

impl KandilliAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedAdapter for KandilliAdapter {
    fn source(&self) -> Source {
        Source::Kandilli
    }

    async fn fetch(&self) -> Result<Vec<Earthquake>> {
        let body = self.client.get_text(ENDPOINT).await?;
        let response: KandilliResponse =
            serde_json::from_str(&body).map_err(|e| TemblorError::Parse {
                origin: Source::Kandilli,
                message: e.to_string(),
            })?;
        Ok(standardize(response))
    }
}

#[derive(Debug, Deserialize)]
struct KandilliResponse {
    #[serde(default)]
    result: Vec<KandilliQuake>,
}

#[derive(Debug, Deserialize)]
struct KandilliQuake {
    earthquake_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    mag: f64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    depth: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    lng: f64,
}

/// The wrapper is loose about numeric types; accept numbers or numeric
/// strings, anything else becomes 0.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
        Other(serde_json::Value),
    }

    Ok(match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => n,
        NumOrStr::Str(s) => s.trim().parse().unwrap_or(0.0),
        NumOrStr::Other(_) => 0.0,
    })
}

fn standardize(response: KandilliResponse) -> Vec<Earthquake> {
    let events = response
        .result
        .into_iter()
        .filter_map(|quake| {
            let Ok(naive) = NaiveDateTime::parse_from_str(&quake.date, DATE_FORMAT) else {
                tracing::warn!(date = %quake.date, "skipping Kandilli record with unparsable date");
                return None;
            };
            let id = match quake.earthquake_id {
                Some(id) if !id.is_empty() => id,
                _ => Earthquake::synthesize_id(quake.lat, quake.lng, &quake.date),
            };
            Some(Earthquake {
                id,
                magnitude: quake.mag,
                place: quake.title,
                time: naive.and_utc(),
                depth_km: quake.depth,
                lat: quake.lat,
                lon: quake.lng,
                source: Source::Kandilli,
            })
        })
        .filter(|quake| {
            quake.lat >= LAT_RANGE.0
                && quake.lat <= LAT_RANGE.1
                && quake.lon >= LON_RANGE.0
                && quake.lon <= LON_RANGE.1
        })
        .collect();

    newest_first(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
      "status": true,
      "result": [
        {
          "earthquake_id": "kandilli-001",
          "title": "SIMAV (KUTAHYA)",
          "date": "2025.08.07 09:15:42",
          "mag": 4.2,
          "depth": 8.1,
          "lat": 39.09,
          "lng": 28.98
        },
        {
          "title": "AKDENIZ",
          "date": "2025.08.07 08:40:10",
          "mag": "3.4",
          "depth": "60.5",
          "lat": "36.11",
          "lng": "30.42"
        },
        {
          "earthquake_id": "kandilli-outside",
          "title": "GIRIT ADASI (AKDENIZ)",
          "date": "2025.08.07 07:00:00",
          "mag": 5.0,
          "depth": 12.0,
          "lat": 35.1,
          "lng": 25.0
        }
      ]
    }"#;

    #[test]
    fn test_standardize_maps_and_bbox_filters() {
        let response: KandilliResponse = serde_json::from_str(FIXTURE).unwrap();
        let events = standardize(response);

        // The Crete record is outside the bounding box
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "kandilli-001");
        assert_eq!(events[0].place, "SIMAV (KUTAHYA)");
        assert_eq!(events[0].magnitude, 4.2);
        assert_eq!(events[0].source, Source::Kandilli);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let response: KandilliResponse = serde_json::from_str(FIXTURE).unwrap();
        let events = standardize(response);

        let akdeniz = &events[1];
        assert_eq!(akdeniz.magnitude, 3.4);
        assert_eq!(akdeniz.depth_km, 60.5);
        assert_eq!(akdeniz.lat, 36.11);
        assert_eq!(akdeniz.lon, 30.42);
    }

    #[test]
    fn test_missing_id_is_synthesized_deterministically() {
        let response1: KandilliResponse = serde_json::from_str(FIXTURE).unwrap();
        let response2: KandilliResponse = serde_json::from_str(FIXTURE).unwrap();
        let a = standardize(response1);
        let b = standardize(response2);

        assert_eq!(a[1].id, b[1].id);
        assert_eq!(a[1].id.len(), 64);
    }

    #[test]
    fn test_unparsable_date_is_skipped() {
        let body = r#"{"result": [{
          "earthquake_id": "bad-date",
          "title": "X",
          "date": "not a date",
          "mag": 4.0, "depth": 5.0, "lat": 39.0, "lng": 32.0
        }]}"#;
        let response: KandilliResponse = serde_json::from_str(body).unwrap();
        assert!(standardize(response).is_empty());
    }

    #[test]
    fn test_garbage_numeric_fields_become_zero_and_filtered() {
        // lat/lng degrade to 0, which the bounding box then rejects
        let body = r#"{"result": [{
          "title": "X",
          "date": "2025.08.07 01:00:00",
          "mag": {"weird": true}, "depth": null, "lat": "n/a", "lng": "n/a"
        }]}"#;
        let response: KandilliResponse = serde_json::from_str(body).unwrap();
        assert!(standardize(response).is_empty());
    }
}
