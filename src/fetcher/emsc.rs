use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::app::{Result, TemblorError};
use crate::domain::{Earthquake, Source};
use crate::fetcher::{newest_first, FeedAdapter, HttpClient};

pub const EMSC_BASE: &str = "https://www.seismicportal.eu/fdsnws/event/1/query";

/// The FDSN endpoint supports bounding-box queries, so the Turkey filter is
/// applied server-side here, unlike the other adapters.
const QUERY: [(&str, &str); 8] = [
    ("format", "json"),
    ("limit", "100"),
    ("orderby", "time"),
    ("minlat", "35.5"),
    ("maxlat", "42.5"),
    ("minlon", "25.5"),
    ("maxlon", "45.0"),
    ("nodata", "404"),
];

pub struct EmscAdapter {
    client: HttpClient,
}

impl EmscAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn query_url() -> String {
        // Static base and parameters, cannot fail to parse
        Url::parse_with_params(EMSC_BASE, QUERY)
            .expect("EMSC query URL is valid")
            .to_string()
    }
}

#[async_trait]
impl FeedAdapter for EmscAdapter {
    fn source(&self) -> Source {
        Source::Emsc
    }

    async fn fetch(&self) -> Result<Vec<Earthquake>> {
        let body = self.client.get_text(&Self::query_url()).await?;
        let feed: EmscFeed = serde_json::from_str(&body).map_err(|e| TemblorError::Parse {
            origin: Source::Emsc,
            message: e.to_string(),
        })?;
        Ok(standardize(feed))
    }
}

#[derive(Debug, Deserialize)]
struct EmscFeed {
    #[serde(default)]
    features: Vec<EmscFeature>,
}

#[derive(Debug, Deserialize)]
struct EmscFeature {
    id: String,
    properties: EmscProperties,
    geometry: EmscGeometry,
}

#[derive(Debug, Deserialize)]
struct EmscProperties {
    mag: Option<f64>,
    flynn_region: Option<String>,
    #[serde(default)]
    time: String,
}

#[derive(Debug, Deserialize)]
struct EmscGeometry {
    // [lon, lat, depth_m]
    #[serde(default)]
    coordinates: Vec<f64>,
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn standardize(feed: EmscFeed) -> Vec<Earthquake> {
    let events = feed
        .features
        .into_iter()
        .filter_map(|feature| {
            let &[lon, lat, depth_m] = &feature.geometry.coordinates[..] else {
                tracing::warn!(id = %feature.id, "skipping EMSC record with malformed geometry");
                return None;
            };
            let Some(time) = parse_time(&feature.properties.time) else {
                tracing::warn!(id = %feature.id, time = %feature.properties.time, "skipping EMSC record with invalid time");
                return None;
            };
            Some(Earthquake {
                id: feature.id,
                magnitude: feature.properties.mag.unwrap_or(0.0),
                place: feature
                    .properties
                    .flynn_region
                    .unwrap_or_else(|| "Unknown Location".to_string()),
                time,
                // EMSC reports depth in meters
                depth_km: depth_m / 1000.0,
                lat,
                lon,
                source: Source::Emsc,
            })
        })
        .collect();

    newest_first(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "id": "20250807_0000123",
          "properties": {
            "mag": 4.8,
            "flynn_region": "CENTRAL TURKEY",
            "time": "2025-08-07T06:30:15.2Z"
          },
          "geometry": {"type": "Point", "coordinates": [37.5, 38.2, 10000.0]}
        },
        {
          "type": "Feature",
          "id": "20250807_0000124",
          "properties": {
            "mag": 2.1,
            "flynn_region": null,
            "time": "2025-08-07T05:10:00.0Z"
          },
          "geometry": {"type": "Point", "coordinates": [29.1, 36.9, 7500.0]}
        }
      ]
    }"#;

    #[test]
    fn test_standardize_converts_depth_to_km() {
        let feed: EmscFeed = serde_json::from_str(FIXTURE).unwrap();
        let events = standardize(feed);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "20250807_0000123");
        assert_eq!(events[0].depth_km, 10.0);
        assert_eq!(events[1].depth_km, 7.5);
        assert_eq!(events[0].source, Source::Emsc);
    }

    #[test]
    fn test_missing_region_falls_back() {
        let feed: EmscFeed = serde_json::from_str(FIXTURE).unwrap();
        let events = standardize(feed);
        assert_eq!(events[1].place, "Unknown Location");
    }

    #[test]
    fn test_time_without_zone_suffix_parses() {
        assert!(parse_time("2025-08-07T06:30:15.2Z").is_some());
        assert!(parse_time("2025-08-07T06:30:15.2").is_some());
        assert!(parse_time("yesterday").is_none());
    }

    #[test]
    fn test_query_url_carries_bbox() {
        let url = EmscAdapter::query_url();
        assert!(url.starts_with(EMSC_BASE));
        assert!(url.contains("format=json"));
        assert!(url.contains("minlat=35.5"));
        assert!(url.contains("maxlon=45.0"));
    }
}
