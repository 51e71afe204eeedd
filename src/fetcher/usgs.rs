use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use crate::app::{Result, TemblorError};
use crate::domain::{Earthquake, Source};
use crate::fetcher::{newest_first, FeedAdapter, HttpClient};

pub const ENDPOINT: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

/// USGS publishes a worldwide feed, so events are filtered client-side on
/// the place description.
const PLACE_FILTER: &str = "turkey";

pub struct UsgsAdapter {
    client: HttpClient,
}

impl UsgsAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedAdapter for UsgsAdapter {
    fn source(&self) -> Source {
        Source::Usgs
    }

    async fn fetch(&self) -> Result<Vec<Earthquake>> {
        let body = self.client.get_text(ENDPOINT).await?;
        let feed: UsgsFeed = serde_json::from_str(&body).map_err(|e| TemblorError::Parse {
            origin: Source::Usgs,
            message: e.to_string(),
        })?;
        Ok(standardize(feed))
    }
}

#[derive(Debug, Deserialize)]
struct UsgsFeed {
    #[serde(default)]
    features: Vec<UsgsFeature>,
}

#[derive(Debug, Deserialize)]
struct UsgsFeature {
    id: String,
    properties: UsgsProperties,
    geometry: UsgsGeometry,
}

#[derive(Debug, Deserialize)]
struct UsgsProperties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UsgsGeometry {
    // [lon, lat, depth_km]
    #[serde(default)]
    coordinates: Vec<f64>,
}

fn standardize(feed: UsgsFeed) -> Vec<Earthquake> {
    let events = feed
        .features
        .into_iter()
        .filter_map(|feature| {
            let place = feature.properties.place?;
            if !place.to_lowercase().contains(PLACE_FILTER) {
                return None;
            }
            let &[lon, lat, depth_km] = &feature.geometry.coordinates[..] else {
                tracing::warn!(id = %feature.id, "skipping USGS record with malformed geometry");
                return None;
            };
            let Some(time) = feature
                .properties
                .time
                .and_then(DateTime::from_timestamp_millis)
            else {
                tracing::warn!(id = %feature.id, "skipping USGS record with invalid time");
                return None;
            };
            Some(Earthquake {
                id: feature.id,
                magnitude: feature.properties.mag?,
                place,
                time,
                depth_km,
                lat,
                lon,
                source: Source::Usgs,
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
          "id": "us7000quake1",
          "properties": {"mag": 4.6, "place": "12 km NE of Elazig, Turkey", "time": 1754550000000},
          "geometry": {"type": "Point", "coordinates": [39.22, 38.68, 7.2]}
        },
        {
          "type": "Feature",
          "id": "us7000quake2",
          "properties": {"mag": 5.1, "place": "offshore Northern California", "time": 1754551000000},
          "geometry": {"type": "Point", "coordinates": [-124.2, 40.3, 20.0]}
        },
        {
          "type": "Feature",
          "id": "us7000quake3",
          "properties": {"mag": 2.9, "place": "central Turkey", "time": 1754552000000},
          "geometry": {"type": "Point", "coordinates": [34.0, 39.0, 10.0]}
        },
        {
          "type": "Feature",
          "id": "us7000broken",
          "properties": {"mag": 3.3, "place": "western Turkey", "time": 1754553000000},
          "geometry": {"type": "Point", "coordinates": [28.0]}
        }
      ]
    }"#;

    #[test]
    fn test_standardize_filters_and_maps() {
        let feed: UsgsFeed = serde_json::from_str(FIXTURE).unwrap();
        let events = standardize(feed);

        // Non-Turkey and malformed records are dropped
        assert_eq!(events.len(), 2);
        // Newest first
        assert_eq!(events[0].id, "us7000quake3");
        assert_eq!(events[1].id, "us7000quake1");

        let quake1 = &events[1];
        assert_eq!(quake1.magnitude, 4.6);
        assert_eq!(quake1.place, "12 km NE of Elazig, Turkey");
        // GeoJSON order is [lon, lat, depth]
        assert_eq!(quake1.lon, 39.22);
        assert_eq!(quake1.lat, 38.68);
        assert_eq!(quake1.depth_km, 7.2);
        assert_eq!(quake1.source, Source::Usgs);
        assert_eq!(quake1.time.timestamp_millis(), 1754550000000);
    }

    #[test]
    fn test_standardize_skips_null_magnitude() {
        let body = r#"{"features": [{
          "id": "usnull",
          "properties": {"mag": null, "place": "eastern Turkey", "time": 1754550000000},
          "geometry": {"coordinates": [39.0, 38.0, 5.0]}
        }]}"#;
        let feed: UsgsFeed = serde_json::from_str(body).unwrap();
        assert!(standardize(feed).is_empty());
    }

    #[test]
    fn test_empty_feed() {
        let feed: UsgsFeed = serde_json::from_str("{}").unwrap();
        assert!(standardize(feed).is_empty());
    }
}
