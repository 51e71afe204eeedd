//! Startup resolution of the user's coordinate.
//!
//! Resolved exactly once: an explicit `[location]` entry in the config
//! wins, otherwise a one-shot best-effort IP geolocation lookup, otherwise
//! the fixed default. Failure is never fatal.

use serde::Deserialize;

use crate::app::{Result, TemblorError};
use crate::config::Config;
use crate::domain::Coordinate;
use crate::fetcher::HttpClient;

/// Fallback coordinate when no location can be determined (Ankara).
pub const DEFAULT_COORDINATE: Coordinate = Coordinate::new(39.9334, 32.8597);

const GEOLOCATION_ENDPOINT: &str = "http://ip-api.com/json/?fields=status,lat,lon";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

/// Resolve the user coordinate, falling back to [`DEFAULT_COORDINATE`].
pub async fn resolve(config: &Config, client: &HttpClient) -> Coordinate {
    if let Some(pinned) = config.location {
        let coordinate = pinned.into();
        tracing::info!(?coordinate, "using pinned location from config");
        return coordinate;
    }

    match lookup(client).await {
        Ok(coordinate) => {
            tracing::info!(?coordinate, "geolocated via IP lookup");
            coordinate
        }
        Err(e) => {
            tracing::warn!(error = %e, "geolocation unavailable, using default location");
            DEFAULT_COORDINATE
        }
    }
}

async fn lookup(client: &HttpClient) -> Result<Coordinate> {
    let body = client.get_text(GEOLOCATION_ENDPOINT).await?;
    let response: IpApiResponse = serde_json::from_str(&body)
        .map_err(|e| TemblorError::Location(e.to_string()))?;

    if response.status != "success" {
        return Err(TemblorError::Location(format!(
            "lookup status {}",
            response.status
        )));
    }
    Ok(Coordinate::new(response.lat, response.lon))
}
