use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two coordinates using the haversine formula.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANKARA: Coordinate = Coordinate::new(39.9334, 32.8597);
    const ISTANBUL: Coordinate = Coordinate::new(41.0082, 28.9784);

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(distance_km(ANKARA, ANKARA), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Ankara to Istanbul is roughly 350 km as the crow flies
        let d = distance_km(ANKARA, ISTANBUL);
        assert!((349.0..=355.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_symmetry() {
        let ab = distance_km(ANKARA, ISTANBUL);
        let ba = distance_km(ISTANBUL, ANKARA);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_small_offset_is_small() {
        let near = Coordinate::new(ANKARA.lat + 0.01, ANKARA.lon);
        let d = distance_km(ANKARA, near);
        assert!(d > 0.0 && d < 2.0, "got {d}");
    }
}
