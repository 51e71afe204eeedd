use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The seismic data feeds this crate knows how to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Source {
    #[default]
    Usgs,
    Kandilli,
    Emsc,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Usgs, Source::Kandilli, Source::Emsc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Usgs => "USGS",
            Source::Kandilli => "Kandilli",
            Source::Emsc => "EMSC",
        }
    }

    /// Case-insensitive lookup, `None` for names with no adapter.
    pub fn parse(s: &str) -> Option<Source> {
        match s.to_ascii_lowercase().as_str() {
            "usgs" => Some(Source::Usgs),
            "kandilli" => Some(Source::Kandilli),
            "emsc" => Some(Source::Emsc),
            _ => None,
        }
    }

    /// The next source in the switcher cycle.
    pub fn next(self) -> Source {
        match self {
            Source::Usgs => Source::Kandilli,
            Source::Kandilli => Source::Emsc,
            Source::Emsc => Source::Usgs,
        }
    }

    /// Provider event-detail page for an event id, where the provider has one.
    pub fn event_url(&self, id: &str) -> Option<String> {
        match self {
            Source::Usgs => Some(format!(
                "https://earthquake.usgs.gov/earthquakes/eventpage/{id}"
            )),
            Source::Emsc => Some(format!(
                "https://www.seismicportal.eu/eventdetails.html?unid={id}"
            )),
            Source::Kandilli => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A standardized earthquake record, produced fresh on every poll.
///
/// Identity is `id` equality only; an event carried by two sources under
/// different ids is two records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Earthquake {
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    pub time: DateTime<Utc>,
    pub depth_km: f64,
    pub lat: f64,
    pub lon: f64,
    pub source: Source,
}

impl Earthquake {
    /// Deterministic fallback id for feeds that omit one.
    pub fn synthesize_id(lat: f64, lon: f64, date: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{lat:.4}").as_bytes());
        hasher.update(format!("{lon:.4}").as_bytes());
        hasher.update(date.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Display-only magnitude filter bands, matching the filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagnitudeRange {
    R0to2,
    R2to4,
    R4to6,
    R6Plus,
    #[default]
    All,
}

impl MagnitudeRange {
    pub const ALL: [MagnitudeRange; 5] = [
        MagnitudeRange::R0to2,
        MagnitudeRange::R2to4,
        MagnitudeRange::R4to6,
        MagnitudeRange::R6Plus,
        MagnitudeRange::All,
    ];

    /// Half-open `[min, max)` magnitude bounds.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            MagnitudeRange::R0to2 => (0.0, 2.0),
            MagnitudeRange::R2to4 => (2.0, 4.0),
            MagnitudeRange::R4to6 => (4.0, 6.0),
            MagnitudeRange::R6Plus => (6.0, 9.0),
            MagnitudeRange::All => (0.0, 9.0),
        }
    }

    pub fn contains(&self, magnitude: f64) -> bool {
        let (min, max) = self.bounds();
        magnitude >= min && magnitude < max
    }

    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeRange::R0to2 => "0-2",
            MagnitudeRange::R2to4 => "2-4",
            MagnitudeRange::R4to6 => "4-6",
            MagnitudeRange::R6Plus => "6+",
            MagnitudeRange::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<MagnitudeRange> {
        MagnitudeRange::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for MagnitudeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse_case_insensitive() {
        assert_eq!(Source::parse("usgs"), Some(Source::Usgs));
        assert_eq!(Source::parse("USGS"), Some(Source::Usgs));
        assert_eq!(Source::parse("Kandilli"), Some(Source::Kandilli));
        assert_eq!(Source::parse("emsc"), Some(Source::Emsc));
        assert_eq!(Source::parse("AFAD"), None);
    }

    #[test]
    fn test_source_cycle_visits_all() {
        let mut s = Source::Usgs;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(s);
            s = s.next();
        }
        assert_eq!(s, Source::Usgs);
        assert_eq!(seen, Source::ALL.to_vec());
    }

    #[test]
    fn test_event_url_per_source() {
        assert!(Source::Usgs
            .event_url("us7000abcd")
            .unwrap()
            .contains("eventpage/us7000abcd"));
        assert!(Source::Emsc.event_url("20250807_01").unwrap().contains("unid="));
        assert_eq!(Source::Kandilli.event_url("x"), None);
    }

    #[test]
    fn test_synthesized_id_deterministic() {
        let a = Earthquake::synthesize_id(39.12, 28.34, "2025.08.07 01:02:03");
        let b = Earthquake::synthesize_id(39.12, 28.34, "2025.08.07 01:02:03");
        let c = Earthquake::synthesize_id(39.12, 28.35, "2025.08.07 01:02:03");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_magnitude_range_bounds_are_half_open() {
        assert!(MagnitudeRange::R2to4.contains(2.0));
        assert!(MagnitudeRange::R2to4.contains(3.9));
        assert!(!MagnitudeRange::R2to4.contains(4.0));
        assert!(MagnitudeRange::R6Plus.contains(6.0));
        assert!(MagnitudeRange::All.contains(0.0));
        assert!(MagnitudeRange::All.contains(8.9));
    }

    #[test]
    fn test_magnitude_range_parse_labels() {
        for range in MagnitudeRange::ALL {
            assert_eq!(MagnitudeRange::parse(range.label()), Some(range));
        }
        assert_eq!(MagnitudeRange::parse("7-9"), None);
    }
}
