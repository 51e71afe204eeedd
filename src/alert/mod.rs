//! Significant-event detection and alarm deduplication.
//!
//! [`evaluate`] is pure: it looks only at the current poll's records, the
//! previous poll's id snapshot, and the id of the last event that sounded
//! the alarm. The caller owns all of that state (see the poller).

pub mod sink;

use std::collections::HashSet;

use crate::domain::{distance_km, Coordinate, Earthquake};

pub use sink::{alarm_tag, AlarmSink, DesktopSink, NullSink};

/// Alert thresholds. An event is significant when its magnitude is at
/// least `magnitude` and its epicenter is within `distance_km` of the user.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub magnitude: f64,
    pub distance_km: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            magnitude: 4.0,
            distance_km: 50.0,
        }
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Whether any significant event exists in the current records.
    /// Derived fresh each cycle, never latched.
    pub emergency: bool,
    /// Events meeting both thresholds, in input order.
    pub significant: Vec<Earthquake>,
    /// Significant events absent from the previous snapshot, in input order.
    pub novel: Vec<Earthquake>,
    /// The novel event that should sound the alarm, if any. `None` when the
    /// strongest novel event already alarmed under the same id.
    pub trigger: Option<Earthquake>,
    /// The novel event to raise a notification for; set whenever `novel`
    /// is non-empty, even if the alarm sound is suppressed.
    pub notify: Option<Earthquake>,
}

/// Classify the current poll's records against the previous snapshot.
///
/// With no user coordinate or no records there is nothing to alert on:
/// the emergency state is forced off and no trigger or notification is
/// produced, regardless of history.
pub fn evaluate(
    events: &[Earthquake],
    user: Option<Coordinate>,
    previous_ids: &HashSet<String>,
    last_alarm_id: Option<&str>,
    thresholds: &Thresholds,
) -> Evaluation {
    let Some(user) = user else {
        return Evaluation::default();
    };
    if events.is_empty() {
        return Evaluation::default();
    }

    let significant: Vec<Earthquake> = events
        .iter()
        .filter(|e| {
            distance_km(user, Coordinate::new(e.lat, e.lon)) <= thresholds.distance_km
                && e.magnitude >= thresholds.magnitude
        })
        .cloned()
        .collect();

    let novel: Vec<Earthquake> = significant
        .iter()
        .filter(|e| !previous_ids.contains(&e.id))
        .cloned()
        .collect();

    // Strongest novel event; on equal magnitudes the earliest in input
    // order wins, which is the most recent record since adapters emit
    // newest-first.
    let top = novel
        .iter()
        .fold(None::<&Earthquake>, |best, e| match best {
            Some(b) if b.magnitude >= e.magnitude => Some(b),
            _ => Some(e),
        })
        .cloned();

    let trigger = top
        .as_ref()
        .filter(|t| last_alarm_id != Some(t.id.as_str()))
        .cloned();

    Evaluation {
        emergency: !significant.is_empty(),
        significant,
        novel,
        trigger,
        notify: top,
    }
}
