//! Poll cycles over the active feed adapter.
//!
//! The poller owns everything the alert evaluation needs across cycles:
//! the id snapshot from the last successful poll, the id of the last event
//! that sounded the alarm, and the active source. Cycles are serialized by
//! construction (the caller awaits each one inline); a request epoch guards
//! against a cycle finishing after the source was switched under it.

use std::collections::HashSet;

use crate::alert::{self, AlarmSink, Evaluation, Thresholds};
use crate::app::{Result, TemblorError};
use crate::domain::{Coordinate, Earthquake, Source};
use crate::fetcher::{self, HttpClient};

pub struct Poller {
    client: HttpClient,
    source: Source,
    epoch: u64,
    previous_ids: HashSet<String>,
    last_alarm_id: Option<String>,
    thresholds: Thresholds,
    user: Option<Coordinate>,
}

#[derive(Debug)]
pub enum PollOutcome {
    /// A completed cycle: the standardized records and their evaluation.
    Events {
        events: Vec<Earthquake>,
        evaluation: Evaluation,
    },
    /// The source was switched while this cycle was in flight; its result
    /// was discarded and no state changed.
    Stale,
}

impl Poller {
    pub fn new(
        client: HttpClient,
        source: Source,
        user: Option<Coordinate>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            client,
            source,
            epoch: 0,
            previous_ids: HashSet::new(),
            last_alarm_id: None,
            thresholds,
            user,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn last_alarm_id(&self) -> Option<&str> {
        self.last_alarm_id.as_deref()
    }

    /// Switch the active source.
    ///
    /// The snapshot is deliberately NOT reset; until the new source's first
    /// poll completes, novelty is judged against the old source's ids.
    pub fn switch_source(&mut self, source: Source) {
        if source != self.source {
            tracing::info!(from = %self.source, to = %source, "switching data source");
            self.source = source;
            self.epoch += 1;
        }
    }

    /// Run one fetch-and-evaluate pass against the active source.
    pub async fn poll_cycle(&mut self, sink: &dyn AlarmSink) -> Result<PollOutcome> {
        let epoch = self.epoch;
        let source = self.source;
        tracing::debug!(%source, "poll cycle started");

        let fetched = fetcher::adapter_for(source, self.client.clone())
            .fetch()
            .await;
        self.complete_cycle(epoch, source, fetched, sink)
    }

    /// Apply a finished fetch to the poller state.
    ///
    /// On success the snapshot is replaced wholesale with the new id set.
    /// On failure the snapshot and alarm history are left untouched, so the
    /// next successful poll still compares against the last known good ids.
    fn complete_cycle(
        &mut self,
        epoch: u64,
        source: Source,
        fetched: Result<Vec<Earthquake>>,
        sink: &dyn AlarmSink,
    ) -> Result<PollOutcome> {
        if epoch != self.epoch {
            tracing::debug!(%source, "discarding stale poll result");
            return Ok(PollOutcome::Stale);
        }

        let events = fetched.map_err(|e| TemblorError::Fetch {
            origin: source,
            message: e.to_string(),
        })?;

        let evaluation = alert::evaluate(
            &events,
            self.user,
            &self.previous_ids,
            self.last_alarm_id.as_deref(),
            &self.thresholds,
        );

        if let Some(top) = &evaluation.trigger {
            tracing::warn!(id = %top.id, place = %top.place, magnitude = top.magnitude, "significant earthquake, sounding alarm");
            sink.sound();
            sink.vibrate();
            self.last_alarm_id = Some(top.id.clone());
        }
        if let Some(top) = &evaluation.notify {
            sink.notify(
                &alert::alarm_tag(&top.id),
                "Earthquake Alert!",
                &format!(
                    "Significant earthquake detected near you: {} (Mag: {:.1})",
                    top.place, top.magnitude
                ),
            );
        }

        self.previous_ids = events.iter().map(|e| e.id.clone()).collect();
        tracing::info!(%source, count = events.len(), emergency = evaluation.emergency, "poll cycle complete");

        Ok(PollOutcome::Events { events, evaluation })
    }
}
