use crate::alert::alarm_tag;
use crate::app::{AppContext, Result, TemblorError};
use crate::domain::{distance_km, Coordinate, Source};
use crate::fetcher;
use crate::poller::{PollOutcome, Poller};

/// One fetch-and-evaluate pass, printed to stdout.
pub async fn poll(ctx: &AppContext, source_override: Option<&str>) -> Result<()> {
    let source = match source_override {
        Some(name) => Source::parse(name)
            .ok_or_else(|| TemblorError::UnknownSource(name.to_string()))?,
        None => ctx.config.source(),
    };

    let mut poller = Poller::new(ctx.client.clone(), source, ctx.user, ctx.thresholds());

    match poller.poll_cycle(ctx.sink.as_ref()).await {
        Ok(PollOutcome::Events { events, evaluation }) => {
            if events.is_empty() {
                println!("No recent earthquakes from {source}");
                return Ok(());
            }

            println!("Recent earthquakes from {source} (max 20):");
            for quake in &events {
                let distance = ctx
                    .user
                    .map(|user| distance_km(user, Coordinate::new(quake.lat, quake.lon)));
                let distance = distance
                    .map(|d| format!(" | {d:.1} km away"))
                    .unwrap_or_default();
                println!(
                    "  M{:.1}  {}  {}  depth {:.1} km{distance}",
                    quake.magnitude,
                    quake.time.format("%Y-%m-%d %H:%M"),
                    quake.place,
                    quake.depth_km,
                );
            }

            if evaluation.emergency {
                println!(
                    "\nEMERGENCY: {} significant event(s) within alert range",
                    evaluation.significant.len()
                );
            }
        }
        Ok(PollOutcome::Stale) => {}
        Err(e) => {
            eprintln!("Error: {e}");
        }
    }

    Ok(())
}

/// List the sources the `-s/--source` flag and the TUI switcher accept.
pub fn sources() {
    for source in Source::ALL {
        println!("{source}\n  {}", fetcher::endpoint(source));
    }
}

/// Drive every alarm capability once so the user can verify them.
pub fn test_alarm(ctx: &AppContext) {
    println!("Firing test alarm (sound, vibration, notification)...");
    ctx.sink.sound();
    ctx.sink.vibrate();
    ctx.sink.notify(
        &alarm_tag("test"),
        "Test Alarm!",
        "This is a test of the earthquake alarm notification.",
    );
    println!("Done.");
}
