//! Alarm side effects: sound, vibration, system notification.
//!
//! Everything here is fire-and-forget. Failures are logged and never
//! propagated; a missing capability degrades to a debug log line.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use actually_beep::beep_with_hz_and_millis;

/// Notification tag for an event id, so repeat notifications for the same
/// event collapse at the OS level.
pub fn alarm_tag(id: &str) -> String {
    format!("earthquake-alert-{id}")
}

pub trait AlarmSink: Send + Sync {
    /// Play the alarm sound once.
    fn sound(&self);

    /// Vibrate, where the platform can.
    fn vibrate(&self);

    /// Raise a system notification under a deduplication tag.
    fn notify(&self, tag: &str, summary: &str, body: &str);

    /// Toggle the looping test alarm; returns whether it is now playing.
    fn toggle_test(&self) -> bool;
}

/// Alarm sink for desktop terminals: audible beep pattern plus a desktop
/// notification.
pub struct DesktopSink {
    quiet: bool,
    test_running: Arc<AtomicBool>,
}

const BEEP_GAP: Duration = Duration::from_millis(400);
const BEEPS_PER_BURST: usize = 3;

impl DesktopSink {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            test_running: Arc::new(AtomicBool::new(false)),
        }
    }

    fn beep_burst() {
        for i in 0..BEEPS_PER_BURST {
            let _ = beep_with_hz_and_millis(880, 700);
            if i + 1 < BEEPS_PER_BURST {
                thread::sleep(BEEP_GAP);
            }
        }
    }
}

impl AlarmSink for DesktopSink {
    fn sound(&self) {
        if self.quiet {
            tracing::debug!("quiet mode, skipping alarm sound");
            return;
        }
        // Playback blocks for the pattern duration, keep it off the poll path
        thread::spawn(Self::beep_burst);
    }

    fn vibrate(&self) {
        tracing::debug!("vibration not supported on this platform, skipping");
    }

    fn notify(&self, tag: &str, summary: &str, body: &str) {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname("temblor")
            .summary(summary)
            .body(body);
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.id(tag_to_id(tag));

        if let Err(e) = notification.show() {
            tracing::warn!(tag, error = %e, "failed to raise notification");
        } else {
            tracing::info!(tag, "notification raised");
        }
    }

    fn toggle_test(&self) -> bool {
        if self.test_running.swap(false, Ordering::SeqCst) {
            // Was playing, the loop below will observe the flag and stop
            return false;
        }
        self.test_running.store(true, Ordering::SeqCst);

        if self.quiet {
            tracing::debug!("quiet mode, test alarm runs silently");
        }
        let running = self.test_running.clone();
        let quiet = self.quiet;
        thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                if !quiet {
                    Self::beep_burst();
                }
                thread::sleep(BEEP_GAP);
            }
        });
        true
    }
}

/// Stable per-tag notification id; collisions only risk collapsing two
/// unrelated notifications, which is harmless.
#[cfg(all(unix, not(target_os = "macos")))]
fn tag_to_id(tag: &str) -> u32 {
    use std::hash::{Hash, Hasher};

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    tag.hash(&mut hasher);
    hasher.finish() as u32
}

/// Sink that does nothing, for one-shot commands and tests.
pub struct NullSink;

impl AlarmSink for NullSink {
    fn sound(&self) {}
    fn vibrate(&self) {}
    fn notify(&self, _tag: &str, _summary: &str, _body: &str) {}
    fn toggle_test(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_tag_format() {
        assert_eq!(alarm_tag("us7000abcd"), "earthquake-alert-us7000abcd");
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_tag_to_id_is_stable() {
        let tag = alarm_tag("q1");
        assert_eq!(tag_to_id(&tag), tag_to_id(&tag));
        assert_ne!(tag_to_id(&alarm_tag("q1")), tag_to_id(&alarm_tag("q2")));
    }

    #[test]
    fn test_null_sink_test_toggle_stays_off() {
        assert!(!NullSink.toggle_test());
    }
}
