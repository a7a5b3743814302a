//! Debounced active-heading tracking.
//!
//! Scrolling produces a stream of "this heading is now closest to the top"
//! nominations. A nomination only becomes the active heading once it has gone
//! unchallenged for the debounce window, so fast scrolling does not make the
//! navigation flicker. Manual navigation skips the window.
//!
//! The tracker never reads the clock itself: callers pass `now` in and call
//! [`ActiveSectionTracker::poll`] when [`ActiveSectionTracker::deadline`] passes.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::visibility::{closest_to_reference, ObserverOptions, VisibilityEntry};

/// Timing and observer settings for active-section tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// How long a nomination must stand before it is confirmed
    pub debounce: Duration,
    /// Delay before heading elements are attached to the observer
    pub observe_delay: Duration,
    /// Delay before extracted headings are checked against rendered output
    pub reconcile_delay: Duration,
    pub observer: ObserverOptions,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            observe_delay: Duration::from_millis(100),
            reconcile_delay: Duration::from_millis(200),
            observer: ObserverOptions::default(),
        }
    }
}

impl TrackerConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Settings in the shape the browser runtime reads.
    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            debounce_ms: self.debounce.as_millis() as u64,
            observe_delay_ms: self.observe_delay.as_millis() as u64,
            reconcile_delay_ms: self.reconcile_delay.as_millis() as u64,
            root_margin: self.observer.root_margin.clone(),
            thresholds: self.observer.thresholds.clone(),
            reference_line: self.observer.reference_line,
        }
    }
}

/// Serialized form of [`TrackerConfig`] embedded in rendered pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSettings {
    pub debounce_ms: u64,
    pub observe_delay_ms: u64,
    pub reconcile_delay_ms: u64,
    pub root_margin: String,
    pub thresholds: Vec<f64>,
    /// Viewport offset headings are measured from
    pub reference_line: f64,
}

/// Where the tracker is in its confirm cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
    /// Nothing has been confirmed and nothing is waiting
    Idle,
    /// A nomination is waiting out the debounce window
    Pending(&'a str),
    /// The heading currently shown as active
    Active(&'a str),
}

/// Tracks the single active heading id.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    debounce: Duration,
    confirmed: Option<String>,
    pending: Option<String>,
    /// The only outstanding timer. Replaced on every new nomination.
    deadline: Option<Instant>,
}

impl ActiveSectionTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            confirmed: None,
            pending: None,
            deadline: None,
        }
    }

    pub fn phase(&self) -> Phase<'_> {
        match (&self.pending, self.deadline, &self.confirmed) {
            (Some(pending), Some(_), _) => Phase::Pending(pending.as_str()),
            (_, _, Some(confirmed)) => Phase::Active(confirmed.as_str()),
            _ => Phase::Idle,
        }
    }

    /// The confirmed active id.
    pub fn active_id(&self) -> Option<&str> {
        self.confirmed.as_deref()
    }

    /// The most recent nomination, confirmed or not.
    pub fn pending_id(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// When the outstanding nomination will be confirmed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Nominate `id` as the heading closest to the top.
    ///
    /// Repeating the current nomination is a no-op and does not restart the
    /// timer. Returns whether a new debounce window started.
    pub fn nominate(&mut self, id: &str, now: Instant) -> bool {
        if id.is_empty() || self.pending.as_deref() == Some(id) {
            return false;
        }

        self.pending = Some(id.to_string());
        self.deadline = Some(now + self.debounce);
        true
    }

    /// Nominate whichever intersecting entry is closest to `reference_line`.
    pub fn observe(
        &mut self,
        entries: &[VisibilityEntry],
        reference_line: f64,
        now: Instant,
    ) -> bool {
        match closest_to_reference(entries, reference_line) {
            Some(entry) => {
                let id = entry.id.clone();
                self.nominate(&id, now)
            }
            None => false,
        }
    }

    /// Confirm the pending nomination if its window has elapsed.
    ///
    /// Returns the id that became active, if the active id changed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        self.deadline = None;

        if self.pending == self.confirmed {
            return None;
        }

        self.confirmed = self.pending.clone();
        self.confirmed.clone()
    }

    /// Make `id` active immediately, cancelling any outstanding nomination.
    pub fn activate(&mut self, id: &str) {
        self.confirmed = Some(id.to_string());
        self.pending = Some(id.to_string());
        self.deadline = None;
    }

    /// Forget everything and return to [`Phase::Idle`].
    pub fn reset(&mut self) {
        self.confirmed = None;
        self.pending = None;
        self.deadline = None;
    }
}

impl Default for ActiveSectionTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default().debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn confirms_after_debounce_window() {
        let t0 = Instant::now();
        let mut tracker = ActiveSectionTracker::new(ms(300));

        assert_eq!(tracker.phase(), Phase::Idle);
        assert!(tracker.nominate("intro", t0));
        assert_eq!(tracker.phase(), Phase::Pending("intro"));

        assert_eq!(tracker.poll(t0 + ms(299)), None);
        assert_eq!(tracker.active_id(), None);

        assert_eq!(tracker.poll(t0 + ms(300)), Some("intro".to_string()));
        assert_eq!(tracker.phase(), Phase::Active("intro"));
        assert_eq!(tracker.deadline(), None);
    }

    #[test]
    fn last_nomination_wins() {
        let t0 = Instant::now();
        let mut tracker = ActiveSectionTracker::new(ms(300));

        tracker.nominate("a", t0);
        tracker.nominate("b", t0 + ms(100));

        // A's original window has passed but it was superseded
        assert_eq!(tracker.poll(t0 + ms(300)), None);
        assert_eq!(tracker.deadline(), Some(t0 + ms(400)));

        assert_eq!(tracker.poll(t0 + ms(500)), Some("b".to_string()));
        assert_eq!(tracker.active_id(), Some("b"));
    }

    #[test]
    fn repeated_nomination_keeps_timer() {
        let t0 = Instant::now();
        let mut tracker = ActiveSectionTracker::new(ms(300));

        assert!(tracker.nominate("a", t0));
        assert!(!tracker.nominate("a", t0 + ms(200)));

        assert_eq!(tracker.deadline(), Some(t0 + ms(300)));
        assert_eq!(tracker.poll(t0 + ms(300)), Some("a".to_string()));
    }

    #[test]
    fn returning_to_active_heading_is_quiet() {
        let t0 = Instant::now();
        let mut tracker = ActiveSectionTracker::new(ms(300));
        tracker.nominate("a", t0);
        tracker.poll(t0 + ms(300));

        tracker.nominate("b", t0 + ms(400));
        tracker.nominate("a", t0 + ms(450));

        assert_eq!(tracker.poll(t0 + ms(800)), None);
        assert_eq!(tracker.active_id(), Some("a"));
        assert_eq!(tracker.phase(), Phase::Active("a"));
    }

    #[test]
    fn activate_bypasses_debounce() {
        let t0 = Instant::now();
        let mut tracker = ActiveSectionTracker::new(ms(300));
        tracker.nominate("a", t0);

        tracker.activate("z");

        assert_eq!(tracker.active_id(), Some("z"));
        assert_eq!(tracker.pending_id(), Some("z"));
        assert_eq!(tracker.deadline(), None);
        assert_eq!(tracker.poll(t0 + ms(1000)), None);
        assert_eq!(tracker.active_id(), Some("z"));
    }

    #[test]
    fn ignores_empty_ids() {
        let mut tracker = ActiveSectionTracker::default();

        assert!(!tracker.nominate("", Instant::now()));
        assert_eq!(tracker.phase(), Phase::Idle);
    }

    #[test]
    fn observe_nominates_closest_entry() {
        let t0 = Instant::now();
        let mut tracker = ActiveSectionTracker::new(ms(300));
        let entries = vec![
            VisibilityEntry::new("setup", 220.0, true),
            VisibilityEntry::new("usage", 12.0, true),
        ];

        assert!(tracker.observe(&entries, 0.0, t0));
        assert_eq!(tracker.pending_id(), Some("usage"));

        assert!(!tracker.observe(&[VisibilityEntry::new("x", 0.0, false)], 0.0, t0));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut tracker = ActiveSectionTracker::default();
        tracker.activate("a");

        tracker.reset();

        assert_eq!(tracker.phase(), Phase::Idle);
        assert_eq!(tracker.active_id(), None);
    }

    #[test]
    fn runtime_settings_use_milliseconds() {
        let settings = TrackerConfig::default().runtime_settings();

        assert_eq!(settings.debounce_ms, 300);
        assert_eq!(settings.observe_delay_ms, 100);
        assert_eq!(settings.reconcile_delay_ms, 200);
        assert_eq!(settings.thresholds, vec![0.1, 0.3, 0.7]);
        assert_eq!(settings.reference_line, 0.0);
    }

    #[test]
    fn runtime_settings_carry_reference_line() {
        let mut config = TrackerConfig::default();
        config.observer.reference_line = 64.0;

        assert_eq!(config.runtime_settings().reference_line, 64.0);
    }
}
