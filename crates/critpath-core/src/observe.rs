//! Instrumentation side channel for the analysis stages.
//!
//! Every stage has an `*_observed` entry point taking a `&mut dyn Observer`.
//! Observers receive timer and counter events only; nothing they do can
//! change a computed result. The plain entry points pass [`NoopObserver`].

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::json;

/// Receiver for timer and counter events emitted by a stage.
pub trait Observer {
    /// Start (or restart) the wall-clock timer.
    fn start_timer(&mut self);

    /// Stop the timer and keep the elapsed time.
    fn stop_timer(&mut self);

    /// Add `amount` to the counter called `name`.
    fn increment_counter(&mut self, name: &str, amount: u64);

    /// Time between the last start and stop, or until now while running.
    fn elapsed(&self) -> Duration;

    /// Add one to the counter called `name`.
    fn increment(&mut self, name: &str) {
        self.increment_counter(name, 1);
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn start_timer(&mut self) {}

    fn stop_timer(&mut self) {}

    fn increment_counter(&mut self, _name: &str, _amount: u64) {}

    fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
}

/// Counting observer: named operation counters plus one wall-clock timer.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    started: Option<Instant>,
    elapsed: Duration,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all counters and the timer.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.started = None;
        self.elapsed = Duration::ZERO;
    }

    /// Current value of a counter (zero if never incremented).
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// All counters, sorted by name.
    #[must_use]
    pub const fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    /// Returns true while the timer is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Render the metrics as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "elapsed_us": self.elapsed().as_micros(),
            "counters": self.counters,
        })
    }

    /// Render the metrics as a small table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        let mut out = format!("elapsed: {}\n", format_duration(self.elapsed()));
        if self.counters.is_empty() {
            out.push_str("no counters recorded\n");
            return out;
        }
        for (name, value) in &self.counters {
            out.push_str(&format!("  {name:<24} {value:>10}\n"));
        }
        out
    }
}

impl Observer for Metrics {
    fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    fn stop_timer(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    fn increment_counter(&mut self, name: &str, amount: u64) {
        *self.counters.entry(name.to_string()).or_insert(0) += amount;
    }

    fn elapsed(&self) -> Duration {
        self.started.map_or(self.elapsed, |started| started.elapsed())
    }
}

/// Format a duration with a unit suited to its magnitude.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut metrics = Metrics::new();
        metrics.increment("edges");
        metrics.increment_counter("edges", 4);
        metrics.increment("visits");

        assert_eq!(metrics.counter("edges"), 5);
        assert_eq!(metrics.counter("visits"), 1);
        assert_eq!(metrics.counter("missing"), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut metrics = Metrics::new();
        metrics.start_timer();
        metrics.increment("edges");
        metrics.reset();

        assert!(metrics.counters().is_empty());
        assert!(!metrics.is_running());
        assert_eq!(metrics.elapsed(), Duration::ZERO);
    }

    #[test]
    fn stop_without_start_is_ignored() {
        let mut metrics = Metrics::new();
        metrics.stop_timer();
        assert_eq!(metrics.elapsed(), Duration::ZERO);
    }

    #[test]
    fn timer_records_after_stop() {
        let mut metrics = Metrics::new();
        metrics.start_timer();
        std::thread::sleep(Duration::from_millis(1));
        metrics.stop_timer();

        let recorded = metrics.elapsed();
        assert!(recorded >= Duration::from_millis(1));
        assert!(!metrics.is_running());
        assert_eq!(metrics.elapsed(), recorded, "stopped timer is frozen");
    }

    #[test]
    fn json_report_has_counters() {
        let mut metrics = Metrics::new();
        metrics.increment_counter("queue_pushes", 3);
        let value = metrics.to_json();
        assert_eq!(value["counters"]["queue_pushes"], 3);
    }

    #[test]
    fn table_lists_counters_by_name() {
        let mut metrics = Metrics::new();
        metrics.increment("b_counter");
        metrics.increment("a_counter");
        let table = metrics.display_table();
        let a = table.find("a_counter").expect("a listed");
        let b = table.find("b_counter").expect("b listed");
        assert!(a < b);
    }

    #[test]
    fn noop_observer_reports_zero() {
        let mut noop = NoopObserver;
        noop.start_timer();
        noop.increment("anything");
        noop.stop_timer();
        assert_eq!(noop.elapsed(), Duration::ZERO);
    }

    #[test]
    fn format_duration_picks_unit() {
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.500ms");
        assert_eq!(format_duration(Duration::from_millis(2_250)), "2.250s");
    }
}
