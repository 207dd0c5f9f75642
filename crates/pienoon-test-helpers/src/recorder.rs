//! A shared, ordered log of events for observing callbacks from other
//! threads.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Cloneable handle to an append-only list of event strings.
///
/// Clones share the same log, so one handle can be moved into a callback
/// while the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    /// Copy of every event so far, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Events that start with `prefix`, oldest first.
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of events so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Poll until `predicate` holds for the event list or `timeout` elapses.
    ///
    /// Returns whether the predicate was satisfied.
    pub fn wait_until(&self, timeout: Duration, predicate: impl Fn(&[String]) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if predicate(&self.events.lock()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_events() {
        let recorder = EventRecorder::new();
        let handle = recorder.clone();
        handle.record("load a");
        recorder.record("finalize a");
        assert_eq!(recorder.events(), vec!["load a", "finalize a"]);
        assert_eq!(recorder.events_with_prefix("load"), vec!["load a"]);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn test_wait_until_sees_other_thread() {
        let recorder = EventRecorder::new();
        let handle = recorder.clone();
        let worker = std::thread::spawn(move || handle.record("done"));
        assert!(recorder.wait_until(Duration::from_secs(5), |events| !events.is_empty()));
        assert!(worker.join().is_ok());
    }

    #[test]
    fn test_wait_until_times_out() {
        let recorder = EventRecorder::new();
        assert!(!recorder.wait_until(Duration::from_millis(5), |events| !events.is_empty()));
    }
}
