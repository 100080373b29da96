//! Global "busy" indicator for in-flight calls.

use std::sync::Arc;

use tokio::sync::watch;

use crate::signal::Signal;

/// Counts calls that asked for the busy indicator.
///
/// The indicator is on while at least one [`BusyGuard`] is alive. Guards
/// release on drop, so each call settles the indicator exactly once no
/// matter how it ends.
#[derive(Debug, Clone)]
pub struct BusyTracker {
    in_flight: Arc<watch::Sender<usize>>,
}

impl Default for BusyTracker {
    fn default() -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            in_flight: Arc::new(in_flight),
        }
    }
}

impl BusyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the indicator on until the returned guard is dropped.
    pub fn begin(&self) -> BusyGuard {
        self.in_flight.send_modify(|n| *n += 1);
        BusyGuard {
            in_flight: self.in_flight.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    /// Number of busy calls currently in flight.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Subscribe to the indicator.
    pub fn subscribe(&self) -> Signal<usize, bool> {
        Signal::new(self.in_flight.subscribe(), |n| *n > 0)
    }
}

/// Keeps the busy indicator on while alive.
#[derive(Debug)]
#[must_use = "the busy indicator turns off as soon as the guard is dropped"]
pub struct BusyGuard {
    in_flight: Arc<watch::Sender<usize>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_while_any_guard_is_alive() {
        let tracker = BusyTracker::new();
        assert!(!tracker.is_busy());

        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);

        drop(first);
        assert!(tracker.is_busy());
        drop(second);
        assert!(!tracker.is_busy());
    }

    #[tokio::test]
    async fn subscribers_see_indicator_turn_off() {
        let tracker = BusyTracker::new();
        let guard = tracker.begin();
        let mut signal = tracker.subscribe();
        assert!(signal.get());

        drop(guard);
        assert_eq!(signal.changed().await, Some(false));
    }
}
