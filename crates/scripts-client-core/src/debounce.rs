//! Trailing-edge debounce over an explicit timer-handle map.
//!
//! The debouncer does not own a clock. `restart` hands back the id of the
//! timer the host should schedule (and the id it should cancel); when the
//! host's timer fires it reports back with `elapse`, which only yields a value
//! if that timer is still the current one for its key.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restart {
    pub scheduled: TimerId,
    pub cancelled: Option<TimerId>,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
struct PendingTimer<V> {
    id: TimerId,
    value: V,
}

#[derive(Debug, Clone)]
pub struct Debouncer<K, V> {
    window: Duration,
    next_id: u64,
    pending: HashMap<K, PendingTimer<V>>,
}

impl<K: Eq + Hash + Clone, V> Debouncer<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            next_id: 1,
            pending: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any scheduled timer for `key` with a fresh one carrying `value`.
    pub fn restart(&mut self, key: K, value: V) -> Restart {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let cancelled = self
            .pending
            .insert(key, PendingTimer { id, value })
            .map(|previous| previous.id);
        Restart {
            scheduled: id,
            cancelled,
            delay: self.window,
        }
    }

    /// Consumes the pending value if `id` is still the live timer for `key`.
    pub fn elapse(&mut self, key: &K, id: TimerId) -> Option<V> {
        match self.pending.get(key) {
            Some(timer) if timer.id == id => self.pending.remove(key).map(|timer| timer.value),
            _ => None,
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Drops every scheduled timer and returns their ids.
    pub fn cancel_all(&mut self) -> Vec<TimerId> {
        self.pending.drain().map(|(_, timer)| timer.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_last_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let first = debouncer.restart("subdomain", "d");
        let second = debouncer.restart("subdomain", "de");
        let third = debouncer.restart("subdomain", "demo");

        assert_eq!(second.cancelled, Some(first.scheduled));
        assert_eq!(third.cancelled, Some(second.scheduled));

        assert_eq!(debouncer.elapse(&"subdomain", first.scheduled), None);
        assert_eq!(debouncer.elapse(&"subdomain", second.scheduled), None);
        assert_eq!(debouncer.elapse(&"subdomain", third.scheduled), Some("demo"));
        assert_eq!(debouncer.elapse(&"subdomain", third.scheduled), None);
    }

    #[test]
    fn keys_are_independent() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let name = debouncer.restart("projectName", "api");
        let image = debouncer.restart("containerImage", "nginx");

        assert_eq!(name.cancelled, None);
        assert_eq!(image.cancelled, None);
        assert_eq!(debouncer.elapse(&"containerImage", image.scheduled), Some("nginx"));
        assert!(debouncer.is_pending(&"projectName"));
        assert_eq!(debouncer.elapse(&"projectName", name.scheduled), Some("api"));
    }

    #[test]
    fn cancel_all_invalidates_every_timer() {
        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        let restart = debouncer.restart("projectName", "api");
        assert_eq!(restart.delay, Duration::from_millis(250));

        assert_eq!(debouncer.cancel_all(), vec![restart.scheduled]);
        assert_eq!(debouncer.elapse(&"projectName", restart.scheduled), None);
    }
}
