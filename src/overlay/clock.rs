//! Injected clock and deadline timers
//!
//! Overlay timers are plain deadlines polled from the UI tick instead of
//! spawned sleeps. Nothing fires on its own, so tearing the context down only
//! has to drop the pending deadlines, and tests drive time with [`ManualClock`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Instant;
#[cfg(test)]
use std::{sync::Mutex, time::Duration};

/// Source of the current instant
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual clock that only moves when told to
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move virtual time forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.base + *offset
    }
}

/// Handle to a scheduled deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Set of pending deadlines, each carrying a payload returned on expiry
///
/// Expired payloads come back ordered by deadline, ties broken by scheduling
/// order.
#[derive(Debug)]
pub struct Timers<K> {
    next_id: u64,
    pending: BTreeMap<(Instant, TimerId), K>,
    deadlines: HashMap<TimerId, Instant>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Timers<K> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `payload` to expire at `deadline`
    pub fn schedule(&mut self, deadline: Instant, payload: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<K> {
        let deadline = self.deadlines.remove(&id)?;
        self.pending.remove(&(deadline, id))
    }

    /// Cancel everything; returns how many timers were dropped
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        self.deadlines.clear();
        count
    }

    /// Remove and return every payload whose deadline is at or before `now`
    pub fn drain_expired(&mut self, now: Instant) -> Vec<K> {
        let mut expired = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            self.deadlines.remove(&id);
            expired.push(entry.remove());
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_only_on_request() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }

    #[test]
    fn test_drain_expired_in_deadline_order() {
        let clock = ManualClock::new();
        let now = clock.now();
        let mut timers = Timers::new();

        timers.schedule(now + Duration::from_millis(300), "late");
        timers.schedule(now + Duration::from_millis(100), "early");
        timers.schedule(now + Duration::from_millis(100), "early-second");

        assert!(timers.drain_expired(now).is_empty());
        assert_eq!(
            timers.drain_expired(now + Duration::from_millis(100)),
            vec!["early", "early-second"]
        );
        assert_eq!(timers.len(), 1);
        assert_eq!(
            timers.drain_expired(now + Duration::from_millis(300)),
            vec!["late"]
        );
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let now = Instant::now();
        let mut timers = Timers::new();
        let keep = timers.schedule(now, 1);
        let drop = timers.schedule(now, 2);

        assert_eq!(timers.cancel(drop), Some(2));
        assert_eq!(timers.cancel(drop), None);
        assert_eq!(timers.drain_expired(now), vec![1]);
        assert_eq!(timers.cancel(keep), None);
    }

    #[test]
    fn test_cancel_all() {
        let now = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(now, ());
        timers.schedule(now + Duration::from_secs(1), ());

        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.is_empty());
        assert!(timers.drain_expired(now + Duration::from_secs(5)).is_empty());
    }
}
