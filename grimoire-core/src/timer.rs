//! Cancellable deadlines on a caller-supplied millisecond clock.
//!
//! The controller never sleeps. Callers pass `now_ms` into every operation
//! that can schedule work and call [`Timers::due`] to collect what fired.
//! A cancelled handle never fires, so a superseded transition cannot touch
//! state that has since been reset.

use std::collections::BTreeMap;

use tracing::debug;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    pub id: TimerId,
    pub event: E,
    /// Periods elapsed since the last firing. Always 1 for one-shot timers;
    /// a repeating timer that fell behind fires once and reports how many
    /// periods it covers.
    pub periods: u64,
}

#[derive(Debug, Clone)]
struct Entry<E> {
    event: E,
    due_ms: u64,
    period_ms: Option<u64>,
}

/// A set of pending one-shot and repeating timers.
#[derive(Debug, Clone)]
pub struct Timers<E> {
    next_id: u64,
    entries: BTreeMap<TimerId, Entry<E>>,
}

impl<E: Clone> Timers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Fire `event` once at `due_ms`. Callers should build deadlines with
    /// `saturating_add`.
    pub fn once(&mut self, event: E, due_ms: u64) -> TimerId {
        self.insert(Entry {
            event,
            due_ms,
            period_ms: None,
        })
    }

    /// Fire `event` every `period_ms`, first at `start_ms + period_ms`.
    pub fn every(&mut self, event: E, start_ms: u64, period_ms: u64) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(Entry {
            event,
            due_ms: start_ms.saturating_add(period_ms),
            period_ms: Some(period_ms),
        })
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.values().map(|e| e.due_ms).min()
    }

    /// Remove and return everything due at `now_ms`, earliest first.
    ///
    /// A repeating timer fires at most once per call and moves to its first
    /// deadline after `now_ms`. One whose next deadline lies past the end of
    /// the clock is dropped.
    pub fn due(&mut self, now_ms: u64) -> Vec<Fired<E>> {
        let mut fired: Vec<(u64, Fired<E>)> = Vec::new();

        let ids: Vec<TimerId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .map(|(id, _)| *id)
            .collect();

        for id in ids {
            let Some(entry) = self.entries.remove(&id) else {
                continue;
            };
            let due_ms = entry.due_ms;

            let periods = match entry.period_ms {
                Some(period) => {
                    let periods = (now_ms - due_ms) / period + 1;
                    let next = periods
                        .checked_mul(period)
                        .and_then(|span| due_ms.checked_add(span));
                    match next {
                        Some(next) => {
                            self.entries.insert(
                                id,
                                Entry {
                                    event: entry.event.clone(),
                                    due_ms: next,
                                    period_ms: Some(period),
                                },
                            );
                        }
                        None => debug!(?id, "repeating timer ran off the clock"),
                    }
                    periods
                }
                None => 1,
            };

            fired.push((
                due_ms,
                Fired {
                    id,
                    event: entry.event,
                    periods,
                },
            ));
        }

        fired.sort_by_key(|(due, f)| (*due, f.id));
        fired.into_iter().map(|(_, f)| f).collect()
    }

    fn insert(&mut self, entry: Entry<E>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, entry);
        id
    }
}

impl<E: Clone> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ping {
        A,
        B,
    }

    fn events(fired: Vec<Fired<Ping>>) -> Vec<Ping> {
        fired.into_iter().map(|f| f.event).collect()
    }

    #[test]
    fn test_once_fires_once() {
        let mut timers = Timers::new();
        let id = timers.once(Ping::A, 100);

        assert!(timers.due(99).is_empty());
        assert_eq!(events(timers.due(100)), vec![Ping::A]);
        assert!(timers.due(500).is_empty());
        assert!(!timers.is_pending(id));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        let id = timers.once(Ping::A, 100);

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.due(1_000).is_empty());
    }

    #[test]
    fn test_late_repeating_timer_fires_once() {
        let mut timers = Timers::new();
        let id = timers.every(Ping::B, 0, 1500);

        assert!(timers.due(1499).is_empty());
        assert_eq!(events(timers.due(1500)), vec![Ping::B]);

        let fired = timers.due(4600);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].periods, 2);
        assert!(timers.is_pending(id));
        assert_eq!(timers.next_deadline(), Some(6000));
    }

    #[test]
    fn test_far_future_tick_is_bounded() {
        let mut timers = Timers::new();
        timers.every(Ping::B, 0, 1500);

        let fired = timers.due(1500 * 5_000_000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].periods, 5_000_000);
        assert_eq!(timers.next_deadline(), Some(1500 * 5_000_001));
    }

    #[test]
    fn test_deadlines_at_the_end_of_the_clock() {
        let mut timers = Timers::new();
        timers.every(Ping::B, 0, u64::MAX / 2);
        timers.every(Ping::A, u64::MAX - 1, 10);

        assert_eq!(timers.next_deadline(), Some(u64::MAX / 2));
        let fired = timers.due(u64::MAX);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].event, Ping::B);
        assert_eq!(fired[0].periods, 2);
        assert_eq!(fired[1].event, Ping::A);

        // Neither can fire again.
        assert!(timers.is_empty());
        assert!(timers.due(u64::MAX).is_empty());
    }

    #[test]
    fn test_due_orders_by_deadline() {
        let mut timers = Timers::new();
        timers.once(Ping::A, 300);
        timers.once(Ping::B, 100);

        assert_eq!(events(timers.due(300)), vec![Ping::B, Ping::A]);
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        timers.once(Ping::A, 10);
        timers.every(Ping::B, 0, 10);
        assert_eq!(timers.len(), 2);

        timers.cancel_all();
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
    }
}
