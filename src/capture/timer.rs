use std::collections::BTreeMap;

/// One-shot timers on a virtual millisecond timeline.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<E> {
    timers: BTreeMap<(u64, u64), E>,
    next_seq: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert((due_ms, seq), event);
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, E)> {
        let due = self.next_due_ms()?;
        if due > now_ms {
            return None;
        }
        self.timers.pop_first().map(|((due, _), event)| (due, event))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drop every pending timer, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.timers.len();
        self.timers.clear();
        dropped
    }
}
