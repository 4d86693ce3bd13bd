// schedule.rs - One-shot timers owned by the simulation
//
// Events fire inside the frame tick, in due order (ties in schedule order),
// so a timer never lands half-way through a particle update.

pub struct Scheduler<E> {
    pending: Vec<Pending<E>>,
    seq: u64,
}

struct Pending<E> {
    due: f64,
    seq: u64,
    event: E,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self { pending: Vec::new(), seq: 0 }
    }

    pub fn schedule(&mut self, due_ms: f64, event: E) {
        self.pending.push(Pending { due: due_ms, seq: self.seq, event });
        self.seq += 1;
    }

    /// Remove and return the earliest event due at or before `now_ms`,
    /// together with the time it was due.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, E)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now_ms)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        let p = self.pending.swap_remove(idx);
        Some((p.due, p.event))
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.due).min_by(f64::total_cmp)
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300.0, 'c');
        s.schedule(100.0, 'a');
        s.schedule(100.0, 'b');
        s.schedule(900.0, 'z');

        let mut fired = Vec::new();
        while let Some((_, e)) = s.pop_due(500.0) {
            fired.push(e);
        }
        assert_eq!(fired, vec!['a', 'b', 'c']);
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_due(), Some(900.0));
    }

    #[test]
    fn nothing_before_due() {
        let mut s = Scheduler::new();
        s.schedule(50.0, ());
        assert!(s.pop_due(49.9).is_none());
        assert_eq!(s.pop_due(50.0), Some((50.0, ())));
    }

    #[test]
    fn cancel_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule(1.0, 1);
        s.schedule(2.0, 2);
        s.cancel_all();
        assert!(s.is_empty());
        assert!(s.pop_due(f64::MAX).is_none());
    }
}
