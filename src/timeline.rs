//! Host-driven timeline of deferred actions
//!
//! Transitions are sequences of actions at fixed millisecond offsets. The
//! host advances time explicitly (animation frame callbacks on the web, a
//! loop in tests), so runs are deterministic:
//! - actions fire in time order
//! - actions due at the same time fire in scheduling order
//! - nothing is cancelled once scheduled

/// A scheduled action
#[derive(Debug, Clone)]
struct Scheduled<A> {
    at: f64,
    seq: u64,
    action: A,
}

/// Pending actions ordered by due time
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    pending: Vec<Scheduled<A>>,
    next_seq: u64,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire once time reaches `at` (milliseconds)
    pub fn schedule(&mut self, at: f64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { at, seq, action });
    }

    /// Remove and return the earliest action due at `now`
    pub fn pop_due(&mut self, now: f64) -> Option<A> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.at <= now)
            .min_by(|(_, a), (_, b)| a.at.total_cmp(&b.at).then(a.seq.cmp(&b.seq)))?;
        Some(self.pending.remove(index).action)
    }

    /// Due time of the next pending action
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|s| s.at).min_by(f64::total_cmp)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_time_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(850.0, "redraw");
        timeline.schedule(750.0, "detach");
        timeline.schedule(100.0, "early");

        assert_eq!(timeline.pop_due(50.0), None);
        assert_eq!(timeline.pop_due(800.0), Some("early"));
        assert_eq!(timeline.pop_due(800.0), Some("detach"));
        assert_eq!(timeline.pop_due(800.0), None);
        assert_eq!(timeline.next_due(), Some(850.0));
        assert_eq!(timeline.pop_due(850.0), Some("redraw"));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_same_time_keeps_schedule_order() {
        let mut timeline = Timeline::new();
        for i in 0..5 {
            timeline.schedule(1000.0, i);
        }
        let fired: Vec<i32> = std::iter::from_fn(|| timeline.pop_due(1000.0)).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }
}
