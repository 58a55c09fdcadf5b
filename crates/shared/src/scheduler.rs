use crate::models::Direction;

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    due_ms: f64,
    seq: u64,
    section: String,
    direction: Direction,
    payload: T,
}

/// Pending entries are cancelled when their section transitions again or when
/// the scroll direction reverses.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, due_ms: f64, section: &str, direction: Direction, payload: T) {
        self.pending.push(Pending {
            due_ms,
            seq: self.next_seq,
            section: section.to_string(),
            direction,
            payload,
        });
        self.next_seq += 1;
    }

    /// Cancel entries invalidated by a new transition. Returns how many were dropped.
    pub fn on_transition(&mut self, section: &str, direction: Direction) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|p| p.section != section && p.direction == direction);
        before - self.pending.len()
    }

    /// Remove and return every payload due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.payload).collect()
    }
}
