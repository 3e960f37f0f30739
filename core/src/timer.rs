#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct TimerEntry<T> {
    id: u64,
    due_ms: f64,
    task: T,
}

#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        let due_ms = now_ms + delay_ms.max(0.0);
        // entries stay sorted by due time; equal deadlines keep insertion order
        let index = self
            .entries
            .iter()
            .position(|entry| entry.due_ms > due_ms)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, TimerEntry { id, due_ms, task });
        TimerHandle(id)
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != handle.0);
        self.entries.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|entry| entry.id == handle.0)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.entries.first().map(|entry| entry.due_ms)
    }

    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, T)> {
        let first = self.entries.first()?;
        if first.due_ms > now_ms {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.due_ms, entry.task))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Trailing-edge only: the first trigger arms a deadline one window out and
// later triggers are folded into it until it fires.
#[derive(Clone, Debug)]
pub struct Throttle {
    window_ms: f64,
    deadline: Option<f64>,
}

impl Throttle {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    pub fn trigger(&mut self, now_ms: f64) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now_ms + self.window_ms);
        true
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn take_due(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now_ms => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
