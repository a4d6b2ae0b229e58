use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds on a monotonic timeline.
pub type Millis = u64;

/// Monotonic millisecond timestamp provider
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Production clock measuring from its own creation
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: Millis) {
        if ms >= self.now.get() {
            self.now.set(ms);
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    Deactivate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub at: Millis,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    due: Millis,
    period: Option<Millis>,
}

/// Pending one-shot and repeating timers, drained in deadline order.
///
/// Nothing fires on its own: the owner calls [`Timers::pop_due`] with the
/// current time and dispatches whatever comes back. Equal deadlines fire in
/// the order they were scheduled.
#[derive(Debug, Default)]
pub struct Timers {
    next_id: u64,
    pending: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timeout(&mut self, due: Millis, kind: TimerKind) -> TimerId {
        self.push(kind, due, None)
    }

    /// Fires first at `first_due`, then every `period` ms after that.
    pub fn set_interval(&mut self, first_due: Millis, period: Millis, kind: TimerKind) -> TimerId {
        self.push(kind, first_due, Some(period.max(1)))
    }

    /// Returns whether a pending timer was removed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Removes and returns the earliest timer due at or before `now`.
    /// Repeating timers are re-armed one period after their deadline.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fired> {
        let (pos, timer) = self
            .pending
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.id))?;

        match timer.period {
            Some(period) => self.pending[pos].due = timer.due + period,
            None => {
                self.pending.remove(pos);
            }
        }

        Some(Fired {
            id: timer.id,
            kind: timer.kind,
            at: timer.due,
        })
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|t| t.due).min()
    }

    pub fn count(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|t| t.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn push(&mut self, kind: TimerKind, due: Millis, period: Option<Millis>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            kind,
            due,
            period,
        });
        id
    }
}
