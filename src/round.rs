use crate::clock::{Millis, TimerId};

pub const ROUND_SECS: u32 = 60;
pub const TICK_MS: Millis = 1000;
pub const INITIAL_DWELL_MS: f64 = 500.0;
pub const FLOOR_DWELL_MS: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// How long a panel stays lit with `time_left` seconds remaining. Shrinks
/// linearly from the initial dwell at the start to the floor at zero.
pub fn dwell_for(time_left: u32) -> f64 {
    let elapsed = ROUND_SECS.saturating_sub(time_left) as f64;
    let progress = (elapsed / ROUND_SECS as f64).clamp(0.0, 1.0);
    FLOOR_DWELL_MS + (INITIAL_DWELL_MS - FLOOR_DWELL_MS) * (1.0 - progress)
}

/// Everything a single round mutates. Created on start, dropped on
/// acknowledgement.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub score: u32,
    pub time_left_secs: u32,
    pub reaction_samples_ms: Vec<u64>,
    pub active_panel: Option<usize>,
    pub last_panel: Option<usize>,
    pub dwell_ms: f64,
    pub started_at: Millis,
    pub activated_at: Millis,
    /// Panels that timed out without being hit.
    pub expired: u32,
    pub(crate) countdown: Option<TimerId>,
    pub(crate) pending_deactivation: Option<TimerId>,
}

impl RoundState {
    pub fn new(started_at: Millis) -> Self {
        Self {
            score: 0,
            time_left_secs: ROUND_SECS,
            reaction_samples_ms: Vec::new(),
            active_panel: None,
            last_panel: None,
            dwell_ms: INITIAL_DWELL_MS,
            started_at,
            activated_at: started_at,
            expired: 0,
            countdown: None,
            pending_deactivation: None,
        }
    }

    pub fn dwell_delay_ms(&self) -> Millis {
        self.dwell_ms.round() as Millis
    }
}
