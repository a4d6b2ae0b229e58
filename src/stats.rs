use itertools::{Itertools, MinMaxResult};

use crate::round::RoundState;
use crate::util::{floored_mean, std_dev};

/// Shown in place of a statistic when the round produced no samples.
pub const NO_DATA: &str = "N/A";

/// End-of-round results. Reaction statistics are `None` when the player
/// never hit a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub score: u32,
    pub expired: u32,
    pub fastest_ms: Option<u64>,
    pub slowest_ms: Option<u64>,
    pub average_ms: Option<u64>,
    pub std_dev_ms: Option<f64>,
}

impl RoundSummary {
    pub fn from_samples(samples: &[u64]) -> Self {
        let (fastest_ms, slowest_ms) = match samples.iter().copied().minmax() {
            MinMaxResult::NoElements => (None, None),
            MinMaxResult::OneElement(x) => (Some(x), Some(x)),
            MinMaxResult::MinMax(lo, hi) => (Some(lo), Some(hi)),
        };
        let as_f64: Vec<f64> = samples.iter().map(|&s| s as f64).collect();

        Self {
            score: samples.len() as u32,
            expired: 0,
            fastest_ms,
            slowest_ms,
            average_ms: floored_mean(samples),
            std_dev_ms: std_dev(&as_f64),
        }
    }

    pub fn from_state(state: &RoundState) -> Self {
        Self {
            score: state.score,
            expired: state.expired,
            ..Self::from_samples(&state.reaction_samples_ms)
        }
    }

    pub fn has_data(&self) -> bool {
        self.fastest_ms.is_some()
    }
}

/// Formats a statistic in milliseconds, or the no-data sentinel.
pub fn format_ms(value: Option<u64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |ms| format!("{} ms", ms))
}
