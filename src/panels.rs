use rand::Rng;

use crate::error::{GameError, Result};

pub const DEFAULT_PANEL_COUNT: usize = 9;

/// Fixed, ordered set of interchangeable targets. Panels have no identity
/// beyond their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSet {
    len: usize,
}

impl PanelSet {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(GameError::EmptyPanelSet);
        }
        Ok(Self { len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len
    }

    /// Uniform pick that never repeats `last`. A single-panel set has nothing
    /// else to offer, so it always yields 0.
    pub fn pick_next<R: Rng + ?Sized>(&self, last: Option<usize>, rng: &mut R) -> usize {
        match last.filter(|&l| l < self.len) {
            Some(last) if self.len > 1 => {
                let idx = rng.gen_range(0..self.len - 1);
                if idx >= last {
                    idx + 1
                } else {
                    idx
                }
            }
            _ => rng.gen_range(0..self.len),
        }
    }
}

impl Default for PanelSet {
    fn default() -> Self {
        Self {
            len: DEFAULT_PANEL_COUNT,
        }
    }
}
