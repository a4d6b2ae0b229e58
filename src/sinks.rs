use crate::stats::RoundSummary;

/// Where on screen a click landed, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Presentation side of the game. Calls are fire-and-forget: an
/// implementation that fails to draw must swallow the failure.
pub trait DisplaySink {
    fn highlight(&mut self, panel: usize);
    fn clear(&mut self, panel: usize);
    fn render_score(&mut self, score: u32);
    fn render_time_left(&mut self, secs: u32);
    fn show_summary(&mut self, summary: &RoundSummary);
    fn hide_summary(&mut self);
    fn spawn_effect(&mut self, at: Position);
}

/// Sound cues. Fire-and-forget, never blocking.
pub trait AudioSink {
    fn play_activation(&mut self);
    fn play_miss(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Highlight(usize),
    Clear(usize),
    Score(u32),
    TimeLeft(u32),
    ShowSummary(RoundSummary),
    HideSummary,
    Effect(Position),
}

/// Test display that records every call in order
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panels currently highlighted according to the recorded calls.
    pub fn lit(&self) -> Vec<usize> {
        let mut lit = Vec::new();
        for call in &self.calls {
            match call {
                DisplayCall::Highlight(i) => lit.push(*i),
                DisplayCall::Clear(i) => lit.retain(|p| p != i),
                _ => {}
            }
        }
        lit
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.calls.iter().rev().find_map(|c| match c {
            DisplayCall::ShowSummary(s) => Some(s),
            _ => None,
        })
    }

    pub fn highlights(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Highlight(i) => Some(*i),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingDisplay {
    fn highlight(&mut self, panel: usize) {
        self.calls.push(DisplayCall::Highlight(panel));
    }

    fn clear(&mut self, panel: usize) {
        self.calls.push(DisplayCall::Clear(panel));
    }

    fn render_score(&mut self, score: u32) {
        self.calls.push(DisplayCall::Score(score));
    }

    fn render_time_left(&mut self, secs: u32) {
        self.calls.push(DisplayCall::TimeLeft(secs));
    }

    fn show_summary(&mut self, summary: &RoundSummary) {
        self.calls.push(DisplayCall::ShowSummary(summary.clone()));
    }

    fn hide_summary(&mut self) {
        self.calls.push(DisplayCall::HideSummary);
    }

    fn spawn_effect(&mut self, at: Position) {
        self.calls.push(DisplayCall::Effect(at));
    }
}

/// Test audio that counts cues
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingAudio {
    pub activations: u32,
    pub misses: u32,
}

impl AudioSink for CountingAudio {
    fn play_activation(&mut self) {
        self.activations += 1;
    }

    fn play_miss(&mut self) {
        self.misses += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_display_tracks_lit_panels() {
        let mut display = RecordingDisplay::new();
        display.highlight(2);
        display.clear(2);
        display.highlight(5);
        assert_eq!(display.lit(), vec![5]);
        assert_eq!(display.highlights(), vec![2, 5]);
    }

    #[test]
    fn last_summary_is_most_recent() {
        let mut display = RecordingDisplay::new();
        assert!(display.last_summary().is_none());
        display.show_summary(&RoundSummary::from_samples(&[10]));
        display.show_summary(&RoundSummary::from_samples(&[20]));
        assert_eq!(display.last_summary().unwrap().fastest_ms, Some(20));
    }

    #[test]
    fn counting_audio() {
        let mut audio = CountingAudio::default();
        audio.play_activation();
        audio.play_miss();
        audio.play_miss();
        assert_eq!(
            audio,
            CountingAudio {
                activations: 1,
                misses: 2
            }
        );
    }
}
