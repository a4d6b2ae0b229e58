use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::clock::{Clock, Fired, Millis, TimerId, TimerKind, Timers};
use crate::panels::PanelSet;
use crate::round::{dwell_for, Phase, RoundState, ROUND_SECS, TICK_MS};
use crate::sinks::{AudioSink, DisplaySink, Position};
use crate::stats::RoundSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Hit { reaction_ms: u64 },
    Miss,
    /// No round is running.
    Ignored,
}

/// Owns a round from start to summary: the countdown, the panel
/// activation cycle and the adaptive dwell time.
///
/// Nothing runs in the background. The owner feeds it clicks and calls
/// [`RoundController::advance`] often enough to fire due timers; both run to
/// completion on the caller's thread.
pub struct RoundController<D: DisplaySink, A: AudioSink, C: Clock> {
    panels: PanelSet,
    display: D,
    audio: A,
    clock: C,
    rng: StdRng,
    timers: Timers,
    phase: Phase,
    state: Option<RoundState>,
    summary: Option<RoundSummary>,
}

impl<D: DisplaySink, A: AudioSink, C: Clock> RoundController<D, A, C> {
    pub fn new(panels: PanelSet, display: D, audio: A, clock: C) -> Self {
        Self {
            panels,
            display,
            audio,
            clock,
            rng: StdRng::from_entropy(),
            timers: Timers::new(),
            phase: Phase::Idle,
            state: None,
            summary: None,
        }
    }

    /// Makes panel selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn start_round(&mut self) -> bool {
        if self.phase != Phase::Idle {
            debug!(phase = %self.phase, "start_round ignored");
            return false;
        }

        let now = self.clock.now();
        let mut state = RoundState::new(now);
        state.countdown = Some(
            self.timers
                .set_interval(now + TICK_MS, TICK_MS, TimerKind::Countdown),
        );
        self.state = Some(state);
        self.summary = None;
        self.phase = Phase::Running;

        self.display.render_score(0);
        self.display.render_time_left(ROUND_SECS);
        info!(panels = self.panels.len(), "round started");

        self.activate_panel_at(now);
        true
    }

    /// One second of the countdown. Shortens the dwell time and ends the
    /// round when the clock runs out.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };

        state.time_left_secs = state.time_left_secs.saturating_sub(1);
        state.dwell_ms = dwell_for(state.time_left_secs).min(state.dwell_ms);
        let time_left = state.time_left_secs;
        self.display.render_time_left(time_left);

        if time_left == 0 {
            self.end_round();
        }
    }

    pub fn activate_panel(&mut self) {
        let now = self.clock.now();
        self.activate_panel_at(now);
    }

    pub fn handle_panel_click(&mut self, panel: usize, at: Position) -> ClickOutcome {
        // Anything that expired before the click lands first.
        self.advance();

        if self.phase != Phase::Running {
            return ClickOutcome::Ignored;
        }
        let now = self.clock.now();
        let Some(state) = self.state.as_mut() else {
            return ClickOutcome::Ignored;
        };

        if state.active_panel != Some(panel) {
            self.audio.play_miss();
            return ClickOutcome::Miss;
        }

        let reaction_ms = now.saturating_sub(state.activated_at);
        state.reaction_samples_ms.push(reaction_ms);
        state.score += 1;
        let score = state.score;
        debug!(panel, reaction_ms, score, "panel hit");

        self.display.render_score(score);
        self.deactivate_panel();
        self.display.spawn_effect(at);
        self.activate_panel_at(now);

        ClickOutcome::Hit { reaction_ms }
    }

    pub fn end_round(&mut self) -> bool {
        if self.phase != Phase::Running {
            debug!(phase = %self.phase, "end_round ignored");
            return false;
        }

        self.deactivate_panel();
        if let Some(id) = self.state.as_mut().and_then(|s| s.countdown.take()) {
            self.timers.cancel(id);
        }

        let summary = self
            .state
            .as_ref()
            .map(RoundSummary::from_state)
            .unwrap_or_else(|| RoundSummary::from_samples(&[]));
        self.phase = Phase::Finished;
        self.display.show_summary(&summary);
        info!(
            score = summary.score,
            expired = summary.expired,
            fastest_ms = ?summary.fastest_ms,
            slowest_ms = ?summary.slowest_ms,
            average_ms = ?summary.average_ms,
            "round finished"
        );
        self.summary = Some(summary);
        true
    }

    pub fn acknowledge_results(&mut self) -> bool {
        if self.phase != Phase::Finished {
            debug!(phase = %self.phase, "acknowledge_results ignored");
            return false;
        }

        self.display.hide_summary();
        self.state = None;
        self.phase = Phase::Idle;
        true
    }

    /// Fires every timer that is due by now, in deadline order. Returns how
    /// many fired.
    pub fn advance(&mut self) -> usize {
        let mut fired = 0;
        while let Some(Fired { id, kind, at }) = self.timers.pop_due(self.clock.now()) {
            fired += 1;
            match kind {
                TimerKind::Countdown => self.on_countdown(id),
                TimerKind::Deactivate => self.on_dwell_expired(id, at),
            }
        }
        fired
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<&RoundState> {
        self.state.as_ref()
    }

    /// Results of the last finished round, kept until the next start.
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn panels(&self) -> PanelSet {
        self.panels
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Milliseconds until the next timer is due, zero when one is overdue.
    pub fn time_to_next_timer(&self) -> Option<Millis> {
        self.timers
            .next_deadline()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    fn activate_panel_at(&mut self, at: Millis) {
        if self.phase != Phase::Running {
            return;
        }
        self.deactivate_panel();
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let panel = self.panels.pick_next(state.last_panel, &mut self.rng);
        state.active_panel = Some(panel);
        state.last_panel = Some(panel);
        state.activated_at = at;
        state.pending_deactivation = Some(
            self.timers
                .set_timeout(at + state.dwell_delay_ms(), TimerKind::Deactivate),
        );
        debug!(panel, dwell_ms = state.dwell_ms, "panel activated");

        self.display.highlight(panel);
        self.audio.play_activation();
    }

    /// Idempotent: safe to call with nothing lit.
    fn deactivate_panel(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Some(id) = state.pending_deactivation.take() {
            self.timers.cancel(id);
        }
        if let Some(panel) = state.active_panel.take() {
            self.display.clear(panel);
        }
    }

    fn on_countdown(&mut self, id: TimerId) {
        let current = self.state.as_ref().and_then(|s| s.countdown);
        if self.phase != Phase::Running || current != Some(id) {
            debug!(?id, "orphaned countdown cancelled");
            self.timers.cancel(id);
            return;
        }
        self.tick();
    }

    fn on_dwell_expired(&mut self, id: TimerId, at: Millis) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if self.phase != Phase::Running || state.pending_deactivation != Some(id) {
            debug!(?id, "stale deactivation ignored");
            return;
        }

        state.pending_deactivation = None;
        state.expired += 1;
        self.deactivate_panel();
        self.activate_panel_at(at);
    }
}
