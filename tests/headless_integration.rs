use std::sync::mpsc;
use std::time::Duration;

use assert_matches::assert_matches;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use flashgrid::clock::{ManualClock, TimerKind};
use flashgrid::runtime::{FixedTicker, GameEvent, Runner, TestEventSource};
use flashgrid::sinks::{CountingAudio, DisplayCall, Position, RecordingDisplay};
use flashgrid::{ClickOutcome, PanelSet, Phase, RoundController};

type Controller = RoundController<RecordingDisplay, CountingAudio, ManualClock>;

fn controller(panels: usize, seed: u64) -> (Controller, ManualClock) {
    let clock = ManualClock::new();
    let ctl = RoundController::new(
        PanelSet::new(panels).unwrap(),
        RecordingDisplay::new(),
        CountingAudio::default(),
        clock.clone(),
    )
    .with_seed(seed);
    (ctl, clock)
}

fn active(ctl: &Controller) -> usize {
    ctl.state().and_then(|s| s.active_panel).unwrap()
}

// Headless game loop: digits click panels, ticks move the clock forward by
// one frame. Verifies the Runner/TestEventSource plumbing drives a round.
#[test]
fn headless_round_driven_by_events() {
    let (mut ctl, clock) = controller(9, 1);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    ctl.start_round();
    let first = active(&ctl);
    let digit = char::from_digit(first as u32 + 1, 10).unwrap();
    tx.send(GameEvent::Key(KeyEvent::new(
        KeyCode::Char(digit),
        KeyModifiers::NONE,
    )))
    .unwrap();

    let mut hits = Vec::new();
    for _ in 0..1_000u32 {
        match runner.step() {
            GameEvent::Tick => {
                clock.advance(100);
                ctl.advance();
            }
            GameEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    let panel = c.to_digit(10).unwrap() as usize - 1;
                    hits.push(ctl.handle_panel_click(panel, Position::default()));
                }
            }
            GameEvent::Mouse(_) | GameEvent::Resize => {}
        }
        if ctl.phase() == Phase::Finished {
            break;
        }
    }

    assert_eq!(ctl.phase(), Phase::Finished);
    assert_eq!(hits.len(), 1);
    assert_matches!(hits[0], ClickOutcome::Hit { reaction_ms: 0 });

    let summary = ctl.summary().unwrap();
    assert_eq!(summary.score, 1);
    assert_eq!(summary.fastest_ms, Some(0));
    assert_eq!(ctl.display().last_summary(), Some(summary));
}

#[test]
fn samples_always_match_score() {
    let (mut ctl, clock) = controller(6, 3);
    ctl.start_round();

    // Alternate hits, misses and idle stretches across the whole round.
    let mut step = 0u64;
    while ctl.phase() == Phase::Running {
        step += 1;
        clock.advance(90 + (step * 37) % 400);
        let lit = ctl.state().and_then(|s| s.active_panel);
        if let Some(panel) = lit {
            let target = if step % 3 == 0 { (panel + 1) % 6 } else { panel };
            ctl.handle_panel_click(target, Position::default());
        } else {
            ctl.advance();
        }

        if let Some(state) = ctl.state() {
            assert_eq!(state.reaction_samples_ms.len() as u32, state.score);
        }
    }

    let state = ctl.state().unwrap();
    assert_eq!(state.reaction_samples_ms.len() as u32, state.score);
    assert!(state.score > 0);
    assert!(ctl.audio().misses > 0);
}

#[test]
fn dwell_shrinks_across_ticks_and_respects_floor() {
    let (mut ctl, clock) = controller(9, 5);
    ctl.start_round();

    let mut previous = ctl.state().unwrap().dwell_ms;
    for second in 1..60u64 {
        clock.set(second * 1000);
        ctl.advance();
        let dwell = ctl.state().unwrap().dwell_ms;
        assert!(dwell <= previous, "dwell grew at {}s", second);
        assert!(dwell >= 300.0);
        previous = dwell;
    }
    assert!(previous < 305.0);
}

#[test]
fn activations_never_repeat_the_previous_panel() {
    let (mut ctl, clock) = controller(3, 8);
    ctl.start_round();

    for _ in 0..200 {
        clock.advance(50);
        let panel = active(&ctl);
        ctl.handle_panel_click(panel, Position::default());
    }

    let highlights = ctl.display().highlights();
    assert!(highlights.len() > 200);
    assert!(highlights.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn idle_round_summary_has_no_data() {
    let (mut ctl, clock) = controller(9, 2);
    ctl.start_round();
    clock.set(60_000);
    ctl.advance();

    let summary = ctl.summary().unwrap();
    assert_eq!(summary.score, 0);
    assert_eq!(summary.fastest_ms, None);
    assert_eq!(summary.slowest_ms, None);
    assert_eq!(summary.average_ms, None);
}

#[test]
fn double_start_keeps_one_countdown() {
    let (mut ctl, clock) = controller(9, 4);
    assert!(ctl.start_round());
    assert!(!ctl.start_round());
    assert_eq!(ctl.timers().count(TimerKind::Countdown), 1);

    clock.set(10_000);
    ctl.advance();
    assert_eq!(ctl.state().unwrap().time_left_secs, 50);
}

#[test]
fn nothing_fires_after_the_round_is_acknowledged() {
    let (mut ctl, clock) = controller(9, 6);
    ctl.start_round();
    clock.set(1_200);
    ctl.end_round();
    ctl.acknowledge_results();
    let calls = ctl.display().calls.len();

    clock.set(90_000);
    assert_eq!(ctl.advance(), 0);
    assert_eq!(ctl.display().calls.len(), calls);
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(
        ctl.display().calls.last(),
        Some(&DisplayCall::HideSummary)
    );
}
