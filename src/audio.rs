use std::io::{self, Write};

use crate::sinks::AudioSink;

const BEL: &[u8] = b"\x07";

/// Rings the terminal bell. Write errors are dropped: a missed beep must
/// never stall the round.
pub struct TerminalBell<W: Write> {
    out: W,
    on_activation: bool,
    enabled: bool,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout(enabled: bool) -> Self {
        Self::new(io::stdout(), enabled)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self {
            out,
            on_activation: true,
            enabled,
        }
    }

    /// Ring on every activation as well as on misses. On unless turned off.
    pub fn with_activation_cue(mut self, on: bool) -> Self {
        self.on_activation = on;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self) {
        if self.enabled {
            let _ = self.out.write_all(BEL).and_then(|_| self.out.flush());
        }
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play_activation(&mut self) {
        if self.on_activation {
            self.ring();
        }
    }

    fn play_miss(&mut self) {
        self.ring();
    }
}
