use std::io::{self, Write};

use tracing::debug;

/// Fire-and-forget hit sound
pub trait AudioCue {
    fn play(&mut self);
}

/// Rings the terminal bell
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            debug!(error = %e, "bell failed");
        }
    }
}

#[derive(Debug, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&mut self) {}
}

/// Counts plays; handy for asserting the cue fired once per hit
#[derive(Debug, Default)]
pub struct CountingCue {
    pub plays: u32,
}

impl AudioCue for CountingCue {
    fn play(&mut self) {
        self.plays += 1;
    }
}
