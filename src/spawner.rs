//! Wave timer for new falling characters.
//!
//! The wave interval and the staggered spawns inside a wave are kept as
//! due-timestamps polled from the frame tick, so stopping or restarting is a
//! plain reset.

pub const WAVE_INTERVAL_MS: f64 = 2000.0;
pub const STAGGER_MS: f64 = 200.0;
/// Delay between entering the game view and the very first spawn.
pub const START_DELAY_MS: f64 = 100.0;
pub const MAX_WAVE_SIZE: u32 = 3;
/// Pops needed per extra character in a wave.
pub const POPS_PER_STEP: u32 = 10;

/// Characters per wave for the given number of pops so far.
pub fn wave_size(popped: u32) -> u32 {
    (popped / POPS_PER_STEP + 1).min(MAX_WAVE_SIZE)
}

#[derive(Debug, Default)]
pub struct Spawner {
    next_wave_ms: Option<f64>, // None while stopped
    pending: Vec<f64>,         // due times of individual spawns
}

impl Spawner {
    /// Begin spawning at `at`: one character right away, then a wave every interval.
    pub fn start(&mut self, at: f64) {
        self.pending.clear();
        self.pending.push(at);
        self.next_wave_ms = Some(at + WAVE_INTERVAL_MS);
    }

    pub fn stop(&mut self) {
        self.next_wave_ms = None;
        self.pending.clear();
    }

    pub fn is_running(&self) -> bool {
        self.next_wave_ms.is_some()
    }

    /// Fire the wave if it came due by `now` and return how many spawns are due.
    /// Wave size is sampled when the wave fires. Waves missed during a long gap
    /// between polls collapse into one, and the schedule restarts from `now`.
    pub fn poll(&mut self, now: f64, popped: u32) -> usize {
        if let Some(at) = self.next_wave_ms.filter(|&at| at <= now) {
            let late = at + WAVE_INTERVAL_MS <= now;
            let base = if late { now } else { at };
            for i in 0..wave_size(popped) {
                self.pending.push(base + i as f64 * STAGGER_MS);
            }
            self.next_wave_ms = Some(base + WAVE_INTERVAL_MS);
        }
        let before = self.pending.len();
        self.pending.retain(|&due| due > now);
        before - self.pending.len()
    }
}
