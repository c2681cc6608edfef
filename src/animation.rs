//! Animation state: cursor, phase, and the timer tickets hosts arm.

use serde::Serialize;

use crate::rng::RandomSource;

/// Progress through the script list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cursor {
    pub script_index: usize,
    /// Characters of the current entry on screen, typo excluded.
    pub char_index: usize,
    pub deleting: bool,
}

/// Observable state of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Typing,
    /// A typo is on screen, waiting to be corrected.
    ErrorDetour,
    /// Full string shown, holding before deletion starts.
    Pausing,
    Deleting,
    /// Not live: before `start()` or between `restart()` and resume.
    Halted,
}

/// What a ticket does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Wake {
    /// Run one animation step.
    Tick,
    /// Remove the injected typo and continue typing.
    ResolveTypo,
    /// Begin a fresh cycle after `restart()`.
    Resume,
}

/// A one-shot timer request. The host waits `delay_ms`, then passes the
/// ticket back to `Typewriter::fire`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Schedule {
    /// Restart generation the ticket belongs to.
    pub epoch: u64,
    pub wake: Wake,
    pub delay_ms: f64,
}

/// `base * (floor + r * (1 - floor)) / multiplier`, with `r` uniform in [0, 1).
pub fn variable_delay(base: f64, jitter_floor: f64, multiplier: f64, rng: &mut dyn RandomSource) -> f64 {
    let variation = jitter_floor + rng.next_f64() * (1.0 - jitter_floor);
    base * variation / multiplier
}
