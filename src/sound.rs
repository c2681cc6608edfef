//! Sound synthesizer: keystroke and error tones, and the audio device seam.
//!
//! The controller owns at most one open [`ToneOutput`] at a time. Devices
//! hand out fresh outputs on every `open()`, so toggling sound off and on
//! never reuses a closed handle.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;
use crate::error::TypewriterError;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneKind {
    /// A normal keystroke (typed or deleted character).
    Type,
    /// An injected typo.
    Error,
}

/// A fully resolved tone: waveform, pitch and decay envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub kind: ToneKind,
    pub waveform: Waveform,
    /// Hz
    pub frequency: f64,
    pub peak_gain: f64,
    pub floor_gain: f64,
    /// Seconds until the tone stops.
    pub duration: f64,
}

impl Tone {
    /// Keystroke tone. Pitch is drawn from [800, 1000) Hz.
    pub fn keystroke(rng: &mut dyn RandomSource) -> Tone {
        Tone {
            kind: ToneKind::Type,
            waveform: Waveform::Square,
            frequency: rng.range(800.0, 1000.0),
            peak_gain: 0.1,
            floor_gain: 0.01,
            duration: 0.1,
        }
    }

    pub fn error() -> Tone {
        Tone {
            kind: ToneKind::Error,
            waveform: Waveform::Sawtooth,
            frequency: 300.0,
            peak_gain: 0.05,
            floor_gain: 0.01,
            duration: 0.2,
        }
    }

    pub fn for_kind(kind: ToneKind, rng: &mut dyn RandomSource) -> Tone {
        match kind {
            ToneKind::Type => Tone::keystroke(rng),
            ToneKind::Error => Tone::error(),
        }
    }
}

// ── Device seam ─────────────────────────────────────────────

/// A live synthesis context. Closed exactly once, by value.
pub trait ToneOutput {
    /// Play `tone` now. `at_ms` is the widget's logical clock, which
    /// real-time backends may ignore.
    fn play(&mut self, tone: &Tone, at_ms: f64);

    fn close(self);
}

/// Opens synthesis contexts on demand.
pub trait AudioDevice {
    type Output: ToneOutput;

    fn open(&mut self) -> Result<Self::Output, TypewriterError>;
}

// ── Offline recorder ────────────────────────────────────────

/// A tone that was played, with the handle that played it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedTone {
    pub handle: u32,
    pub at_ms: f64,
    pub tone: Tone,
}

#[derive(Debug, Default)]
pub struct ToneLog {
    pub played: Vec<PlayedTone>,
    pub opened: Vec<u32>,
    pub closed: Vec<u32>,
}

/// Audio device that records tones instead of playing them.
///
/// The log is shared so callers can inspect or render it after the device
/// has been moved into a controller.
#[derive(Debug, Clone, Default)]
pub struct OfflineAudio {
    log: Rc<RefCell<ToneLog>>,
    next_id: u32,
    /// When set, `open()` fails with this message.
    fail_with: Option<String>,
    /// When set, played tones are dropped instead of logged.
    discard: bool,
}

impl OfflineAudio {
    pub fn new() -> Self {
        OfflineAudio::default()
    }

    /// A device whose every `open()` fails, for exercising the no-audio path.
    pub fn failing(message: &str) -> Self {
        OfflineAudio {
            fail_with: Some(message.to_string()),
            ..OfflineAudio::default()
        }
    }

    /// A device that tracks handles but keeps no tones, for runs that never
    /// render the log.
    pub fn discarding() -> Self {
        OfflineAudio {
            discard: true,
            ..OfflineAudio::default()
        }
    }

    pub fn log(&self) -> Rc<RefCell<ToneLog>> {
        Rc::clone(&self.log)
    }
}

#[derive(Debug)]
pub struct OfflineOutput {
    id: u32,
    discard: bool,
    log: Rc<RefCell<ToneLog>>,
}

impl OfflineOutput {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl ToneOutput for OfflineOutput {
    fn play(&mut self, tone: &Tone, at_ms: f64) {
        if self.discard {
            return;
        }
        self.log.borrow_mut().played.push(PlayedTone {
            handle: self.id,
            at_ms,
            tone: tone.clone(),
        });
    }

    fn close(self) {
        self.log.borrow_mut().closed.push(self.id);
    }
}

impl AudioDevice for OfflineAudio {
    type Output = OfflineOutput;

    fn open(&mut self) -> Result<OfflineOutput, TypewriterError> {
        if let Some(msg) = &self.fail_with {
            return Err(TypewriterError::AudioUnavailable(msg.clone()));
        }
        self.next_id += 1;
        self.log.borrow_mut().opened.push(self.next_id);
        Ok(OfflineOutput {
            id: self.next_id,
            discard: self.discard,
            log: Rc::clone(&self.log),
        })
    }
}
