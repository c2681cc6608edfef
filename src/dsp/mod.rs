//! DSP: offline synthesis of the keystroke and error tones.
//!
//! The browser plays tones through Web Audio directly; this module renders
//! the same tones in Rust so the native runner and the `render_tone_wav`
//! export produce matching audio without a browser.

pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
