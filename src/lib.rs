pub mod accessibility;
pub mod animation;
pub mod config;
pub mod dsp;
pub mod error;
#[cfg(feature = "native")]
pub mod native;
pub mod rng;
pub mod script;
pub mod settings;
pub mod sound;
pub mod surface;
pub mod typewriter;
pub mod typo;
pub mod web;

use crate::rng::Lcg;
use crate::sound::{Tone, ToneKind};
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the typewriter-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: the default configuration as a JS object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&config::TypewriterConfig::default())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// Render one tone (`"type"` or `"error"`) to WAV bytes.
///
/// `seed` picks the keystroke pitch; the error tone ignores it.
pub fn tone_wav(kind: ToneKind, seed: u64, sample_rate: u32) -> Vec<u8> {
    let tone = Tone::for_kind(kind, &mut Lcg::new(seed));
    let samples: Vec<f32> = dsp::renderer::render_tone(&tone, sample_rate)
        .iter()
        .map(|&s| s as f32)
        .collect();
    dsp::renderer::encode_wav(&samples, sample_rate)
}

/// WASM-exposed: render a keystroke or error tone to a WAV byte array.
#[wasm_bindgen]
pub fn render_tone_wav(kind: &str, seed: u64, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let kind = match kind {
        "type" => ToneKind::Type,
        "error" => ToneKind::Error,
        other => return Err(JsValue::from_str(&format!("unknown tone kind '{other}'"))),
    };
    Ok(tone_wav(kind, seed, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_wav_has_expected_length() {
        // error tone: 0.2 s at 8 kHz = 1600 samples, 2 bytes each
        let wav = tone_wav(ToneKind::Error, 0, 8000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(wav.len(), 44 + 3200);
    }

    #[test]
    fn keystroke_wav_is_not_silent() {
        let wav = tone_wav(ToneKind::Type, 12, 22050);
        let has_sound = wav[44..]
            .chunks_exact(2)
            .any(|b| i16::from_le_bytes([b[0], b[1]]) != 0);
        assert!(has_sound);
    }
}
