//! Offline renderer: turns tones into samples and WAV bytes.

use crate::sound::{PlayedTone, Tone};

use super::envelope::DecayEnvelope;
use super::mixer::Mixer;
use super::oscillator::Oscillator;

/// Render a single tone to mono samples.
pub fn render_tone(tone: &Tone, sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    let mut osc = Oscillator::new(tone.waveform, tone.frequency, sr);
    let mut env = DecayEnvelope::new(tone.peak_gain, tone.floor_gain, tone.duration, sr);
    let len = DecayEnvelope::len_samples(tone.duration, sr);
    (0..len).map(|_| osc.next_sample() * env.next_sample()).collect()
}

/// Render a timeline of played tones, each placed at its timestamp.
///
/// Output length covers the last tone's tail plus `tail_ms` of silence.
pub fn render_timeline(tones: &[PlayedTone], sample_rate: u32, tail_ms: f64) -> Vec<f32> {
    let sr = sample_rate as f64;
    let mut mixer = Mixer::new();
    let mut end = 0usize;
    for played in tones {
        let offset = (played.at_ms / 1000.0 * sr).round() as usize;
        let samples = render_tone(&played.tone, sample_rate);
        end = end.max(offset + samples.len());
        mixer.add_at(offset, &samples);
    }
    mixer.extend_to(end + (tail_ms / 1000.0 * sr).round() as usize);
    mixer.output().iter().map(|&s| s as f32).collect()
}

/// Encode mono f32 samples to a 16-bit PCM WAV byte buffer.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        buf.extend_from_slice(&pcm.to_le_bytes());
    }

    buf
}
