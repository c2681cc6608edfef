//! Mixer: sums overlapping tones into one buffer with master gain.

#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: 1.0,
            buffer: Vec::new(),
        }
    }

    /// Mix `samples` in starting at `offset`, growing the buffer as needed.
    pub fn add_at(&mut self, offset: usize, samples: &[f64]) {
        let end = offset + samples.len();
        if end > self.buffer.len() {
            self.buffer.resize(end, 0.0);
        }
        for (slot, &s) in self.buffer[offset..end].iter_mut().zip(samples) {
            *slot += s;
        }
    }

    /// Pad the buffer with silence up to `num_samples`.
    pub fn extend_to(&mut self, num_samples: usize) {
        if num_samples > self.buffer.len() {
            self.buffer.resize(num_samples, 0.0);
        }
    }

    /// Mixed output with master gain and soft clipping applied.
    pub fn output(&self) -> Vec<f64> {
        self.buffer
            .iter()
            .map(|&s| soft_clip(s * self.master_gain))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Mixer::new()
    }
}

/// Soft clipper using tanh to prevent harsh digital clipping.
fn soft_clip(x: f64) -> f64 {
    x.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_written() {
        let mut m = Mixer::new();
        assert!(m.is_empty());
        m.extend_to(128);
        let out = m.output();
        assert_eq!(out.len(), 128);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn overlapping_writes_accumulate() {
        let mut m = Mixer::new();
        m.add_at(0, &[0.5, 0.5]);
        m.add_at(1, &[0.3, 1.0]);
        let out = m.output();
        assert_eq!(out.len(), 3);
        assert!((out[0] - soft_clip(0.5)).abs() < 1e-10);
        assert!((out[1] - soft_clip(0.8)).abs() < 1e-10);
        assert!((out[2] - soft_clip(1.0)).abs() < 1e-10);
    }

    #[test]
    fn soft_clip_prevents_overflow() {
        let mut m = Mixer::new();
        m.add_at(0, &[100.0]);
        let out = m.output();
        assert!(out[0].abs() <= 1.0, "Soft clip should keep output <= 1.0, got {}", out[0]);
    }
}
