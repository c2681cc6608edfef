//! Exponential decay envelope.
//!
//! Mirrors Web Audio's `setValueAtTime(peak)` followed by
//! `exponentialRampToValueAtTime(floor, duration)`: the gain falls
//! geometrically from `peak` to `floor` and the voice stops at `duration`.

#[derive(Debug, Clone)]
pub struct DecayEnvelope {
    /// Gain at t = 0.
    pub peak: f64,
    /// Gain reached at `duration`.
    pub floor: f64,
    /// Decay time in seconds.
    pub duration: f64,

    level: f64,
    ratio: f64,
    /// Samples remaining before the envelope goes silent.
    remaining: usize,
}

impl DecayEnvelope {
    pub fn new(peak: f64, floor: f64, duration: f64, sample_rate: f64) -> Self {
        let total = (duration * sample_rate).round() as usize;
        // Per-sample factor so that peak * ratio^total == floor.
        let ratio = if total == 0 || peak <= 0.0 || floor <= 0.0 {
            1.0
        } else {
            (floor / peak).powf(1.0 / total as f64)
        };
        DecayEnvelope {
            peak,
            floor,
            duration,
            level: peak,
            ratio,
            remaining: total,
        }
    }

    /// Number of samples this envelope produces before finishing.
    pub fn len_samples(duration: f64, sample_rate: f64) -> usize {
        (duration * sample_rate).round() as usize
    }

    /// Generate the next gain value.
    pub fn next_sample(&mut self) -> f64 {
        if self.remaining == 0 {
            return 0.0;
        }
        let out = self.level;
        self.level *= self.ratio;
        self.remaining -= 1;
        out
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_peak() {
        let mut env = DecayEnvelope::new(0.1, 0.01, 0.1, 44100.0);
        assert!((env.next_sample() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn ends_near_floor_then_silent() {
        let mut env = DecayEnvelope::new(0.1, 0.01, 0.1, 44100.0);
        let mut last = 0.0;
        for _ in 0..4410 {
            last = env.next_sample();
        }
        assert!((last - 0.01).abs() < 1e-4, "last gain {last}");
        assert!(env.is_finished());
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn monotonically_decreasing() {
        let mut env = DecayEnvelope::new(0.05, 0.01, 0.2, 8000.0);
        let mut prev = f64::MAX;
        while !env.is_finished() {
            let g = env.next_sample();
            assert!(g < prev);
            prev = g;
        }
    }
}
