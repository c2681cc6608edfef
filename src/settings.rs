//! User-facing settings: sound, typo simulation, speed, and their labels.

use serde::{Deserialize, Serialize};

/// Speed presets, cycled by the speed control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    /// Divisor applied to every variable delay.
    pub fn multiplier(self) -> f64 {
        match self {
            Speed::Slow => 0.5,
            Speed::Normal => 1.0,
            Speed::Fast => 2.0,
        }
    }

    /// slow → normal → fast → slow
    pub fn next(self) -> Speed {
        match self {
            Speed::Slow => Speed::Normal,
            Speed::Normal => Speed::Fast,
            Speed::Fast => Speed::Slow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Speed::Slow => "🐌 Slow Speed",
            Speed::Normal => "⚡ Normal Speed",
            Speed::Fast => "🚀 Fast Speed",
        }
    }
}

/// The on-screen controls whose labels track settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Sound,
    Errors,
    Speed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sound_enabled: bool,
    pub errors_enabled: bool,
    pub speed: Speed,
    /// Set by the reduced-motion adapter; cleared by the next speed change.
    pub multiplier_override: Option<f64>,
}

impl Settings {
    pub fn speed_multiplier(&self) -> f64 {
        self.multiplier_override.unwrap_or_else(|| self.speed.multiplier())
    }

    pub fn cycle_speed(&mut self) {
        self.speed = self.speed.next();
        self.multiplier_override = None;
    }

    pub fn label(&self, control: Control) -> &'static str {
        match control {
            Control::Sound => sound_label(self.sound_enabled),
            Control::Errors => errors_label(self.errors_enabled),
            Control::Speed => self.speed.label(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sound_enabled: true,
            errors_enabled: false,
            speed: Speed::Normal,
            multiplier_override: None,
        }
    }
}

pub fn sound_label(enabled: bool) -> &'static str {
    if enabled { "🔊 Sound ON" } else { "🔇 Sound OFF" }
}

pub fn errors_label(enabled: bool) -> &'static str {
    if enabled { "✅ Errors ON" } else { "❌ Errors OFF" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_cycles_through_three_levels() {
        let mut s = Speed::Slow;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(s);
            s = s.next();
        }
        assert_eq!(seen, vec![Speed::Slow, Speed::Normal, Speed::Fast, Speed::Slow]);
    }

    #[test]
    fn override_wins_until_speed_changes() {
        let mut s = Settings { multiplier_override: Some(3.0), ..Settings::default() };
        assert_eq!(s.speed_multiplier(), 3.0);
        s.cycle_speed();
        assert_eq!(s.speed, Speed::Fast);
        assert_eq!(s.speed_multiplier(), 2.0);
    }

    #[test]
    fn labels_follow_flags() {
        let s = Settings { sound_enabled: false, errors_enabled: true, ..Settings::default() };
        assert_eq!(s.label(Control::Sound), "🔇 Sound OFF");
        assert_eq!(s.label(Control::Errors), "✅ Errors ON");
        assert_eq!(s.label(Control::Speed), "⚡ Normal Speed");
    }

    #[test]
    fn speed_deserializes_lowercase() {
        let s: Speed = serde_json::from_str("\"fast\"").unwrap();
        assert_eq!(s, Speed::Fast);
    }
}
