//! Widget configuration, deserializable from JSON or a JS object.
//!
//! Every field is optional; omitted fields fall back to the stock widget's
//! behavior (normal speed, sound on, typos off, the default script list).

use serde::{Deserialize, Serialize};

use crate::error::TypewriterError;
use crate::script::{DEFAULT_SCRIPTS, ScriptLibrary};
use crate::settings::{Settings, Speed};

// ── Timing ──────────────────────────────────────────────────

/// Delays in milliseconds, before speed scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    /// Delay between `start()` and the first tick.
    pub start_delay_ms: f64,
    /// Base delay after a typed character.
    pub type_ms: f64,
    /// Base delay after a deleted character.
    pub delete_ms: f64,
    /// Fixed hold once a string is fully typed.
    pub pause_ms: f64,
    /// How long an injected typo stays on screen.
    pub typo_hold_ms: f64,
    /// Base delay before typing resumes after a typo is corrected.
    pub typo_resume_ms: f64,
    /// Delay between `restart()` and the fresh cycle.
    pub restart_delay_ms: f64,
    /// Lower bound of the random jitter factor; the upper bound is 1.0.
    pub jitter_floor: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            start_delay_ms: 1000.0,
            type_ms: 120.0,
            delete_ms: 30.0,
            pause_ms: 2000.0,
            typo_hold_ms: 300.0,
            typo_resume_ms: 100.0,
            restart_delay_ms: 500.0,
            jitter_floor: 0.3,
        }
    }
}

impl Timing {
    fn validate(&self) -> Result<(), TypewriterError> {
        let fields = [
            ("startDelayMs", self.start_delay_ms),
            ("typeMs", self.type_ms),
            ("deleteMs", self.delete_ms),
            ("pauseMs", self.pause_ms),
            ("typoHoldMs", self.typo_hold_ms),
            ("typoResumeMs", self.typo_resume_ms),
            ("restartDelayMs", self.restart_delay_ms),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TypewriterError::InvalidTiming { field });
            }
        }
        if !(0.0..=1.0).contains(&self.jitter_floor) {
            return Err(TypewriterError::InvalidTiming { field: "jitterFloor" });
        }
        Ok(())
    }
}

// ── Top-level config ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypewriterConfig {
    pub scripts: Vec<String>,
    /// Seed for the random source. `None` lets the host pick one.
    pub seed: Option<u64>,
    pub sound: bool,
    pub errors: bool,
    pub speed: Speed,
    /// Chance per typed character of injecting a typo.
    pub typo_probability: f64,
    /// Speed multiplier forced by a reduced-motion preference.
    pub reduced_motion_multiplier: f64,
    pub timing: Timing,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        TypewriterConfig {
            scripts: DEFAULT_SCRIPTS.iter().map(|s| s.to_string()).collect(),
            seed: None,
            sound: true,
            errors: false,
            speed: Speed::Normal,
            typo_probability: 0.05,
            reduced_motion_multiplier: 3.0,
            timing: Timing::default(),
        }
    }
}

impl TypewriterConfig {
    pub fn from_json(json: &str) -> Result<Self, TypewriterError> {
        let config: TypewriterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TypewriterError> {
        self.timing.validate()?;
        if !(0.0..=1.0).contains(&self.typo_probability) {
            return Err(TypewriterError::Config(format!(
                "typoProbability must be within [0, 1], got {}",
                self.typo_probability
            )));
        }
        if !self.reduced_motion_multiplier.is_finite() || self.reduced_motion_multiplier <= 0.0 {
            return Err(TypewriterError::Config(
                "reducedMotionMultiplier must be positive".to_string(),
            ));
        }
        ScriptLibrary::new(&self.scripts).map(|_| ())
    }

    pub fn script_library(&self) -> Result<ScriptLibrary, TypewriterError> {
        ScriptLibrary::new(&self.scripts)
    }

    pub fn initial_settings(&self) -> Settings {
        Settings {
            sound_enabled: self.sound,
            errors_enabled: self.errors,
            speed: self.speed,
            multiplier_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = TypewriterConfig::from_json("{}").unwrap();
        assert_eq!(config, TypewriterConfig::default());
        assert_eq!(config.timing.pause_ms, 2000.0);
    }

    #[test]
    fn partial_timing_keeps_other_defaults() {
        let config = TypewriterConfig::from_json(
            r#"{ "scripts": ["Hi"], "speed": "slow", "timing": { "typeMs": 50 } }"#,
        )
        .unwrap();
        assert_eq!(config.scripts, vec!["Hi".to_string()]);
        assert_eq!(config.speed, Speed::Slow);
        assert_eq!(config.timing.type_ms, 50.0);
        assert_eq!(config.timing.delete_ms, 30.0);
    }

    #[test]
    fn rejects_zero_delay() {
        let err = TypewriterConfig::from_json(r#"{ "timing": { "pauseMs": 0 } }"#).unwrap_err();
        assert_eq!(err, TypewriterError::InvalidTiming { field: "pauseMs" });
    }

    #[test]
    fn rejects_empty_scripts() {
        let err = TypewriterConfig::from_json(r#"{ "scripts": [] }"#).unwrap_err();
        assert_eq!(err, TypewriterError::EmptyScript);
    }

    #[test]
    fn rejects_probability_above_one() {
        let err = TypewriterConfig::from_json(r#"{ "typoProbability": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TypewriterError::Config(_)));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = TypewriterConfig::from_json("{ scripts: ").unwrap_err();
        assert!(matches!(err, TypewriterError::Config(_)));
    }
}
