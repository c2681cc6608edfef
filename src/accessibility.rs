//! Reduced-motion adapter, applied once before the first tick.

use crate::settings::Settings;

/// The media query a browser host evaluates.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Silence the widget and run it faster than any manual preset.
///
/// Returns true when settings were changed.
pub fn apply_reduced_motion(settings: &mut Settings, reduced_motion: bool, multiplier: f64) -> bool {
    if !reduced_motion {
        return false;
    }
    settings.sound_enabled = false;
    settings.multiplier_override = Some(multiplier);
    true
}
