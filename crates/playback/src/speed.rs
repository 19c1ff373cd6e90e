//! Playback speed presets.

use apngkit_common::error::{ApngkitError, ApngkitResult};

/// Speeds offered by a speed selector.
pub const SPEED_PRESETS: [f64; 5] = [0.25, 0.5, 1.0, 1.5, 2.0];

/// Index of normal speed in [`SPEED_PRESETS`].
pub const DEFAULT_SPEED_PRESET: usize = 2;

/// Preset speed by selector index.
pub fn speed_preset(index: usize) -> Option<f64> {
    SPEED_PRESETS.get(index).copied()
}

/// Selector index of a speed, if it is one of the presets.
pub fn preset_index(speed: f64) -> Option<usize> {
    SPEED_PRESETS.iter().position(|&preset| preset == speed)
}

/// Selector label for a speed, e.g. `x1.50`.
pub fn speed_label(speed: f64) -> String {
    format!("x{speed:.2}")
}

/// Accept any finite speed above zero.
pub fn validate_speed(speed: f64) -> ApngkitResult<f64> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(ApngkitError::InvalidSpeed { speed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_is_normal_speed() {
        assert_eq!(speed_preset(DEFAULT_SPEED_PRESET), Some(1.0));
        assert_eq!(speed_preset(SPEED_PRESETS.len()), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = SPEED_PRESETS.iter().map(|&s| speed_label(s)).collect();
        assert_eq!(labels, vec!["x0.25", "x0.50", "x1.00", "x1.50", "x2.00"]);
    }

    #[test]
    fn test_preset_index() {
        assert_eq!(preset_index(1.5), Some(3));
        assert_eq!(preset_index(3.0), None);
    }

    #[test]
    fn test_validate_speed() {
        assert_eq!(validate_speed(3.0).unwrap(), 3.0);
        assert!(validate_speed(0.0).is_err());
        assert!(validate_speed(-1.0).is_err());
        assert!(validate_speed(f64::NAN).is_err());
        assert!(validate_speed(f64::INFINITY).is_err());
    }
}
