//! Parameter validation shared by the baseline and classifier configurations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{name} must be >= {min}, got {value}")]
    WindowTooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    #[error("{name} must be in (0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be finite and > 0, got {value}")]
    InvalidMultiplier { name: &'static str, value: f64 },
}

pub(crate) fn check_window(name: &'static str, value: usize, min: usize) -> Result<(), ParamError> {
    if value < min {
        return Err(ParamError::WindowTooSmall { name, min, value });
    }
    Ok(())
}

pub(crate) fn check_fraction(name: &'static str, value: f64) -> Result<(), ParamError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ParamError::FractionOutOfRange { name, value });
    }
    Ok(())
}

pub(crate) fn check_multiplier(name: &'static str, value: f64) -> Result<(), ParamError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ParamError::InvalidMultiplier { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds() {
        assert!(check_window("w", 1, 1).is_ok());
        assert_eq!(
            check_window("w", 0, 1),
            Err(ParamError::WindowTooSmall {
                name: "w",
                min: 1,
                value: 0
            })
        );
    }

    #[test]
    fn fraction_bounds() {
        assert!(check_fraction("f", 1.0).is_ok());
        assert!(check_fraction("f", 0.1).is_ok());
        assert!(check_fraction("f", 0.0).is_err());
        assert!(check_fraction("f", 1.5).is_err());
        assert!(check_fraction("f", f64::NAN).is_err());
    }

    #[test]
    fn multiplier_bounds() {
        assert!(check_multiplier("m", 1.2).is_ok());
        assert!(check_multiplier("m", 0.0).is_err());
        assert!(check_multiplier("m", f64::INFINITY).is_err());
    }
}
