//! Mining thresholds and per-run options

use crate::data::LoaderOptions;
use crate::error::{MiningError, MiningResult};
use crate::rules::RuleOrientation;

/// Support, confidence and lift cut-offs. All comparisons are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub min_support: f64,
    pub min_confidence: f64,
    pub min_lift: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_support: 0.0045,
            min_confidence: 0.2,
            min_lift: 3.0,
        }
    }
}

impl Thresholds {
    pub fn new(min_support: f64, min_confidence: f64, min_lift: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            min_lift,
        }
    }

    /// Check every threshold against its range.
    ///
    /// `min_support` must lie in (0, 1], `min_confidence` in [0, 1] and
    /// `min_lift` must be positive. NaN fails every check.
    pub fn validate(&self) -> MiningResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(MiningError::Parameter {
                name: "min_support",
                value: self.min_support,
                expected: "a value in (0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MiningError::Parameter {
                name: "min_confidence",
                value: self.min_confidence,
                expected: "a value in [0, 1]",
            });
        }
        if !(self.min_lift > 0.0 && self.min_lift.is_finite()) {
            return Err(MiningError::Parameter {
                name: "min_lift",
                value: self.min_lift,
                expected: "a finite value greater than 0",
            });
        }
        Ok(())
    }
}

/// Everything a single `mine` call needs besides the input itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningOptions {
    pub thresholds: Thresholds,
    pub loader: LoaderOptions,
    pub orientation: RuleOrientation,
}

impl MiningOptions {
    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Thresholds::default().validate().is_ok());
        assert_eq!(MiningOptions::default().orientation, RuleOrientation::FirstQualifying);
    }

    #[test]
    fn test_support_range() {
        assert!(Thresholds::new(1.0, 0.5, 1.0).validate().is_ok());
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            let err = Thresholds::new(bad, 0.5, 1.0).validate().unwrap_err();
            assert!(matches!(err, MiningError::Parameter { name: "min_support", .. }));
        }
    }

    #[test]
    fn test_confidence_range() {
        assert!(Thresholds::new(0.5, 0.0, 1.0).validate().is_ok());
        assert!(Thresholds::new(0.5, 1.0, 1.0).validate().is_ok());
        for bad in [-0.01, 1.5, f64::NAN] {
            let err = Thresholds::new(0.5, bad, 1.0).validate().unwrap_err();
            assert!(matches!(err, MiningError::Parameter { name: "min_confidence", .. }));
        }
    }

    #[test]
    fn test_lift_range() {
        assert!(Thresholds::new(0.5, 0.5, 0.5).validate().is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Thresholds::new(0.5, 0.5, bad).validate().unwrap_err();
            assert!(matches!(err, MiningError::Parameter { name: "min_lift", .. }));
        }
    }
}
