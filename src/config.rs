use crate::error::{Result, RoadGraphError};

/// Coincidence radius in map units. Projected coordinates carry floating error, so exact
/// equality is too strict.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Minimum truncation distance used when an element has no usable width.
pub const DEFAULT_OFFSET: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadGraphConfig {
    /// Two points closer than this are the same point.
    pub tolerance: f64,
    /// Truncation distance for connections whose width is zero or unset.
    pub min_offset: f64,
}

impl Default for RoadGraphConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_offset: DEFAULT_OFFSET,
        }
    }
}

impl RoadGraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_offset(mut self, min_offset: f64) -> Self {
        self.min_offset = min_offset;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(RoadGraphError::InvalidArgument(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if !self.min_offset.is_finite() || self.min_offset < 0.0 {
            return Err(RoadGraphError::InvalidArgument(format!(
                "offset must be finite and non-negative, got {}",
                self.min_offset
            )));
        }
        Ok(())
    }

    /// Truncation threshold for a connection of the given width.
    pub fn threshold_for(&self, width: f64) -> f64 {
        if width > 0.0 {
            width
        } else {
            self.min_offset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_tolerance() {
        assert!(RoadGraphConfig::new().with_tolerance(0.0).validate().is_err());
        assert!(RoadGraphConfig::new().with_tolerance(f64::NAN).validate().is_err());
        assert!(RoadGraphConfig::new().with_offset(-1.0).validate().is_err());
        assert!(RoadGraphConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_falls_back_to_offset() {
        let config = RoadGraphConfig::new().with_offset(1.5);
        assert_eq!(config.threshold_for(0.0), 1.5);
        assert_eq!(config.threshold_for(-2.0), 1.5);
        assert_eq!(config.threshold_for(4.0), 4.0);
    }
}
