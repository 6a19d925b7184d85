//! # Engine Settings
//!
//! Numeric tolerances and policy constants for the stress engine. Kept in one
//! serializable struct so a saved project reproduces the exact same profile.

use serde::{Deserialize, Serialize};

use crate::errors::{SoilError, SoilResult};

/// Points closer than this (m) are treated as the same depth.
pub const DEFAULT_DEPTH_TOLERANCE: f64 = 1e-4;

/// Negative effective stress down to `-tolerance` is numerical noise.
pub const DEFAULT_CLAMP_TOLERANCE: f64 = 1e-9;

/// A global table deeper than `factor × profile depth` is treated as unset.
pub const DEFAULT_GLOBAL_TABLE_RANGE_FACTOR: f64 = 1.5;

/// Decimal places kept in responses.
pub const DEFAULT_OUTPUT_DECIMALS: u32 = 4;

/// Tolerances and limits used by [`crate::stresses::calculate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Deduplication tolerance ε for computation point depths (m)
    pub depth_tolerance: f64,

    /// Effective stresses in `[-clamp_tolerance, 0)` are silently clamped;
    /// lower values are clamped with a warning
    pub clamp_tolerance: f64,

    /// Upper bound of the sane global water-table range, as a multiple of total depth
    pub global_table_range_factor: f64,

    /// Rounding applied at the response boundary
    pub output_decimals: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            depth_tolerance: DEFAULT_DEPTH_TOLERANCE,
            clamp_tolerance: DEFAULT_CLAMP_TOLERANCE,
            global_table_range_factor: DEFAULT_GLOBAL_TABLE_RANGE_FACTOR,
            output_decimals: DEFAULT_OUTPUT_DECIMALS,
        }
    }
}

impl EngineSettings {
    /// Validate settings values.
    pub fn validate(&self) -> SoilResult<()> {
        if !(self.depth_tolerance.is_finite() && self.depth_tolerance > 0.0) {
            return Err(SoilError::invalid_input(
                "depth_tolerance",
                self.depth_tolerance.to_string(),
                "Depth tolerance must be a positive number",
            ));
        }
        if !(self.clamp_tolerance.is_finite() && self.clamp_tolerance >= 0.0) {
            return Err(SoilError::invalid_input(
                "clamp_tolerance",
                self.clamp_tolerance.to_string(),
                "Clamp tolerance cannot be negative",
            ));
        }
        if !(self.global_table_range_factor.is_finite() && self.global_table_range_factor >= 1.0) {
            return Err(SoilError::invalid_input(
                "global_table_range_factor",
                self.global_table_range_factor.to_string(),
                "Range factor must be at least 1.0",
            ));
        }
        if self.output_decimals > 12 {
            return Err(SoilError::invalid_input(
                "output_decimals",
                self.output_decimals.to_string(),
                "At most 12 decimal places are supported",
            ));
        }
        Ok(())
    }

    /// Builder-style override of the deduplication tolerance.
    pub fn with_depth_tolerance(mut self, tolerance: f64) -> Self {
        self.depth_tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.depth_tolerance, 1e-4);
        assert_eq!(settings.output_decimals, 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"depth_tolerance": 0.01}"#).unwrap();
        assert_eq!(settings.depth_tolerance, 0.01);
        assert_eq!(settings.global_table_range_factor, 1.5);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(EngineSettings::default().with_depth_tolerance(0.0).validate().is_err());
        let settings = EngineSettings {
            global_table_range_factor: 0.5,
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
