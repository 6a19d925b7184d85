//! # Layer Model
//!
//! Immutable description of a stratified soil column. Layers are ordered from
//! the ground surface down; a layer's top depth is the sum of the thicknesses
//! above it.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "layers": [
//!     { "thickness": 3.0, "unit_weight_natural": 17.0, "unit_weight_saturated": 19.0 },
//!     { "thickness": 4.0, "unit_weight_saturated": 18.5, "lateral_coefficient": 0.6 }
//!   ],
//!   "global_water_table_depth": 2.0,
//!   "global_capillary_height": 0.5
//! }
//! ```
//!
//! Omitted fields take their defaults: `lateral_coefficient = 0.5`,
//! `impermeable = false`, `global_capillary_height = 0`, `unit_weight_water = 10`.

use serde::{Deserialize, Serialize};

use crate::errors::{SoilError, SoilResult};

/// Default K₀ when a layer does not specify one
pub const DEFAULT_LATERAL_COEFFICIENT: f64 = 0.5;

/// Default unit weight of water (kN/m³)
pub const DEFAULT_UNIT_WEIGHT_WATER: f64 = 10.0;

fn default_lateral_coefficient() -> f64 {
    DEFAULT_LATERAL_COEFFICIENT
}

fn default_unit_weight_water() -> f64 {
    DEFAULT_UNIT_WEIGHT_WATER
}

/// One soil stratum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Layer thickness (m), must be positive
    pub thickness: f64,

    /// Natural unit weight γnat (kN/m³), used above the water table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_weight_natural: Option<f64>,

    /// Saturated unit weight γsat (kN/m³), used below the water table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_weight_saturated: Option<f64>,

    /// Coefficient of earth pressure at rest K₀
    #[serde(default = "default_lateral_coefficient")]
    pub lateral_coefficient: f64,

    /// No-flow boundary: blocks water-table propagation unless the layer has its own table
    #[serde(default)]
    pub impermeable: bool,

    /// Depth from the surface of a perched / separate aquifer (m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_water_table_depth: Option<f64>,

    /// Capillary height above the local table (m); ignored without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_capillary_height: Option<f64>,
}

impl SoilLayer {
    /// Layer with a single unit weight used both above and below any table.
    pub fn new(thickness: f64, unit_weight: f64) -> Self {
        SoilLayer {
            thickness,
            unit_weight_natural: Some(unit_weight),
            unit_weight_saturated: Some(unit_weight),
            lateral_coefficient: DEFAULT_LATERAL_COEFFICIENT,
            impermeable: false,
            local_water_table_depth: None,
            local_capillary_height: None,
        }
    }

    /// Layer with distinct natural and saturated unit weights.
    pub fn with_weights(thickness: f64, natural: Option<f64>, saturated: Option<f64>) -> Self {
        SoilLayer {
            unit_weight_natural: natural,
            unit_weight_saturated: saturated,
            ..SoilLayer::new(thickness, 0.0)
        }
    }

    pub fn lateral(mut self, k0: f64) -> Self {
        self.lateral_coefficient = k0;
        self
    }

    pub fn impermeable(mut self) -> Self {
        self.impermeable = true;
        self
    }

    pub fn local_table(mut self, depth: f64, capillary_height: Option<f64>) -> Self {
        self.local_water_table_depth = Some(depth);
        self.local_capillary_height = capillary_height;
        self
    }

    /// True when this layer blocks propagation of tables from other layers.
    pub fn blocks_flow(&self) -> bool {
        self.impermeable && self.local_water_table_depth.is_none()
    }

    /// Validate layer parameters.
    ///
    /// `z_top` is the depth of the layer top; a local table must lie at or
    /// below it. Missing unit weights are not checked here: whether a weight
    /// is needed depends on the governing water table, which the integrator
    /// decides.
    pub fn validate(&self, index: usize, z_top: f64) -> SoilResult<()> {
        let field = |name: &str| format!("layers[{}].{}", index, name);

        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(SoilError::invalid_input(
                field("thickness"),
                self.thickness.to_string(),
                "Layer thickness must be positive",
            ));
        }
        for (name, weight) in [
            ("unit_weight_natural", self.unit_weight_natural),
            ("unit_weight_saturated", self.unit_weight_saturated),
        ] {
            if let Some(gamma) = weight {
                if !(gamma.is_finite() && gamma > 0.0) {
                    return Err(SoilError::invalid_input(
                        field(name),
                        gamma.to_string(),
                        "Unit weight must be positive",
                    ));
                }
            }
        }
        if !(self.lateral_coefficient.is_finite() && self.lateral_coefficient >= 0.0) {
            return Err(SoilError::invalid_input(
                field("lateral_coefficient"),
                self.lateral_coefficient.to_string(),
                "K0 cannot be negative",
            ));
        }
        if let Some(depth) = self.local_water_table_depth {
            if !(depth.is_finite() && depth >= 0.0) {
                return Err(SoilError::invalid_input(
                    field("local_water_table_depth"),
                    depth.to_string(),
                    "Water table depth is measured from the surface and cannot be negative",
                ));
            }
            if depth < z_top {
                return Err(SoilError::invalid_input(
                    field("local_water_table_depth"),
                    depth.to_string(),
                    format!("Local water table lies above the layer top at {} m", z_top),
                ));
            }
        }
        if let Some(height) = self.local_capillary_height {
            if !(height.is_finite() && height >= 0.0) {
                return Err(SoilError::invalid_input(
                    field("local_capillary_height"),
                    height.to_string(),
                    "Capillary height cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// Request-level aggregate: the soil column plus the profile-wide water conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressProfileInput {
    /// Layers from the surface down
    pub layers: Vec<SoilLayer>,

    /// Depth of the global water table (m); absent means no global table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_water_table_depth: Option<f64>,

    /// Capillary fringe height above the global table (m)
    #[serde(default)]
    pub global_capillary_height: f64,

    /// Unit weight of water γw (kN/m³)
    #[serde(default = "default_unit_weight_water")]
    pub unit_weight_water: f64,
}

impl StressProfileInput {
    /// Profile with no global table and default water properties.
    pub fn new(layers: Vec<SoilLayer>) -> Self {
        StressProfileInput {
            layers,
            global_water_table_depth: None,
            global_capillary_height: 0.0,
            unit_weight_water: DEFAULT_UNIT_WEIGHT_WATER,
        }
    }

    pub fn with_water_table(mut self, depth: f64, capillary_height: f64) -> Self {
        self.global_water_table_depth = Some(depth);
        self.global_capillary_height = capillary_height;
        self
    }

    /// Sum of all layer thicknesses (m)
    pub fn total_depth(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }

    /// Top and base depth of every layer, in order.
    pub fn layer_bounds(&self) -> Vec<(f64, f64)> {
        let mut z_top = 0.0;
        self.layers
            .iter()
            .map(|layer| {
                let bounds = (z_top, z_top + layer.thickness);
                z_top = bounds.1;
                bounds
            })
            .collect()
    }

    /// True when at least one layer defines its own water table.
    pub fn has_local_tables(&self) -> bool {
        self.layers.iter().any(|l| l.local_water_table_depth.is_some())
    }

    /// Validate the whole profile.
    ///
    /// An empty layer list is a structural error rather than an empty success.
    pub fn validate(&self) -> SoilResult<()> {
        if self.layers.is_empty() {
            return Err(SoilError::structural("The layer list cannot be empty"));
        }
        let bounds = self.layer_bounds();
        for (index, (layer, (z_top, _))) in self.layers.iter().zip(bounds).enumerate() {
            layer.validate(index, z_top)?;
        }
        if !(self.unit_weight_water.is_finite() && self.unit_weight_water > 0.0) {
            return Err(SoilError::invalid_input(
                "unit_weight_water",
                self.unit_weight_water.to_string(),
                "Unit weight of water must be positive",
            ));
        }
        if !(self.global_capillary_height.is_finite() && self.global_capillary_height >= 0.0) {
            return Err(SoilError::invalid_input(
                "global_capillary_height",
                self.global_capillary_height.to_string(),
                "Capillary height cannot be negative",
            ));
        }
        if let Some(depth) = self.global_water_table_depth {
            if depth.is_nan() {
                return Err(SoilError::invalid_input(
                    "global_water_table_depth",
                    depth.to_string(),
                    "Water table depth must be a number",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{ "layers": [ { "thickness": 2.0, "unit_weight_natural": 18.0 } ] }"#;
        let input: StressProfileInput = serde_json::from_str(json).unwrap();
        let layer = &input.layers[0];
        assert_eq!(layer.lateral_coefficient, 0.5);
        assert!(!layer.impermeable);
        assert!(layer.unit_weight_saturated.is_none());
        assert_eq!(input.unit_weight_water, 10.0);
        assert_eq!(input.global_capillary_height, 0.0);
        assert!(input.global_water_table_depth.is_none());
    }

    #[test]
    fn test_layer_bounds_and_total_depth() {
        let input = StressProfileInput::new(vec![
            SoilLayer::new(2.0, 18.0),
            SoilLayer::new(3.5, 19.0),
            SoilLayer::new(1.0, 20.0),
        ]);
        assert_eq!(input.layer_bounds(), vec![(0.0, 2.0), (2.0, 5.5), (5.5, 6.5)]);
        assert!((input.total_depth() - 6.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_profile_is_structural_error() {
        let input = StressProfileInput::new(vec![]);
        let err = input.validate().unwrap_err();
        assert_eq!(err.error_code(), "STRUCTURAL_ERROR");
    }

    #[test]
    fn test_invalid_thickness() {
        let input =
            StressProfileInput::new(vec![SoilLayer::new(2.0, 18.0), SoilLayer::new(0.0, 18.0)]);
        match input.validate() {
            Err(SoilError::InvalidInput { field, .. }) => assert_eq!(field, "layers[1].thickness"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_local_table_above_own_layer_rejected() {
        let input = StressProfileInput::new(vec![
            SoilLayer::new(2.0, 18.0),
            SoilLayer::new(2.0, 19.0).local_table(1.0, None),
        ]);
        match input.validate() {
            Err(SoilError::InvalidInput { field, .. }) => {
                assert_eq!(field, "layers[1].local_water_table_depth")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        // At the layer top, inside it and below it are all accepted
        for depth in [2.0, 3.0, 7.5] {
            let input = StressProfileInput::new(vec![
                SoilLayer::new(2.0, 18.0),
                SoilLayer::new(2.0, 19.0).local_table(depth, None),
            ]);
            assert!(input.validate().is_ok(), "depth {}", depth);
        }
    }

    #[test]
    fn test_missing_weights_pass_validation() {
        let input = StressProfileInput::new(vec![SoilLayer::with_weights(2.0, None, None)]);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_negative_k0_rejected() {
        let input = StressProfileInput::new(vec![SoilLayer::new(2.0, 18.0).lateral(-0.1)]);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_blocks_flow() {
        assert!(SoilLayer::new(1.0, 18.0).impermeable().blocks_flow());
        assert!(!SoilLayer::new(1.0, 18.0).impermeable().local_table(0.5, None).blocks_flow());
        assert!(!SoilLayer::new(1.0, 18.0).blocks_flow());
    }
}
