//! # Profile Assembler
//!
//! Drives the integrator down the soil column and turns the collected points
//! into a stress profile:
//!
//! 1. Seed the surface point (σv = 0).
//! 2. For each layer: resolve its water regime, integrate, append the base point.
//! 3. Sort by depth and drop points within `depth_tolerance` of a kept point
//!    (first occurrence wins).
//! 4. Evaluate u, σ'v (clamped at zero) and σ'h = K₀·σ'v at every point.
//!
//! ## Example
//!
//! ```rust
//! use soil_core::settings::EngineSettings;
//! use soil_core::stresses::{calculate, SoilLayer, StressProfileInput};
//!
//! let input = StressProfileInput::new(vec![
//!     SoilLayer::with_weights(5.0, Some(18.0), Some(20.0)),
//! ])
//! .with_water_table(2.0, 0.0);
//!
//! let result = calculate(&input, &EngineSettings::default()).unwrap();
//! let base = result.base().unwrap();
//! assert!((base.total_vertical_stress - 96.0).abs() < 1e-9);
//! assert!((base.pore_pressure - 30.0).abs() < 1e-9);
//! assert!((base.effective_horizontal_stress - 33.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::equations::geostatic::{
    capillary_suction, effective_horizontal_stress, effective_vertical_stress,
};
use crate::errors::{LayerPosition, SoilResult};
use crate::settings::EngineSettings;
use crate::stresses::integrator::{integrate_layer, LayerSlice, PointKind, RawPoint};
use crate::stresses::layer::StressProfileInput;
use crate::stresses::piezometric::{PiezometricResolver, Piezometry};
use crate::units::round_to;

/// Stress state at one depth.
///
/// ## JSON Example
///
/// ```json
/// {
///   "depth": 5.0,
///   "total_vertical_stress": 96.0,
///   "pore_pressure": 30.0,
///   "effective_vertical_stress": 66.0,
///   "effective_horizontal_stress": 33.0,
///   "layer_index": 0,
///   "kind": "LayerBase"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressPoint {
    /// Depth below the surface (m)
    pub depth: f64,
    /// Total vertical stress σv (kPa)
    pub total_vertical_stress: f64,
    /// Pore pressure u (kPa), negative inside a capillary fringe
    pub pore_pressure: f64,
    /// Effective vertical stress σ'v (kPa), never negative
    pub effective_vertical_stress: f64,
    /// Effective horizontal stress σ'h = K₀·σ'v (kPa)
    pub effective_horizontal_stress: f64,
    /// Layer whose K₀ was applied
    pub layer_index: usize,
    pub kind: PointKind,
}

impl StressPoint {
    fn rounded(&self, decimals: u32) -> Self {
        StressPoint {
            depth: round_to(self.depth, decimals),
            total_vertical_stress: round_to(self.total_vertical_stress, decimals),
            pore_pressure: round_to(self.pore_pressure, decimals),
            effective_vertical_stress: round_to(self.effective_vertical_stress, decimals),
            effective_horizontal_stress: round_to(self.effective_horizontal_stress, decimals),
            ..self.clone()
        }
    }

    fn is_finite(&self) -> bool {
        [
            self.depth,
            self.total_vertical_stress,
            self.pore_pressure,
            self.effective_vertical_stress,
            self.effective_horizontal_stress,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Per-layer summary for drawing the soil column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub index: usize,
    pub z_top: f64,
    pub z_base: f64,
    /// Governing water regime, table depth and capillary height
    pub piezometry: Piezometry,
    pub position: LayerPosition,
    /// Weight used above the table (or throughout when not crossed)
    pub unit_weight_above: f64,
    /// Weight used below the table when the table crosses the layer
    pub unit_weight_below: Option<f64>,
    pub lateral_coefficient: f64,
    pub impermeable: bool,
}

impl LayerSummary {
    fn rounded(&self, decimals: u32) -> Self {
        let piezometry = Piezometry {
            water_table_depth: self.piezometry.water_table_depth.map(|z| round_to(z, decimals)),
            capillary_height: round_to(self.piezometry.capillary_height, decimals),
            ..self.piezometry
        };
        LayerSummary {
            z_top: round_to(self.z_top, decimals),
            z_base: round_to(self.z_base, decimals),
            piezometry,
            ..self.clone()
        }
    }
}

/// Stress profile through the whole soil column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressProfileResult {
    /// Points with strictly increasing depth, starting at the surface
    pub points: Vec<StressPoint>,
    pub layers: Vec<LayerSummary>,
    /// Sum of layer thicknesses (m)
    pub total_depth: f64,
}

impl StressProfileResult {
    /// Surface point (depth 0); `None` when the result holds no points.
    pub fn surface(&self) -> Option<&StressPoint> {
        self.points.first()
    }

    /// Deepest point.
    pub fn base(&self) -> Option<&StressPoint> {
        self.points.last()
    }

    /// Point at `depth`, if one exists within `tolerance`.
    pub fn point_at(&self, depth: f64, tolerance: f64) -> Option<&StressPoint> {
        self.points.iter().find(|p| (p.depth - depth).abs() <= tolerance)
    }

    /// Largest effective vertical stress in the profile (kPa).
    pub fn max_effective_vertical_stress(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.effective_vertical_stress)
            .fold(0.0, f64::max)
    }

    /// Copy with every point and layer depth rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        StressProfileResult {
            points: self.points.iter().map(|p| p.rounded(decimals)).collect(),
            layers: self.layers.iter().map(|l| l.rounded(decimals)).collect(),
            total_depth: round_to(self.total_depth, decimals),
        }
    }

    /// True when no point carries NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(StressPoint::is_finite)
    }
}

/// Pore pressure at the ground surface.
///
/// A table at or above the surface with a capillary height seeds suction
/// `-h_c·γw`; otherwise the surface is at zero pore pressure.
fn surface_pore_pressure(piezometry: &Piezometry, unit_weight_water: f64) -> f64 {
    match piezometry.water_table_depth {
        Some(z_w) if z_w <= 0.0 && piezometry.capillary_height > 0.0 => {
            capillary_suction(piezometry.capillary_height, unit_weight_water)
        }
        _ => 0.0,
    }
}

/// Sort by depth and drop near-duplicates; the first of a cluster is kept.
fn dedupe_by_depth(mut raw: Vec<RawPoint>, tolerance: f64) -> Vec<RawPoint> {
    // stable: for equal depths the earlier-emitted point wins
    raw.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let mut kept: Vec<RawPoint> = Vec::with_capacity(raw.len());
    for point in raw {
        match kept.last() {
            Some(last) if point.depth - last.depth <= tolerance => {}
            _ => kept.push(point),
        }
    }
    kept
}

/// Calculate the geostatic stress profile.
///
/// # Arguments
///
/// * `input` - Soil column and water conditions
/// * `settings` - Tolerances (deduplication ε, clamping, global-table range)
///
/// # Returns
///
/// * `Ok(StressProfileResult)` - Points sorted by depth, deduplicated
/// * `Err(SoilError::Structural)` - No layers
/// * `Err(SoilError::InvalidInput)` - Bad thickness, K₀, γw, ...
/// * `Err(SoilError::MissingUnitWeight)` - A layer lacks a weight its position needs
///
/// Nothing partial is returned on failure.
pub fn calculate(
    input: &StressProfileInput,
    settings: &EngineSettings,
) -> SoilResult<StressProfileResult> {
    settings.validate()?;
    input.validate()?;

    let resolver = PiezometricResolver::new(input, settings);
    let regimes = resolver.resolve_all();
    let perched_tables: Vec<f64> = input
        .layers
        .iter()
        .filter_map(|l| l.local_water_table_depth)
        .collect();
    let unit_weight_water = input.unit_weight_water;

    let mut raw = Vec::with_capacity(3 * input.layers.len() + 1);
    raw.push(RawPoint {
        depth: 0.0,
        total_vertical_stress: 0.0,
        layer_index: 0,
        kind: PointKind::Surface,
    });

    let mut summaries = Vec::with_capacity(input.layers.len());
    let mut z_top = 0.0;
    let mut total_stress = 0.0;

    for (index, (layer, piezometry)) in input.layers.iter().zip(&regimes).enumerate() {
        let slice = LayerSlice {
            index,
            layer,
            z_top,
            piezometry,
        };
        let step = integrate_layer(&slice, total_stress, &perched_tables)?;
        let z_base = slice.z_base();

        total_stress = step.outgoing_total_stress;
        raw.extend(step.points);
        raw.push(RawPoint {
            depth: z_base,
            total_vertical_stress: total_stress,
            layer_index: index,
            kind: PointKind::LayerBase,
        });

        summaries.push(LayerSummary {
            index,
            z_top,
            z_base,
            piezometry: *piezometry,
            position: step.position,
            unit_weight_above: step.unit_weight_above,
            unit_weight_below: step.unit_weight_below,
            lateral_coefficient: layer.lateral_coefficient,
            impermeable: layer.impermeable,
        });
        z_top = z_base;
    }

    let points: Vec<StressPoint> = dedupe_by_depth(raw, settings.depth_tolerance)
        .into_iter()
        .map(|p| {
            let piezometry = &regimes[p.layer_index];
            let pore_pressure = match p.kind {
                PointKind::Surface => surface_pore_pressure(piezometry, unit_weight_water),
                PointKind::WaterTable => 0.0,
                PointKind::CapillaryFringe => {
                    capillary_suction(piezometry.capillary_height, unit_weight_water)
                }
                PointKind::LayerBase | PointKind::PerchedTable => {
                    piezometry.pore_pressure_at(p.depth, unit_weight_water)
                }
            };

            let effective = effective_vertical_stress(
                p.total_vertical_stress,
                pore_pressure,
                settings.clamp_tolerance,
            );
            if let Some(raw_value) = effective.clamped_from {
                warn!(depth = p.depth, raw_value, "negative effective stress clamped to zero");
            }
            let effective_vertical = effective.value.value();
            let k0 = input.layers[p.layer_index].lateral_coefficient;

            StressPoint {
                depth: p.depth,
                total_vertical_stress: p.total_vertical_stress,
                pore_pressure,
                effective_vertical_stress: effective_vertical,
                effective_horizontal_stress: effective_horizontal_stress(effective_vertical, k0),
                layer_index: p.layer_index,
                kind: p.kind,
            }
        })
        .collect();

    info!(
        layers = input.layers.len(),
        points = points.len(),
        total_depth = z_top,
        "geostatic stress profile computed"
    );

    Ok(StressProfileResult {
        points,
        layers: summaries,
        total_depth: z_top,
    })
}
