//! # Layer Stress Integrator
//!
//! Carries the cumulative total vertical stress through one layer and emits
//! the extra computation points that fall inside it:
//!
//! - the governing water table, where it crosses the layer (u = 0)
//! - the start of the capillary fringe (u = −h_c·γw)
//! - any perched table from the profile that lies inside the layer
//!
//! The layer's own base point is appended by the profile assembler.
//!
//! ```text
//!  z_top  ───────────────  σ_in
//!          γnat
//!  z_c    ─ ─ ─ ─ ─ ─ ─ ─  fringe start
//!          γnat
//!  z_w    ═══════════════  table crossing, σ_in + γnat·(z_w − z_top)
//!          γsat
//!  z_base ───────────────  σ_out
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::geostatic::slice_weight;
use crate::errors::{LayerPosition, SoilError, SoilResult, UnitWeightKind};
use crate::stresses::layer::SoilLayer;
use crate::stresses::piezometric::Piezometry;

/// Why a computation point exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    /// Ground surface (depth 0)
    Surface,
    /// Base of a layer
    LayerBase,
    /// Governing water table crossing a layer
    WaterTable,
    /// Top of a capillary fringe
    CapillaryFringe,
    /// Perched table of another layer passing through this one
    PerchedTable,
}

/// Computation point before pore pressures are evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub depth: f64,
    pub total_vertical_stress: f64,
    /// Layer whose K₀ and water regime apply at this point
    pub layer_index: usize,
    pub kind: PointKind,
}

/// One layer as seen by the integrator.
#[derive(Debug, Clone, Copy)]
pub struct LayerSlice<'a> {
    pub index: usize,
    pub layer: &'a SoilLayer,
    pub z_top: f64,
    pub piezometry: &'a Piezometry,
}

impl LayerSlice<'_> {
    pub fn z_base(&self) -> f64 {
        self.z_top + self.layer.thickness
    }
}

/// Output of [`integrate_layer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerIntegration {
    /// Total vertical stress at the layer base
    pub outgoing_total_stress: f64,
    /// Extra points strictly inside the layer (or at its base for a fringe start)
    pub points: Vec<RawPoint>,
    /// Position of the layer relative to its governing table
    pub position: LayerPosition,
    /// Unit weight above the table (or the single weight used)
    pub unit_weight_above: f64,
    /// Unit weight below the table, when the table crosses the layer
    pub unit_weight_below: Option<f64>,
}

/// How the weight of the layer is distributed with depth.
#[derive(Debug, Clone, Copy)]
enum Column {
    Uniform(f64),
    Split { table: f64, natural: f64, saturated: f64 },
}

impl Column {
    /// Stress added between `z_top` and `depth`.
    fn weight_to(&self, z_top: f64, depth: f64) -> f64 {
        match *self {
            Column::Uniform(gamma) => slice_weight(gamma, depth - z_top),
            Column::Split { table, natural, saturated } => {
                if depth <= table {
                    slice_weight(natural, depth - z_top)
                } else {
                    slice_weight(natural, table - z_top) + slice_weight(saturated, depth - table)
                }
            }
        }
    }
}

/// Pick the unit weights a layer needs given its governing table.
fn column_for(slice: &LayerSlice<'_>) -> SoilResult<(Column, LayerPosition)> {
    let layer = slice.layer;
    let z_top = slice.z_top;
    let z_base = slice.z_base();
    let missing = |weight, position| SoilError::missing_unit_weight(slice.index, weight, position);

    match slice.piezometry.water_table_depth {
        None => {
            let gamma = layer
                .unit_weight_natural
                .or(layer.unit_weight_saturated)
                .ok_or_else(|| missing(UnitWeightKind::Either, LayerPosition::NoTable))?;
            Ok((Column::Uniform(gamma), LayerPosition::NoTable))
        }
        Some(z_w) if z_w >= z_base => {
            let gamma = layer
                .unit_weight_natural
                .ok_or_else(|| missing(UnitWeightKind::Natural, LayerPosition::AboveTable))?;
            Ok((Column::Uniform(gamma), LayerPosition::AboveTable))
        }
        Some(z_w) if z_w <= z_top => {
            let gamma = layer
                .unit_weight_saturated
                .ok_or_else(|| missing(UnitWeightKind::Saturated, LayerPosition::BelowTable))?;
            Ok((Column::Uniform(gamma), LayerPosition::BelowTable))
        }
        Some(z_w) => {
            let natural = layer
                .unit_weight_natural
                .ok_or_else(|| missing(UnitWeightKind::Natural, LayerPosition::CrossedByTable))?;
            let saturated = layer
                .unit_weight_saturated
                .ok_or_else(|| missing(UnitWeightKind::Saturated, LayerPosition::CrossedByTable))?;
            Ok((
                Column::Split {
                    table: z_w,
                    natural,
                    saturated,
                },
                LayerPosition::CrossedByTable,
            ))
        }
    }
}

/// Integrate total vertical stress across one layer.
///
/// # Arguments
///
/// * `slice` - The layer, its top depth and its resolved water regime
/// * `incoming_total_stress` - Total vertical stress at `slice.z_top`
/// * `perched_tables` - Depths of every local table in the profile
///
/// # Returns
///
/// * `Ok(LayerIntegration)` - Stress at the base and the extra points
/// * `Err(SoilError::MissingUnitWeight)` - A weight required by the layer's
///   position relative to its table is absent
pub fn integrate_layer(
    slice: &LayerSlice<'_>,
    incoming_total_stress: f64,
    perched_tables: &[f64],
) -> SoilResult<LayerIntegration> {
    let (column, position) = column_for(slice)?;
    let z_top = slice.z_top;
    let z_base = slice.z_base();
    let total_at = |depth: f64| incoming_total_stress + column.weight_to(z_top, depth);

    let mut points = Vec::new();
    let mut emit = |depth: f64, kind: PointKind| {
        debug!(layer = slice.index, depth, ?kind, "extra computation point");
        points.push(RawPoint {
            depth,
            total_vertical_stress: total_at(depth),
            layer_index: slice.index,
            kind,
        });
    };

    let governing = slice.piezometry.water_table_depth;
    if let Column::Split { table, .. } = column {
        emit(table, PointKind::WaterTable);
    }

    if let Some(z_c) = slice.piezometry.fringe_start() {
        if z_c > z_top && z_c <= z_base {
            emit(z_c, PointKind::CapillaryFringe);
        }
    }

    for &z_p in perched_tables {
        if z_p > z_top && z_p < z_base && governing != Some(z_p) {
            emit(z_p, PointKind::PerchedTable);
        }
    }

    let outgoing_total_stress = total_at(z_base);
    debug!(
        layer = slice.index,
        z_top,
        z_base,
        ?position,
        regime = ?slice.piezometry.regime,
        sigma_in = incoming_total_stress,
        sigma_out = outgoing_total_stress,
        "integrated layer"
    );

    let (unit_weight_above, unit_weight_below) = match column {
        Column::Uniform(gamma) => (gamma, None),
        Column::Split { natural, saturated, .. } => (natural, Some(saturated)),
    };

    Ok(LayerIntegration {
        outgoing_total_stress,
        points,
        position,
        unit_weight_above,
        unit_weight_below,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stresses::piezometric::WaterRegime;

    fn table(depth: f64, capillary_height: f64) -> Piezometry {
        Piezometry {
            regime: WaterRegime::GlobalTable,
            water_table_depth: Some(depth),
            capillary_height,
        }
    }

    fn slice<'a>(layer: &'a SoilLayer, z_top: f64, piezometry: &'a Piezometry) -> LayerSlice<'a> {
        LayerSlice {
            index: 0,
            layer,
            z_top,
            piezometry,
        }
    }

    #[test]
    fn test_dry_layer_uses_natural_then_saturated() {
        let dry = Piezometry::dry();
        let layer = SoilLayer::with_weights(2.0, None, Some(19.0));
        let out = integrate_layer(&slice(&layer, 0.0, &dry), 0.0, &[]).unwrap();
        assert!((out.outgoing_total_stress - 38.0).abs() < 1e-9);
        assert_eq!(out.position, LayerPosition::NoTable);
        assert!(out.points.is_empty());

        let layer = SoilLayer::with_weights(2.0, None, None);
        let err = integrate_layer(&slice(&layer, 0.0, &dry), 0.0, &[]).unwrap_err();
        assert_eq!(
            err,
            SoilError::missing_unit_weight(0, UnitWeightKind::Either, LayerPosition::NoTable)
        );
    }

    #[test]
    fn test_layer_above_table_requires_natural() {
        let p = table(10.0, 0.0);
        let layer = SoilLayer::with_weights(3.0, None, Some(20.0));
        let err = integrate_layer(&slice(&layer, 0.0, &p), 0.0, &[]).unwrap_err();
        assert_eq!(
            err,
            SoilError::missing_unit_weight(0, UnitWeightKind::Natural, LayerPosition::AboveTable)
        );
    }

    #[test]
    fn test_layer_below_table_uses_saturated() {
        let p = table(1.0, 0.0);
        let layer = SoilLayer::with_weights(2.0, None, Some(20.0));
        let out = integrate_layer(&slice(&layer, 3.0, &p), 50.0, &[]).unwrap();
        assert!((out.outgoing_total_stress - 90.0).abs() < 1e-9);
        assert_eq!(out.position, LayerPosition::BelowTable);
        assert_eq!(out.unit_weight_above, 20.0);
    }

    #[test]
    fn test_crossing_table_splits_layer() {
        let p = table(2.0, 0.0);
        let layer = SoilLayer::with_weights(5.0, Some(18.0), Some(20.0));
        let out = integrate_layer(&slice(&layer, 0.0, &p), 0.0, &[]).unwrap();
        assert!((out.outgoing_total_stress - 96.0).abs() < 1e-9);
        assert_eq!(out.points.len(), 1);
        let wt = out.points[0];
        assert_eq!(wt.kind, PointKind::WaterTable);
        assert_eq!(wt.depth, 2.0);
        assert!((wt.total_vertical_stress - 36.0).abs() < 1e-9);
        assert_eq!(out.unit_weight_below, Some(20.0));
    }

    #[test]
    fn test_crossing_table_names_missing_saturated_weight() {
        let p = table(2.0, 0.0);
        let layer = SoilLayer::with_weights(5.0, Some(18.0), None);
        let err = integrate_layer(&slice(&layer, 0.0, &p), 0.0, &[]).unwrap_err();
        assert_eq!(
            err,
            SoilError::missing_unit_weight(
                0,
                UnitWeightKind::Saturated,
                LayerPosition::CrossedByTable,
            )
        );
    }

    #[test]
    fn test_capillary_fringe_point() {
        let p = table(3.0, 1.0);
        let layer = SoilLayer::with_weights(5.0, Some(17.0), Some(20.0));
        let out = integrate_layer(&slice(&layer, 0.0, &p), 0.0, &[]).unwrap();
        let fringe = out
            .points
            .iter()
            .find(|pt| pt.kind == PointKind::CapillaryFringe)
            .unwrap();
        assert_eq!(fringe.depth, 2.0);
        assert!((fringe.total_vertical_stress - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_fringe_at_surface_is_not_emitted() {
        let p = table(0.5, 1.0);
        let layer = SoilLayer::with_weights(2.0, Some(17.0), Some(20.0));
        let out = integrate_layer(&slice(&layer, 0.0, &p), 0.0, &[]).unwrap();
        assert!(out.points.iter().all(|pt| pt.kind != PointKind::CapillaryFringe));
    }

    #[test]
    fn test_fringe_outside_layer_is_not_emitted() {
        let p = table(6.0, 1.0);
        let layer = SoilLayer::with_weights(3.0, Some(17.0), Some(20.0));
        let out = integrate_layer(&slice(&layer, 0.0, &p), 0.0, &[]).unwrap();
        assert!(out.points.is_empty());
    }

    #[test]
    fn test_perched_table_marker() {
        let dry = Piezometry::dry();
        let layer = SoilLayer::new(4.0, 18.0);
        let out = integrate_layer(&slice(&layer, 2.0, &dry), 36.0, &[1.0, 3.5, 6.0]).unwrap();
        assert_eq!(out.points.len(), 1);
        assert_eq!(out.points[0].kind, PointKind::PerchedTable);
        assert_eq!(out.points[0].depth, 3.5);
        assert!((out.points[0].total_vertical_stress - 63.0).abs() < 1e-9);
    }
}
