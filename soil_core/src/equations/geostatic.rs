//! # Geostatic Stress Formulas
//!
//! Closed-form relations evaluated on a single depth interval. The profile
//! assembler chains them layer by layer; nothing here iterates.
//!
//! ## Notation
//!
//! - `z` = Depth below the ground surface (m, positive downward)
//! - `z_w` = Depth of the governing water table (m)
//! - `h_c` = Capillary fringe height above the table (m)
//! - `γ` = Unit weight of the soil (kN/m³)
//! - `γw` = Unit weight of water (kN/m³)
//! - `σv` = Total vertical stress (kPa)
//! - `u` = Pore pressure (kPa)
//! - `σ'v`, `σ'h` = Effective vertical / horizontal stress (kPa)
//! - `K₀` = Lateral earth pressure coefficient at rest
//!
//! ## Sign Conventions
//!
//! - **Depth**: Positive downward from the ground surface
//! - **Pore pressure**: Positive below the table, negative (suction) in the capillary fringe

use crate::units::{KiloPascals, KnPerM3, Meters};

/// Weight of a soil slice per unit area.
///
/// # Formula
/// Δσv = γ × Δz
///
/// # Example
/// ```rust
/// use soil_core::equations::geostatic::slice_weight;
///
/// let dsigma = slice_weight(18.0, 2.0);
/// assert!((dsigma - 36.0).abs() < 1e-12);
/// ```
#[inline]
pub fn slice_weight(unit_weight: f64, thickness: f64) -> f64 {
    (KnPerM3(unit_weight) * Meters(thickness)).value()
}

/// Hydrostatic pore pressure with a capillary fringe.
///
/// ```text
///   z = z_w - h_c  ──────  u = -h_c·γw   (fringe start)
///                   ░░░░   u = (z - z_w)·γw  < 0
///   z = z_w        ══════  u = 0
///                   ~~~~   u = (z - z_w)·γw  > 0
/// ```
///
/// # Formula
/// - z ≥ z_w: u = (z − z_w)·γw
/// - z_w − z ≤ h_c: u = (z − z_w)·γw (suction)
/// - otherwise: u = 0
///
/// `None` for the table means no governing table, so u = 0.
///
/// # Example
/// ```rust
/// use soil_core::equations::geostatic::pore_pressure;
///
/// assert_eq!(pore_pressure(5.0, Some(2.0), 0.0, 10.0), 30.0);
/// assert_eq!(pore_pressure(1.5, Some(2.0), 1.0, 10.0), -5.0);
/// assert_eq!(pore_pressure(0.5, Some(2.0), 1.0, 10.0), 0.0);
/// assert_eq!(pore_pressure(9.0, None, 1.0, 10.0), 0.0);
/// ```
pub fn pore_pressure(
    depth: f64,
    table_depth: Option<f64>,
    capillary_height: f64,
    unit_weight_water: f64,
) -> f64 {
    let Some(z_w) = table_depth else {
        return 0.0;
    };
    let head = depth - z_w;
    if head >= 0.0 || -head <= capillary_height {
        (Meters(head) * KnPerM3(unit_weight_water)).value()
    } else {
        0.0
    }
}

/// Depth at which the capillary fringe starts, clipped at the surface.
///
/// Returns `None` when there is no fringe (h_c ≤ 0).
///
/// # Formula
/// z_c = max(0, z_w − h_c)
#[inline]
pub fn capillary_fringe_start(table_depth: f64, capillary_height: f64) -> Option<f64> {
    if capillary_height > 0.0 {
        Some((table_depth - capillary_height).max(0.0))
    } else {
        None
    }
}

/// Suction at the top of a capillary fringe.
///
/// # Formula
/// u = −h_c·γw
#[inline]
pub fn capillary_suction(capillary_height: f64, unit_weight_water: f64) -> f64 {
    -(Meters(capillary_height) * KnPerM3(unit_weight_water)).value()
}

/// Outcome of the effective stress evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStress {
    /// σ'v after clamping (never negative)
    pub value: KiloPascals,
    /// Raw σv − u when it fell below `-clamp_tolerance`, for diagnostics
    pub clamped_from: Option<f64>,
}

/// Terzaghi effective stress, clamped at zero.
///
/// # Formula
/// σ'v = max(0, σv − u)
///
/// Values in `[-clamp_tolerance, 0)` are numerical noise and are zeroed
/// silently. Anything lower is zeroed too but reported in `clamped_from`.
///
/// # Example
/// ```rust
/// use soil_core::equations::geostatic::effective_vertical_stress;
///
/// let s = effective_vertical_stress(96.0, 30.0, 1e-9);
/// assert_eq!(s.value.0, 66.0);
/// assert!(s.clamped_from.is_none());
///
/// let s = effective_vertical_stress(10.0, 25.0, 1e-9);
/// assert_eq!(s.value.0, 0.0);
/// assert_eq!(s.clamped_from, Some(-15.0));
/// ```
pub fn effective_vertical_stress(total: f64, pore: f64, clamp_tolerance: f64) -> EffectiveStress {
    let raw = total - pore;
    if raw >= 0.0 {
        EffectiveStress {
            value: KiloPascals(raw),
            clamped_from: None,
        }
    } else {
        EffectiveStress {
            value: KiloPascals(0.0),
            clamped_from: (raw < -clamp_tolerance).then_some(raw),
        }
    }
}

/// At-rest effective horizontal stress.
///
/// # Formula
/// σ'h = K₀ × σ'v
#[inline]
pub fn effective_horizontal_stress(effective_vertical: f64, k0: f64) -> f64 {
    (KiloPascals(effective_vertical) * k0).value()
}
