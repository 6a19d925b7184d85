//! # Geostatic Stresses
//!
//! In-situ stress profile of a stratified soil column under self-weight.
//!
//! ## Pipeline
//!
//! - [`layer`] - Layer model and request aggregate
//! - [`piezometric`] - Which water table governs each layer
//! - [`integrator`] - Total vertical stress through one layer, extra points
//! - [`profile`] - Assembles, sorts and deduplicates points; effective stresses
//!
//! ## Sign Conventions
//!
//! - Depth is positive downward from the ground surface (m)
//! - Compression is positive (kPa)
//! - Pore pressure is negative (suction) inside a capillary fringe

pub mod integrator;
pub mod layer;
pub mod piezometric;
pub mod profile;

pub use integrator::{integrate_layer, LayerIntegration, LayerSlice, PointKind, RawPoint};
pub use layer::{
    SoilLayer, StressProfileInput, DEFAULT_LATERAL_COEFFICIENT, DEFAULT_UNIT_WEIGHT_WATER,
};
pub use piezometric::{PiezometricResolver, Piezometry, WaterRegime};
pub use profile::{calculate, LayerSummary, StressPoint, StressProfileResult};
