//! # Soil Mechanics Equations
//!
//! Fundamental closed-form relations used by the calculation modules. Keeping
//! them in one place makes them easy to check against a textbook and keeps
//! the sign conventions consistent.
//!
//! ## Modules
//!
//! - [`geostatic`] - In-situ stresses: slice weight, pore pressure, effective stress, K₀
//!
//! ## References
//!
//! - Terzaghi, K. "Theoretical Soil Mechanics" (1943) - principle of effective stress
//! - Das, B. M. "Principles of Geotechnical Engineering", Chapter 9: In Situ Stresses
//! - Jaky, J. (1944) - coefficient of earth pressure at rest

pub mod geostatic;

pub use geostatic::{
    capillary_fringe_start,
    capillary_suction,
    effective_horizontal_stress,
    effective_vertical_stress,
    pore_pressure,
    slice_weight,
    EffectiveStress,
};
