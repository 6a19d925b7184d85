//! # Unit Types
//!
//! Type-safe wrappers for the geotechnical units used by the engine. They are
//! plain f64 newtypes that serialize as bare numbers.
//!
//! ## SI Units (Primary)
//!
//! - Length / depth: meters (m)
//! - Unit weight: kilonewtons per cubic meter (kN/m³)
//! - Stress / pressure: kilopascals (kPa = kN/m²)
//!
//! Multiplying a unit weight by a thickness yields a stress:
//!
//! ```rust
//! use soil_core::units::{KnPerM3, Meters, KiloPascals};
//!
//! let gamma = KnPerM3(18.0);
//! let thickness = Meters(2.5);
//! let sigma: KiloPascals = gamma * thickness;
//! assert_eq!(sigma.0, 45.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length
// ============================================================================

/// Length or depth in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

// ============================================================================
// Unit Weight
// ============================================================================

/// Unit weight in kN/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM3(pub f64);

// ============================================================================
// Stress
// ============================================================================

/// Stress or pressure in kPa
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

impl Mul<Meters> for KnPerM3 {
    type Output = KiloPascals;
    fn mul(self, rhs: Meters) -> KiloPascals {
        KiloPascals(self.0 * rhs.0)
    }
}

impl Mul<KnPerM3> for Meters {
    type Output = KiloPascals;
    fn mul(self, rhs: KnPerM3) -> KiloPascals {
        KiloPascals(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(KnPerM3);
impl_arithmetic!(KiloPascals);

/// Round to a fixed number of decimal places, normalizing `-0.0` to `0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
