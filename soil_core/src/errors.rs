//! # Error Types
//!
//! Structured error types for soil_core. Each variant carries enough context
//! for a client to point at the offending layer or field without parsing
//! the message text.
//!
//! ## Example
//!
//! ```rust
//! use soil_core::errors::{SoilError, SoilResult};
//!
//! fn validate_thickness(thickness: f64) -> SoilResult<()> {
//!     if thickness <= 0.0 {
//!         return Err(SoilError::invalid_input(
//!             "thickness",
//!             thickness.to_string(),
//!             "Layer thickness must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_thickness(-1.0).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for soil_core operations
pub type SoilResult<T> = Result<T, SoilError>;

/// Which unit weight a layer was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitWeightKind {
    /// Natural (moist) unit weight, used above the water table
    Natural,
    /// Saturated unit weight, used below the water table
    Saturated,
    /// Neither weight was given and the layer has no governing table
    Either,
}

impl fmt::Display for UnitWeightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitWeightKind::Natural => write!(f, "natural unit weight (γnat)"),
            UnitWeightKind::Saturated => write!(f, "saturated unit weight (γsat)"),
            UnitWeightKind::Either => write!(f, "unit weight (γnat or γsat)"),
        }
    }
}

/// Position of a layer relative to its governing water table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerPosition {
    /// No table governs the layer
    NoTable,
    /// Layer lies entirely above the table
    AboveTable,
    /// Layer lies entirely below the table
    BelowTable,
    /// The table crosses the layer
    CrossedByTable,
}

impl fmt::Display for LayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerPosition::NoTable => write!(f, "has no governing water table"),
            LayerPosition::AboveTable => write!(f, "lies above the water table"),
            LayerPosition::BelowTable => write!(f, "lies below the water table"),
            LayerPosition::CrossedByTable => write!(f, "is crossed by the water table"),
        }
    }
}

/// Structured error type for stress-profile operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SoilError {
    /// The profile itself is malformed (e.g. no layers)
    #[error("Invalid profile structure: {reason}")]
    Structural { reason: String },

    /// A layer lacks the unit weight its position requires.
    ///
    /// `layer_index` is zero-based; the message reports the 1-based layer number.
    #[error("Layer {} {position}: {weight} is not defined", .layer_index + 1)]
    MissingUnitWeight {
        layer_index: usize,
        weight: UnitWeightKind,
        position: LayerPosition,
    },

    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Unexpected computation fault. Only the fault kind is kept.
    #[error("Internal server error: {kind}")]
    Internal { kind: String },
}

impl SoilError {
    /// Create a Structural error
    pub fn structural(reason: impl Into<String>) -> Self {
        SoilError::Structural {
            reason: reason.into(),
        }
    }

    /// Create a MissingUnitWeight error
    pub fn missing_unit_weight(
        layer_index: usize,
        weight: UnitWeightKind,
        position: LayerPosition,
    ) -> Self {
        SoilError::MissingUnitWeight {
            layer_index,
            weight,
            position,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SoilError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SoilError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error from a fault kind name
    pub fn internal(kind: impl Into<String>) -> Self {
        SoilError::Internal { kind: kind.into() }
    }

    /// True when the caller supplied something the engine cannot compute (HTTP 400 class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SoilError::Structural { .. }
                | SoilError::MissingUnitWeight { .. }
                | SoilError::InvalidInput { .. }
                | SoilError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SoilError::Structural { .. } => "STRUCTURAL_ERROR",
            SoilError::MissingUnitWeight { .. } => "MISSING_UNIT_WEIGHT",
            SoilError::InvalidInput { .. } => "INVALID_INPUT",
            SoilError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SoilError::FileError { .. } => "FILE_ERROR",
            SoilError::VersionMismatch { .. } => "VERSION_MISMATCH",
            SoilError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Variant name, the only detail disclosed for internal faults.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SoilError::Structural { .. } => "Structural",
            SoilError::MissingUnitWeight { .. } => "MissingUnitWeight",
            SoilError::InvalidInput { .. } => "InvalidInput",
            SoilError::SerializationError { .. } => "SerializationError",
            SoilError::FileError { .. } => "FileError",
            SoilError::VersionMismatch { .. } => "VersionMismatch",
            SoilError::Internal { .. } => "Internal",
        }
    }
}

impl From<serde_json::Error> for SoilError {
    fn from(e: serde_json::Error) -> Self {
        SoilError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error =
            SoilError::missing_unit_weight(2, UnitWeightKind::Saturated, LayerPosition::BelowTable);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MissingUnitWeight"));
        let roundtrip: SoilError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_missing_weight_message_names_layer_and_weight() {
        let error = SoilError::missing_unit_weight(
            0,
            UnitWeightKind::Natural,
            LayerPosition::CrossedByTable,
        );
        let msg = error.to_string();
        assert!(msg.starts_with("Layer 1 is crossed by the water table"));
        assert!(msg.contains("γnat"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SoilError::structural("no layers").error_code(), "STRUCTURAL_ERROR");
        assert_eq!(SoilError::internal("Panic").error_code(), "INTERNAL_ERROR");
        assert_eq!(SoilError::internal("Panic").to_string(), "Internal server error: Panic");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(SoilError::structural("empty").is_client_error());
        assert!(SoilError::invalid_input("thickness", "0", "must be positive").is_client_error());
        assert!(!SoilError::internal("NonFiniteResult").is_client_error());
        assert!(!SoilError::file_error("open", "a.stm", "missing").is_client_error());
    }
}
