//! # soil_core - Geostatic Stress Engine
//!
//! `soil_core` computes the in-situ stress state of a stratified soil column:
//! total vertical stress, pore pressure, effective vertical stress and
//! effective horizontal stress at every depth where something changes.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: [`stresses::calculate`] is a pure function of its input
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Logging via `tracing`**: the library emits events, the binary picks the subscriber
//!
//! ## Quick Start
//!
//! ```rust
//! use soil_core::settings::EngineSettings;
//! use soil_core::stresses::{calculate, SoilLayer, StressProfileInput};
//!
//! let input = StressProfileInput::new(vec![
//!     SoilLayer::with_weights(3.0, Some(17.0), Some(19.0)),
//!     SoilLayer::with_weights(4.0, None, Some(20.0)).lateral(0.6),
//! ])
//! .with_water_table(2.0, 0.5);
//!
//! let result = calculate(&input, &EngineSettings::default()).unwrap();
//! for point in &result.points {
//!     println!("{:>6.2} m  σ'v = {:.1} kPa", point.depth, point.effective_vertical_stress);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`stresses`] - Layer model, water-table resolution, integration, profile assembly
//! - [`equations`] - Closed-form geostatic relations
//! - [`api`] - Request/response boundary with status codes and memoization
//! - [`cache`] - LRU memo of computed profiles
//! - [`presets`] - Built-in example profiles
//! - [`project`] - Saved profiles for a job
//! - [`file_io`] - Project files with atomic saves
//! - [`settings`] - Engine tolerances
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod api;
pub mod cache;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod presets;
pub mod project;
pub mod settings;
pub mod stresses;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use api::{
    handle, handle_cached, handle_json, ApiReply, StressProfileRequest, StressProfileResponse,
};
pub use errors::{SoilError, SoilResult};
pub use file_io::{load_project, save_project};
pub use project::{Project, ProjectMetadata, SavedProfile};
pub use settings::EngineSettings;
pub use stresses::{calculate, SoilLayer, StressPoint, StressProfileInput, StressProfileResult};
