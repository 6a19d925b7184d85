//! Subcommands. Each module exposes an `XArgs` struct and `execute`.

pub mod calc;
pub mod example;
pub mod project;

use soil_core::settings::EngineSettings;

/// Engine settings with an optional deduplication tolerance override.
pub fn settings_with_tolerance(tolerance: Option<f64>) -> EngineSettings {
    match tolerance {
        Some(t) => EngineSettings::default().with_depth_tolerance(t),
        None => EngineSettings::default(),
    }
}
