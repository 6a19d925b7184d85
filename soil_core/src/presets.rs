//! # Example Profiles
//!
//! Ready-made soil columns covering each water-table situation the engine
//! handles. Used by the CLI `example` command and as regression fixtures.
//!
//! ```rust
//! use soil_core::presets;
//! use soil_core::settings::EngineSettings;
//! use soil_core::stresses::calculate;
//!
//! let preset = presets::find("sand-over-clay").unwrap();
//! let result = calculate(&preset.input, &EngineSettings::default()).unwrap();
//! assert_eq!(result.layers.len(), 2);
//! ```

use crate::stresses::{SoilLayer, StressProfileInput};

/// A named example profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Identifier used on the command line
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Display name of each layer, top to bottom
    pub layer_names: Vec<&'static str>,
    pub input: StressProfileInput,
}

fn homogeneous_dry() -> Preset {
    Preset {
        name: "homogeneous-dry",
        title: "Homogeneous dry sand",
        description: "Single 6 m sand layer, no water table",
        layer_names: vec!["Dry sand"],
        input: StressProfileInput::new(vec![SoilLayer::new(6.0, 17.0).lateral(0.4)]),
    }
}

fn sand_over_clay() -> Preset {
    Preset {
        name: "sand-over-clay",
        title: "Sand over clay",
        description: "Medium sand (4 m) over stiff clay (6 m), water table at 3 m",
        layer_names: vec!["Medium sand", "Stiff clay"],
        input: StressProfileInput::new(vec![
            SoilLayer::with_weights(4.0, Some(17.5), Some(19.2)).lateral(0.4),
            SoilLayer::with_weights(6.0, None, Some(18.8)).lateral(0.6),
        ])
        .with_water_table(3.0, 0.0),
    }
}

fn capillary_fringe() -> Preset {
    Preset {
        name: "capillary-fringe",
        title: "Capillary fringe",
        description: "Stratified profile with a 1 m capillary fringe above the water table",
        layer_names: vec!["Medium clay", "Sandy silt", "Dense sand"],
        input: StressProfileInput::new(vec![
            SoilLayer::with_weights(2.5, Some(18.5), Some(20.2)).lateral(0.55),
            SoilLayer::with_weights(3.0, Some(17.8), Some(19.5)),
            SoilLayer::with_weights(4.5, None, Some(19.8)).lateral(0.45),
        ])
        .with_water_table(4.0, 1.0),
    }
}

fn clay_over_sand() -> Preset {
    Preset {
        name: "clay-over-sand",
        title: "Clay over sand",
        description: "Soft clay (3 m) over compact sand (7 m), water table at the interface",
        layer_names: vec!["Soft clay", "Compact sand"],
        input: StressProfileInput::new(vec![
            SoilLayer::with_weights(3.0, Some(16.5), Some(18.5)).lateral(0.6),
            SoilLayer::with_weights(7.0, None, Some(20.2)).lateral(0.35),
        ])
        .with_water_table(3.0, 0.5),
    }
}

fn separated_aquifers() -> Preset {
    Preset {
        name: "separated-aquifers",
        title: "Perched aquifer over clay",
        description: "Unconfined aquifer and confined aquifer separated by an impermeable clay",
        layer_names: vec!["Fine sand (unconfined)", "Impermeable clay", "Coarse sand (confined)"],
        input: StressProfileInput::new(vec![
            SoilLayer::with_weights(3.0, Some(17.0), Some(19.0))
                .lateral(0.4)
                .local_table(2.0, Some(0.5)),
            SoilLayer::with_weights(2.0, Some(19.0), Some(20.5))
                .lateral(0.6)
                .impermeable(),
            SoilLayer::with_weights(5.0, None, Some(20.0))
                .lateral(0.35)
                .local_table(5.0, None),
        ]),
    }
}

fn clay_blanket() -> Preset {
    Preset {
        name: "clay-blanket",
        title: "Impermeable clay blanket",
        description: "Clay layer without its own table inside a sand profile, water table at 4 m",
        layer_names: vec!["Upper sand", "Clay blanket", "Lower sand"],
        input: StressProfileInput::new(vec![
            SoilLayer::with_weights(3.0, Some(17.0), Some(19.0)).lateral(0.4),
            SoilLayer::with_weights(2.0, Some(18.0), Some(19.5))
                .lateral(0.6)
                .impermeable(),
            SoilLayer::with_weights(4.0, Some(19.0), Some(20.0)).lateral(0.4),
        ])
        .with_water_table(4.0, 0.0),
    }
}

fn surface_water_table() -> Preset {
    Preset {
        name: "surface-water-table",
        title: "Water table at the surface",
        description: "Saturated silt over soft clay, saturated from the ground surface",
        layer_names: vec!["Saturated silt", "Soft saturated clay"],
        input: StressProfileInput::new(vec![
            SoilLayer::with_weights(4.0, None, Some(18.5)),
            SoilLayer::with_weights(6.0, None, Some(19.2)).lateral(0.55),
        ])
        .with_water_table(0.0, 0.0),
    }
}

/// Every built-in example, in display order.
pub fn catalog() -> Vec<Preset> {
    vec![
        homogeneous_dry(),
        sand_over_clay(),
        capillary_fringe(),
        clay_over_sand(),
        separated_aquifers(),
        clay_blanket(),
        surface_water_table(),
    ]
}

/// Look up an example by name.
pub fn find(name: &str) -> Option<Preset> {
    catalog().into_iter().find(|p| p.name == name)
}

pub fn names() -> Vec<&'static str> {
    catalog().iter().map(|p| p.name).collect()
}
