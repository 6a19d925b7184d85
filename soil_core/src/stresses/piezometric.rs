//! # Piezometric Resolver
//!
//! Decides, once per layer, which water table governs its pore pressure.
//! The answer is a [`Piezometry`]: a tagged [`WaterRegime`] plus the table
//! depth and capillary height that go with it.
//!
//! ## Precedence
//!
//! 1. Impermeable layer without its own table → no table.
//! 2. Layer with its own (local) table → that table and its capillary height.
//! 3. No layer anywhere defines a local table and the global table is in a
//!    sane range → the global table.
//! 4. Mixed profile: search upward for the nearest local table. An
//!    impermeable layer without a table stops the search (no table). If the
//!    search runs out, fall back to the global table unless a blocking layer
//!    sits between the global table and this layer.
//!
//! A pressure signal only travels through connected permeable strata, so an
//! impermeable layer without a perched table acts as a no-flow boundary.

use serde::{Deserialize, Serialize};

use crate::equations::geostatic::{capillary_fringe_start, pore_pressure};
use crate::settings::EngineSettings;
use crate::stresses::layer::StressProfileInput;

/// Which hydraulic boundary condition applies to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "regime")]
pub enum WaterRegime {
    /// No governing table; pore pressure is zero throughout the layer
    NoTable,
    /// The profile-wide water table
    GlobalTable,
    /// The local table defined on layer `layer` (zero-based)
    LocalTable { layer: usize },
}

/// Resolved water conditions for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piezometry {
    #[serde(flatten)]
    pub regime: WaterRegime,
    /// Depth of the governing table (m), `None` for [`WaterRegime::NoTable`]
    pub water_table_depth: Option<f64>,
    /// Capillary fringe height above the governing table (m)
    pub capillary_height: f64,
}

impl Piezometry {
    /// No governing table.
    pub fn dry() -> Self {
        Piezometry {
            regime: WaterRegime::NoTable,
            water_table_depth: None,
            capillary_height: 0.0,
        }
    }

    /// Pore pressure at `depth` under this regime (hydrostatic below the
    /// table, suction inside the fringe, zero elsewhere).
    pub fn pore_pressure_at(&self, depth: f64, unit_weight_water: f64) -> f64 {
        pore_pressure(depth, self.water_table_depth, self.capillary_height, unit_weight_water)
    }

    /// Depth where the capillary fringe starts, if there is one.
    pub fn fringe_start(&self) -> Option<f64> {
        self.water_table_depth
            .and_then(|z_w| capillary_fringe_start(z_w, self.capillary_height))
    }
}

/// Resolves the governing water table of each layer of a profile.
///
/// Resolution depends only on the input, never on traversal state, so
/// layers can be resolved in any order.
#[derive(Debug)]
pub struct PiezometricResolver<'a> {
    input: &'a StressProfileInput,
    bounds: Vec<(f64, f64)>,
    has_local_tables: bool,
    global_table: Option<f64>,
}

impl<'a> PiezometricResolver<'a> {
    pub fn new(input: &'a StressProfileInput, settings: &EngineSettings) -> Self {
        let total_depth = input.total_depth();
        let max_depth = total_depth * settings.global_table_range_factor;
        let global_table = input
            .global_water_table_depth
            .filter(|&z_w| (0.0..=max_depth).contains(&z_w));

        PiezometricResolver {
            input,
            bounds: input.layer_bounds(),
            has_local_tables: input.has_local_tables(),
            global_table,
        }
    }

    /// Global table depth if it is within the sane range.
    pub fn global_table(&self) -> Option<f64> {
        self.global_table
    }

    /// Resolve the governing table for layer `index`.
    pub fn resolve(&self, index: usize) -> Piezometry {
        let Some(layer) = self.input.layers.get(index) else {
            return Piezometry::dry();
        };

        if layer.blocks_flow() {
            return Piezometry::dry();
        }
        if layer.local_water_table_depth.is_some() {
            return self.local(index);
        }
        if !self.has_local_tables {
            return self.global();
        }

        for j in (0..index).rev() {
            let above = &self.input.layers[j];
            if above.local_water_table_depth.is_some() {
                return self.local(j);
            }
            if above.blocks_flow() {
                return Piezometry::dry();
            }
        }

        match self.global_table {
            Some(z_w) if !self.blocked_between(index, z_w) => self.global(),
            _ => Piezometry::dry(),
        }
    }

    /// Resolve every layer, in order.
    pub fn resolve_all(&self) -> Vec<Piezometry> {
        (0..self.input.layers.len()).map(|i| self.resolve(i)).collect()
    }

    fn global(&self) -> Piezometry {
        match self.global_table {
            Some(z_w) => Piezometry {
                regime: WaterRegime::GlobalTable,
                water_table_depth: Some(z_w),
                capillary_height: self.input.global_capillary_height,
            },
            None => Piezometry::dry(),
        }
    }

    fn local(&self, owner: usize) -> Piezometry {
        let layer = &self.input.layers[owner];
        Piezometry {
            regime: WaterRegime::LocalTable { layer: owner },
            water_table_depth: layer.local_water_table_depth,
            capillary_height: layer.local_capillary_height.unwrap_or(0.0),
        }
    }

    /// True if a flow-blocking layer other than `index` occupies depths
    /// between the table at `z_w` and layer `index`.
    fn blocked_between(&self, index: usize, z_w: f64) -> bool {
        let (top, base) = self.bounds[index];
        let (gap_top, gap_base) = if z_w <= top {
            (z_w, top)
        } else if z_w >= base {
            (base, z_w)
        } else {
            return false;
        };

        self.input
            .layers
            .iter()
            .zip(&self.bounds)
            .enumerate()
            .any(|(j, (layer, &(z_top, z_base)))| {
                j != index && layer.blocks_flow() && z_top < gap_base && z_base > gap_top
            })
    }
}
