//! Terminal output: banner, layer column and stress table.

use anyhow::Result;
use serde::Serialize;
use soil_core::stresses::{LayerSummary, PointKind, StressPoint, WaterRegime};

const BANNER: &str = "═══════════════════════════════════════════════════════════════════════";

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kind_label(kind: PointKind) -> &'static str {
    match kind {
        PointKind::Surface => "surface",
        PointKind::LayerBase => "base",
        PointKind::WaterTable => "WT",
        PointKind::CapillaryFringe => "fringe",
        PointKind::PerchedTable => "perched",
    }
}

fn regime_label(layer: &LayerSummary) -> String {
    let table = |z_w: Option<f64>| z_w.map(|z| format!("{:.2} m", z)).unwrap_or_default();
    match layer.piezometry.regime {
        WaterRegime::NoTable => "no table".to_string(),
        WaterRegime::GlobalTable => {
            format!("global WT {}", table(layer.piezometry.water_table_depth))
        }
        WaterRegime::LocalTable { layer: owner } => format!(
            "local WT {} (layer {})",
            table(layer.piezometry.water_table_depth),
            owner + 1
        ),
    }
}

fn format_layer_line(layer: &LayerSummary, name: Option<&str>) -> String {
    let weights = match layer.unit_weight_below {
        Some(below) => format!("γ = {:.2}/{:.2}", layer.unit_weight_above, below),
        None => format!("γ = {:.2}", layer.unit_weight_above),
    };
    let mut line = format!(
        "  {:>2}. {:>6.2} - {:>6.2} m  {:<16} K0 = {:.2}  {}",
        layer.index + 1,
        layer.z_top,
        layer.z_base,
        weights,
        layer.lateral_coefficient,
        regime_label(layer)
    );
    if layer.piezometry.capillary_height > 0.0 {
        line.push_str(&format!(", hc = {:.2} m", layer.piezometry.capillary_height));
    }
    if layer.impermeable {
        line.push_str(", impermeable");
    }
    if let Some(name) = name {
        line.push_str(&format!("  [{}]", name));
    }
    line
}

fn format_point_row(point: &StressPoint) -> String {
    format!(
        "  {:>8.3} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>6} {:>9}",
        point.depth,
        point.total_vertical_stress,
        point.pore_pressure,
        point.effective_vertical_stress,
        point.effective_horizontal_stress,
        point.layer_index + 1,
        kind_label(point.kind)
    )
}

/// Print a computed profile as a layer list followed by the stress table.
pub fn print_profile(
    title: &str,
    points: &[StressPoint],
    layers: &[LayerSummary],
    names: Option<&[&str]>,
) {
    println!("{}", BANNER);
    println!("  {}", title);
    println!("{}", BANNER);
    println!();

    println!("Layers:");
    for layer in layers {
        let name = names.and_then(|n| n.get(layer.index).copied());
        println!("{}", format_layer_line(layer, name));
    }
    println!();

    println!(
        "  {:>8} {:>10} {:>10} {:>10} {:>10} {:>6} {:>9}",
        "z (m)", "σv (kPa)", "u (kPa)", "σ'v (kPa)", "σ'h (kPa)", "layer", "point"
    );
    println!("  {}", "─".repeat(69));
    for point in points {
        println!("{}", format_point_row(point));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use soil_core::presets;
    use soil_core::settings::EngineSettings;
    use soil_core::stresses::calculate;

    fn result_for(name: &str) -> soil_core::stresses::StressProfileResult {
        let preset = presets::find(name).unwrap();
        calculate(&preset.input, &EngineSettings::default()).unwrap()
    }

    #[test]
    fn test_point_row_contains_values() {
        let result = result_for("sand-over-clay");
        let row = format_point_row(result.base().unwrap());
        assert!(row.contains("10.000"), "{}", row);
        assert!(row.contains("184.50"), "{}", row);
        assert!(row.contains("base"), "{}", row);
    }

    #[test]
    fn test_layer_line_describes_regime() {
        let result = result_for("separated-aquifers");
        let line = format_layer_line(&result.layers[0], Some("Fine sand"));
        assert!(line.contains("local WT 2.00 m (layer 1)"), "{}", line);
        assert!(line.contains("hc = 0.50 m"), "{}", line);
        assert!(line.contains("[Fine sand]"), "{}", line);

        let line = format_layer_line(&result.layers[1], None);
        assert!(line.contains("no table"), "{}", line);
        assert!(line.contains("impermeable"), "{}", line);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(kind_label(PointKind::WaterTable), "WT");
        assert_eq!(kind_label(PointKind::CapillaryFringe), "fringe");
    }
}
