//! Detector build runner: construction, diagnostics and export.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use photodet_core::{Detector, DetectorConfig, DetectorConstruction, PmtConstruction};
use photodet_geometry::PlacementSummary;
use photodet_materials::MaterialTable;

/// A built detector together with its frozen material table.
pub struct BuildOutput {
    pub detector: Detector,
    pub materials: MaterialTable,
}

/// Build the detector described by `config`.
pub fn build_detector(config: DetectorConfig) -> Result<BuildOutput> {
    let mut materials = MaterialTable::new();
    let detector = PmtConstruction::new(config)
        .construct(&mut materials)
        .context("detector construction failed")?;
    Ok(BuildOutput {
        detector,
        materials,
    })
}

/// Print the material table and the placement tree to stdout.
pub fn print_report(output: &BuildOutput) -> Result<()> {
    println!("{}", output.materials);
    println!("Placement tree");
    println!("==============");
    print!("{}", output.detector.geometry());
    println!();

    let g = output.detector.geometry();
    for (id, p) in g.placements() {
        let logical = g.logical_of(id)?;
        let material = output
            .materials
            .material(logical.material)
            .map(|m| m.name())
            .unwrap_or("<unknown>");
        let pos = g.world_position(id)?;
        println!(
            "  {:<14} {:<8} {:<16} volume {:>12.4e} mm3  world ({:.6}, {:.6}, {:.6}) mm",
            p.name,
            logical.shape.kind(),
            material,
            logical.shape.cubic_volume(),
            pos[0],
            pos[1],
            pos[2]
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct MaterialEntry<'a> {
    id: usize,
    name: &'a str,
    density_g_per_cm3: f64,
    mass_fractions: Vec<(&'a str, f64)>,
}

#[derive(Serialize)]
struct GeometryExport<'a> {
    materials: Vec<MaterialEntry<'a>>,
    placements: Vec<PlacementSummary>,
}

/// Write materials and placements as JSON.
pub fn write_json(output: &BuildOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let materials = output
        .materials
        .iter()
        .map(|(id, m)| MaterialEntry {
            id: id.index(),
            name: m.name(),
            density_g_per_cm3: m.density(),
            mass_fractions: m
                .components()
                .iter()
                .map(|c| (c.element.symbol(), c.mass_fraction))
                .collect(),
        })
        .collect();
    let export = GeometryExport {
        materials,
        placements: output.detector.geometry().summary()?,
    };

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("geometry written to {}", path.display());
    Ok(())
}
