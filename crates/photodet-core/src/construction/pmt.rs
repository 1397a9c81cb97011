//! Photomultiplier test-stand geometry.
//!
//! ```text
//! World (box, 1.2 x envelope, G4_Galactic)
//! └── Envelope (box, 20 x 20 x 20 cm, G4_Galactic)
//!     ├── Tube (tube, r = 9.3 mm, L = 88 mm, at z = +44 mm)
//!     │   └── Photocathode (disk, r = 7.5 mm, 40 nm CsK2Sb, optional)
//!     └── extra volumes from the configuration
//! ```

use photodet_geometry::primitives::{Cuboid, Tube};
use photodet_geometry::units::{DEG, G_PER_CM3, G_PER_MOLE};
use photodet_geometry::{Geometry, PlacementId, Shape, Transform, MAX_OVERLAP_RESOLUTION};
use photodet_materials::{Element, MaterialBuilder, MaterialTable, NistDatabase};

use super::{ConstructionError, Detector, DetectorConstruction};
use crate::config::{DetectorConfig, VolumeConfig};

pub const WORLD: &str = "World";
pub const ENVELOPE: &str = "Envelope";
pub const TUBE: &str = "Tube";
pub const PHOTOCATHODE: &str = "Photocathode";
/// Name of the bialkali photocathode material.
pub const BIALKALI: &str = "CsK2Sb";

fn box_shape(full_x: f64, full_y: f64, full_z: f64) -> Shape {
    Shape::Box(Cuboid {
        half_extents: [0.5 * full_x, 0.5 * full_y, 0.5 * full_z],
    })
}

fn disk_shape(radius: f64, half_z: f64) -> Shape {
    Shape::Tube(Tube {
        rmin: 0.0,
        rmax: radius,
        half_z,
        start_phi: 0.0,
        delta_phi: 360.0 * DEG,
    })
}

/// Builds the PMT test stand from a [`DetectorConfig`].
#[derive(Debug, Clone, Default)]
pub struct PmtConstruction {
    pub config: DetectorConfig,
    database: NistDatabase,
}

impl PmtConstruction {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            database: NistDatabase::new(),
        }
    }

    fn validate_config(&self) -> Result<(), ConstructionError> {
        let c = &self.config;
        if !c.world_margin.is_finite() || c.world_margin < 1.0 {
            return Err(ConstructionError::InvalidConfig(format!(
                "world margin must be >= 1 so the world encloses the envelope, got {}",
                c.world_margin
            )));
        }
        if c.overlap_resolution == 0 || c.overlap_resolution > MAX_OVERLAP_RESOLUTION {
            return Err(ConstructionError::InvalidConfig(format!(
                "overlap resolution must be in 1..={MAX_OVERLAP_RESOLUTION}, got {}",
                c.overlap_resolution
            )));
        }
        Ok(())
    }

    /// Every material name the geometry will refer to.
    fn referenced_materials(&self) -> Vec<&str> {
        let c = &self.config;
        let mut names = vec![c.world_material.as_str(), c.tube.material.as_str()];
        if c.photocathode.enabled {
            names.push(c.photocathode.material.as_str());
        }
        names.extend(c.extra_volumes.iter().map(|v| v.material.as_str()));
        names
    }

    /// The single placement an extra volume names as its parent.
    fn resolve_parent(
        geometry: &Geometry,
        extra: &VolumeConfig,
    ) -> Result<PlacementId, ConstructionError> {
        let mut matches = geometry
            .placements()
            .filter(|(_, p)| {
                p.name == extra.parent && extra.parent_copy_no.map_or(true, |n| p.copy_no == n)
            })
            .map(|(id, _)| id);
        let parent_label = match extra.parent_copy_no {
            Some(n) => format!("'{}' #{n}", extra.parent),
            None => format!("'{}'", extra.parent),
        };
        let first = matches.next().ok_or_else(|| {
            ConstructionError::InvalidConfig(format!(
                "unknown parent {parent_label} for volume '{}'",
                extra.name
            ))
        })?;
        if matches.next().is_some() {
            return Err(ConstructionError::InvalidConfig(format!(
                "parent {parent_label} of volume '{}' is ambiguous: several placements match, \
                 set parent_copy_no",
                extra.name
            )));
        }
        Ok(first)
    }

    fn place_extra_volumes(
        &self,
        geometry: &mut Geometry,
        materials: &MaterialTable,
    ) -> Result<(), ConstructionError> {
        for extra in &self.config.extra_volumes {
            let parent = Self::resolve_parent(geometry, extra)?;
            let material = materials.id(&extra.material)?;
            let logical = match geometry.find_logical(&extra.name) {
                Some(existing) => {
                    let lv = geometry.logical(existing)?;
                    if lv.shape != extra.shape || lv.material != material {
                        return Err(ConstructionError::InvalidConfig(format!(
                            "volume '{}' redeclared with a different shape or material",
                            extra.name
                        )));
                    }
                    existing
                }
                None => geometry.add_logical(extra.name.as_str(), extra.shape.clone(), material)?,
            };
            let [rx, ry, rz] = extra.rotation_deg;
            let [x, y, z] = extra.position;
            let transform = Transform::from_euler(rx * DEG, ry * DEG, rz * DEG, x, y, z);
            geometry.place(
                extra.name.as_str(),
                logical,
                transform,
                parent,
                extra.copy_no,
                self.config.check_overlaps,
            )?;
        }
        Ok(())
    }
}

impl DetectorConstruction for PmtConstruction {
    fn define_materials(&self, materials: &mut MaterialTable) -> Result<(), ConstructionError> {
        let cs = Element::new("caesium", "Cs", 55, 132.90543 * G_PER_MOLE)?;
        let k = Element::new("kalium", "K", 19, 39.0983 * G_PER_MOLE)?;
        let sb = Element::new("antimony", "Sb", 51, 121.760 * G_PER_MOLE)?;
        materials.register_element(cs.clone())?;
        materials.register_element(k.clone())?;
        materials.register_element(sb.clone())?;

        materials.find_or_build(&self.database, "G4_Galactic")?;
        materials.find_or_build(&self.database, "G4_AIR")?;

        let bialkali = MaterialBuilder::new(BIALKALI, 1.7295 * G_PER_CM3, 3)
            .add_element_atoms(&cs, 1)
            .add_element_atoms(&k, 2)
            .add_element_atoms(&sb, 1)
            .build()?;
        materials.add_material(bialkali)?;

        for name in self.referenced_materials() {
            materials.find_or_build(&self.database, name)?;
        }

        log::info!("\n{materials}");
        Ok(())
    }

    fn construct(&self, materials: &mut MaterialTable) -> Result<Detector, ConstructionError> {
        self.validate_config()?;
        self.define_materials(materials)?;

        let c = &self.config;
        let check = c.check_overlaps;
        let vacuum = materials.id(&c.world_material)?;
        let mut geometry = Geometry::new().with_overlap_resolution(c.overlap_resolution);

        // World
        let world_lv = geometry.add_logical(
            WORLD,
            box_shape(c.world_xy(), c.world_xy(), c.world_z()),
            vacuum,
        )?;
        let world = geometry.place_world(WORLD, world_lv)?;

        // Envelope
        let envelope_lv = geometry.add_logical(
            ENVELOPE,
            box_shape(c.envelope_xy, c.envelope_xy, c.envelope_z),
            vacuum,
        )?;
        let envelope =
            geometry.place(ENVELOPE, envelope_lv, Transform::default(), world, 0, check)?;

        // Vacuum tube
        let tube_lv = geometry.add_logical(
            TUBE,
            disk_shape(c.tube.outer_radius, c.tube.half_length),
            materials.id(&c.tube.material)?,
        )?;
        let [x, y, z] = c.tube.position;
        let tube = geometry.place(
            TUBE,
            tube_lv,
            Transform::translation(x, y, z),
            envelope,
            0,
            check,
        )?;

        // Photocathode, flush with the tube's +z end cap
        if c.photocathode.enabled {
            let pc = &c.photocathode;
            let pc_lv = geometry.add_logical(
                PHOTOCATHODE,
                disk_shape(pc.radius, pc.half_thickness),
                materials.id(&pc.material)?,
            )?;
            geometry.place(
                PHOTOCATHODE,
                pc_lv,
                Transform::translation(0.0, 0.0, c.tube.half_length - pc.half_thickness),
                tube,
                0,
                check,
            )?;
        }

        self.place_extra_volumes(&mut geometry, materials)?;

        materials.freeze();
        log::info!(
            "constructed detector: {} logical volumes, {} placements",
            geometry.logicals().count(),
            geometry.len()
        );
        log::debug!("placement tree:\n{geometry}");
        Detector::new(geometry)
    }
}
