//! Build parameters of the detector.
//!
//! [`DetectorConfig::default`] holds the fixed constants of the build
//! procedure. All fields are deserialisable so a host can override them,
//! but the core itself never reads files. Lengths are in mm, shape angles
//! in radians, placement rotations in degrees.

use photodet_geometry::primitives::Shape;
use photodet_materials::units::{CM, MM, NM};
use serde::{Deserialize, Serialize};

/// Top-level detector description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Full envelope size in x and y (mm).
    pub envelope_xy: f64,
    /// Full envelope size in z (mm).
    pub envelope_z: f64,
    /// World size as a multiple of the envelope size.
    pub world_margin: f64,
    /// Reference material filling the world and the envelope.
    pub world_material: String,
    /// Check each placement against its mother and siblings.
    pub check_overlaps: bool,
    /// Lattice cells per axis sampled by the overlap check, at most
    /// [`photodet_geometry::MAX_OVERLAP_RESOLUTION`].
    pub overlap_resolution: usize,
    pub tube: TubeConfig,
    pub photocathode: PhotocathodeConfig,
    /// Additional volumes placed after the built-in ones.
    pub extra_volumes: Vec<VolumeConfig>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            envelope_xy: 20.0 * CM,
            envelope_z: 20.0 * CM,
            world_margin: 1.2,
            world_material: "G4_Galactic".into(),
            check_overlaps: true,
            overlap_resolution: 20,
            tube: TubeConfig::default(),
            photocathode: PhotocathodeConfig::default(),
            extra_volumes: Vec::new(),
        }
    }
}

impl DetectorConfig {
    /// Full world size in x and y (mm).
    pub fn world_xy(&self) -> f64 {
        self.world_margin * self.envelope_xy
    }

    /// Full world size in z (mm).
    pub fn world_z(&self) -> f64 {
        self.world_margin * self.envelope_z
    }
}

/// The evacuated PMT tube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeConfig {
    pub outer_radius: f64,
    pub half_length: f64,
    /// Centre of the tube in the envelope frame (mm).
    pub position: [f64; 3],
    pub material: String,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            outer_radius: 18.6 / 2.0 * MM,
            half_length: 88.0 / 2.0 * MM,
            position: [0.0, 0.0, 44.0 * MM],
            material: "G4_Galactic".into(),
        }
    }
}

/// Thin bialkali layer against the +z end cap inside the tube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotocathodeConfig {
    pub enabled: bool,
    pub radius: f64,
    pub half_thickness: f64,
    pub material: String,
}

impl Default for PhotocathodeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 15.0 / 2.0 * MM,
            half_thickness: 40.0 / 2.0 * NM,
            material: "CsK2Sb".into(),
        }
    }
}

/// A user-described volume placed inside an existing placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub name: String,
    pub shape: Shape,
    /// Name of a material in the table or in the reference database.
    pub material: String,
    /// Name of the parent placement.
    #[serde(default = "default_parent")]
    pub parent: String,
    /// Copy number of the parent, required when several placements share
    /// the parent's name.
    #[serde(default)]
    pub parent_copy_no: Option<u32>,
    /// Translation in the parent frame (mm).
    #[serde(default)]
    pub position: [f64; 3],
    /// Rotation about x, y and z (degrees).
    #[serde(default)]
    pub rotation_deg: [f64; 3],
    #[serde(default)]
    pub copy_no: u32,
}

fn default_parent() -> String {
    "Envelope".into()
}
