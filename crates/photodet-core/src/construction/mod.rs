//! Detector construction: materials first, then the placement tree.
//!
//! The [`DetectorConstruction`] trait is the call point the host toolkit
//! uses at initialisation. Implementations register their materials in a
//! caller-owned [`MaterialTable`], build the volume hierarchy, and freeze
//! the table. Every failure is fatal; no partially built [`Detector`] is
//! ever returned.

pub mod pmt;

pub use pmt::PmtConstruction;

use photodet_geometry::{Geometry, GeometryError, PlacementId};
use photodet_materials::{MaterialError, MaterialTable};
use thiserror::Error;

/// Errors that abort detector construction.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("Material error: {0}")]
    Material(#[from] MaterialError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A fully built, overlap-validated detector.
///
/// Holds the placement arena and the handle of its world placement.
/// Nothing in it can be mutated after construction.
#[derive(Debug, Clone)]
pub struct Detector {
    geometry: Geometry,
    world: PlacementId,
}

impl Detector {
    pub(crate) fn new(geometry: Geometry) -> Result<Self, ConstructionError> {
        let world = geometry.world()?;
        Ok(Self { geometry, world })
    }

    /// The root placement.
    pub fn world(&self) -> PlacementId {
        self.world
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// First placement with the given name.
    pub fn find(&self, name: &str) -> Option<PlacementId> {
        self.geometry.find(name)
    }
}

/// Builds a detector once at start-up.
pub trait DetectorConstruction {
    /// Register every element and material the geometry will refer to.
    fn define_materials(&self, materials: &mut MaterialTable) -> Result<(), ConstructionError>;

    /// Define materials, build the placement tree, and freeze `materials`.
    fn construct(&self, materials: &mut MaterialTable) -> Result<Detector, ConstructionError>;
}
