//! # Photodet Geometry
//!
//! Geometry handling for the photodet detector model. This crate provides:
//!
//! - **Solid shapes** ([`primitives`]) — Box, tube, sphere, cone and
//!   trapezoid primitives as a closed sum type.
//! - **Transformations** ([`transform`]) — Rigid rotation + translation
//!   placing a daughter volume in its parent's frame.
//! - **Discretisation** ([`discretise`]) — Interior and surface sample
//!   lattices used by the overlap check.
//! - **Volumes and placements** ([`volume`]) — An arena of logical volumes
//!   and a placement tree rooted at the world volume.
//! - **Overlap checking** ([`overlap`]) — Sibling-intersection and
//!   mother-containment validation at placement time.

pub mod discretise;
pub mod error;
pub mod overlap;
pub mod primitives;
pub mod transform;
pub mod volume;

pub use photodet_materials::units;

pub use error::GeometryError;
pub use primitives::{Inside, Shape, ShapeError};
pub use transform::Transform;
pub use volume::{
    Geometry, LogicalId, LogicalVolume, Placement, PlacementId, PlacementSummary,
    MAX_OVERLAP_RESOLUTION,
};
