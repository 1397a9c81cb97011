//! Logical volumes and the placement tree.
//!
//! [`Geometry`] is an arena: logical volumes (shape + material templates)
//! and placements (positioned instances) live in two vectors and refer to
//! each other by index handles. The placement graph is a tree rooted at the
//! single world placement; every other placement names exactly one parent
//! placement and is positioned in that parent's local frame.
//!
//! Build order is materials, shapes, logical volumes, then placements with
//! parents before children. The arena is append-only, so once construction
//! finishes it can be shared read-only for the rest of the run.

use std::fmt;

use photodet_materials::MaterialId;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::overlap;
use crate::primitives::Shape;
use crate::transform::Transform;

/// Default number of lattice cells per axis used by the overlap check.
pub const DEFAULT_OVERLAP_RESOLUTION: usize = 20;

/// Upper bound on the overlap lattice; each check samples about twice
/// `resolution^3` points per shape.
pub const MAX_OVERLAP_RESOLUTION: usize = 100;

/// Handle to a logical volume in a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalId(usize);

/// Handle to a placement in a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacementId(usize);

impl LogicalId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl PlacementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A (shape, material) template with a name and no position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalVolume {
    pub name: String,
    pub shape: Shape,
    pub material: MaterialId,
}

/// A positioned instance of a logical volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub name: String,
    pub logical: LogicalId,
    /// `None` only for the world placement.
    pub parent: Option<PlacementId>,
    /// Local-to-parent transform.
    pub transform: Transform,
    /// Distinguishes repeated placements of one logical volume under one parent.
    pub copy_no: u32,
}

/// Flattened, serialisable view of one placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSummary {
    pub name: String,
    pub copy_no: u32,
    pub logical: String,
    pub shape: Shape,
    pub material: MaterialId,
    pub parent: Option<String>,
    pub depth: usize,
    /// Translation in the parent frame (mm).
    pub local_position: [f64; 3],
    /// Origin in world coordinates (mm).
    pub world_position: [f64; 3],
}

/// Arena of logical volumes and placements.
#[derive(Debug, Clone)]
pub struct Geometry {
    logicals: Vec<LogicalVolume>,
    placements: Vec<Placement>,
    world: Option<PlacementId>,
    overlap_resolution: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    pub fn new() -> Self {
        Self {
            logicals: Vec::new(),
            placements: Vec::new(),
            world: None,
            overlap_resolution: DEFAULT_OVERLAP_RESOLUTION,
        }
    }

    /// Set the number of lattice cells per axis sampled by overlap checks,
    /// clamped to `1..=MAX_OVERLAP_RESOLUTION`.
    pub fn with_overlap_resolution(mut self, resolution: usize) -> Self {
        self.overlap_resolution = resolution.clamp(1, MAX_OVERLAP_RESOLUTION);
        self
    }

    pub fn overlap_resolution(&self) -> usize {
        self.overlap_resolution
    }

    /// Register a logical volume after validating its shape.
    ///
    /// # Errors
    /// [`GeometryError::InvalidShapeParameter`] naming the volume, or
    /// [`GeometryError::DuplicateName`] if the name is taken.
    pub fn add_logical(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        material: MaterialId,
    ) -> Result<LogicalId, GeometryError> {
        let name = name.into();
        shape
            .validate()
            .map_err(|reason| GeometryError::InvalidShapeParameter {
                volume: name.clone(),
                reason,
            })?;
        if self.logicals.iter().any(|l| l.name == name) {
            return Err(GeometryError::DuplicateName(name));
        }
        log::debug!("logical volume '{}' ({})", name, shape.kind());
        self.logicals.push(LogicalVolume {
            name,
            shape,
            material,
        });
        Ok(LogicalId(self.logicals.len() - 1))
    }

    /// Place the world volume: identity transform, no parent.
    pub fn place_world(
        &mut self,
        name: impl Into<String>,
        logical: LogicalId,
    ) -> Result<PlacementId, GeometryError> {
        self.logical(logical)?;
        if let Some(world) = self.world {
            return Err(GeometryError::DuplicateWorld(
                self.placements[world.0].name.clone(),
            ));
        }
        let name = name.into();
        log::debug!("placed world '{}'", name);
        self.placements.push(Placement {
            name,
            logical,
            parent: None,
            transform: Transform::default(),
            copy_no: 0,
        });
        let id = PlacementId(self.placements.len() - 1);
        self.world = Some(id);
        Ok(id)
    }

    /// Place `logical` inside `parent` with the given local-to-parent transform.
    ///
    /// With `check_overlaps` the new placement must stay within its parent
    /// and must not intersect any existing sibling; nothing is added on failure.
    pub fn place(
        &mut self,
        name: impl Into<String>,
        logical: LogicalId,
        transform: Transform,
        parent: PlacementId,
        copy_no: u32,
        check_overlaps: bool,
    ) -> Result<PlacementId, GeometryError> {
        let name = name.into();
        self.logical(logical)?;
        let parent_name = self.placement(parent)?.name.clone();
        if self
            .children(parent)
            .any(|c| self.placements[c.0].name == name && self.placements[c.0].copy_no == copy_no)
        {
            return Err(GeometryError::DuplicatePlacement {
                name,
                copy_no,
                parent: parent_name,
            });
        }

        let candidate = Placement {
            name,
            logical,
            parent: Some(parent),
            transform,
            copy_no,
        };
        if check_overlaps {
            overlap::check_placement(self, &candidate)?;
        }

        let t = candidate.transform.translation;
        log::debug!(
            "placed '{}' #{} in '{}' at ({}, {}, {}) mm",
            candidate.name,
            copy_no,
            parent_name,
            t.x,
            t.y,
            t.z
        );
        self.placements.push(candidate);
        Ok(PlacementId(self.placements.len() - 1))
    }

    /// The world placement.
    pub fn world(&self) -> Result<PlacementId, GeometryError> {
        self.world.ok_or(GeometryError::NoWorld)
    }

    pub fn placement(&self, id: PlacementId) -> Result<&Placement, GeometryError> {
        self.placements
            .get(id.0)
            .ok_or(GeometryError::UnknownPlacement(id.0))
    }

    pub fn logical(&self, id: LogicalId) -> Result<&LogicalVolume, GeometryError> {
        self.logicals
            .get(id.0)
            .ok_or(GeometryError::UnknownLogical(id.0))
    }

    /// Logical volume of a placement.
    pub fn logical_of(&self, id: PlacementId) -> Result<&LogicalVolume, GeometryError> {
        let logical = self.placement(id)?.logical;
        self.logical(logical)
    }

    /// First placement with the given name, in placement order.
    pub fn find(&self, name: &str) -> Option<PlacementId> {
        self.placements
            .iter()
            .position(|p| p.name == name)
            .map(PlacementId)
    }

    /// Logical volume handle by name.
    pub fn find_logical(&self, name: &str) -> Option<LogicalId> {
        self.logicals
            .iter()
            .position(|l| l.name == name)
            .map(LogicalId)
    }

    /// Direct children of `parent`, in placement order.
    pub fn children(&self, parent: PlacementId) -> impl Iterator<Item = PlacementId> + '_ {
        self.placements
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.parent == Some(parent))
            .map(|(i, _)| PlacementId(i))
    }

    pub fn parent(&self, id: PlacementId) -> Result<Option<PlacementId>, GeometryError> {
        Ok(self.placement(id)?.parent)
    }

    /// Local-to-world transform, composed from the leaf up to the root.
    pub fn world_transform(&self, id: PlacementId) -> Result<Transform, GeometryError> {
        let mut placement = self.placement(id)?;
        let mut transform = placement.transform.clone();
        while let Some(parent) = placement.parent {
            placement = self.placement(parent)?;
            transform = transform.then(&placement.transform);
        }
        Ok(transform)
    }

    /// Origin of a placement in world coordinates.
    pub fn world_position(&self, id: PlacementId) -> Result<[f64; 3], GeometryError> {
        Ok(self.world_transform(id)?.apply(&[0.0, 0.0, 0.0]))
    }

    /// Number of ancestors between a placement and the root (world is 0).
    pub fn depth(&self, id: PlacementId) -> Result<usize, GeometryError> {
        let mut depth = 0;
        let mut current = self.placement(id)?;
        while let Some(parent) = current.parent {
            depth += 1;
            current = self.placement(parent)?;
        }
        Ok(depth)
    }

    pub fn placements(&self) -> impl Iterator<Item = (PlacementId, &Placement)> {
        self.placements
            .iter()
            .enumerate()
            .map(|(i, p)| (PlacementId(i), p))
    }

    pub fn logicals(&self) -> impl Iterator<Item = (LogicalId, &LogicalVolume)> {
        self.logicals
            .iter()
            .enumerate()
            .map(|(i, l)| (LogicalId(i), l))
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Flattened description of every placement, in placement order.
    pub fn summary(&self) -> Result<Vec<PlacementSummary>, GeometryError> {
        self.placements()
            .map(|(id, p)| -> Result<PlacementSummary, GeometryError> {
                let logical = self.logical(p.logical)?;
                let parent = match p.parent {
                    Some(parent) => Some(self.placement(parent)?.name.clone()),
                    None => None,
                };
                let t = p.transform.translation;
                Ok(PlacementSummary {
                    name: p.name.clone(),
                    copy_no: p.copy_no,
                    logical: logical.name.clone(),
                    shape: logical.shape.clone(),
                    material: logical.material,
                    parent,
                    depth: self.depth(id)?,
                    local_position: [t.x, t.y, t.z],
                    world_position: self.world_position(id)?,
                })
            })
            .collect()
    }

    fn fmt_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: PlacementId,
        depth: usize,
    ) -> fmt::Result {
        let p = &self.placements[id.0];
        let l = &self.logicals[p.logical.0];
        let t = p.transform.translation;
        writeln!(
            f,
            "{:indent$}{} #{} [{}, material {}] at ({:.4}, {:.4}, {:.4}) mm",
            "",
            p.name,
            p.copy_no,
            l.shape.kind(),
            l.material.index(),
            t.x,
            t.y,
            t.z,
            indent = 2 * depth
        )?;
        let children: Vec<_> = self.children(id).collect();
        for child in children {
            self.fmt_subtree(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.world {
            Some(world) => self.fmt_subtree(f, world, 0),
            None => writeln!(f, "<no world placed>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use photodet_materials::{MaterialTable, NistDatabase};

    fn vacuum() -> MaterialId {
        let mut table = MaterialTable::new();
        table.find_or_build(&NistDatabase::new(), "G4_Galactic").unwrap()
    }

    fn world_with_box(half: f64) -> (Geometry, PlacementId, MaterialId) {
        let mat = vacuum();
        let mut g = Geometry::new();
        let lv = g
            .add_logical("World", Shape::cuboid(half, half, half).unwrap(), mat)
            .unwrap();
        let w = g.place_world("World", lv).unwrap();
        (g, w, mat)
    }

    #[test]
    fn world_has_no_parent() {
        let (g, w, _) = world_with_box(100.0);
        assert_eq!(g.world().unwrap(), w);
        assert_eq!(g.parent(w).unwrap(), None);
        assert_eq!(g.depth(w).unwrap(), 0);
    }

    #[test]
    fn second_world_rejected() {
        let (mut g, _, mat) = world_with_box(100.0);
        let lv = g
            .add_logical("Other", Shape::cuboid(1.0, 1.0, 1.0).unwrap(), mat)
            .unwrap();
        assert!(matches!(
            g.place_world("Other", lv),
            Err(GeometryError::DuplicateWorld(_))
        ));
    }

    #[test]
    fn invalid_shape_names_volume() {
        let (mut g, _, mat) = world_with_box(100.0);
        let bad = Shape::Box(crate::primitives::Cuboid {
            half_extents: [1.0, -1.0, 1.0],
        });
        let err = g.add_logical("Broken", bad, mat).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidShapeParameter { ref volume, .. } if volume == "Broken"
        ));
    }

    #[test]
    fn nested_world_positions_compose() {
        let (mut g, w, mat) = world_with_box(100.0);
        let outer = g
            .add_logical("Outer", Shape::cuboid(50.0, 50.0, 50.0).unwrap(), mat)
            .unwrap();
        let inner = g
            .add_logical("Inner", Shape::cuboid(5.0, 5.0, 5.0).unwrap(), mat)
            .unwrap();
        let o = g
            .place("Outer", outer, Transform::translation(10.0, 0.0, 0.0), w, 0, true)
            .unwrap();
        let i = g
            .place("Inner", inner, Transform::translation(0.0, 0.0, 20.0), o, 0, true)
            .unwrap();

        let pos = g.world_position(i).unwrap();
        assert_abs_diff_eq!(pos[0], 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pos[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pos[2], 20.0, epsilon = 1e-12);
        assert_eq!(g.depth(i).unwrap(), 2);
        assert_eq!(g.children(w).collect::<Vec<_>>(), vec![o]);
        assert_eq!(g.children(o).collect::<Vec<_>>(), vec![i]);
    }

    #[test]
    fn repeated_copies_need_distinct_copy_numbers() {
        let (mut g, w, mat) = world_with_box(100.0);
        let cell = g
            .add_logical("Cell", Shape::cuboid(1.0, 1.0, 1.0).unwrap(), mat)
            .unwrap();
        g.place("Cell", cell, Transform::translation(-10.0, 0.0, 0.0), w, 0, true)
            .unwrap();
        g.place("Cell", cell, Transform::translation(10.0, 0.0, 0.0), w, 1, true)
            .unwrap();
        let err = g
            .place("Cell", cell, Transform::translation(0.0, 0.0, 0.0), w, 1, true)
            .unwrap_err();
        assert!(matches!(err, GeometryError::DuplicatePlacement { copy_no: 1, .. }));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn overlap_resolution_is_clamped() {
        assert_eq!(Geometry::new().with_overlap_resolution(0).overlap_resolution(), 1);
        assert_eq!(
            Geometry::new()
                .with_overlap_resolution(1_000_000)
                .overlap_resolution(),
            MAX_OVERLAP_RESOLUTION
        );
    }

    #[test]
    fn summary_and_tree_listing() {
        let (mut g, w, mat) = world_with_box(100.0);
        let lv = g
            .add_logical("Tube", Shape::tube(0.0, 9.3, 44.0, 0.0, std::f64::consts::TAU).unwrap(), mat)
            .unwrap();
        g.place("Tube", lv, Transform::translation(0.0, 0.0, 44.0), w, 0, true)
            .unwrap();

        let summary = g.summary().unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].parent.as_deref(), Some("World"));
        assert_eq!(summary[1].world_position, [0.0, 0.0, 44.0]);

        let text = g.to_string();
        assert!(text.starts_with("World #0 [box"));
        assert!(text.contains("  Tube #0 [tube"));
    }
}
