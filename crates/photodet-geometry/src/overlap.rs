//! Placement-time overlap checking.
//!
//! A candidate placement is sampled with its interior lattice
//! ([`discretise_shape`]) and its surface points ([`boundary_samples`]),
//! and the samples are expressed in the parent frame. The candidate is
//! rejected when
//!
//! 1. any sample lies outside the parent shape (the daughter extrudes its
//!    mother), or
//! 2. any sample lies strictly inside an existing sibling, or any sample of
//!    that sibling lies strictly inside the candidate.
//!
//! Siblings whose transformed bounding boxes do not intersect are skipped.
//! Two unrotated boxes are decided exactly from their extents. Points on a
//! surface never count, so volumes that merely touch are accepted.
//!
//! Surface samples include the corners and faces of boxes and trapezoids
//! and the extreme points of curved shapes along the lattice lines, so any
//! extrusion or intersection reaching one of them is caught however thin.
//! Between lattice lines curved surfaces are only sampled.

use crate::discretise::{boundary_samples, discretise_shape};
use crate::error::GeometryError;
use crate::primitives::{Inside, Shape, SURFACE_TOLERANCE};
use crate::transform::Transform;
use crate::volume::{Geometry, Placement};

type Aabb = ([f64; 3], [f64; 3]);

/// True when the boxes share a region thicker than the surface tolerance.
fn boxes_intersect(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|k| a.0[k] < b.1[k] - SURFACE_TOLERANCE && b.0[k] < a.1[k] - SURFACE_TOLERANCE)
}

fn samples_in_parent(
    geometry: &Geometry,
    placement: &Placement,
) -> Result<Vec<[f64; 3]>, GeometryError> {
    let shape = &geometry.logical(placement.logical)?.shape;
    let resolution = geometry.overlap_resolution();
    Ok(discretise_shape(shape, resolution)
        .into_iter()
        .chain(boundary_samples(shape, resolution))
        .map(|p| placement.transform.apply(&p.position))
        .collect())
}

fn parent_frame_box(geometry: &Geometry, placement: &Placement) -> Result<Aabb, GeometryError> {
    let (min, max) = geometry.logical(placement.logical)?.shape.bounding_box();
    Ok(placement.transform.apply_to_box(&min, &max))
}

/// An unrotated box coincides with its parent-frame bounding box.
fn is_aligned_box(geometry: &Geometry, placement: &Placement) -> Result<bool, GeometryError> {
    let shape = &geometry.logical(placement.logical)?.shape;
    Ok(matches!(shape, Shape::Box(_)) && placement.transform.is_translation())
}

fn any_strictly_inside(
    geometry: &Geometry,
    points: &[[f64; 3]],
    target: &Placement,
) -> Result<bool, GeometryError> {
    let shape = &geometry.logical(target.logical)?.shape;
    let to_local: Transform = target.transform.inverse();
    Ok(points
        .iter()
        .any(|p| shape.inside(&to_local.apply(p)) == Inside::Inside))
}

/// Validate a placement that is about to be added under its parent.
///
/// # Errors
/// [`GeometryError::ExtrudesMother`] or [`GeometryError::Overlap`] naming
/// the conflicting volumes.
pub fn check_placement(geometry: &Geometry, candidate: &Placement) -> Result<(), GeometryError> {
    let Some(parent_id) = candidate.parent else {
        return Ok(());
    };
    let parent = geometry.placement(parent_id)?;
    let mother_shape = &geometry.logical(parent.logical)?.shape;

    let samples = samples_in_parent(geometry, candidate)?;
    log::debug!(
        "checking overlaps for volume '{}' with {} samples",
        candidate.name,
        samples.len()
    );

    if samples
        .iter()
        .any(|p| mother_shape.inside(p) == Inside::Outside)
    {
        return Err(GeometryError::ExtrudesMother {
            volume: candidate.name.clone(),
            mother: parent.name.clone(),
        });
    }

    let candidate_box = parent_frame_box(geometry, candidate)?;
    let candidate_aligned = is_aligned_box(geometry, candidate)?;
    for sibling_id in geometry.children(parent_id) {
        let sibling = geometry.placement(sibling_id)?;
        if !boxes_intersect(&candidate_box, &parent_frame_box(geometry, sibling)?) {
            continue;
        }
        let overlaps = (candidate_aligned && is_aligned_box(geometry, sibling)?)
            || any_strictly_inside(geometry, &samples, sibling)?
            || any_strictly_inside(geometry, &samples_in_parent(geometry, sibling)?, candidate)?;
        if overlaps {
            return Err(GeometryError::Overlap {
                volume: candidate.name.clone(),
                other: sibling.name.clone(),
            });
        }
    }

    log::debug!("overlap check for '{}' OK", candidate.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::GeometryError;
    use crate::primitives::Shape;
    use crate::transform::Transform;
    use crate::volume::{Geometry, PlacementId};
    use photodet_materials::{MaterialTable, NistDatabase};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

    fn world() -> (Geometry, PlacementId, photodet_materials::MaterialId) {
        let mut table = MaterialTable::new();
        let mat = table.find_or_build(&NistDatabase::new(), "G4_AIR").unwrap();
        let mut g = Geometry::new();
        let lv = g
            .add_logical("World", Shape::cuboid(100.0, 100.0, 100.0).unwrap(), mat)
            .unwrap();
        let w = g.place_world("World", lv).unwrap();
        (g, w, mat)
    }

    #[test]
    fn intersecting_siblings_rejected() {
        let (mut g, w, mat) = world();
        let a = g.add_logical("A", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        let b = g.add_logical("B", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        g.place("A", a, Transform::default(), w, 0, true).unwrap();
        let err = g
            .place("B", b, Transform::translation(15.0, 0.0, 0.0), w, 0, true)
            .unwrap_err();
        match err {
            GeometryError::Overlap { volume, other } => {
                assert_eq!(volume, "B");
                assert_eq!(other, "A");
            }
            other => panic!("expected overlap, got {other}"),
        }
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn separated_siblings_accepted() {
        let (mut g, w, mat) = world();
        let a = g.add_logical("A", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        let b = g.add_logical("B", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        g.place("A", a, Transform::default(), w, 0, true).unwrap();
        g.place("B", b, Transform::translation(25.0, 0.0, 0.0), w, 0, true)
            .unwrap();
    }

    #[test]
    fn touching_siblings_accepted() {
        let (mut g, w, mat) = world();
        let a = g.add_logical("A", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        g.place("A", a, Transform::translation(-10.0, 0.0, 0.0), w, 0, true)
            .unwrap();
        g.place("A", a, Transform::translation(10.0, 0.0, 0.0), w, 1, true)
            .unwrap();
    }

    #[test]
    fn overlap_check_can_be_disabled() {
        let (mut g, w, mat) = world();
        let a = g.add_logical("A", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        g.place("A", a, Transform::default(), w, 0, false).unwrap();
        g.place("A", a, Transform::translation(5.0, 0.0, 0.0), w, 1, false)
            .unwrap();
    }

    #[test]
    fn small_volume_inside_large_sibling_rejected() {
        // The big box's lattice is too coarse to hit the small sphere, so
        // only the sphere's own samples reveal the overlap.
        let (mut g, w, mat) = world();
        let big = g.add_logical("Big", Shape::cuboid(50.0, 50.0, 50.0).unwrap(), mat).unwrap();
        let small = g.add_logical("Small", Shape::sphere(0.0, 1.0).unwrap(), mat).unwrap();
        g.place("Small", small, Transform::translation(0.3, 0.3, 0.3), w, 0, true)
            .unwrap();
        assert!(matches!(
            g.place("Big", big, Transform::default(), w, 0, true),
            Err(GeometryError::Overlap { .. })
        ));
    }

    #[test]
    fn daughter_extruding_mother_rejected() {
        let (mut g, w, mat) = world();
        let tube = g
            .add_logical("Tube", Shape::tube(0.0, 10.0, 50.0, 0.0, TAU).unwrap(), mat)
            .unwrap();
        let err = g
            .place("Tube", tube, Transform::translation(0.0, 0.0, 80.0), w, 0, true)
            .unwrap_err();
        assert!(matches!(
            err,
            GeometryError::ExtrudesMother { ref mother, .. } if mother == "World"
        ));
    }

    #[test]
    fn sub_cell_box_overlap_rejected() {
        // 0.4 mm of interpenetration against a 1 mm lattice spacing.
        let (mut g, w, mat) = world();
        let a = g.add_logical("A", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        g.place("A", a, Transform::default(), w, 0, true).unwrap();
        let err = g
            .place("A", a, Transform::translation(19.6, 0.0, 0.0), w, 1, true)
            .unwrap_err();
        assert!(matches!(err, GeometryError::Overlap { .. }));
        g.place("A", a, Transform::translation(20.0, 0.0, 0.0), w, 1, true)
            .unwrap();
    }

    #[test]
    fn sub_cell_corner_overlap_rejected() {
        let (mut g, w, mat) = world();
        let a = g.add_logical("A", Shape::cuboid(10.0, 10.0, 10.0).unwrap(), mat).unwrap();
        g.place("A", a, Transform::default(), w, 0, true).unwrap();
        // Rotated by a right angle, so only the sampled corners can decide.
        let turned = Transform::from_euler(0.0, 0.0, FRAC_PI_2, 19.8, 19.8, 19.8);
        assert!(matches!(
            g.place("A", a, turned, w, 1, true),
            Err(GeometryError::Overlap { .. })
        ));
    }

    #[test]
    fn sub_cell_sphere_overlap_rejected() {
        let (mut g, w, mat) = world();
        let ball = g.add_logical("Ball", Shape::sphere(0.0, 10.0).unwrap(), mat).unwrap();
        g.place("Ball", ball, Transform::default(), w, 0, true).unwrap();
        assert!(matches!(
            g.place("Ball", ball, Transform::translation(0.0, 0.0, 19.7), w, 1, true),
            Err(GeometryError::Overlap { .. })
        ));
        g.place("Ball", ball, Transform::translation(0.0, 0.0, 20.0), w, 1, true)
            .unwrap();
    }

    #[test]
    fn sub_cell_extrusion_rejected() {
        let (mut g, w, mat) = world();
        let b = g.add_logical("B", Shape::cuboid(5.0, 5.0, 5.0).unwrap(), mat).unwrap();
        assert!(matches!(
            g.place("B", b, Transform::translation(0.0, 0.0, 95.2), w, 0, true),
            Err(GeometryError::ExtrudesMother { .. })
        ));
        let disk = g
            .add_logical("Disk", Shape::tube(0.0, 10.0, 5.0, 0.0, TAU).unwrap(), mat)
            .unwrap();
        assert!(matches!(
            g.place("Disk", disk, Transform::translation(90.1, 0.0, 0.0), w, 0, true),
            Err(GeometryError::ExtrudesMother { .. })
        ));
        // Flush with the world face is still inside.
        g.place("B", b, Transform::translation(0.0, 0.0, 95.0), w, 0, true)
            .unwrap();
    }

    #[test]
    fn rotated_bar_overlap_detected() {
        let (mut g, w, mat) = world();
        let bar = g.add_logical("Bar", Shape::cuboid(30.0, 2.0, 2.0).unwrap(), mat).unwrap();
        let post = g.add_logical("Post", Shape::cuboid(2.0, 2.0, 2.0).unwrap(), mat).unwrap();
        g.place("Post", post, Transform::translation(15.0, 15.0, 0.0), w, 0, true)
            .unwrap();
        // Unrotated the bar would pass below the post; at 45 degrees it crosses it.
        let rotated = Transform::from_euler(0.0, 0.0, FRAC_PI_4, 0.0, 0.0, 0.0);
        assert!(matches!(
            g.place("Bar", bar, rotated, w, 0, true),
            Err(GeometryError::Overlap { .. })
        ));
        g.place("Bar", bar, Transform::default(), w, 0, true).unwrap();
    }
}
