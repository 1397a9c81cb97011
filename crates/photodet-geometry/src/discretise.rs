//! Discretisation of solid shapes into sample lattices.
//!
//! Given a [`Shape`], this module generates lattices over its bounding box
//! with `resolution` cells per axis:
//!
//! - [`discretise_shape`]: cell centres lying strictly inside the shape.
//! - [`boundary_samples`]: points on the shape's surface, taken from the
//!   cell vertices (bounding-box faces included) and from the places where
//!   lattice edges cross the surface.
//!
//! Spacing is per axis, so thin shapes such as a 40 nm photocathode layer
//! are sampled as densely as bulky ones.

use crate::primitives::{Inside, Shape};

/// Bisection steps used to locate a surface crossing on a lattice edge.
const BISECTION_STEPS: usize = 64;

/// A sample point inside a shape, in the shape's local frame (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticePoint {
    pub position: [f64; 3],
}

/// Discretise a shape into lattice points strictly inside it.
///
/// # Arguments
/// * `shape` - The shape to discretise.
/// * `resolution` - Number of lattice cells along each bounding-box axis.
///
/// # Returns
/// The lattice points classified as [`Inside::Inside`]. Empty when
/// `resolution` is zero.
pub fn discretise_shape(shape: &Shape, resolution: usize) -> Vec<LatticePoint> {
    if resolution == 0 {
        return Vec::new();
    }
    let (min, max) = shape.bounding_box();
    let n = resolution as f64;
    let step = [
        (max[0] - min[0]) / n,
        (max[1] - min[1]) / n,
        (max[2] - min[2]) / n,
    ];

    let mut points = Vec::new();
    for i in 0..resolution {
        let x = min[0] + (i as f64 + 0.5) * step[0];
        for j in 0..resolution {
            let y = min[1] + (j as f64 + 0.5) * step[1];
            for k in 0..resolution {
                let z = min[2] + (k as f64 + 0.5) * step[2];
                let p = [x, y, z];
                if shape.inside(&p) == Inside::Inside {
                    points.push(LatticePoint { position: p });
                }
            }
        }
    }
    points
}

/// Sample points on the surface of a shape.
///
/// Walks the `(resolution + 1)^3` vertices of the lattice, keeping every
/// vertex classified [`Inside::Surface`]. For each lattice edge joining an
/// inside vertex to an outside one, the crossing is located by bisection
/// and reported on the inner side of the surface, never outside it.
///
/// Faces lying on the bounding box, such as those of a box or the end caps
/// of a tube, are therefore sampled on a regular grid including their
/// corners and edges.
pub fn boundary_samples(shape: &Shape, resolution: usize) -> Vec<LatticePoint> {
    if resolution == 0 {
        return Vec::new();
    }
    let (min, max) = shape.bounding_box();
    let n = resolution as f64;
    let coord = |axis: usize, i: usize| {
        if i == resolution {
            max[axis]
        } else {
            min[axis] + (max[axis] - min[axis]) * i as f64 / n
        }
    };

    let side = resolution + 1;
    let index = |i: usize, j: usize, k: usize| (i * side + j) * side + k;
    let mut classes = Vec::with_capacity(side * side * side);
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                classes.push(shape.inside(&[coord(0, i), coord(1, j), coord(2, k)]));
            }
        }
    }

    let mut points = Vec::new();
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                let vertex = [i, j, k];
                let p = [coord(0, i), coord(1, j), coord(2, k)];
                let here = classes[index(i, j, k)];
                if here == Inside::Surface {
                    points.push(LatticePoint { position: p });
                }
                for axis in 0..3 {
                    if vertex[axis] == resolution {
                        continue;
                    }
                    let mut next = vertex;
                    next[axis] += 1;
                    let there = classes[index(next[0], next[1], next[2])];
                    let mut q = p;
                    q[axis] = coord(axis, next[axis]);
                    let crossing = match (here, there) {
                        (Inside::Inside, Inside::Outside) => Some(bisect_surface(shape, p, q)),
                        (Inside::Outside, Inside::Inside) => Some(bisect_surface(shape, q, p)),
                        _ => None,
                    };
                    if let Some(position) = crossing {
                        points.push(LatticePoint { position });
                    }
                }
            }
        }
    }
    points
}

/// Narrow the segment `inner`..`outer` down to the shape's surface.
///
/// Returns a surface point, or the innermost point reached when the surface
/// band is thinner than floating-point resolution along the segment.
fn bisect_surface(shape: &Shape, mut inner: [f64; 3], mut outer: [f64; 3]) -> [f64; 3] {
    for _ in 0..BISECTION_STEPS {
        let mid = [
            0.5 * (inner[0] + outer[0]),
            0.5 * (inner[1] + outer[1]),
            0.5 * (inner[2] + outer[2]),
        ];
        match shape.inside(&mid) {
            Inside::Surface => return mid,
            Inside::Inside => inner = mid,
            Inside::Outside => outer = mid,
        }
    }
    inner
}
