//! Parametric solid shapes.
//!
//! Each primitive is centred on its own local origin with the z axis as
//! its symmetry axis, following the usual particle-transport conventions:
//! boxes and trapezoids are given by half-lengths, tubes and cones by radii
//! and a half-length along z, with an optional phi segment.
//!
//! Shapes carry no position; a [`Transform`](crate::transform::Transform)
//! places them inside a parent volume.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Half-thickness of a shape's surface (mm).
pub const SURFACE_TOLERANCE: f64 = 1.0e-9;

/// Classification of a point against a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inside {
    Inside,
    Surface,
    Outside,
}

impl Inside {
    fn classify(distance: f64) -> Self {
        if distance > SURFACE_TOLERANCE {
            Inside::Outside
        } else if distance < -SURFACE_TOLERANCE {
            Inside::Inside
        } else {
            Inside::Surface
        }
    }
}

/// A shape built with invalid dimensions.
///
/// Shapes are validated again when registered as a logical volume, where
/// the failure becomes [`GeometryError::InvalidShapeParameter`] naming the
/// volume.
///
/// [`GeometryError::InvalidShapeParameter`]: crate::error::GeometryError::InvalidShapeParameter
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid {kind} parameters: {reason}")]
pub struct ShapeError {
    pub kind: &'static str,
    pub reason: String,
}

/// A solid primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Box(Cuboid),
    Tube(Tube),
    Sphere(Sphere),
    Cone(Cone),
    Trd(Trd),
}

/// A box given by its half-lengths along x, y and z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub half_extents: [f64; 3],
}

/// A cylindrical section: inner/outer radius, half-length and phi segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tube {
    #[serde(default)]
    pub rmin: f64,
    pub rmax: f64,
    pub half_z: f64,
    #[serde(default)]
    pub start_phi: f64,
    #[serde(default = "full_turn")]
    pub delta_phi: f64,
}

/// A spherical shell (a full ball when `rmin` is zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    #[serde(default)]
    pub rmin: f64,
    pub rmax: f64,
}

/// A conical section with radii given at -z and +z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    #[serde(default)]
    pub rmin_minus_z: f64,
    pub rmax_minus_z: f64,
    #[serde(default)]
    pub rmin_plus_z: f64,
    pub rmax_plus_z: f64,
    pub half_z: f64,
    #[serde(default)]
    pub start_phi: f64,
    #[serde(default = "full_turn")]
    pub delta_phi: f64,
}

/// A trapezoid whose x and y half-lengths vary linearly between -z and +z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trd {
    pub half_x_minus_z: f64,
    pub half_x_plus_z: f64,
    pub half_y_minus_z: f64,
    pub half_y_plus_z: f64,
    pub half_z: f64,
}

fn full_turn() -> f64 {
    TAU
}

fn positive(value: f64, what: &str) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{what} must be finite and > 0, got {value}"));
    }
    Ok(())
}

fn non_negative(value: f64, what: &str) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{what} must be finite and >= 0, got {value}"));
    }
    Ok(())
}

fn phi_segment(start_phi: f64, delta_phi: f64) -> Result<(), String> {
    if !start_phi.is_finite() {
        return Err(format!("start phi must be finite, got {start_phi}"));
    }
    if !delta_phi.is_finite() || delta_phi <= 0.0 || delta_phi > TAU + SURFACE_TOLERANCE {
        return Err(format!("delta phi must be in (0, 2pi], got {delta_phi}"));
    }
    Ok(())
}

/// Signed angular distance of `(x, y)` from a phi segment, as arc length.
///
/// Negative inside the segment, positive outside, zero on its edges.
fn phi_distance(x: f64, y: f64, start_phi: f64, delta_phi: f64) -> f64 {
    if delta_phi >= TAU - SURFACE_TOLERANCE {
        return f64::NEG_INFINITY;
    }
    let r = x.hypot(y);
    let d = (y.atan2(x) - start_phi).rem_euclid(TAU);
    if d <= delta_phi {
        -r * d.min(delta_phi - d).min(PI / 2.0).sin()
    } else {
        r * (d - delta_phi).min(TAU - d).min(PI / 2.0).sin()
    }
}

impl Shape {
    fn validated(self) -> Result<Self, ShapeError> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(reason) => Err(ShapeError {
                kind: self.kind(),
                reason,
            }),
        }
    }

    /// A validated box from half-lengths.
    pub fn cuboid(half_x: f64, half_y: f64, half_z: f64) -> Result<Self, ShapeError> {
        Shape::Box(Cuboid {
            half_extents: [half_x, half_y, half_z],
        })
        .validated()
    }

    /// A validated tube section. Angles in radians.
    pub fn tube(
        rmin: f64,
        rmax: f64,
        half_z: f64,
        start_phi: f64,
        delta_phi: f64,
    ) -> Result<Self, ShapeError> {
        Shape::Tube(Tube {
            rmin,
            rmax,
            half_z,
            start_phi,
            delta_phi,
        })
        .validated()
    }

    /// A validated spherical shell.
    pub fn sphere(rmin: f64, rmax: f64) -> Result<Self, ShapeError> {
        Shape::Sphere(Sphere { rmin, rmax }).validated()
    }

    /// A validated full-turn cone section.
    pub fn cone(
        rmin_minus_z: f64,
        rmax_minus_z: f64,
        rmin_plus_z: f64,
        rmax_plus_z: f64,
        half_z: f64,
    ) -> Result<Self, ShapeError> {
        Shape::Cone(Cone {
            rmin_minus_z,
            rmax_minus_z,
            rmin_plus_z,
            rmax_plus_z,
            half_z,
            start_phi: 0.0,
            delta_phi: TAU,
        })
        .validated()
    }

    /// A validated trapezoid.
    pub fn trd(
        half_x_minus_z: f64,
        half_x_plus_z: f64,
        half_y_minus_z: f64,
        half_y_plus_z: f64,
        half_z: f64,
    ) -> Result<Self, ShapeError> {
        Shape::Trd(Trd {
            half_x_minus_z,
            half_x_plus_z,
            half_y_minus_z,
            half_y_plus_z,
            half_z,
        })
        .validated()
    }

    /// Short lowercase name of the shape kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Box(_) => "box",
            Shape::Tube(_) => "tube",
            Shape::Sphere(_) => "sphere",
            Shape::Cone(_) => "cone",
            Shape::Trd(_) => "trd",
        }
    }

    /// Check the dimensional parameters. Returns the reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Shape::Box(b) => {
                for (h, axis) in b.half_extents.iter().zip(["x", "y", "z"]) {
                    positive(*h, &format!("half-length along {axis}"))?;
                }
            }
            Shape::Tube(t) => {
                non_negative(t.rmin, "inner radius")?;
                positive(t.rmax, "outer radius")?;
                positive(t.half_z, "half-length along z")?;
                if t.rmin >= t.rmax {
                    return Err(format!(
                        "inner radius {} must be smaller than outer radius {}",
                        t.rmin, t.rmax
                    ));
                }
                phi_segment(t.start_phi, t.delta_phi)?;
            }
            Shape::Sphere(s) => {
                non_negative(s.rmin, "inner radius")?;
                positive(s.rmax, "outer radius")?;
                if s.rmin >= s.rmax {
                    return Err(format!(
                        "inner radius {} must be smaller than outer radius {}",
                        s.rmin, s.rmax
                    ));
                }
            }
            Shape::Cone(c) => {
                non_negative(c.rmin_minus_z, "inner radius at -z")?;
                non_negative(c.rmax_minus_z, "outer radius at -z")?;
                non_negative(c.rmin_plus_z, "inner radius at +z")?;
                non_negative(c.rmax_plus_z, "outer radius at +z")?;
                positive(c.half_z, "half-length along z")?;
                if c.rmin_minus_z > c.rmax_minus_z || c.rmin_plus_z > c.rmax_plus_z {
                    return Err("inner radius exceeds outer radius".into());
                }
                if c.rmin_minus_z == c.rmax_minus_z && c.rmin_plus_z == c.rmax_plus_z {
                    return Err("cone has zero wall thickness at both ends".into());
                }
                phi_segment(c.start_phi, c.delta_phi)?;
            }
            Shape::Trd(t) => {
                non_negative(t.half_x_minus_z, "half-length along x at -z")?;
                non_negative(t.half_x_plus_z, "half-length along x at +z")?;
                non_negative(t.half_y_minus_z, "half-length along y at -z")?;
                non_negative(t.half_y_plus_z, "half-length along y at +z")?;
                positive(t.half_z, "half-length along z")?;
                if t.half_x_minus_z + t.half_x_plus_z <= 0.0
                    || t.half_y_minus_z + t.half_y_plus_z <= 0.0
                {
                    return Err("trapezoid is degenerate in x or y".into());
                }
            }
        }
        Ok(())
    }

    /// Approximate signed distance to the surface: negative inside.
    ///
    /// Exact for boxes and spheres; for the other shapes the sign and the
    /// behaviour near the surface are exact, far values are an upper bound.
    pub fn signed_distance(&self, p: &[f64; 3]) -> f64 {
        let [x, y, z] = *p;
        match self {
            Shape::Box(b) => (0..3)
                .map(|i| p[i].abs() - b.half_extents[i])
                .fold(f64::NEG_INFINITY, f64::max),
            Shape::Tube(t) => {
                let r = x.hypot(y);
                let mut d = (z.abs() - t.half_z).max(r - t.rmax);
                if t.rmin > 0.0 {
                    d = d.max(t.rmin - r);
                }
                d.max(phi_distance(x, y, t.start_phi, t.delta_phi))
            }
            Shape::Sphere(s) => {
                let r = (x * x + y * y + z * z).sqrt();
                let mut d = r - s.rmax;
                if s.rmin > 0.0 {
                    d = d.max(s.rmin - r);
                }
                d
            }
            Shape::Cone(c) => {
                let r = x.hypot(y);
                let t = ((z + c.half_z) / (2.0 * c.half_z)).clamp(0.0, 1.0);
                let rmin = c.rmin_minus_z + t * (c.rmin_plus_z - c.rmin_minus_z);
                let rmax = c.rmax_minus_z + t * (c.rmax_plus_z - c.rmax_minus_z);
                let mut d = (z.abs() - c.half_z).max(r - rmax);
                if c.rmin_minus_z > 0.0 || c.rmin_plus_z > 0.0 {
                    d = d.max(rmin - r);
                }
                d.max(phi_distance(x, y, c.start_phi, c.delta_phi))
            }
            Shape::Trd(t) => {
                let s = ((z + t.half_z) / (2.0 * t.half_z)).clamp(0.0, 1.0);
                let hx = t.half_x_minus_z + s * (t.half_x_plus_z - t.half_x_minus_z);
                let hy = t.half_y_minus_z + s * (t.half_y_plus_z - t.half_y_minus_z);
                (z.abs() - t.half_z).max(x.abs() - hx).max(y.abs() - hy)
            }
        }
    }

    /// Classify a point given in the shape's local frame.
    pub fn inside(&self, point: &[f64; 3]) -> Inside {
        Inside::classify(self.signed_distance(point))
    }

    /// Local axis-aligned bounding box: returns (min_corner, max_corner).
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        let h = match self {
            Shape::Box(b) => b.half_extents,
            Shape::Tube(t) => [t.rmax, t.rmax, t.half_z],
            Shape::Sphere(s) => [s.rmax, s.rmax, s.rmax],
            Shape::Cone(c) => {
                let r = c.rmax_minus_z.max(c.rmax_plus_z);
                [r, r, c.half_z]
            }
            Shape::Trd(t) => [
                t.half_x_minus_z.max(t.half_x_plus_z),
                t.half_y_minus_z.max(t.half_y_plus_z),
                t.half_z,
            ],
        };
        ([-h[0], -h[1], -h[2]], h)
    }

    /// Enclosed volume (mm³).
    pub fn cubic_volume(&self) -> f64 {
        match self {
            Shape::Box(b) => 8.0 * b.half_extents.iter().product::<f64>(),
            Shape::Tube(t) => t.delta_phi * t.half_z * (t.rmax * t.rmax - t.rmin * t.rmin),
            Shape::Sphere(s) => 4.0 / 3.0 * PI * (s.rmax.powi(3) - s.rmin.powi(3)),
            Shape::Cone(c) => {
                let (r1, r2) = (c.rmax_minus_z, c.rmax_plus_z);
                let (q1, q2) = (c.rmin_minus_z, c.rmin_plus_z);
                c.delta_phi * c.half_z / 3.0
                    * ((r1 * r1 + r1 * r2 + r2 * r2) - (q1 * q1 + q1 * q2 + q2 * q2))
            }
            Shape::Trd(t) => {
                let (x1, x2) = (t.half_x_minus_z, t.half_x_plus_z);
                let (y1, y2) = (t.half_y_minus_z, t.half_y_plus_z);
                4.0 * t.half_z / 3.0 * (2.0 * x1 * y1 + x1 * y2 + x2 * y1 + 2.0 * x2 * y2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{DEG, MM};
    use approx::assert_relative_eq;

    #[test]
    fn box_classification() {
        let b = Shape::cuboid(10.0, 10.0, 10.0).unwrap();
        assert_eq!(b.inside(&[0.0, 0.0, 0.0]), Inside::Inside);
        assert_eq!(b.inside(&[10.0, 0.0, 0.0]), Inside::Surface);
        assert_eq!(b.inside(&[10.1, 0.0, 0.0]), Inside::Outside);
    }

    #[test]
    fn tube_classification() {
        let t = Shape::tube(0.0, 9.3 * MM, 44.0 * MM, 0.0, 360.0 * DEG).unwrap();
        assert_eq!(t.inside(&[0.0, 0.0, 0.0]), Inside::Inside);
        assert_eq!(t.inside(&[9.3, 0.0, 0.0]), Inside::Surface);
        assert_eq!(t.inside(&[0.0, 9.4, 0.0]), Inside::Outside);
        assert_eq!(t.inside(&[0.0, 0.0, 44.5]), Inside::Outside);
    }

    #[test]
    fn hollow_tube_excludes_bore() {
        let t = Shape::tube(2.0, 5.0, 1.0, 0.0, 360.0 * DEG).unwrap();
        assert_eq!(t.inside(&[1.0, 0.0, 0.0]), Inside::Outside);
        assert_eq!(t.inside(&[3.0, 0.0, 0.0]), Inside::Inside);
    }

    #[test]
    fn phi_segment_limits_tube() {
        // Quarter tube covering the +x/+y quadrant.
        let t = Shape::tube(0.0, 5.0, 1.0, 0.0, 90.0 * DEG).unwrap();
        assert_eq!(t.inside(&[1.0, 1.0, 0.0]), Inside::Inside);
        assert_eq!(t.inside(&[-1.0, 1.0, 0.0]), Inside::Outside);
        assert_eq!(t.inside(&[1.0, -1.0, 0.0]), Inside::Outside);
        assert_eq!(t.inside(&[1.0, 0.0, 0.0]), Inside::Surface);
    }

    #[test]
    fn sphere_shell_classification() {
        let s = Shape::sphere(1.0, 2.0).unwrap();
        assert_eq!(s.inside(&[0.0, 0.0, 0.0]), Inside::Outside);
        assert_eq!(s.inside(&[0.0, 1.5, 0.0]), Inside::Inside);
        assert_eq!(s.inside(&[0.0, 0.0, 2.0]), Inside::Surface);
    }

    #[test]
    fn cone_radius_varies_with_z() {
        let c = Shape::cone(0.0, 1.0, 0.0, 3.0, 2.0).unwrap();
        // Outer radius is 1 at z=-2 and 3 at z=+2.
        assert_eq!(c.inside(&[2.0, 0.0, -1.9]), Inside::Outside);
        assert_eq!(c.inside(&[2.0, 0.0, 1.9]), Inside::Inside);
    }

    #[test]
    fn trd_narrows_towards_plus_z() {
        let t = Shape::trd(4.0, 1.0, 4.0, 1.0, 3.0).unwrap();
        assert_eq!(t.inside(&[3.0, 0.0, -2.5]), Inside::Inside);
        assert_eq!(t.inside(&[3.0, 0.0, 2.5]), Inside::Outside);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(Shape::cuboid(0.0, 1.0, 1.0).is_err());
        assert!(Shape::cuboid(-1.0, 1.0, 1.0).is_err());
        assert!(Shape::cuboid(f64::NAN, 1.0, 1.0).is_err());
        assert!(Shape::tube(3.0, 2.0, 1.0, 0.0, TAU).is_err());
        assert!(Shape::tube(0.0, 2.0, 1.0, 0.0, 0.0).is_err());
        assert!(Shape::tube(0.0, 2.0, 1.0, 0.0, 7.0).is_err());
        assert!(Shape::sphere(2.0, 2.0).is_err());
        assert!(Shape::cone(1.0, 1.0, 1.0, 1.0, 1.0).is_err());
        assert!(Shape::trd(0.0, 0.0, 1.0, 1.0, 1.0).is_err());

        let err = Shape::cuboid(1.0, 1.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("half-length along z"));
    }

    #[test]
    fn constructor_errors_name_the_shape_kind() {
        let err = Shape::tube(0.0, -2.0, 1.0, 0.0, TAU).unwrap_err();
        assert_eq!(err.kind, "tube");
        assert!(err.reason.contains("outer radius"));
        assert_eq!(
            err.to_string(),
            "Invalid tube parameters: outer radius must be finite and > 0, got -2"
        );
    }

    #[test]
    fn volumes() {
        assert_relative_eq!(Shape::cuboid(1.0, 2.0, 3.0).unwrap().cubic_volume(), 48.0);
        assert_relative_eq!(
            Shape::tube(0.0, 1.0, 0.5, 0.0, TAU).unwrap().cubic_volume(),
            PI,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            Shape::sphere(0.0, 1.0).unwrap().cubic_volume(),
            4.0 / 3.0 * PI,
            max_relative = 1e-12
        );
        // A cone with equal radii is a cylinder.
        assert_relative_eq!(
            Shape::cone(0.0, 1.0, 0.0, 1.0, 0.5).unwrap().cubic_volume(),
            PI,
            max_relative = 1e-12
        );
        // A trd with equal ends is a box.
        assert_relative_eq!(
            Shape::trd(1.0, 1.0, 2.0, 2.0, 3.0).unwrap().cubic_volume(),
            48.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn bounding_box_of_tube() {
        let t = Shape::tube(0.0, 9.3, 44.0, 0.0, TAU).unwrap();
        let (min, max) = t.bounding_box();
        assert_eq!(min, [-9.3, -9.3, -44.0]);
        assert_eq!(max, [9.3, 9.3, 44.0]);
    }
}
