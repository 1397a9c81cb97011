//! Rigid transformations placing a daughter volume inside its parent.
//!
//! A [`Transform`] maps points from a daughter's local frame into its
//! parent's frame: `p_parent = R * p_local + t`. World coordinates of any
//! placement follow by composing transforms from the leaf up to the root.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// A rigid transformation: rotation followed by translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Rotation of the daughter frame relative to the parent frame.
    pub rotation: Rotation3<f64>,
    /// Position of the daughter origin in the parent frame (mm).
    pub translation: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }
}

impl Transform {
    /// Create a pure translation.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::new(dx, dy, dz),
        }
    }

    /// Create a rotation followed by a translation.
    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Rotation about the x, y and z axes (roll, pitch, yaw; radians), then translation.
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            rotation: Rotation3::from_euler_angles(roll, pitch, yaw),
            translation: Vector3::new(dx, dy, dz),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translation == Vector3::zeros() && self.is_translation()
    }

    /// True when the rotation part is the identity.
    pub fn is_translation(&self) -> bool {
        self.rotation == Rotation3::identity()
    }

    /// Apply this transformation to a 3D point.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        let v = Vector3::new(point[0], point[1], point[2]);
        let result = self.rotation * v + self.translation;
        [result.x, result.y, result.z]
    }

    /// Compose two transforms: self followed by other.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            rotation: other.rotation * self.rotation,
            translation: other.rotation * self.translation + other.translation,
        }
    }

    /// The transform mapping parent coordinates back into the local frame.
    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        Transform {
            translation: -(rotation * self.translation),
            rotation,
        }
    }

    /// Axis-aligned box enclosing a local box after transformation.
    pub fn apply_to_box(&self, min: &[f64; 3], max: &[f64; 3]) -> ([f64; 3], [f64; 3]) {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for corner in 0..8 {
            let p = [
                if corner & 1 == 0 { min[0] } else { max[0] },
                if corner & 2 == 0 { min[1] } else { max[1] },
                if corner & 4 == 0 { min[2] } else { max[2] },
            ];
            let q = self.apply(&p);
            for k in 0..3 {
                lo[k] = lo[k].min(q[k]);
                hi[k] = hi[k].max(q[k]);
            }
        }
        (lo, hi)
    }
}
