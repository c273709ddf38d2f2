#![warn(missing_docs)]

//! Math types for the gouge grinding model.
//!
//! Thin wrappers around nalgebra providing the vector, rotation, and
//! plane primitives the edge, jig, and solver crates build on. All
//! operations are pure and deterministic; the failure modes (zero-length
//! vectors, lines parallel to planes) are explicit errors rather than
//! NaN-producing silent fallbacks.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Relative tolerance below which a vector is considered degenerate.
pub const DEGENERATE_TOL: f64 = 1e-9;

/// Errors from the low-level geometric primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A vector with (near-)zero length was normalized or used as a direction.
    #[error("degenerate vector: length {0:.3e} below tolerance")]
    DegenerateVector(f64),

    /// A line was intersected with a plane it never crosses.
    #[error("line is parallel to plane (direction . normal = {0:.3e})")]
    ParallelLinePlane(f64),
}

/// Unit vector in the direction of `v`.
///
/// Fails with [`MathError::DegenerateVector`] if `|v|` is below
/// [`DEGENERATE_TOL`].
pub fn unit(v: &Vec3) -> Result<Dir3, MathError> {
    let n = v.norm();
    if n < DEGENERATE_TOL {
        return Err(MathError::DegenerateVector(n));
    }
    Ok(Unit::new_unchecked(v / n))
}

/// An infinite plane defined by a point on it and its unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Unit normal.
    pub normal: Dir3,
}

impl Plane {
    /// Create a plane from a point and a (not necessarily unit) normal.
    pub fn new(origin: Point3, normal: Vec3) -> Result<Self, MathError> {
        Ok(Self {
            origin,
            normal: unit(&normal)?,
        })
    }

    /// Signed distance from `p` to this plane, positive on the normal side.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal.as_ref())
    }

    /// Intersect the line `origin + t * dir` with this plane.
    ///
    /// Fails with [`MathError::ParallelLinePlane`] when the line is parallel
    /// to the plane and not contained in it; a contained line returns its
    /// origin.
    pub fn intersect_line(&self, origin: &Point3, dir: &Vec3) -> Result<Point3, MathError> {
        let denom = dir.dot(self.normal.as_ref());
        let dist = self.signed_distance(origin);
        if denom.abs() < DEGENERATE_TOL * dir.norm().max(1.0) {
            if dist.abs() < DEGENERATE_TOL {
                return Ok(*origin);
            }
            return Err(MathError::ParallelLinePlane(denom));
        }
        Ok(origin - dir * (dist / denom))
    }
}

/// A 4x4 affine transformation matrix.
///
/// Rigid transforms only in this model (rotations about the jig axis plus
/// fixed translations); [`Transform::inverse_rigid`] relies on that.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    ///
    /// Uses Rodrigues' rotation formula.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self { matrix: m }
    }

    /// Compose: apply `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (rotation only, ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Inverse of a rigid transform (orthonormal linear part).
    ///
    /// Transposes the 3x3 block and counter-rotates the translation; no
    /// general matrix inversion, so no failure case.
    pub fn inverse_rigid(&self) -> Self {
        let r = self.matrix.fixed_view::<3, 3>(0, 0).transpose();
        let t = Vec3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)]);
        let ti = -(r * t);
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        m[(0, 3)] = ti.x;
        m[(1, 3)] = ti.y;
        m[(2, 3)] = ti.z;
        Self { matrix: m }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in inches.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default model tolerances (1e-9 linear, 1e-6 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        angular: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two angles are effectively equal (in radians).
    pub fn angles_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
