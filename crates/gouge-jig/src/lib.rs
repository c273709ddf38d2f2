#![warn(missing_docs)]

//! Grinding-jig model: validated configuration, the jig pivot point, and
//! the rotation-dependent transform between tool and jig/wheel coordinates.
//!
//! The jig holds the gouge by its handle and pivots on a fixed point; the
//! tool tip stays on the wheel while the jig swings, rolling the flute
//! across the grinding surface. Both coordinate frames share the tip as
//! origin and coincide at rotation 0:
//!
//! - x: horizontal, perpendicular to the upright jig,
//! - y: up,
//! - z: from tip along the bar toward the pivot.
//!
//! Rotating the jig by `rotation` turns the whole tool about the tip→pivot
//! axis, so the tool↔jig conversion is a pure rotation; the pivot offset
//! is the configuration's fixed point.

use gouge_math::{Dir3, Point3, Transform, Vec3};
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

/// Errors from jig configuration.
#[derive(Error, Debug)]
pub enum JigError {
    /// The jig lengths/angles do not describe a realizable setup.
    #[error("impossible jig geometry: {0}")]
    ImpossibleGeometry(String),
}

/// Validated grinding-jig setup, immutable for a model run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JigConfig {
    /// Pivot-to-tip distance in inches.
    length: f64,
    /// Angle between the jig rotation axis and the bar, radians.
    angle: f64,
    /// Nose angle ground on the gouge, radians.
    nose_angle: f64,
    /// Bar radius of the gouge held in the jig, inches.
    bar_radius: f64,
}

impl JigConfig {
    /// Validate and build a jig configuration.
    ///
    /// The pivot, tip, and wheel contact form a triangle whose interior
    /// angles are fixed by the jig angle and the nose angle; it degenerates
    /// unless the jig angle is strictly smaller than the nose angle, and
    /// both must be acute.
    pub fn new(
        length: f64,
        angle: f64,
        nose_angle: f64,
        bar_radius: f64,
    ) -> Result<Self, JigError> {
        for (name, v) in [
            ("length", length),
            ("angle", angle),
            ("nose angle", nose_angle),
            ("bar radius", bar_radius),
        ] {
            if !v.is_finite() {
                return Err(JigError::ImpossibleGeometry(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        if bar_radius <= 0.0 {
            return Err(JigError::ImpossibleGeometry(format!(
                "bar radius must be positive, got {bar_radius}"
            )));
        }
        if length <= bar_radius {
            return Err(JigError::ImpossibleGeometry(format!(
                "jig length {length} must exceed the bar radius {bar_radius}"
            )));
        }
        if !(0.0 < angle && angle < FRAC_PI_2) {
            return Err(JigError::ImpossibleGeometry(format!(
                "jig angle {angle} rad outside (0, pi/2)"
            )));
        }
        if !(0.0 < nose_angle && nose_angle < FRAC_PI_2) {
            return Err(JigError::ImpossibleGeometry(format!(
                "nose angle {nose_angle} rad outside (0, pi/2)"
            )));
        }
        if angle >= nose_angle {
            return Err(JigError::ImpossibleGeometry(format!(
                "jig angle {angle} rad must be smaller than the nose angle {nose_angle} rad"
            )));
        }
        Ok(Self {
            length,
            angle,
            nose_angle,
            bar_radius,
        })
    }

    /// The Thompson-style jig preset: 9.37" arm at 33.7°.
    pub fn thompson(nose_angle: f64, bar_radius: f64) -> Result<Self, JigError> {
        Self::new(9.37, 33.7f64.to_radians(), nose_angle, bar_radius)
    }

    /// Pivot-to-tip distance in inches.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Jig angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Nose angle in radians.
    pub fn nose_angle(&self) -> f64 {
        self.nose_angle
    }

    /// Bar radius in inches.
    pub fn bar_radius(&self) -> f64 {
        self.bar_radius
    }

    /// The jig pivot in tool coordinates at rotation 0 — the configuration's
    /// fixed point. Pure function of the config.
    pub fn pivot(&self) -> Point3 {
        Point3::new(
            0.0,
            self.length * self.angle.sin(),
            self.length * self.angle.cos(),
        )
    }

    /// Unit direction of the jig rotation axis (tip toward pivot).
    pub fn rotation_axis(&self) -> Dir3 {
        Dir3::new_unchecked(Vec3::new(0.0, self.angle.sin(), self.angle.cos()))
    }

    /// Unit normal of the grinding surface at the contact point, in
    /// jig/wheel coordinates. Points up and toward the tool.
    pub fn wheel_normal(&self) -> Vec3 {
        Vec3::new(0.0, self.nose_angle.cos(), -self.nose_angle.sin())
    }

    /// Unit tangent of the wheel's cross-section circle at the contact
    /// point, in jig/wheel coordinates.
    pub fn wheel_tangent(&self) -> Vec3 {
        Vec3::new(0.0, self.nose_angle.sin(), self.nose_angle.cos())
    }

    /// Transform from tool coordinates into jig/wheel coordinates at the
    /// given jig rotation (radians; 0 is upright, positive rolls the +x
    /// wing down).
    pub fn tool_transform(&self, rotation: f64) -> Transform {
        Transform::rotation_about_axis(&self.rotation_axis(), rotation)
    }

    /// The grinding-surface normal pulled back into tool coordinates for a
    /// candidate jig rotation.
    pub fn wheel_normal_in_tool(&self, rotation: f64) -> Vec3 {
        self.tool_transform(rotation)
            .inverse_rigid()
            .apply_vec(&self.wheel_normal())
    }
}
