#![warn(missing_docs)]

//! Cutting-edge geometry for a woodturning gouge.
//!
//! A gouge is a round bar with a longitudinal channel (the flute) ground
//! into it; the cutting edge is the curve where the ground end surface
//! meets the flute. This crate builds that curve in tool coordinates from
//! two 1D inputs:
//!
//! - [`FluteProfile`] — the channel cross-section (constant along the bar),
//! - [`EdgeProfile`] — the edge shape seen from the side (y–z plane).
//!
//! Tool coordinates: origin at the tip, x lateral across the flute,
//! y up, z along the bar toward the handle. All dimensions in inches.
//!
//! The built [`CuttingEdgeCurve`] is a natural cubic spline through the
//! combined points, mirrored about x = 0 and parametrized by cumulative
//! chord length over `[-1, 1]` with 0 at the nose.

mod spline;

use gouge_math::{unit, Dir3, MathError, Point3, Vec3};
use spline::NaturalSpline;
use thiserror::Error;

/// Errors from profile validation and edge-curve construction.
#[derive(Error, Debug)]
pub enum EdgeError {
    /// An input profile is physically impossible or malformed.
    #[error("invalid profile shape: {0}")]
    ProfileShape(String),

    /// A low-level geometric primitive failed (degenerate tangent etc.).
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Absolute tolerance for "on the bar surface" checks, in inches.
const SURFACE_TOL: f64 = 1e-6;

/// The channel cross-section of the flute, on the +x half.
///
/// Samples run from the channel bottom (lateral 0, the deepest point) out
/// to the channel top edge, which must lie on the bar circle. The profile
/// is symmetric about x = 0 and constant along the bar axis.
#[derive(Debug, Clone)]
pub struct FluteProfile {
    bar_radius: f64,
    /// (lateral, height) pairs, lateral strictly increasing from 0.
    samples: Vec<(f64, f64)>,
    /// Angle from vertical (+y) to the channel top edge.
    top_angle: f64,
}

impl FluteProfile {
    /// The common parabolic channel: height `f^2 * r - 0.1 * d` at lateral
    /// `f * r`, clipped to the bar circle.
    pub fn parabola(bar_diameter: f64) -> Result<Self, EdgeError> {
        if !(bar_diameter.is_finite() && bar_diameter > 0.0) {
            return Err(EdgeError::ProfileShape(format!(
                "bar diameter must be positive, got {bar_diameter}"
            )));
        }
        let r = bar_diameter / 2.0;
        let mut pts: Vec<(f64, f64)> = Vec::new();
        let mut crossing = None;
        for k in 0..=10 {
            let f = k as f64 / 10.0;
            let x = f * r;
            let y = f * f * r - 0.1 * bar_diameter;
            if x * x + y * y >= r * r {
                let last = *pts.last().expect("first parabola sample is inside the bar");
                crossing = Some(circle_crossing(last, (x, y), r));
                break;
            }
            pts.push((x, y));
        }
        // The parabola always leaves the bar before f = 1.
        let (cx, cy) = crossing.expect("parabola must reach the bar surface");
        let top_angle = cx.atan2(cy);
        pts.push((r * top_angle.sin(), r * top_angle.cos()));
        Ok(Self {
            bar_radius: r,
            samples: pts,
            top_angle,
        })
    }

    /// Build a flute from `(lateral, depth)` samples, depth measured down
    /// from the bar's horizontal mid-plane.
    ///
    /// The first sample must be at lateral 0 (the channel bottom, deepest),
    /// depths must not increase outward, and the outermost sample must lie
    /// on the bar surface.
    pub fn from_depths(bar_diameter: f64, depths: &[(f64, f64)]) -> Result<Self, EdgeError> {
        if !(bar_diameter.is_finite() && bar_diameter > 0.0) {
            return Err(EdgeError::ProfileShape(format!(
                "bar diameter must be positive, got {bar_diameter}"
            )));
        }
        let r = bar_diameter / 2.0;
        if depths.len() < 2 {
            return Err(EdgeError::ProfileShape(
                "flute profile needs at least two samples".into(),
            ));
        }
        if depths[0].0.abs() > SURFACE_TOL {
            return Err(EdgeError::ProfileShape(
                "first flute sample must be at lateral position 0".into(),
            ));
        }
        for w in depths.windows(2) {
            if w[1].0 <= w[0].0 {
                return Err(EdgeError::ProfileShape(
                    "flute lateral positions must strictly increase".into(),
                ));
            }
            if w[1].1 > w[0].1 + SURFACE_TOL {
                return Err(EdgeError::ProfileShape(
                    "flute depth must not increase away from the channel bottom".into(),
                ));
            }
        }
        let mut samples = Vec::with_capacity(depths.len());
        for &(lateral, depth) in depths {
            if !(lateral.is_finite() && depth.is_finite()) {
                return Err(EdgeError::ProfileShape("non-finite flute sample".into()));
            }
            if depth > r {
                return Err(EdgeError::ProfileShape(format!(
                    "flute depth {depth} exceeds bar radius {r}"
                )));
            }
            let (x, y) = (lateral, -depth);
            if x * x + y * y > r * r + SURFACE_TOL {
                return Err(EdgeError::ProfileShape(format!(
                    "flute sample ({lateral}, {depth}) lies outside the bar"
                )));
            }
            samples.push((x, y));
        }
        // The channel must reach the bar surface so the edge curve spans
        // flute top to flute top.
        let (tx, ty) = *samples.last().unwrap();
        if ((tx * tx + ty * ty).sqrt() - r).abs() > SURFACE_TOL {
            return Err(EdgeError::ProfileShape(
                "outermost flute sample must lie on the bar surface".into(),
            ));
        }
        let top_angle = tx.atan2(ty);
        let last = samples.last_mut().unwrap();
        *last = (r * top_angle.sin(), r * top_angle.cos());
        Ok(Self {
            bar_radius: r,
            samples,
            top_angle,
        })
    }

    /// Bar radius in inches.
    pub fn bar_radius(&self) -> f64 {
        self.bar_radius
    }

    /// Angle from vertical to the channel top edge.
    pub fn top_angle(&self) -> f64 {
        self.top_angle
    }

    /// Height of the channel bottom (the nose height).
    pub fn bottom_height(&self) -> f64 {
        self.samples[0].1
    }

    /// Height of the channel top edge.
    pub fn top_height(&self) -> f64 {
        self.samples.last().unwrap().1
    }

    /// The `(lateral, height)` samples from channel bottom to top edge.
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }
}

/// Refine the bar-circle crossing between an inside and an outside point.
fn circle_crossing(inside: (f64, f64), outside: (f64, f64), r: f64) -> (f64, f64) {
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..60 {
        let m = 0.5 * (lo + hi);
        let x = inside.0 + m * (outside.0 - inside.0);
        let y = inside.1 + m * (outside.1 - inside.1);
        if x * x + y * y >= r * r {
            hi = m;
        } else {
            lo = m;
        }
    }
    let m = 0.5 * (lo + hi);
    (
        inside.0 + m * (outside.0 - inside.0),
        inside.1 + m * (outside.1 - inside.1),
    )
}

/// The edge shape in the y–z plane: axial position z as a function of
/// height y, with z = 0 at the nose and the wings sweeping back (−z).
#[derive(Debug, Clone)]
pub struct EdgeProfile {
    /// (height, z) pairs, height strictly increasing.
    samples: Vec<(f64, f64)>,
}

impl EdgeProfile {
    /// Straight wings swept back at `wing_angle` radians from the bar axis.
    ///
    /// Runs from the flute's channel bottom to its top edge.
    pub fn flat_wing(flute: &FluteProfile, wing_angle: f64) -> Result<Self, EdgeError> {
        if !(wing_angle.is_finite() && wing_angle > 0.0 && wing_angle < std::f64::consts::FRAC_PI_2)
        {
            return Err(EdgeError::ProfileShape(format!(
                "wing angle must be in (0, pi/2), got {wing_angle}"
            )));
        }
        let ybot = flute.bottom_height();
        let ytop = flute.top_height();
        let dy = ytop - ybot;
        if dy <= SURFACE_TOL {
            return Err(EdgeError::ProfileShape(
                "channel top must be above channel bottom for a flat wing".into(),
            ));
        }
        let dz = dy / wing_angle.tan();
        Ok(Self {
            samples: vec![(ybot, 0.0), (ytop, -dz)],
        })
    }

    /// Build an edge profile from `(height, z)` samples.
    ///
    /// Heights must strictly increase; z values are shifted so the first
    /// sample (the nose) sits at z = 0.
    pub fn from_samples(samples: &[(f64, f64)]) -> Result<Self, EdgeError> {
        if samples.len() < 2 {
            return Err(EdgeError::ProfileShape(
                "edge profile needs at least two samples".into(),
            ));
        }
        for w in samples.windows(2) {
            if w[1].0 <= w[0].0 {
                return Err(EdgeError::ProfileShape(
                    "edge profile heights must strictly increase".into(),
                ));
            }
        }
        if samples.iter().any(|(y, z)| !(y.is_finite() && z.is_finite())) {
            return Err(EdgeError::ProfileShape("non-finite edge sample".into()));
        }
        let z0 = samples[0].1;
        Ok(Self {
            samples: samples.iter().map(|&(y, z)| (y, z - z0)).collect(),
        })
    }

    /// Axial position at height `y`, linearly interpolated and clamped to
    /// the sampled range.
    pub fn z_at(&self, y: f64) -> f64 {
        let s = &self.samples;
        if y <= s[0].0 {
            return s[0].1;
        }
        if y >= s[s.len() - 1].0 {
            return s[s.len() - 1].1;
        }
        let i = s.partition_point(|&(h, _)| h < y) - 1;
        let (y0, z0) = s[i];
        let (y1, z1) = s[i + 1];
        z0 + (z1 - z0) * (y - y0) / (y1 - y0)
    }
}

/// The 3D cutting-edge curve: a chord-length-parametrized natural cubic
/// spline from one flute top edge through the nose to the other.
///
/// Parameter domain is `[-1, 1]`; 0 is the nose. The curve is symmetric
/// about x = 0 and its tangent at the nose is exactly `(1, 0, 0)` — the
/// mirrored construction makes the parametrization symmetric, and the
/// nose tangent is snapped onto the x axis so the invariant is exact.
#[derive(Debug, Clone)]
pub struct CuttingEdgeCurve {
    x: NaturalSpline,
    y: NaturalSpline,
    z: NaturalSpline,
    knots: Vec<Point3>,
    bar_radius: f64,
    top_angle: f64,
}

impl CuttingEdgeCurve {
    /// Combine a flute and an edge profile into the cutting-edge spline.
    pub fn build(flute: &FluteProfile, edge: &EdgeProfile) -> Result<Self, EdgeError> {
        let fs = flute.samples();
        let n = fs.len();
        let mut knots: Vec<Point3> = Vec::with_capacity(2 * n - 1);
        // -x wing from the top edge down to (but not including) the nose,
        // then the +x half from the nose out; the nose appears once.
        for j in (1..n).rev() {
            let (lat, h) = fs[j];
            knots.push(Point3::new(-lat, h, edge.z_at(h)));
        }
        for &(lat, h) in fs.iter() {
            knots.push(Point3::new(lat, h, edge.z_at(h)));
        }

        // Cumulative chord length, rescaled to [-1, 1].
        let mut params = Vec::with_capacity(knots.len());
        let mut acc = 0.0;
        params.push(0.0);
        for w in knots.windows(2) {
            let d = (w[1] - w[0]).norm();
            if d < SURFACE_TOL {
                return Err(EdgeError::ProfileShape(
                    "coincident edge points; flute samples too close".into(),
                ));
            }
            acc += d;
            params.push(acc);
        }
        let total = acc;
        for p in params.iter_mut() {
            *p = 2.0 * *p / total - 1.0;
        }
        // The mirrored knots make the parametrization symmetric up to
        // floating-point roundoff; enforce it exactly so the nose sits at
        // parameter 0 and the tip-tangent invariant is analytic.
        let m = knots.len();
        for i in 0..m / 2 {
            let s = 0.5 * (params[i] - params[m - 1 - i]);
            params[i] = s;
            params[m - 1 - i] = -s;
        }
        params[m / 2] = 0.0;

        let xs: Vec<f64> = knots.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = knots.iter().map(|p| p.y).collect();
        let zs: Vec<f64> = knots.iter().map(|p| p.z).collect();
        Ok(Self {
            x: NaturalSpline::fit(&params, &xs),
            y: NaturalSpline::fit(&params, &ys),
            z: NaturalSpline::fit(&params, &zs),
            knots,
            bar_radius: flute.bar_radius(),
            top_angle: flute.top_angle(),
        })
    }

    /// Point on the curve at parameter `t` in `[-1, 1]`.
    pub fn point_at(&self, t: f64) -> Point3 {
        Point3::new(self.x.eval(t), self.y.eval(t), self.z.eval(t))
    }

    /// Unit tangent at parameter `t`, oriented from −x wing toward +x wing.
    ///
    /// At the nose the tangent is exactly `(1, 0, 0)`.
    pub fn tangent_at(&self, t: f64) -> Result<Dir3, EdgeError> {
        if t.abs() < 1e-12 {
            return Ok(Dir3::new_normalize(Vec3::x()));
        }
        let d = Vec3::new(self.x.deriv(t), self.y.deriv(t), self.z.deriv(t));
        Ok(unit(&d)?)
    }

    /// `n` points spaced evenly in parameter (approximately arc length).
    ///
    /// An odd `n` places a point exactly on the nose.
    pub fn sample(&self, n: usize) -> Vec<Point3> {
        sample_params(n).map(|t| self.point_at(t)).collect()
    }

    /// The interpolation knots (for inspection and symmetry checks).
    pub fn knot_points(&self) -> &[Point3] {
        &self.knots
    }

    /// Bar radius the curve was built for.
    pub fn bar_radius(&self) -> f64 {
        self.bar_radius
    }

    /// Channel top-edge angle from vertical.
    pub fn top_angle(&self) -> f64 {
        self.top_angle
    }

    /// End-on outline of the bar from one channel top edge the long way
    /// round to the other, in the tip plane.
    pub fn bar_outline(&self, n: usize) -> Vec<Point3> {
        let r = self.bar_radius;
        let start = self.top_angle;
        let end = 2.0 * std::f64::consts::PI - self.top_angle;
        (0..n)
            .map(|i| {
                let a = start + (end - start) * i as f64 / n.saturating_sub(1).max(1) as f64;
                Point3::new(r * a.sin(), r * a.cos(), 0.0)
            })
            .collect()
    }
}

/// Evenly spaced parameters over `[-1, 1]` (odd `n` includes 0 exactly).
pub fn sample_params(n: usize) -> impl Iterator<Item = f64> {
    let steps = n.saturating_sub(1).max(1) as f64;
    (0..n).map(move |i| -1.0 + 2.0 * i as f64 / steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn tapered_flute() -> FluteProfile {
        // Depth 0.05" at center tapering linearly to 0 at the bar edge.
        let depths: Vec<(f64, f64)> = (0..=5)
            .map(|i| {
                let u = i as f64 * 0.05;
                (u, 0.05 * (1.0 - u / 0.25))
            })
            .collect();
        FluteProfile::from_depths(0.5, &depths).unwrap()
    }

    #[test]
    fn test_parabola_ends_on_bar() {
        let flute = FluteProfile::parabola(0.5).unwrap();
        let (x, y) = *flute.samples().last().unwrap();
        assert_relative_eq!((x * x + y * y).sqrt(), 0.25, epsilon = 1e-9);
        assert_relative_eq!(flute.bottom_height(), -0.05, epsilon = 1e-12);
        assert!(flute.top_angle() > 0.0 && flute.top_angle() < FRAC_PI_2);
    }

    #[test]
    fn test_flute_too_deep_rejected() {
        let err = FluteProfile::from_depths(0.5, &[(0.0, 0.3), (0.25, 0.0)]).unwrap_err();
        assert!(matches!(err, EdgeError::ProfileShape(_)));
    }

    #[test]
    fn test_flute_depth_must_taper() {
        let err =
            FluteProfile::from_depths(0.5, &[(0.0, 0.01), (0.1, 0.05), (0.25, 0.0)]).unwrap_err();
        assert!(matches!(err, EdgeError::ProfileShape(_)));
    }

    #[test]
    fn test_flute_must_reach_bar_surface() {
        let err = FluteProfile::from_depths(0.5, &[(0.0, 0.05), (0.1, 0.0)]).unwrap_err();
        assert!(matches!(err, EdgeError::ProfileShape(_)));
    }

    #[test]
    fn test_flat_wing_sweeps_back() {
        let flute = tapered_flute();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        assert_relative_eq!(edge.z_at(flute.bottom_height()), 0.0, epsilon = 1e-12);
        let ztop = edge.z_at(flute.top_height());
        // 0.05 rise over tan(30°)
        assert_relative_eq!(ztop, -0.05 / 30f64.to_radians().tan(), epsilon = 1e-9);
    }

    #[test]
    fn test_edge_profile_normalized_to_nose() {
        let edge = EdgeProfile::from_samples(&[(-0.05, 1.0), (0.0, 0.9)]).unwrap();
        assert_relative_eq!(edge.z_at(-0.05), 0.0, epsilon = 1e-12);
        assert_relative_eq!(edge.z_at(0.0), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_mirror_symmetry() {
        let flute = tapered_flute();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        let curve = CuttingEdgeCurve::build(&flute, &edge).unwrap();
        for i in 1..10 {
            let t = i as f64 / 10.0;
            let p = curve.point_at(t);
            let q = curve.point_at(-t);
            assert_relative_eq!(p.x, -q.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, q.y, epsilon = 1e-9);
            assert_relative_eq!(p.z, q.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_nose_point_and_tangent() {
        let flute = tapered_flute();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        let curve = CuttingEdgeCurve::build(&flute, &edge).unwrap();
        let nose = curve.point_at(0.0);
        assert_relative_eq!(nose.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(nose.y, -0.05, epsilon = 1e-9);
        assert_relative_eq!(nose.z, 0.0, epsilon = 1e-9);
        let tan = curve.tangent_at(0.0).unwrap();
        assert_relative_eq!(tan.as_ref().x, 1.0, epsilon = 1e-6);
        assert!(tan.as_ref().y.abs() < 1e-6);
        assert!(tan.as_ref().z.abs() < 1e-6);
        // The snap is consistent with the raw spline derivative.
        let near = curve.tangent_at(1e-6).unwrap();
        assert!(near.as_ref().x > 0.99);
    }

    #[test]
    fn test_curve_ends_on_flute_top_edges() {
        let flute = tapered_flute();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        let curve = CuttingEdgeCurve::build(&flute, &edge).unwrap();
        let a = curve.point_at(-1.0);
        let b = curve.point_at(1.0);
        assert_relative_eq!((a.x * a.x + a.y * a.y).sqrt(), 0.25, epsilon = 1e-9);
        assert_relative_eq!(a.x, -b.x, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_count_and_nose() {
        let flute = FluteProfile::parabola(0.5).unwrap();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        let curve = CuttingEdgeCurve::build(&flute, &edge).unwrap();
        let pts = curve.sample(21);
        assert_eq!(pts.len(), 21);
        assert_relative_eq!(pts[10].x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bar_outline_on_circle() {
        let flute = FluteProfile::parabola(0.5).unwrap();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        let curve = CuttingEdgeCurve::build(&flute, &edge).unwrap();
        for p in curve.bar_outline(50) {
            assert_relative_eq!((p.x * p.x + p.y * p.y).sqrt(), 0.25, epsilon = 1e-9);
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
        }
    }
}
