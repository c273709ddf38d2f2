//! Grind-curve reconstruction.
//!
//! Once an edge point's jig rotation is known, the ground facet behind it
//! is the arc of the wheel's cross-section circle from the edge point out
//! to the bar surface. The wheel spins about a jig-x axis, so its
//! cross-section through the contact lies in a plane of constant jig x,
//! with the center one wheel radius behind the contact along the surface
//! normal.

use crate::error::SolveError;
use crate::model::WheelConfig;
use gouge_jig::JigConfig;
use gouge_math::{Point3, Transform};

/// Sweep subdivisions before declaring the trace lost inside the bar.
const MAX_STEPS: usize = 40;

/// Absolute tolerance for "already on the bar surface", square inches.
const SURFACE_TOL: f64 = 1e-9;

/// Trace the ground surface curve from `edge_point` (tool coordinates)
/// outward along the wheel circle to the bar surface.
///
/// Returns the ordered curve starting at the edge point and ending exactly
/// on the bar surface. An edge point already on the bar surface (a wing
/// tip) yields the single-point curve.
pub fn grind_curve(
    edge_point: &Point3,
    rotation: f64,
    jig: &JigConfig,
    wheel: &WheelConfig,
) -> Result<Vec<Point3>, SolveError> {
    let bar_r = jig.bar_radius();
    let bar_r2 = bar_r * bar_r;
    if radial2(edge_point) >= bar_r2 - SURFACE_TOL {
        return Ok(vec![*edge_point]);
    }

    let to_jig = jig.tool_transform(rotation);
    let to_tool = to_jig.inverse_rigid();
    let contact = to_jig.apply_point(edge_point);
    let rw = wheel.radius();
    // Wheel center: one radius behind the contact along the inward normal.
    let center = contact - rw * jig.wheel_normal();
    let a0 = jig.nose_angle();
    // The facet subtends at most ~bar_diameter/wheel_radius of wheel arc;
    // sweep twice that for margin.
    let sweep = 4.0 * bar_r / rw;

    let mut pts = vec![*edge_point];
    let mut prev_a = a0;
    for i in 1..=MAX_STEPS {
        let a = a0 + sweep * i as f64 / MAX_STEPS as f64;
        let p = to_tool.apply_point(&wheel_point(&center, rw, a));
        if radial2(&p) >= bar_r2 {
            let exit = refine_crossing(&to_tool, &center, rw, prev_a, a, bar_r2);
            pts.push(snap_to_bar(&exit, bar_r));
            return Ok(pts);
        }
        pts.push(p);
        prev_a = a;
    }
    Err(SolveError::NoIntersection { steps: MAX_STEPS })
}

/// Squared distance from the bar axis (tool z).
fn radial2(p: &Point3) -> f64 {
    p.x * p.x + p.y * p.y
}

/// Point on the wheel cross-section circle at wheel angle `a`, jig coords.
fn wheel_point(center: &Point3, rw: f64, a: f64) -> Point3 {
    Point3::new(center.x, center.y + rw * a.cos(), center.z - rw * a.sin())
}

/// Bisect the wheel angle to the bar-surface crossing.
fn refine_crossing(
    to_tool: &Transform,
    center: &Point3,
    rw: f64,
    mut lo: f64,
    mut hi: f64,
    bar_r2: f64,
) -> Point3 {
    for _ in 0..60 {
        let mid = 0.5 * (lo + hi);
        let p = to_tool.apply_point(&wheel_point(center, rw, mid));
        if radial2(&p) >= bar_r2 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    to_tool.apply_point(&wheel_point(center, rw, 0.5 * (lo + hi)))
}

/// Scale the x/y components onto the bar circle, keeping z.
fn snap_to_bar(p: &Point3, bar_r: f64) -> Point3 {
    let d = radial2(p).sqrt();
    if d <= 0.0 {
        return *p;
    }
    let s = bar_r / d;
    Point3::new(p.x * s, p.y * s, p.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nose_trace_ends_on_bar() {
        let jig = JigConfig::new(9.0, 40f64.to_radians(), 50f64.to_radians(), 0.25).unwrap();
        let wheel = WheelConfig::new(8.0).unwrap();
        let edge = Point3::new(0.0, -0.05, 0.0);
        let curve = grind_curve(&edge, 0.0, &jig, &wheel).unwrap();
        assert!(curve.len() >= 3);
        assert_eq!(curve[0], edge);
        // Upright trace stays in the x = 0 plane.
        for p in &curve {
            assert!(p.x.abs() < 1e-9);
        }
        let last = curve.last().unwrap();
        assert_relative_eq!(radial2(last).sqrt(), 0.25, epsilon = 1e-9);
        // The heel trails behind the edge.
        assert!(last.z < 0.0);
        assert!(last.y < edge.y);
    }

    #[test]
    fn test_trace_monotone_outward() {
        let jig = JigConfig::new(9.0, 40f64.to_radians(), 50f64.to_radians(), 0.25).unwrap();
        let wheel = WheelConfig::new(8.0).unwrap();
        let curve = grind_curve(&Point3::new(0.0, -0.05, 0.0), 0.0, &jig, &wheel).unwrap();
        for w in curve.windows(2) {
            assert!(radial2(&w[1]) > radial2(&w[0]) - 1e-12);
        }
    }

    #[test]
    fn test_wing_tip_is_single_point() {
        let jig = JigConfig::new(9.0, 40f64.to_radians(), 50f64.to_radians(), 0.25).unwrap();
        let wheel = WheelConfig::new(8.0).unwrap();
        let tip = Point3::new(0.25, 0.0, -0.1);
        let curve = grind_curve(&tip, 0.4, &jig, &wheel).unwrap();
        assert_eq!(curve, vec![tip]);
    }

    #[test]
    fn test_wheel_lost_inside_large_bar() {
        // A small wheel fully inside a large bar never reaches its surface.
        let jig = JigConfig::new(9.0, 30f64.to_radians(), 50f64.to_radians(), 2.0).unwrap();
        let wheel = WheelConfig::new(1.0).unwrap();
        let err = grind_curve(&Point3::new(0.0, -0.05, 0.0), 0.0, &jig, &wheel).unwrap_err();
        assert!(matches!(err, SolveError::NoIntersection { .. }));
    }

    #[test]
    fn test_rotated_trace_ends_on_bar() {
        let jig = JigConfig::new(9.4, 30f64.to_radians(), 50f64.to_radians(), 0.25).unwrap();
        let wheel = WheelConfig::new(8.0).unwrap();
        let edge = Point3::new(0.15, -0.02, -0.08);
        let curve = grind_curve(&edge, -0.35, &jig, &wheel).unwrap();
        let last = curve.last().unwrap();
        assert_relative_eq!(radial2(last).sqrt(), 0.25, epsilon = 1e-9);
    }
}
