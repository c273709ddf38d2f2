//! Per-edge-point jig rotation solving.
//!
//! At the instant of contact the wheel presents a plane through the edge
//! point with a fixed normal in jig coordinates. A rotation grinds the
//! edge correctly when the edge tangent lies in that plane, i.e. when
//! `tangent . wheel_normal_in_tool(rotation) = 0`. That residual is a
//! smooth scalar function of one variable; we bracket its sign changes
//! with a coarse scan and refine each bracket by bisection.

use gouge_jig::JigConfig;
use gouge_math::{Point3, Vec3};
use std::f64::consts::FRAC_PI_2;

/// Physical swing limit of the jig, radians either side of upright.
pub const ROTATION_LIMIT: f64 = FRAC_PI_2;

/// Coarse scan intervals across the rotation range.
const SCAN_STEPS: usize = 180;

/// Bracket refinement width, radians. Well inside the 1e-6 target.
const REFINE_TOL: f64 = 1e-9;

/// Result of solving one edge point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedAngle {
    /// The edge point, in tool coordinates.
    pub edge_point: Point3,
    /// Jig rotation satisfying tangency, or `None` when no rotation in
    /// range does.
    pub angle: Option<f64>,
    /// `|tangency_residual|` at the returned angle, or the scan minimum
    /// when unsolved.
    pub residual: f64,
}

/// The tangency residual `tangent . wheel_normal_in_tool(rotation)`.
pub fn tangency_residual(tangent: &Vec3, jig: &JigConfig, rotation: f64) -> f64 {
    tangent.dot(&jig.wheel_normal_in_tool(rotation))
}

/// All rotations in `[-ROTATION_LIMIT, ROTATION_LIMIT]` where the residual
/// crosses zero, plus the smallest `|residual|` seen during the scan.
pub fn admissible_roots(tangent: &Vec3, jig: &JigConfig) -> (Vec<f64>, f64) {
    let step = 2.0 * ROTATION_LIMIT / SCAN_STEPS as f64;
    let mut roots: Vec<f64> = Vec::new();
    let mut min_abs = f64::INFINITY;
    let mut prev_r = -ROTATION_LIMIT;
    let mut prev_f = tangency_residual(tangent, jig, prev_r);
    min_abs = min_abs.min(prev_f.abs());
    if prev_f == 0.0 {
        roots.push(prev_r);
    }
    for i in 1..=SCAN_STEPS {
        let r = -ROTATION_LIMIT + step * i as f64;
        let f = tangency_residual(tangent, jig, r);
        min_abs = min_abs.min(f.abs());
        if f == 0.0 {
            roots.push(r);
        } else if prev_f != 0.0 && prev_f.signum() != f.signum() {
            roots.push(bisect(tangent, jig, prev_r, prev_f, r));
        }
        prev_r = r;
        prev_f = f;
    }
    roots.dedup_by(|a, b| (*a - *b).abs() < REFINE_TOL * 10.0);
    (roots, min_abs)
}

/// Refine a sign-change bracket to [`REFINE_TOL`] by bisection.
fn bisect(tangent: &Vec3, jig: &JigConfig, mut lo: f64, f_lo: f64, mut hi: f64) -> f64 {
    let mut sign_lo = f_lo.signum();
    for _ in 0..100 {
        if hi - lo <= REFINE_TOL {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = tangency_residual(tangent, jig, mid);
        if f_mid == 0.0 {
            return mid;
        }
        if f_mid.signum() == sign_lo {
            lo = mid;
            sign_lo = f_mid.signum();
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Choose among multiple admissible rotations: nearest the previous edge
/// point's angle when one exists (the grind varies smoothly along the
/// edge), otherwise nearest upright.
pub fn pick_root(roots: &[f64], previous: Option<f64>) -> Option<f64> {
    let key = |r: f64| match previous {
        Some(p) => (r - p).abs(),
        None => r.abs(),
    };
    roots.iter().copied().min_by(|a, b| {
        key(*a)
            .partial_cmp(&key(*b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Solve one edge point for the jig rotation that makes the grinding plane
/// contain the edge tangent.
pub fn solve_angle(
    edge_point: &Point3,
    tangent: &Vec3,
    jig: &JigConfig,
    previous: Option<f64>,
) -> SolvedAngle {
    let (roots, min_abs) = admissible_roots(tangent, jig);
    match pick_root(&roots, previous) {
        Some(angle) => SolvedAngle {
            edge_point: *edge_point,
            angle: Some(angle),
            residual: tangency_residual(tangent, jig, angle).abs(),
        },
        None => SolvedAngle {
            edge_point: *edge_point,
            angle: None,
            residual: min_abs,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn jig() -> JigConfig {
        JigConfig::new(9.4, 30f64.to_radians(), 50f64.to_radians(), 0.25).unwrap()
    }

    #[test]
    fn test_nose_tangent_solves_upright() {
        // A straight-across tip is ground with the jig upright.
        let j = jig();
        let solved = solve_angle(&Point3::new(0.0, -0.05, 0.0), &Vec3::x(), &j, None);
        let angle = solved.angle.expect("nose must solve");
        assert!(angle.abs() < 1e-6);
        assert!(solved.residual < 1e-9);
    }

    #[test]
    fn test_roundtrip_recovers_known_angle() {
        // Build a tangent that satisfies tangency exactly at 0.3 rad, then
        // recover it.
        let j = jig();
        let target = 0.3;
        let normal = j.wheel_normal_in_tool(target);
        let tangent = normal.cross(&Vec3::x());
        assert!(tangency_residual(&tangent, &j, target).abs() < 1e-12);
        let solved = solve_angle(&Point3::origin(), &tangent, &j, Some(target));
        assert_relative_eq!(solved.angle.unwrap(), target, epsilon = 1e-6);
    }

    #[test]
    fn test_continuity_tiebreak_prefers_previous() {
        let j = jig();
        let target = 0.3;
        let normal = j.wheel_normal_in_tool(target);
        let tangent = normal.cross(&Vec3::x());
        let (roots, _) = admissible_roots(&tangent, &j);
        assert!(!roots.is_empty());
        // Whatever other roots exist, the continuity pick stays near 0.3.
        let picked = pick_root(&roots, Some(0.29)).unwrap();
        assert_relative_eq!(picked, target, epsilon = 1e-6);
    }

    #[test]
    fn test_unsolvable_reports_scan_minimum() {
        // A tangent along the rotation axis never enters the grinding
        // plane: the residual keeps the sign of (axis . normal) for every
        // rotation, so no root exists.
        let j = jig();
        let axis = *j.rotation_axis().as_ref();
        let solved = solve_angle(&Point3::origin(), &axis, &j, None);
        assert_eq!(solved.angle, None);
        assert!(solved.residual > 0.0);
    }

    #[test]
    fn test_solved_tangent_lies_in_grinding_plane() {
        use gouge_math::Plane;
        let j = jig();
        let target = -0.45;
        let normal = j.wheel_normal_in_tool(target);
        let tangent = normal.cross(&Vec3::new(0.2, 1.0, 0.1));
        let solved = solve_angle(&Point3::new(0.1, -0.02, 0.0), &tangent, &j, Some(target));
        let angle = solved.angle.unwrap();
        let plane = Plane::new(
            Point3::new(0.1, -0.02, 0.0),
            j.wheel_normal_in_tool(angle),
        )
        .unwrap();
        let off_edge = Point3::new(0.1, -0.02, 0.0) + tangent;
        assert!(plane.signed_distance(&off_edge).abs() < 1e-6);
    }
}
