//! The model facade: sample the cutting edge, solve every point, trace
//! every grind curve, and collect the serializable result.

use crate::angle::{admissible_roots, pick_root, solve_angle, tangency_residual};
use crate::error::{ModelError, Result};
use crate::trace::grind_curve;
use gouge_edge::{sample_params, CuttingEdgeCurve, EdgeProfile, FluteProfile};
use gouge_jig::JigConfig;
use gouge_math::{Point3, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Grinding wheel geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    diameter: f64,
}

impl WheelConfig {
    /// Validate and build a wheel configuration (diameter in inches).
    pub fn new(diameter: f64) -> Result<Self> {
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(ModelError::InvalidWheel(diameter));
        }
        Ok(Self { diameter })
    }

    /// Wheel diameter in inches.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Wheel radius in inches.
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

/// One edge point's result: the solved rotation (if any) and the ground
/// surface curve behind it. Coordinates are `[x, y, z]` tool-space inches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrindPoint {
    /// The edge point.
    pub edge_point: [f64; 3],
    /// Solved jig rotation in radians; `null` when the point is unsolvable.
    pub angle: Option<f64>,
    /// Tangency residual at the solved angle (scan minimum when unsolved).
    pub residual: f64,
    /// Grind curve from the edge to the bar surface; empty on failure.
    pub ground_curve: Vec<[f64; 3]>,
}

/// The complete ground-surface description: one record per edge sample,
/// ordered from the −x wing through the nose to the +x wing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrindProfile {
    /// Per-edge-point records.
    pub points: Vec<GrindPoint>,
}

impl GrindProfile {
    /// Number of edge points with a solved angle.
    pub fn solved_count(&self) -> usize {
        self.points.iter().filter(|p| p.angle.is_some()).count()
    }

    /// Indices of failed points (no angle, or no grind curve).
    pub fn failed(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.angle.is_none() || p.ground_curve.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// True when every edge point solved and traced.
    pub fn is_fully_solved(&self) -> bool {
        self.failed().is_empty()
    }

    /// Largest rotation jump between consecutive solved points, radians.
    ///
    /// A large value indicates a wrong-root selection somewhere along the
    /// edge.
    pub fn max_angle_step(&self) -> Option<f64> {
        let angles: Vec<f64> = self.points.iter().filter_map(|p| p.angle).collect();
        angles
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(None, |acc, d| Some(acc.map_or(d, |m: f64| m.max(d))))
    }

    /// Serialize to JSON — the boundary contract with viewers/exporters.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn xyz(p: &Point3) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// Validate the sample count and build the edge curve.
fn prepare(
    flute: &FluteProfile,
    edge: &EdgeProfile,
    samples: usize,
) -> Result<CuttingEdgeCurve> {
    if samples < 3 {
        return Err(ModelError::BadSampleCount(samples));
    }
    Ok(CuttingEdgeCurve::build(flute, edge)?)
}

fn finish(points: Vec<GrindPoint>) -> Result<GrindProfile> {
    let profile = GrindProfile { points };
    if profile.solved_count() == 0 {
        return Err(ModelError::AllPointsUnsolvable {
            points: profile.points.len(),
        });
    }
    Ok(profile)
}

/// Compute the full grind profile for a gouge design.
///
/// Pure function of its inputs. Edge points are solved left to right with
/// the continuity tie-break; unsolvable points are recorded with a `null`
/// angle and the run continues. Only total infeasibility is an error.
pub fn compute_model(
    flute: &FluteProfile,
    edge: &EdgeProfile,
    jig: &JigConfig,
    wheel: &WheelConfig,
    samples: usize,
) -> Result<GrindProfile> {
    let curve = prepare(flute, edge, samples)?;
    let mut points = Vec::with_capacity(samples);
    let mut previous: Option<f64> = None;
    for t in sample_params(samples) {
        let p = curve.point_at(t);
        let tangent = curve.tangent_at(t)?;
        let solved = solve_angle(&p, tangent.as_ref(), jig, previous);
        let ground = match solved.angle {
            Some(a) => {
                previous = Some(a);
                grind_curve(&p, a, jig, wheel).unwrap_or_default()
            }
            None => Vec::new(),
        };
        points.push(GrindPoint {
            edge_point: xyz(&p),
            angle: solved.angle,
            residual: solved.residual,
            ground_curve: ground.iter().map(xyz).collect(),
        });
    }
    finish(points)
}

/// Parallel variant: bracket every edge point's admissible rotations
/// concurrently, then choose roots in a strictly sequential continuity
/// pass. Identical results to [`compute_model`] for the same inputs.
pub fn compute_model_parallel(
    flute: &FluteProfile,
    edge: &EdgeProfile,
    jig: &JigConfig,
    wheel: &WheelConfig,
    samples: usize,
) -> Result<GrindProfile> {
    let curve = prepare(flute, edge, samples)?;
    let params: Vec<f64> = sample_params(samples).collect();
    let bracketed: Vec<(Point3, Vec3, Vec<f64>, f64)> = params
        .par_iter()
        .map(|&t| -> Result<(Point3, Vec3, Vec<f64>, f64)> {
            let p = curve.point_at(t);
            let tangent = *curve.tangent_at(t)?.as_ref();
            let (roots, min_abs) = admissible_roots(&tangent, jig);
            Ok((p, tangent, roots, min_abs))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut points = Vec::with_capacity(samples);
    let mut previous: Option<f64> = None;
    for (p, tangent, roots, min_abs) in bracketed {
        let angle = pick_root(&roots, previous);
        let (residual, ground) = match angle {
            Some(a) => {
                previous = Some(a);
                (
                    tangency_residual(&tangent, jig, a).abs(),
                    grind_curve(&p, a, jig, wheel).unwrap_or_default(),
                )
            }
            None => (min_abs, Vec::new()),
        };
        points.push(GrindPoint {
            edge_point: xyz(&p),
            angle,
            residual,
            ground_curve: ground.iter().map(xyz).collect(),
        });
    }
    finish(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario() -> (FluteProfile, EdgeProfile, JigConfig, WheelConfig) {
        // 1/2" bar, 0.05" flute tapering to nothing at the bar edge, flat
        // wings, 50° nose on a 9.4" jig at 30°, 8" wheel.
        let depths: Vec<(f64, f64)> = (0..=5)
            .map(|i| {
                let u = i as f64 * 0.05;
                (u, 0.05 * (1.0 - u / 0.25))
            })
            .collect();
        let flute = FluteProfile::from_depths(0.5, &depths).unwrap();
        let edge = EdgeProfile::flat_wing(&flute, 30f64.to_radians()).unwrap();
        let jig = JigConfig::new(9.4, 30f64.to_radians(), 50f64.to_radians(), 0.25).unwrap();
        let wheel = WheelConfig::new(8.0).unwrap();
        (flute, edge, jig, wheel)
    }

    #[test]
    fn test_wheel_validation() {
        assert!(WheelConfig::new(8.0).is_ok());
        assert!(WheelConfig::new(0.0).is_err());
        assert!(WheelConfig::new(-3.0).is_err());
        assert!(WheelConfig::new(f64::NAN).is_err());
    }

    #[test]
    fn test_sample_count_validated() {
        let (flute, edge, jig, wheel) = scenario();
        let err = compute_model(&flute, &edge, &jig, &wheel, 2).unwrap_err();
        assert!(matches!(err, ModelError::BadSampleCount(2)));
    }

    #[test]
    fn test_end_to_end_scenario_fully_solved() {
        let (flute, edge, jig, wheel) = scenario();
        let profile = compute_model(&flute, &edge, &jig, &wheel, 21).unwrap();
        assert_eq!(profile.points.len(), 21);
        assert_eq!(profile.solved_count(), 21);
        assert!(profile.is_fully_solved());
        // Nose sample: straight across, ground upright.
        let nose = &profile.points[10];
        assert!(nose.angle.unwrap().abs() < 1e-6);
        // Smooth variation along the edge.
        assert!(profile.max_angle_step().unwrap() < 0.2);
        // Wings roll to opposite sides.
        let left = profile.points[0].angle.unwrap();
        let right = profile.points[20].angle.unwrap();
        assert_relative_eq!(left, -right, epsilon = 1e-6);
        assert!(left.abs() > 0.05);
    }

    #[test]
    fn test_ground_curves_reach_bar() {
        let (flute, edge, jig, wheel) = scenario();
        let profile = compute_model(&flute, &edge, &jig, &wheel, 11).unwrap();
        let r = jig.bar_radius();
        for pt in &profile.points {
            let last = pt.ground_curve.last().unwrap();
            let radial = (last[0] * last[0] + last[1] * last[1]).sqrt();
            assert_relative_eq!(radial, r, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (flute, edge, jig, wheel) = scenario();
        let seq = compute_model(&flute, &edge, &jig, &wheel, 15).unwrap();
        let par = compute_model_parallel(&flute, &edge, &jig, &wheel, 15).unwrap();
        assert_eq!(seq.points.len(), par.points.len());
        for (a, b) in seq.points.iter().zip(par.points.iter()) {
            assert_eq!(a.angle.is_some(), b.angle.is_some());
            if let (Some(x), Some(y)) = (a.angle, b.angle) {
                assert_relative_eq!(x, y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let (flute, edge, jig, wheel) = scenario();
        let profile = compute_model(&flute, &edge, &jig, &wheel, 5).unwrap();
        let json = profile.to_json().unwrap();
        let restored = GrindProfile::from_json(&json).unwrap();
        assert_eq!(restored.points.len(), profile.points.len());
        assert_eq!(restored.points[2].angle, profile.points[2].angle);
        assert_eq!(restored.points[1].ground_curve, profile.points[1].ground_curve);
    }

    #[test]
    fn test_symmetric_design_symmetric_angles() {
        let (flute, edge, jig, wheel) = scenario();
        let profile = compute_model(&flute, &edge, &jig, &wheel, 21).unwrap();
        for i in 0..profile.points.len() / 2 {
            let a = profile.points[i].angle.unwrap();
            let b = profile.points[profile.points.len() - 1 - i].angle.unwrap();
            assert_relative_eq!(a, -b, epsilon = 1e-6);
        }
    }
}
