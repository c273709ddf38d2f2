#![warn(missing_docs)]

//! Grinding solver for bowl-gouge sharpening jigs.
//!
//! Given a cutting-edge curve, a jig configuration, and a wheel, this crate
//! answers the central question: through what jig rotation must the tool
//! roll so that the wheel grinds each point of the edge tangentially? From
//! the solved rotations it reconstructs the ground facet behind every edge
//! point, producing the complete ground-surface description.
//!
//! # Example
//!
//! ```ignore
//! use gouge_edge::{EdgeProfile, FluteProfile};
//! use gouge_jig::JigConfig;
//! use gouge_solver::{compute_model, WheelConfig};
//!
//! let flute = FluteProfile::parabola(0.5)?;
//! let edge = EdgeProfile::flat_wing(&flute, 0.5)?;
//! let jig = JigConfig::thompson(50f64.to_radians(), 0.25)?;
//! let wheel = WheelConfig::new(8.0)?;
//!
//! let profile = compute_model(&flute, &edge, &jig, &wheel, 21)?;
//! println!("solved {}/{}", profile.solved_count(), profile.points.len());
//! ```

pub mod angle;
pub mod error;
pub mod model;
pub mod trace;

pub use angle::{
    admissible_roots, pick_root, solve_angle, tangency_residual, SolvedAngle, ROTATION_LIMIT,
};
pub use error::{ModelError, Result, SolveError};
pub use model::{
    compute_model, compute_model_parallel, GrindPoint, GrindProfile, WheelConfig,
};
pub use trace::grind_curve;
