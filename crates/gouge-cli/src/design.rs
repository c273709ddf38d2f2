//! The `.gouge` design file: a JSON description of bar, flute, cutting
//! edge, jig, and wheel, resolved into solver inputs.

use anyhow::{Context, Result};
use gouge_edge::{EdgeProfile, FluteProfile};
use gouge_jig::JigConfig;
use gouge_solver::WheelConfig;
use serde::{Deserialize, Serialize};

/// Flute cross-section choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FluteSpec {
    /// Standard parabolic channel.
    Parabola,
    /// Measured (lateral offset, depth below rim) pairs, inches.
    Depths {
        /// Samples from the channel centre outward.
        samples: Vec<(f64, f64)>,
    },
}

/// Cutting-edge profile choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeSpec {
    /// Straight wings swept back at a fixed angle from the nose.
    FlatWing {
        /// Sweep-back angle, degrees.
        angle_degrees: f64,
    },
    /// Measured (height, axial offset) pairs, inches.
    Samples {
        /// Samples from the nose toward the wing tip.
        samples: Vec<(f64, f64)>,
    },
}

/// Sharpening-jig geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JigSpec {
    /// Thompson-style jig preset; only the nose angle varies.
    Thompson {
        /// Target nose bevel angle, degrees.
        nose_angle_degrees: f64,
    },
    /// Fully specified jig.
    Custom {
        /// Tip-to-pivot distance, inches.
        length: f64,
        /// Jig arm angle from the bar axis, degrees.
        angle_degrees: f64,
        /// Target nose bevel angle, degrees.
        nose_angle_degrees: f64,
    },
}

/// A complete gouge grinding design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// Bar stock diameter, inches.
    pub bar_diameter: f64,
    /// Flute cross-section.
    pub flute: FluteSpec,
    /// Cutting-edge profile.
    pub edge: EdgeSpec,
    /// Sharpening jig.
    pub jig: JigSpec,
    /// Grinding wheel diameter, inches.
    pub wheel_diameter: f64,
}

impl Design {
    /// Parse a design from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid design file")
    }

    /// Resolve the design into validated solver inputs.
    pub fn resolve(&self) -> Result<(FluteProfile, EdgeProfile, JigConfig, WheelConfig)> {
        let flute = match &self.flute {
            FluteSpec::Parabola => FluteProfile::parabola(self.bar_diameter),
            FluteSpec::Depths { samples } => {
                FluteProfile::from_depths(self.bar_diameter, samples)
            }
        }
        .context("invalid flute")?;

        let edge = match &self.edge {
            EdgeSpec::FlatWing { angle_degrees } => {
                EdgeProfile::flat_wing(&flute, angle_degrees.to_radians())
            }
            EdgeSpec::Samples { samples } => EdgeProfile::from_samples(samples),
        }
        .context("invalid edge profile")?;

        let bar_radius = self.bar_diameter / 2.0;
        let jig = match &self.jig {
            JigSpec::Thompson { nose_angle_degrees } => {
                JigConfig::thompson(nose_angle_degrees.to_radians(), bar_radius)
            }
            JigSpec::Custom {
                length,
                angle_degrees,
                nose_angle_degrees,
            } => JigConfig::new(
                *length,
                angle_degrees.to_radians(),
                nose_angle_degrees.to_radians(),
                bar_radius,
            ),
        }
        .context("invalid jig")?;

        let wheel = WheelConfig::new(self.wheel_diameter).context("invalid wheel")?;
        Ok((flute, edge, jig, wheel))
    }
}
