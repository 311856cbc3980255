//! Rotation modes, stages and angle permutations

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

/// Rotation policy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationMode {
    /// All rectangles stay at angle 0.
    Fixed0,
    /// Each rectangle is either 0 or 90 degrees.
    Discrete90,
    /// Each rectangle is one of 0, 45, 90 or 135 degrees.
    Discrete45,
    /// Angles are continuous decision variables in [0, pi).
    Free,
    /// Staged cascade: FIXED_0, DISCRETE_90, DISCRETE_45, FREE.
    #[default]
    Auto,
}

impl RotationMode {
    /// The stages this mode runs, in order.
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            RotationMode::Fixed0 => &[Stage::Fixed0],
            RotationMode::Discrete90 => &[Stage::Discrete90],
            RotationMode::Discrete45 => &[Stage::Discrete45],
            RotationMode::Free => &[Stage::Free],
            RotationMode::Auto => &[
                Stage::Fixed0,
                Stage::Discrete90,
                Stage::Discrete45,
                Stage::Free,
            ],
        }
    }
}

impl FromStr for RotationMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "fixed_0" | "fixed0" | "fixed" => Ok(RotationMode::Fixed0),
            "discrete_90" | "discrete90" => Ok(RotationMode::Discrete90),
            "discrete_45" | "discrete45" => Ok(RotationMode::Discrete45),
            "free" => Ok(RotationMode::Free),
            "auto" | "multistage" => Ok(RotationMode::Auto),
            _ => Err(format!("unknown rotation mode: {}", s)),
        }
    }
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationMode::Fixed0 => "FIXED_0",
            RotationMode::Discrete90 => "DISCRETE_90",
            RotationMode::Discrete45 => "DISCRETE_45",
            RotationMode::Free => "FREE",
            RotationMode::Auto => "AUTO",
        };
        f.write_str(name)
    }
}

/// One optimization stage: a concrete rotation policy with no cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// All rectangles at angle 0 (a single permutation).
    Fixed0,
    /// Discrete angle choices {0, 90} degrees per rectangle.
    Discrete90,
    /// Discrete angle choices {0, 45, 90, 135} degrees per rectangle.
    Discrete45,
    /// Continuous angles as decision variables.
    Free,
}

/// Angle choices for the two discrete stages, in radians.
const ANGLES_90: [f64; 2] = [0.0, FRAC_PI_2];
const ANGLES_45: [f64; 4] = [0.0, FRAC_PI_4, FRAC_PI_2, FRAC_PI_4 * 3.0];
const ANGLES_0: [f64; 1] = [0.0];

impl Stage {
    /// Per-rectangle angle choices for discrete stages; `None` for FREE.
    pub fn angle_choices(&self) -> Option<&'static [f64]> {
        match self {
            Stage::Fixed0 => Some(&ANGLES_0),
            Stage::Discrete90 => Some(&ANGLES_90),
            Stage::Discrete45 => Some(&ANGLES_45),
            Stage::Free => None,
        }
    }

    /// Number of angle permutations this stage enumerates for `n`
    /// rectangles: `choices^n` for discrete stages, 1 for FREE.
    pub fn permutation_count(&self, n: usize) -> u64 {
        match self.angle_choices() {
            Some(choices) => (choices.len() as u64)
                .checked_pow(n as u32)
                .unwrap_or(u64::MAX),
            None => 1,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fixed0 => "FIXED_0",
            Stage::Discrete90 => "DISCRETE_90",
            Stage::Discrete45 => "DISCRETE_45",
            Stage::Free => "FREE",
        };
        f.write_str(name)
    }
}

/// Decode permutation `index` of a discrete stage into per-rectangle
/// angles, treating the index as an `n`-digit number in base
/// `choices.len()`. Rectangle 0 is the lowest digit.
pub fn decode_permutation(index: u64, n: usize, choices: &[f64]) -> Vec<f64> {
    let base = choices.len() as u64;
    let mut angles = Vec::with_capacity(n);
    let mut rest = index;
    for _ in 0..n {
        angles.push(choices[(rest % base) as usize]);
        rest /= base;
    }
    angles
}
