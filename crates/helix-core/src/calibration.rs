// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Calibration Feedback Pass
// ─────────────────────────────────────────────────────────────────────
//! One proportional step per knob, no integral term:
//!
//!   s_P = P_target / P_raw   (multiplies the mechanical factor)
//!   s_M = M_target / M_raw   (multiplies the long-range factor)
//!
//! Power and mass are each linear in their own scale, so one step lands
//! on the target up to rounding. The two knobs never touch each other's
//! path.

use serde::{Deserialize, Serialize};

use helix_types::{CalibrationState, HelixError, HelixResult, KnobConfig, Mode};

use helix_physics::constants::CALIBRATION_EPSILON;

/// Targets the pass steers toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTargets {
    pub power_target_w: f64,
    pub mass_target_kg: f64,
}

impl CalibrationTargets {
    pub fn from_knobs(knobs: &KnobConfig) -> Self {
        Self {
            power_target_w: knobs.power_target_w,
            mass_target_kg: knobs.mass_target_kg,
        }
    }
}

/// Proportional scale `target / measured`.
///
/// Fails with `CalibrationDegenerate` when `measured` is at or below ε
/// (or not finite), or when the resulting scale is not finite and
/// positive.
pub fn proportional_scale(quantity: &'static str, measured: f64, target: f64) -> HelixResult<f64> {
    let degenerate = || HelixError::CalibrationDegenerate {
        quantity,
        measured,
        target,
    };
    if !measured.is_finite() || measured <= CALIBRATION_EPSILON {
        return Err(degenerate());
    }
    let scale = target / measured;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(degenerate());
    }
    Ok(scale)
}

/// Run the pass for `mode` against raw (uncalibrated) totals.
pub fn calibrate(
    mode: Mode,
    raw_power_w: f64,
    raw_mass_kg: f64,
    targets: &CalibrationTargets,
) -> HelixResult<CalibrationState> {
    let power_scale = proportional_scale("power", raw_power_w, targets.power_target_w)?;
    let mass_scale = proportional_scale("mass", raw_mass_kg, targets.mass_target_kg)?;
    Ok(CalibrationState::Calibrated {
        mode,
        power_scale,
        mass_scale,
    })
}
