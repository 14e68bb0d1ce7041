// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Compliance Gate
// ─────────────────────────────────────────────────────────────────────
//! Stability ratio and tri-level status classifier.
//!
//!   ζ = 1 / (d_eff · √Q_ref)
//!
//! Priority, first match wins:
//!   1. CRITICAL: ζ ≥ 1, or |E_Q| at/above the curvature limit
//!   2. WARNING:  P_total at/above the ceiling, or ζ ≥ 0.8
//!   3. NOMINAL
//!
//! Pure and total over finite inputs. The pipeline rejects NaN/Inf
//! before calling in here.

use helix_types::{ComplianceFlags, Status, TripReason};

use crate::constants::{CALIBRATION_EPSILON, CURVATURE_LIMIT_J, Q_REFERENCE, ZETA_WARNING};

/// Quantum-inequality-style stability margin.
pub fn stability_ratio(duty_fraction: f64) -> f64 {
    1.0 / (duty_fraction * Q_REFERENCE.sqrt()).max(CALIBRATION_EPSILON)
}

pub fn flags(zeta: f64, energy_q_j: f64) -> ComplianceFlags {
    ComplianceFlags {
        stability: zeta < 1.0,
        curvature: energy_q_j.abs() < CURVATURE_LIMIT_J,
        geometric: true,
    }
}

/// First guard that trips, or `None` for NOMINAL.
pub fn trip_reason(
    flags: &ComplianceFlags,
    zeta: f64,
    power_total_w: f64,
    power_ceiling_w: f64,
) -> Option<TripReason> {
    if !flags.stability {
        Some(TripReason::Stability)
    } else if !flags.curvature {
        Some(TripReason::Curvature)
    } else if power_total_w >= power_ceiling_w {
        Some(TripReason::PowerCeiling)
    } else if zeta >= ZETA_WARNING {
        Some(TripReason::ZetaBand)
    } else {
        None
    }
}

pub fn classify(
    flags: &ComplianceFlags,
    zeta: f64,
    power_total_w: f64,
    power_ceiling_w: f64,
) -> Status {
    trip_reason(flags, zeta, power_total_w, power_ceiling_w)
        .map_or(Status::Nominal, TripReason::status)
}

/// Flags and status in one call.
pub fn evaluate(
    zeta: f64,
    energy_q_j: f64,
    power_total_w: f64,
    power_ceiling_w: f64,
) -> (ComplianceFlags, Status) {
    let f = flags(zeta, energy_q_j);
    let status = classify(&f, zeta, power_total_w, power_ceiling_w);
    (f, status)
}
