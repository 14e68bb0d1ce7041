// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Derived State Records
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{GeometryClass, Mode};

/// Tri-level compliance verdict, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Nominal,
    Warning,
    Critical,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Nominal => "NOMINAL",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
        })
    }
}

/// First guard that moved a state off NOMINAL, in classifier priority
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripReason {
    /// ζ ≥ 1.
    Stability,
    /// |E_Q| at or above the curvature limit.
    Curvature,
    /// P_total at or above the power ceiling.
    PowerCeiling,
    /// ζ inside the warning band.
    ZetaBand,
}

impl TripReason {
    /// Status this guard forces.
    pub fn status(self) -> Status {
        match self {
            TripReason::Stability | TripReason::Curvature => Status::Critical,
            TripReason::PowerCeiling | TripReason::ZetaBand => Status::Warning,
        }
    }
}

/// Independent compliance flags feeding the status classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFlags {
    /// ζ < 1.
    pub stability: bool,
    /// |E_Q| below the curvature limit.
    pub curvature: bool,
    /// Geometric constraint. Always true until a geometric check exists.
    pub geometric: bool,
}

/// Calibration held by a pipeline context.
///
/// Recomputation is a pure function of `(Configuration, CalibrationState)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CalibrationState {
    #[default]
    Uncalibrated,
    Calibrated {
        mode: Mode,
        /// Multiplier on the mechanical (power-path) factor.
        power_scale: f64,
        /// Multiplier on the long-range (mass-path) factor.
        mass_scale: f64,
    },
}

impl CalibrationState {
    /// `(power_scale, mass_scale)` to apply while `mode` is active.
    pub fn scales_for(&self, mode: Mode) -> (f64, f64) {
        match *self {
            CalibrationState::Calibrated {
                mode: held,
                power_scale,
                mass_scale,
            } if held == mode => (power_scale, mass_scale),
            _ => (1.0, 1.0),
        }
    }

    pub fn is_calibrated_for(&self, mode: Mode) -> bool {
        matches!(*self, CalibrationState::Calibrated { mode: held, .. } if held == mode)
    }
}

/// Flat record of every stage's output for one pipeline pass.
///
/// Intermediate values are kept so that a proof pack can re-derive and
/// display each equation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    pub mode: Mode,
    pub geometry_class: GeometryClass,

    // Geometry & tile census
    pub hull_area_m2: f64,
    pub tile_population: u64,

    // Static field (one reference tile)
    pub static_energy_j: f64,
    pub static_energy_per_area_j_m2: f64,
    pub static_force_n: f64,

    // Amplification chain
    pub gamma_geo: f64,
    pub mechanical_multiplier: f64,
    pub energy_geo_j: f64,
    pub energy_q_j: f64,
    pub energy_cycle_j: f64,

    // Sector scheduling
    pub total_sectors: u32,
    pub live_sectors: u32,
    pub tiles_per_sector: u64,
    pub active_tiles: u64,
    pub active_fraction: f64,
    /// Effective duty fraction (burst duty × live/total sectors).
    pub duty_fraction: f64,
    /// User-facing nominal duty cycle. Not used by the power path.
    pub nominal_duty: f64,
    pub q_spoil_factor: f64,

    // Power & mass
    pub omega_rad_s: f64,
    pub power_per_tile_w: f64,
    pub power_raw_w: f64,
    pub power_total_w: f64,
    pub power_total_mw: f64,
    pub gamma_long_range: f64,
    pub mass_energy_per_tile_j: f64,
    pub mass_raw_kg: f64,
    pub mass_total_kg: f64,

    // Calibration
    pub calibrated: bool,
    pub power_scale: f64,
    pub mass_scale: f64,

    // Time-scale separation
    pub ts_ratio_conservative: f64,
    pub ts_ratio_geometric: f64,

    // Compliance
    pub zeta: f64,
    pub compliance: ComplianceFlags,
    pub status: Status,
}

/// One sample of the diagnostic displacement field.
///
/// Field names are part of the export contract with external renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSample {
    /// Position in hull coordinates (m).
    pub position: [f64; 3],
    /// Ellipsoidal radius ρ (1.0 on the hull surface).
    pub ellipsoidal_radius: f64,
    pub bell_weight: f64,
    /// Unit outward normal of the ellipsoid through this sample.
    pub normal: [f64; 3],
    pub sector_sign: f64,
    /// Soft-clamped displacement, |d| < max_push.
    pub displacement: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(Status::Nominal < Status::Warning);
        assert!(Status::Warning < Status::Critical);
        assert_eq!(Status::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_trip_reason_status_and_wire_name() {
        assert_eq!(TripReason::Curvature.status(), Status::Critical);
        assert_eq!(TripReason::ZetaBand.status(), Status::Warning);
        assert_eq!(
            serde_json::to_string(&TripReason::PowerCeiling).unwrap(),
            "\"power_ceiling\""
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Warning).unwrap(), "\"WARNING\"");
    }

    #[test]
    fn test_field_sample_wire_names() {
        let sample = FieldSample {
            position: [1.0, 0.0, 0.0],
            ellipsoidal_radius: 1.0,
            bell_weight: 1.0,
            normal: [1.0, 0.0, 0.0],
            sector_sign: -1.0,
            displacement: 0.01,
        };
        let json = serde_json::to_string(&sample).unwrap();
        for key in ["ellipsoidalRadius", "bellWeight", "sectorSign", "displacement"] {
            assert!(json.contains(key), "{key} missing from {json}");
        }
    }

    #[test]
    fn test_uncalibrated_scales_are_unity() {
        assert_eq!(CalibrationState::Uncalibrated.scales_for(Mode::Hover), (1.0, 1.0));
    }

    #[test]
    fn test_calibrated_scales_only_for_held_mode() {
        let state = CalibrationState::Calibrated {
            mode: Mode::Hover,
            power_scale: 3.0,
            mass_scale: 0.5,
        };
        assert_eq!(state.scales_for(Mode::Hover), (3.0, 0.5));
        assert_eq!(state.scales_for(Mode::Cruise), (1.0, 1.0));
        assert!(state.is_calibrated_for(Mode::Hover));
        assert!(!state.is_calibrated_for(Mode::Standby));
    }

    #[test]
    fn test_calibration_state_tagged_json() {
        let state = CalibrationState::Calibrated {
            mode: Mode::Cruise,
            power_scale: 2.0,
            mass_scale: 4.0,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"state\":\"calibrated\""), "{json}");
        let back: CalibrationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
