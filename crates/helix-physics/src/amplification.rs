// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Amplification & Duty-Cycle Chain
// ─────────────────────────────────────────────────────────────────────
//! E_geo   = E_static · γ_geo                 (linear on the power path)
//! E_Q     = E_geo · m                        (m = mechanical multiplier)
//! E_cycle = E_Q · d_eff
//!
//! The mechanical multiplier is 1 in the raw chain, `q_mechanical` when
//! mechanical gain is switched on, and carries the calibration power
//! scale when one is held.

use serde::{Deserialize, Serialize};

use helix_types::KnobConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amplification {
    pub energy_geo_j: f64,
    pub mechanical_multiplier: f64,
    pub energy_q_j: f64,
    pub energy_cycle_j: f64,
}

/// Power-path multiplier for the given knobs and calibration scale.
pub fn mechanical_multiplier(knobs: &KnobConfig, power_scale: f64) -> f64 {
    let base = if knobs.mechanical_gain {
        knobs.q_mechanical
    } else {
        1.0
    };
    base * power_scale
}

pub fn amplify(
    static_energy_j: f64,
    gamma_geo: f64,
    mechanical_multiplier: f64,
    duty_fraction: f64,
) -> Amplification {
    let energy_geo_j = static_energy_j * gamma_geo;
    let energy_q_j = energy_geo_j * mechanical_multiplier;
    Amplification {
        energy_geo_j,
        mechanical_multiplier,
        energy_q_j,
        energy_cycle_j: energy_q_j * duty_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_chain_is_linear_in_gamma() {
        let amp = amplify(-2.0e-3, 26.0, 1.0, 5.0e-5);
        assert_eq!(amp.energy_geo_j, -2.0e-3 * 26.0);
        assert_eq!(amp.energy_q_j, amp.energy_geo_j);
        assert_eq!(amp.energy_cycle_j, amp.energy_q_j * 5.0e-5);
    }

    #[test]
    fn test_mechanical_multiplier_off_by_default() {
        let knobs = KnobConfig::default();
        assert_eq!(mechanical_multiplier(&knobs, 1.0), 1.0);
        assert_eq!(mechanical_multiplier(&knobs, 3.5), 3.5);
    }

    #[test]
    fn test_mechanical_multiplier_with_gain() {
        let knobs = KnobConfig {
            mechanical_gain: true,
            q_mechanical: 1.0e4,
            ..Default::default()
        };
        assert_eq!(mechanical_multiplier(&knobs, 2.0), 2.0e4);
        let amp = amplify(1.0, 10.0, mechanical_multiplier(&knobs, 1.0), 1.0);
        assert_eq!(amp.energy_q_j, 1.0e5);
    }

    #[test]
    fn test_gamma_monotonic() {
        let lo = amplify(-1.0e-3, 10.0, 1.0, 1e-5).energy_geo_j.abs();
        let hi = amplify(-1.0e-3, 11.0, 1.0, 1e-5).energy_geo_j.abs();
        assert!(hi > lo);
    }
}
