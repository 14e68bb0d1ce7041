// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Power & Mass Derivation
// ─────────────────────────────────────────────────────────────────────
//! ω         = 2π f_m
//! P_tile    = |E_Q| · ω / Q_burst
//! P_total   = P_tile · N · d_eff
//! E_mass    = |E_static| · γ_geo³ · Q_burst · γ_LR · s_M · d_eff
//! M_total   = E_mass / c² · N
//!
//! The mass path uses γ_geo³ while the power path uses γ_geo¹. The two
//! channels are kept separate; do not unify the exponents.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::constants::{C_LIGHT, Q_BURST};

/// Inputs shared by the power and mass paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerMassInputs {
    pub static_energy_j: f64,
    pub energy_q_j: f64,
    pub gamma_geo: f64,
    pub gamma_long_range: f64,
    /// Calibration multiplier on γ_LR.
    pub mass_scale: f64,
    pub duty_fraction: f64,
    pub modulation_freq_hz: f64,
    pub tile_population: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerMass {
    pub omega_rad_s: f64,
    pub power_per_tile_w: f64,
    pub power_total_w: f64,
    pub mass_energy_per_tile_j: f64,
    pub mass_total_kg: f64,
}

pub fn angular_frequency(modulation_freq_hz: f64) -> f64 {
    TAU * modulation_freq_hz
}

/// Instantaneous per-tile loss (W).
pub fn power_per_tile(energy_q_j: f64, omega_rad_s: f64) -> f64 {
    energy_q_j.abs() * omega_rad_s / Q_BURST
}

/// Hull-aggregate averaged power (W).
pub fn total_power(power_per_tile_w: f64, tile_population: u64, duty_fraction: f64) -> f64 {
    power_per_tile_w * tile_population as f64 * duty_fraction
}

/// Duty-averaged mass-equivalent energy per tile (J).
pub fn mass_energy_per_tile(
    static_energy_j: f64,
    gamma_geo: f64,
    gamma_long_range: f64,
    mass_scale: f64,
    duty_fraction: f64,
) -> f64 {
    static_energy_j.abs()
        * gamma_geo.powi(3)
        * Q_BURST
        * (gamma_long_range * mass_scale)
        * duty_fraction
}

/// Cumulative mass-equivalent over the tile population (kg).
pub fn total_mass(mass_energy_per_tile_j: f64, tile_population: u64) -> f64 {
    mass_energy_per_tile_j / (C_LIGHT * C_LIGHT) * tile_population as f64
}

pub fn derive(inputs: &PowerMassInputs) -> PowerMass {
    let omega_rad_s = angular_frequency(inputs.modulation_freq_hz);
    let power_per_tile_w = power_per_tile(inputs.energy_q_j, omega_rad_s);
    let mass_energy_per_tile_j = mass_energy_per_tile(
        inputs.static_energy_j,
        inputs.gamma_geo,
        inputs.gamma_long_range,
        inputs.mass_scale,
        inputs.duty_fraction,
    );
    PowerMass {
        omega_rad_s,
        power_per_tile_w,
        power_total_w: total_power(power_per_tile_w, inputs.tile_population, inputs.duty_fraction),
        mass_energy_per_tile_j,
        mass_total_kg: total_mass(mass_energy_per_tile_j, inputs.tile_population),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(gamma_geo: f64) -> PowerMassInputs {
        let static_energy_j = -1.08e-3;
        PowerMassInputs {
            static_energy_j,
            energy_q_j: static_energy_j * gamma_geo,
            gamma_geo,
            gamma_long_range: 1.0e11,
            mass_scale: 1.0,
            duty_fraction: 5.0e-5,
            modulation_freq_hz: 15.0e9,
            tile_population: 2_000_000_000,
        }
    }

    #[test]
    fn test_power_per_tile_formula() {
        let pm = derive(&inputs(26.0));
        let expected = 1.08e-3 * 26.0 * TAU * 15.0e9 / 1.0e9;
        assert!((pm.power_per_tile_w - expected).abs() / expected < 1e-12);
        assert!((pm.omega_rad_s - TAU * 15.0e9).abs() < 1e-3);
    }

    #[test]
    fn test_total_power_scales_with_population_and_duty() {
        let pm = derive(&inputs(26.0));
        let expected = pm.power_per_tile_w * 2.0e9 * 5.0e-5;
        assert!((pm.power_total_w - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_mass_uses_cubic_gamma() {
        let a = derive(&inputs(10.0)).mass_total_kg;
        let b = derive(&inputs(20.0)).mass_total_kg;
        assert!((b / a - 8.0).abs() < 1e-9, "ratio={}", b / a);
    }

    #[test]
    fn test_power_uses_linear_gamma() {
        let a = derive(&inputs(10.0)).power_total_w;
        let b = derive(&inputs(20.0)).power_total_w;
        assert!((b / a - 2.0).abs() < 1e-9, "ratio={}", b / a);
    }

    #[test]
    fn test_mass_scale_does_not_touch_power() {
        let base = derive(&inputs(26.0));
        let scaled = derive(&PowerMassInputs {
            mass_scale: 1.0e-6,
            ..inputs(26.0)
        });
        assert_eq!(base.power_total_w, scaled.power_total_w);
        assert!((scaled.mass_total_kg / base.mass_total_kg - 1.0e-6).abs() < 1e-15);
    }

    #[test]
    fn test_mass_from_energy() {
        let m = total_mass(C_LIGHT * C_LIGHT, 3);
        assert!((m - 3.0).abs() < 1e-12);
    }
}
