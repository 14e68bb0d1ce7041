// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Time-Scale Separation
// ─────────────────────────────────────────────────────────────────────
//! TS = T_LC / T_m with T_LC = 2L / c and T_m = 1 / f_m.
//!
//! Large TS means the hull cannot respond to individual modulation
//! cycles, so cycle-averaged quantities are meaningful. The conservative
//! variant takes L as the shortest half-axis, the geometric variant as
//! (abc)^(1/3).

use serde::{Deserialize, Serialize};

use crate::constants::{C_LIGHT, CALIBRATION_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScales {
    pub modulation_period_s: f64,
    pub light_crossing_conservative_s: f64,
    pub light_crossing_geometric_s: f64,
    pub ratio_conservative: f64,
    pub ratio_geometric: f64,
}

pub fn time_scales(half_dims_m: [f64; 3], modulation_freq_hz: f64) -> TimeScales {
    let [a, b, c] = half_dims_m;
    let shortest = a.min(b).min(c);
    let geometric_mean = (a * b * c).cbrt();

    let modulation_period_s = 1.0 / modulation_freq_hz.max(CALIBRATION_EPSILON);
    let light_crossing_conservative_s = 2.0 * shortest / C_LIGHT;
    let light_crossing_geometric_s = 2.0 * geometric_mean / C_LIGHT;

    TimeScales {
        modulation_period_s,
        light_crossing_conservative_s,
        light_crossing_geometric_s,
        ratio_conservative: light_crossing_conservative_s / modulation_period_s,
        ratio_geometric: light_crossing_geometric_s / modulation_period_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_variants_agree() {
        let ts = time_scales([5.0, 5.0, 5.0], 15.0e9);
        assert!((ts.ratio_conservative - ts.ratio_geometric).abs() / ts.ratio_geometric < 1e-12);
        let expected = (10.0 / C_LIGHT) * 15.0e9;
        assert!((ts.ratio_geometric - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_conservative_not_above_geometric() {
        let ts = time_scales([503.5, 132.0, 86.5], 15.0e9);
        assert!(ts.ratio_conservative <= ts.ratio_geometric);
        assert!(ts.ratio_conservative > 1.0);
    }

    #[test]
    fn test_period_frequency_relation() {
        let ts = time_scales([1.0, 1.0, 1.0], 15.0e9);
        assert!((ts.modulation_period_s * 15.0e9 - 1.0).abs() < 1e-12);
    }
}
