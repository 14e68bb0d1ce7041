// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Sector Gate Weight
// ─────────────────────────────────────────────────────────────────────
//! Azimuthal gate weighting for the field export path.
//!
//! - gaussian:   wrapped distance to the sector center (plus an optional
//!               split twin half a turn away), normalised by the mean
//!               gaussian min(1, σ·√(2π))
//! - contiguous: the first `live` of `total` sectors are on, normalised
//!               by the live fraction
//!
//! Both are capped at 12, lifted by the floor, then shaped:
//!   w = sqrt(max(0, floor + (1 − floor)·g))^max(0.5, lump_exp)

use helix_types::{SectorGateParams, SyncMode};

const NORM_CAP: f64 = 12.0;
const SQRT_TAU: f64 = 2.506_628_274_631_000_5;

fn wrapped_distance(a01: f64, center01: f64) -> f64 {
    let d = (a01 - center01).abs();
    d.min(1.0 - d)
}

/// Gate weight at azimuth fraction `a01` (any real; wrapped to [0, 1)).
pub fn gate_weight(a01: f64, gp: &SectorGateParams) -> f64 {
    let total = gp.total_sectors.max(1);
    let live = gp.live_sectors.clamp(1, total);
    let a01 = (a01 + gp.phase01.rem_euclid(1.0)).rem_euclid(1.0);

    let floor_frac = gp.sector_floor.clamp(0.0, 0.99);
    let peak_frac = 1.0 - floor_frac;

    let g_norm = match gp.sync_mode {
        SyncMode::Gaussian => {
            let center = gp.sector_center01.rem_euclid(1.0);
            let sigma = gp.sector_sigma01.max(1e-4);
            let bump = |c: f64| {
                let d = wrapped_distance(a01, c);
                (-0.5 * d * d / (sigma * sigma)).exp()
            };
            let mut g = bump(center);
            if gp.split_enabled {
                let w_a = gp.split_frac.clamp(0.0, 1.0);
                g = g * w_a + bump((center + 0.5).rem_euclid(1.0)) * (1.0 - w_a);
            }
            let avg = (sigma * SQRT_TAU).min(1.0);
            (g / avg.max(1e-4)).min(NORM_CAP)
        }
        SyncMode::Contiguous => {
            let idx = (a01 * total as f64).floor() as u32;
            let on = if idx < live { 1.0 } else { 0.0 };
            let frac = (1.0 / total as f64).max(live as f64 / total as f64);
            (on / frac.max(1e-9)).min(NORM_CAP)
        }
    };

    let w_norm = floor_frac + peak_frac * g_norm;
    w_norm.max(0.0).sqrt().powf(gp.lump_exp.max(0.5))
}
