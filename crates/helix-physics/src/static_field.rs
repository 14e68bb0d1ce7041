// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Static Field Module
// ─────────────────────────────────────────────────────────────────────
//! Baseline Casimir energy and force for one reference tile.
//!
//! - flat:      E = −(π²/720) ħc A / a³,          F = |E| / a
//! - spherical: F = (π³/360) ħc r / a⁴,           E = F · a
//! - curved:    E = E_flat · (1 + 1/(2 R_c/a)) · (1 + (s/r)²/2)
//!              with R_c = (r² + s²) / (2s); s = 0 degenerates to flat.
//!
//! `r = √(A/π)` is the radius of a disc with the tile's area.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use helix_types::{GeometryClass, GeometryConfig, HelixResult};

use crate::constants::{
    HBAR_C, LENGTH_FLOOR_M, PFA_FLAT_PREFACTOR, PFA_SPHERE_PREFACTOR, TEMPERATURE_CORRECTION,
};

/// Static field result for one reference tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticField {
    /// Total energy (J).
    pub total_energy_j: f64,
    /// Energy per unit tile area (J/m²).
    pub per_area_energy_j_m2: f64,
    /// Force magnitude (N).
    pub force_n: f64,
    /// Proximity-force correction applied (1.0 for flat/spherical).
    pub pfa_correction: f64,
    /// Surface-area correction applied (1.0 for flat/spherical).
    pub area_correction: f64,
}

/// Radius of the disc with the tile's area.
pub fn reference_radius(tile_area_m2: f64) -> f64 {
    (tile_area_m2 / PI).sqrt()
}

fn flat_energy(tile_area_m2: f64, gap_m: f64) -> f64 {
    -(PFA_FLAT_PREFACTOR * HBAR_C * tile_area_m2) / gap_m.powi(3)
}

/// Evaluate the static field for `class`.
pub fn evaluate(class: GeometryClass, tile_area_m2: f64, gap_m: f64, sag_depth_m: f64) -> StaticField {
    let gap = gap_m.max(LENGTH_FLOOR_M);
    let r = reference_radius(tile_area_m2).max(LENGTH_FLOOR_M);

    let (energy, force, pfa, area_corr) = match class {
        GeometryClass::Flat => {
            let e = flat_energy(tile_area_m2, gap);
            (e, e.abs() / gap, 1.0, 1.0)
        }
        GeometryClass::Spherical => {
            let f = (PFA_SPHERE_PREFACTOR * HBAR_C * r) / gap.powi(4);
            (f * gap, f, 1.0, 1.0)
        }
        GeometryClass::Curved => {
            let s = sag_depth_m.max(0.0);
            if s == 0.0 {
                let e = flat_energy(tile_area_m2, gap);
                (e, e.abs() / gap, 1.0, 1.0)
            } else {
                let s = s.max(LENGTH_FLOOR_M);
                let radius_of_curvature = (r * r + s * s) / (2.0 * s);
                let curvature_ratio = (radius_of_curvature / gap).max(LENGTH_FLOOR_M);
                let pfa = 1.0 + 1.0 / (2.0 * curvature_ratio);
                let area_corr = 1.0 + 0.5 * (s / r).powi(2);
                let e = flat_energy(tile_area_m2, gap) * pfa * area_corr;
                (e, e.abs() / gap, pfa, area_corr)
            }
        }
    };

    let total_energy_j = energy * TEMPERATURE_CORRECTION;
    StaticField {
        total_energy_j,
        per_area_energy_j_m2: total_energy_j / tile_area_m2.max(LENGTH_FLOOR_M * LENGTH_FLOOR_M),
        force_n: force * TEMPERATURE_CORRECTION,
        pfa_correction: pfa,
        area_correction: area_corr,
    }
}

/// Evaluate for a geometry section.
pub fn evaluate_geometry(geometry: &GeometryConfig) -> StaticField {
    evaluate(
        geometry.geometry_class,
        geometry.tile_area_m2,
        geometry.gap_m,
        geometry.sag_depth_m,
    )
}

/// Evaluate for a geometry class given by name.
///
/// Unknown names fail with `HelixError::UnsupportedGeometry`.
pub fn evaluate_named(
    class: &str,
    tile_area_m2: f64,
    gap_m: f64,
    sag_depth_m: f64,
) -> HelixResult<StaticField> {
    let class: GeometryClass = class.parse()?;
    Ok(evaluate(class, tile_area_m2, gap_m, sag_depth_m))
}
