// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Geometry & Tile Census
// ─────────────────────────────────────────────────────────────────────
//! Hull surface area (Knud–Thomsen ellipsoid approximation) and the
//! integer tile population covering it:
//!
//!   A = 4π · (((ab)^p + (ac)^p + (bc)^p) / 3)^(1/p),   p = 1.6075
//!   N = ⌊⌊A / A_tile⌋ · layers · packing⌋,               N ≥ 1

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use helix_types::{HelixError, HelixResult};

use crate::constants::{KNUD_THOMSEN_P, PACKING_FACTOR, RADIAL_LAYERS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileCensus {
    pub hull_area_m2: f64,
    pub tile_population: u64,
}

/// Knud–Thomsen surface area of an ellipsoid with half-axes `a, b, c`.
///
/// Axes are sorted before summation so the result is bit-identical under
/// any permutation of the inputs.
pub fn knud_thomsen_area(a: f64, b: f64, c: f64) -> f64 {
    let mut d = [a, b, c];
    d.sort_by(f64::total_cmp);
    let [x, y, z] = d;
    let p = KNUD_THOMSEN_P;
    let mean = ((x * y).powf(p) + (x * z).powf(p) + (y * z).powf(p)) / 3.0;
    4.0 * PI * mean.powf(1.0 / p)
}

/// Hull area and tile population.
pub fn tile_census(half_dims_m: [f64; 3], tile_area_m2: f64) -> HelixResult<TileCensus> {
    for (axis, dim) in ["a", "b", "c"].iter().zip(half_dims_m) {
        if !(dim.is_finite() && dim > 0.0) {
            return Err(HelixError::Configuration(format!(
                "hull half-dimension {axis} must be > 0, got {dim}"
            )));
        }
    }
    if !(tile_area_m2.is_finite() && tile_area_m2 > 0.0) {
        return Err(HelixError::Configuration(format!(
            "tile area must be > 0, got {tile_area_m2}"
        )));
    }

    let [a, b, c] = half_dims_m;
    let hull_area_m2 = knud_thomsen_area(a, b, c);
    let per_layer = (hull_area_m2 / tile_area_m2).floor();
    let population = (per_layer * RADIAL_LAYERS * PACKING_FACTOR).floor().max(1.0);

    Ok(TileCensus {
        hull_area_m2,
        tile_population: population as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sphere_area_is_exact() {
        // For a = b = c the approximation reduces to 4πr².
        let r = 3.0;
        let area = knud_thomsen_area(r, r, r);
        assert!((area - 4.0 * PI * r * r).abs() < 1e-9, "area={area}");
    }

    #[test]
    fn test_prolate_within_knud_thomsen_error() {
        // Prolate spheroid a=2, b=c=1: exact area ≈ 21.4784.
        let area = knud_thomsen_area(2.0, 1.0, 1.0);
        assert!((area - 21.4784).abs() / 21.4784 < 0.011, "area={area}");
    }

    #[test]
    fn test_census_reference_hull() {
        let census = tile_census([503.5, 132.0, 86.5], 25.0e-4).unwrap();
        let expected =
            ((census.hull_area_m2 / 25.0e-4).floor() * RADIAL_LAYERS * PACKING_FACTOR).floor();
        assert_eq!(census.tile_population, expected as u64);
        assert!(census.hull_area_m2 > 3.0e5 && census.hull_area_m2 < 6.0e5);
    }

    #[test]
    fn test_census_minimum_one_tile() {
        let census = tile_census([1e-3, 1e-3, 1e-3], 1.0).unwrap();
        assert_eq!(census.tile_population, 1);
    }

    #[test]
    fn test_census_rejects_zero_dimension() {
        let err = tile_census([1.0, 0.0, 1.0], 1e-4).unwrap_err();
        assert!(matches!(err, HelixError::Configuration(_)));
    }

    #[test]
    fn test_census_rejects_non_positive_tile_area() {
        assert!(tile_census([1.0, 1.0, 1.0], 0.0).is_err());
        assert!(tile_census([1.0, 1.0, 1.0], f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn prop_area_symmetric_under_permutation(
            a in 1e-3f64..1e4,
            b in 1e-3f64..1e4,
            c in 1e-3f64..1e4,
        ) {
            let base = knud_thomsen_area(a, b, c);
            for (x, y, z) in [(a, c, b), (b, a, c), (b, c, a), (c, a, b), (c, b, a)] {
                prop_assert_eq!(knud_thomsen_area(x, y, z).to_bits(), base.to_bits());
            }
        }
    }
}
