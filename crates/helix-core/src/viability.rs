// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Viability Phase Grid
// ─────────────────────────────────────────────────────────────────────
//! Sweeps tile area × hull scale through the full pipeline, one fresh
//! context per design point, and records where each point lands.
//!
//! Both axes are sampled linearly, endpoints included. The hull scale
//! multiplies every half-dimension of the base configuration.
//!
//! Each successful point carries the compliance flags and the first guard
//! that tripped, so a WARNING or CRITICAL cell says why. Failed points
//! carry the error text instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use helix_physics::trip_reason;
use helix_types::{
    ComplianceFlags, Configuration, DerivedState, HelixError, HelixResult, Status, TripReason,
};

use crate::pipeline::PipelineContext;
use crate::trace::NullSink;

/// Inclusive sweep range along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
}

impl SweepRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, axis: &str) -> HelixResult<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min > 0.0) {
            return Err(HelixError::Configuration(format!(
                "{axis} range must be finite and positive, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(HelixError::Configuration(format!(
                "{axis} range is inverted: [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn point(&self, i: usize, resolution: usize) -> f64 {
        if i + 1 == resolution {
            return self.max;
        }
        let t = i as f64 / (resolution - 1) as f64;
        self.min + (self.max - self.min) * t
    }
}

/// One design point. Failed points carry no status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityPoint {
    #[serde(rename = "tileArea")]
    pub tile_area_m2: f64,
    pub hull_scale: f64,
    pub status: Option<Status>,
    pub reason: Option<TripReason>,
    pub compliance: Option<ComplianceFlags>,
    pub zeta: Option<f64>,
    pub power_mw: Option<f64>,
    pub mass_kg: Option<f64>,
    pub ts_ratio_conservative: Option<f64>,
    pub ts_ratio_geometric: Option<f64>,
    #[serde(rename = "tileCount")]
    pub tile_population: Option<u64>,
    #[serde(rename = "hullArea")]
    pub hull_area_m2: Option<f64>,
    pub error: Option<String>,
}

impl ViabilityPoint {
    fn derived(area: f64, scale: f64, s: &DerivedState, power_ceiling_w: f64) -> Self {
        Self {
            tile_area_m2: area,
            hull_scale: scale,
            status: Some(s.status),
            reason: trip_reason(&s.compliance, s.zeta, s.power_total_w, power_ceiling_w),
            compliance: Some(s.compliance),
            zeta: Some(s.zeta),
            power_mw: Some(s.power_total_mw),
            mass_kg: Some(s.mass_total_kg),
            ts_ratio_conservative: Some(s.ts_ratio_conservative),
            ts_ratio_geometric: Some(s.ts_ratio_geometric),
            tile_population: Some(s.tile_population),
            hull_area_m2: Some(s.hull_area_m2),
            error: None,
        }
    }

    fn failed(area: f64, scale: f64, err: &HelixError) -> Self {
        Self {
            tile_area_m2: area,
            hull_scale: scale,
            status: None,
            reason: None,
            compliance: None,
            zeta: None,
            power_mw: None,
            mass_kg: None,
            ts_ratio_conservative: None,
            ts_ratio_geometric: None,
            tile_population: None,
            hull_area_m2: None,
            error: Some(err.to_string()),
        }
    }
}

/// Sweep result, hull scale outer, tile area inner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityGrid {
    pub resolution: usize,
    pub tile_areas_m2: Vec<f64>,
    pub hull_scales: Vec<f64>,
    pub points: Vec<ViabilityPoint>,
    pub failed: usize,
}

impl ViabilityGrid {
    /// Point at (hull scale index, tile area index).
    pub fn at(&self, scale_idx: usize, area_idx: usize) -> Option<&ViabilityPoint> {
        if scale_idx >= self.resolution || area_idx >= self.resolution {
            return None;
        }
        self.points.get(scale_idx * self.resolution + area_idx)
    }

    pub fn count(&self, status: Status) -> usize {
        self.points
            .iter()
            .filter(|p| p.status == Some(status))
            .count()
    }
}

/// Run the sweep. `resolution` points per axis, at least 2.
pub fn sweep(
    base: &Configuration,
    tile_area_m2: SweepRange,
    hull_scale: SweepRange,
    resolution: usize,
) -> HelixResult<ViabilityGrid> {
    if resolution < 2 {
        return Err(HelixError::Configuration(format!(
            "sweep resolution must be >= 2, got {resolution}"
        )));
    }
    tile_area_m2.validate("tile area")?;
    hull_scale.validate("hull scale")?;

    let tile_areas: Vec<f64> = (0..resolution)
        .map(|i| tile_area_m2.point(i, resolution))
        .collect();
    let hull_scales: Vec<f64> = (0..resolution)
        .map(|i| hull_scale.point(i, resolution))
        .collect();

    let mut points = Vec::with_capacity(resolution * resolution);
    let mut failed = 0usize;

    for &scale in &hull_scales {
        for &area in &tile_areas {
            let mut cfg = base.clone();
            cfg.geometry.tile_area_m2 = area;
            for dim in cfg.geometry.hull_half_dims_m.iter_mut() {
                *dim *= scale;
            }

            let ceiling = cfg.compliance.power_ceiling_w;
            let point = match PipelineContext::with_sink(cfg, Arc::new(NullSink)) {
                Ok(ctx) => ViabilityPoint::derived(area, scale, ctx.state(), ceiling),
                Err(e) => {
                    log::debug!("viability point (A={area:.3e}, scale={scale:.3}) failed: {e}");
                    failed += 1;
                    ViabilityPoint::failed(area, scale, &e)
                }
            };
            points.push(point);
        }
    }

    if failed > 0 {
        log::warn!("viability sweep: {failed} of {} points failed", points.len());
    }

    Ok(ViabilityGrid {
        resolution,
        tile_areas_m2: tile_areas,
        hull_scales,
        points,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> (SweepRange, SweepRange) {
        (SweepRange::new(1.0e-4, 1.0e-2), SweepRange::new(0.5, 2.0))
    }

    #[test]
    fn test_grid_shape_and_endpoints() {
        let (area, scale) = ranges();
        let grid = sweep(&Configuration::default(), area, scale, 3).unwrap();
        assert_eq!(grid.points.len(), 9);
        assert_eq!(grid.tile_areas_m2[0], 1.0e-4);
        assert!((grid.tile_areas_m2[1] - 5.05e-3).abs() < 1e-15);
        assert_eq!(grid.tile_areas_m2[2], 1.0e-2);
        assert_eq!(grid.hull_scales.first(), Some(&0.5));
        assert_eq!(grid.hull_scales.last(), Some(&2.0));
        assert_eq!(grid.failed, 0);
        let p = grid.at(2, 0).unwrap();
        assert_eq!(p.hull_scale, 2.0);
        assert_eq!(p.tile_area_m2, 1.0e-4);
        assert!(grid.at(3, 0).is_none());
    }

    #[test]
    fn test_every_point_has_status() {
        let (area, scale) = ranges();
        let grid = sweep(&Configuration::default(), area, scale, 4).unwrap();
        let total: usize = [Status::Nominal, Status::Warning, Status::Critical]
            .into_iter()
            .map(|s| grid.count(s))
            .sum();
        assert_eq!(total, grid.points.len());
    }

    #[test]
    fn test_matches_direct_pipeline() {
        let (area, scale) = ranges();
        let grid = sweep(&Configuration::default(), area, scale, 2).unwrap();
        let mut cfg = Configuration::default();
        cfg.geometry.tile_area_m2 = 1.0e-2;
        for d in cfg.geometry.hull_half_dims_m.iter_mut() {
            *d *= 0.5;
        }
        let ctx = PipelineContext::new(cfg).unwrap();
        let p = grid.at(0, 1).unwrap();
        assert_eq!(p.power_mw, Some(ctx.state().power_total_mw));
        assert_eq!(p.mass_kg, Some(ctx.state().mass_total_kg));
    }

    #[test]
    fn test_failed_points_are_counted() {
        let mut base = Configuration::default();
        base.calibration.enabled = true;
        base.knobs.gamma_long_range = 1.0e-60;
        let (area, scale) = ranges();
        let grid = sweep(&base, area, scale, 2).unwrap();
        assert_eq!(grid.failed, 4);
        assert!(grid.points.iter().all(|p| p.status.is_none()));
        assert!(grid.points.iter().all(|p| p.error.is_some() && p.reason.is_none()));
    }

    #[test]
    fn test_low_ceiling_reports_power_reason() {
        let mut base = Configuration::default();
        base.compliance.power_ceiling_w = 1.0;
        let (area, scale) = ranges();
        let grid = sweep(&base, area, scale, 3).unwrap();
        assert_eq!(grid.count(Status::Warning), grid.points.len());
        for p in &grid.points {
            assert_eq!(p.reason, Some(TripReason::PowerCeiling));
            let flags = p.compliance.unwrap();
            assert!(flags.stability && flags.curvature);
        }
    }

    #[test]
    fn test_reason_agrees_with_status() {
        let (area, scale) = ranges();
        let grid = sweep(&Configuration::default(), area, scale, 4).unwrap();
        for p in &grid.points {
            let expected = p.reason.map_or(Status::Nominal, TripReason::status);
            assert_eq!(p.status, Some(expected));
        }
    }

    #[test]
    fn test_point_carries_diagnostics() {
        let (area, scale) = ranges();
        let grid = sweep(&Configuration::default(), area, scale, 2).unwrap();
        let mut cfg = Configuration::default();
        cfg.geometry.tile_area_m2 = 1.0e-4;
        for d in cfg.geometry.hull_half_dims_m.iter_mut() {
            *d *= 2.0;
        }
        let ctx = PipelineContext::new(cfg).unwrap();
        let s = ctx.state();
        let p = grid.at(1, 0).unwrap();
        assert_eq!(p.tile_population, Some(s.tile_population));
        assert_eq!(p.hull_area_m2, Some(s.hull_area_m2));
        assert_eq!(p.ts_ratio_conservative, Some(s.ts_ratio_conservative));
        assert_eq!(p.ts_ratio_geometric, Some(s.ts_ratio_geometric));
        assert_eq!(p.compliance, Some(s.compliance));
        assert!(p.error.is_none());
    }

    #[test]
    fn test_resolution_below_two_rejected() {
        let (area, scale) = ranges();
        assert!(sweep(&Configuration::default(), area, scale, 1).is_err());
    }

    #[test]
    fn test_bad_ranges_rejected() {
        let cfg = Configuration::default();
        let ok = SweepRange::new(1.0, 2.0);
        assert!(sweep(&cfg, SweepRange::new(-1.0, 1.0), ok, 2).is_err());
        assert!(sweep(&cfg, ok, SweepRange::new(3.0, 2.0), 2).is_err());
        assert!(sweep(&cfg, ok, SweepRange::new(1.0, f64::INFINITY), 2).is_err());
    }

    #[test]
    fn test_wire_names() {
        let (area, scale) = ranges();
        let grid = sweep(&Configuration::default(), area, scale, 2).unwrap();
        let json = serde_json::to_string(&grid.points[0]).unwrap();
        for key in [
            "tileArea",
            "hullScale",
            "status",
            "reason",
            "compliance",
            "zeta",
            "powerMw",
            "massKg",
            "tsRatioConservative",
            "tsRatioGeometric",
            "tileCount",
            "hullArea",
        ] {
            assert!(json.contains(key), "{key} missing from {json}");
        }
    }
}
