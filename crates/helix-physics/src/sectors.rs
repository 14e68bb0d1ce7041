// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Sector Scheduler
// ─────────────────────────────────────────────────────────────────────
//! Maps the active mode to the fraction of tiles driven concurrently.
//!
//!   d_eff        = d_burst · S_live / S_total
//!   tiles/sector = ⌊N / S_total⌋
//!   active tiles = tiles/sector · S_live
//!
//! `d_eff` is the duty fraction used by every downstream stage. The
//! mode's nominal duty cycle is carried alongside it for display only.

use serde::{Deserialize, Serialize};

use helix_types::ModeProfile;

use crate::constants::{BURST_DUTY_LOCAL, TOTAL_SECTORS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorSchedule {
    pub total_sectors: u32,
    pub live_sectors: u32,
    pub tiles_per_sector: u64,
    pub active_tiles: u64,
    pub active_fraction: f64,
    pub duty_fraction: f64,
    pub nominal_duty: f64,
    pub q_spoil_factor: f64,
}

/// Schedule with the fixed sector count and local burst duty.
pub fn schedule(profile: &ModeProfile, tile_population: u64) -> SectorSchedule {
    schedule_with(TOTAL_SECTORS, BURST_DUTY_LOCAL, profile, tile_population)
}

/// Schedule with explicit sector count and burst duty.
///
/// Live sectors are clamped to `[0, total_sectors]` so the active
/// fraction stays in `[0, 1]`.
pub fn schedule_with(
    total_sectors: u32,
    burst_duty_local: f64,
    profile: &ModeProfile,
    tile_population: u64,
) -> SectorSchedule {
    let total = total_sectors.max(1);
    let live = profile.live_sectors.min(total);
    let active_fraction = live as f64 / total as f64;
    let tiles_per_sector = tile_population / total as u64;

    SectorSchedule {
        total_sectors: total,
        live_sectors: live,
        tiles_per_sector,
        active_tiles: tiles_per_sector * live as u64,
        active_fraction,
        duty_fraction: burst_duty_local.clamp(0.0, 1.0) * active_fraction,
        nominal_duty: profile.nominal_duty,
        q_spoil_factor: profile.q_spoil_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_types::Mode;
    use proptest::prelude::*;

    #[test]
    fn test_hover_duty_fraction() {
        let s = schedule(&Mode::Hover.profile(), 1_000_000);
        assert_eq!(s.live_sectors, 2);
        assert!((s.duty_fraction - 5.0e-5).abs() < 1e-18, "d={}", s.duty_fraction);
        assert!((s.active_fraction - 0.005).abs() < 1e-15);
        assert_eq!(s.tiles_per_sector, 2_500);
        assert_eq!(s.active_tiles, 5_000);
    }

    #[test]
    fn test_standby_halves_hover() {
        let hover = schedule(&Mode::Hover.profile(), 10_000);
        let standby = schedule(&Mode::Standby.profile(), 10_000);
        assert_eq!(standby.duty_fraction * 2.0, hover.duty_fraction);
    }

    #[test]
    fn test_effective_below_nominal_when_strobing() {
        // Standby is excluded: it reports zero nominal duty but keeps one
        // sector live, so d_eff = 2.5e-5 exceeds it.
        for mode in [Mode::Hover, Mode::Cruise, Mode::Emergency] {
            let s = schedule(&mode.profile(), 10_000);
            assert!(s.duty_fraction <= s.nominal_duty, "{mode}");
        }
    }

    #[test]
    fn test_standby_duty_exceeds_zero_nominal() {
        let s = schedule(&Mode::Standby.profile(), 10_000);
        assert_eq!(s.nominal_duty, 0.0);
        assert!((s.duty_fraction - 2.5e-5).abs() < 1e-18);
    }

    #[test]
    fn test_live_sectors_clamped() {
        let profile = ModeProfile {
            live_sectors: 900,
            nominal_duty: 1.0,
            q_spoil_factor: 1.0,
        };
        let s = schedule(&profile, 4_000);
        assert_eq!(s.live_sectors, TOTAL_SECTORS);
        assert_eq!(s.active_fraction, 1.0);
        assert_eq!(s.active_tiles, 4_000);
    }

    #[test]
    fn test_fewer_tiles_than_sectors() {
        let s = schedule(&Mode::Hover.profile(), 10);
        assert_eq!(s.tiles_per_sector, 0);
        assert_eq!(s.active_tiles, 0);
    }

    proptest! {
        #[test]
        fn prop_duty_and_tile_bounds(
            live in 0u32..1000,
            total in 1u32..1000,
            burst in 0.0f64..1.0,
            population in 1u64..10_000_000_000,
        ) {
            let profile = ModeProfile { live_sectors: live, nominal_duty: 0.1, q_spoil_factor: 1.0 };
            let s = schedule_with(total, burst, &profile, population);
            prop_assert!(s.duty_fraction >= 0.0);
            prop_assert!(s.duty_fraction <= burst);
            prop_assert!((0.0..=1.0).contains(&s.active_fraction));
            prop_assert!(s.active_tiles <= population);
        }
    }
}
