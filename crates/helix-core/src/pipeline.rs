// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Pipeline Context
// ─────────────────────────────────────────────────────────────────────
//! Caller-owned pipeline session.
//!
//! A `PipelineContext` holds one configuration, the calibration it has
//! accepted, and the derived state of the last successful pass. Every
//! mutation triggers a full forward recomputation. A failed pass leaves
//! the context exactly as it was.
//!
//! `derive_state` is the pure core: `(Configuration, CalibrationState)`
//! in, `DerivedState` out.

use std::fmt;
use std::sync::Arc;

use helix_types::error::ensure_finite;
use helix_types::{
    CalibrationState, ConfigPatch, Configuration, DerivedState, HelixResult, Status,
};

use helix_physics::power::{self, PowerMassInputs};
use helix_physics::{
    amplify, compliance, evaluate_geometry, mechanical_multiplier, schedule, stability_ratio,
    tile_census, time_scales,
};

use crate::calibration::{calibrate, CalibrationTargets};
use crate::trace::{LogSink, PipelineEvent, TraceSink};

/// Run every stage once for `config` under `calibration`.
///
/// Calibration scales apply only while calibration is enabled and the
/// held mode is the active mode.
pub fn derive_state(
    config: &Configuration,
    calibration: &CalibrationState,
) -> HelixResult<DerivedState> {
    config.validate()?;
    let geometry = &config.geometry;
    let knobs = &config.knobs;
    let mode = config.operating.mode;

    // 1. Geometry & tile census
    let census = tile_census(geometry.hull_half_dims_m, geometry.tile_area_m2)?;
    let n = census.tile_population;

    // 2. Static field
    let field = evaluate_geometry(geometry);
    let static_energy_j = ensure_finite("static energy", field.total_energy_j)?;

    // 4. Sector scheduling (feeds the duty fraction of stage 3)
    let profile = config.mode_profile();
    let sched = schedule(&profile, n);
    let duty = sched.duty_fraction;

    let (power_scale, mass_scale) = if config.calibration.enabled {
        calibration.scales_for(mode)
    } else {
        (1.0, 1.0)
    };
    let calibrated = config.calibration.enabled && calibration.is_calibrated_for(mode);

    // 3. Amplification, raw and as applied
    let amp_raw = amplify(
        static_energy_j,
        knobs.gamma_geo,
        mechanical_multiplier(knobs, 1.0),
        duty,
    );
    let amp = amplify(
        static_energy_j,
        knobs.gamma_geo,
        mechanical_multiplier(knobs, power_scale),
        duty,
    );

    // 5. Power & mass, raw and as applied
    let inputs = PowerMassInputs {
        static_energy_j,
        energy_q_j: amp_raw.energy_q_j,
        gamma_geo: knobs.gamma_geo,
        gamma_long_range: knobs.gamma_long_range,
        mass_scale: 1.0,
        duty_fraction: duty,
        modulation_freq_hz: config.operating.modulation_freq_hz,
        tile_population: n,
    };
    let raw = power::derive(&inputs);
    let pm = power::derive(&PowerMassInputs {
        energy_q_j: amp.energy_q_j,
        mass_scale,
        ..inputs
    });

    let ts = time_scales(geometry.hull_half_dims_m, config.operating.modulation_freq_hz);
    let zeta = stability_ratio(duty);

    // Nothing non-finite may reach the gate.
    let energy_q_j = ensure_finite("E_Q", amp.energy_q_j)?;
    let power_total_w = ensure_finite("P_total", pm.power_total_w)?;
    let mass_total_kg = ensure_finite("M_total", pm.mass_total_kg)?;
    let zeta = ensure_finite("zeta", zeta)?;
    ensure_finite("P_raw", raw.power_total_w)?;
    ensure_finite("M_raw", raw.mass_total_kg)?;

    // 7. Compliance
    let (flags, status) = compliance::evaluate(
        zeta,
        energy_q_j,
        power_total_w,
        config.compliance.power_ceiling_w,
    );

    Ok(DerivedState {
        mode,
        geometry_class: geometry.geometry_class,
        hull_area_m2: census.hull_area_m2,
        tile_population: n,
        static_energy_j,
        static_energy_per_area_j_m2: field.per_area_energy_j_m2,
        static_force_n: field.force_n,
        gamma_geo: knobs.gamma_geo,
        mechanical_multiplier: amp.mechanical_multiplier,
        energy_geo_j: amp.energy_geo_j,
        energy_q_j,
        energy_cycle_j: amp.energy_cycle_j,
        total_sectors: sched.total_sectors,
        live_sectors: sched.live_sectors,
        tiles_per_sector: sched.tiles_per_sector,
        active_tiles: sched.active_tiles,
        active_fraction: sched.active_fraction,
        duty_fraction: duty,
        nominal_duty: sched.nominal_duty,
        q_spoil_factor: sched.q_spoil_factor,
        omega_rad_s: pm.omega_rad_s,
        power_per_tile_w: pm.power_per_tile_w,
        power_raw_w: raw.power_total_w,
        power_total_w,
        power_total_mw: power_total_w / 1.0e6,
        gamma_long_range: knobs.gamma_long_range,
        mass_energy_per_tile_j: pm.mass_energy_per_tile_j,
        mass_raw_kg: raw.mass_total_kg,
        mass_total_kg,
        calibrated,
        power_scale,
        mass_scale,
        ts_ratio_conservative: ts.ratio_conservative,
        ts_ratio_geometric: ts.ratio_geometric,
        zeta,
        compliance: flags,
        status,
    })
}

/// Calibration to use for `config`, running the pass when one is due.
///
/// Returns `held` unchanged unless calibration is enabled, the active
/// mode is the designated one, and `held` does not already cover it.
pub fn resolve_calibration(
    config: &Configuration,
    held: &CalibrationState,
) -> HelixResult<CalibrationState> {
    let mode = config.operating.mode;
    let cal = &config.calibration;
    if !cal.enabled || mode != cal.mode || held.is_calibrated_for(mode) {
        return Ok(*held);
    }
    let raw = derive_state(config, &CalibrationState::Uncalibrated)?;
    calibrate(
        mode,
        raw.power_raw_w,
        raw.mass_raw_kg,
        &CalibrationTargets::from_knobs(&config.knobs),
    )
}

/// Caller-owned pipeline session.
pub struct PipelineContext {
    config: Configuration,
    calibration: CalibrationState,
    state: DerivedState,
    sink: Arc<dyn TraceSink>,
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext")
            .field("config", &self.config)
            .field("calibration", &self.calibration)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PipelineContext {
    /// Context tracing to the `log` facade.
    pub fn new(config: Configuration) -> HelixResult<Self> {
        Self::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: Configuration, sink: Arc<dyn TraceSink>) -> HelixResult<Self> {
        let calibration = resolve_calibration(&config, &CalibrationState::Uncalibrated)?;
        let state = derive_state(&config, &calibration)?;
        let ctx = Self {
            config,
            calibration,
            state,
            sink,
        };
        ctx.announce_calibration(&CalibrationState::Uncalibrated);
        ctx.announce_recompute();
        Ok(ctx)
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn state(&self) -> &DerivedState {
        &self.state
    }

    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    /// Replace the whole configuration and recompute.
    ///
    /// The held calibration survives only if targets and calibration
    /// settings are unchanged.
    pub fn replace_config(&mut self, config: Configuration) -> HelixResult<&DerivedState> {
        let keep = config.calibration == self.config.calibration
            && config.knobs.power_target_w == self.config.knobs.power_target_w
            && config.knobs.mass_target_kg == self.config.knobs.mass_target_kg;
        let held = if keep {
            self.calibration
        } else {
            CalibrationState::Uncalibrated
        };
        self.commit(config, held)?;
        self.sink.record(&PipelineEvent::ConfigReplaced);
        Ok(&self.state)
    }

    /// Merge a partial update and recompute.
    pub fn merge(&mut self, patch: &ConfigPatch) -> HelixResult<&DerivedState> {
        let invalidate = patch.touches_calibration();
        let held = if invalidate {
            CalibrationState::Uncalibrated
        } else {
            self.calibration
        };
        self.commit(self.config.merged(patch), held)?;
        self.sink.record(&PipelineEvent::ConfigMerged {
            calibration_invalidated: invalidate,
        });
        Ok(&self.state)
    }

    /// Recompute from the current configuration.
    pub fn recompute(&mut self) -> HelixResult<&DerivedState> {
        self.commit(self.config.clone(), self.calibration)?;
        Ok(&self.state)
    }

    /// Drop the held calibration and recompute. If calibration is still
    /// enabled for the active mode, a fresh pass runs immediately.
    pub fn reset_calibration(&mut self) -> HelixResult<&DerivedState> {
        self.commit(self.config.clone(), CalibrationState::Uncalibrated)?;
        self.sink.record(&PipelineEvent::CalibrationReset);
        Ok(&self.state)
    }

    fn commit(&mut self, config: Configuration, held: CalibrationState) -> HelixResult<()> {
        let calibration = resolve_calibration(&config, &held)?;
        let state = derive_state(&config, &calibration)?;

        let previous_status = self.state.status;
        let previous_calibration = self.calibration;
        self.config = config;
        self.calibration = calibration;
        self.state = state;

        self.announce_calibration(&previous_calibration);
        if previous_status != self.state.status {
            self.sink.record(&PipelineEvent::StatusChanged {
                from: previous_status,
                to: self.state.status,
            });
        }
        self.announce_recompute();
        Ok(())
    }

    fn announce_calibration(&self, previous: &CalibrationState) {
        if let CalibrationState::Calibrated {
            mode,
            power_scale,
            mass_scale,
        } = self.calibration
        {
            if *previous != self.calibration {
                self.sink.record(&PipelineEvent::Calibrated {
                    mode,
                    power_scale,
                    mass_scale,
                });
            }
        }
    }

    fn announce_recompute(&self) {
        self.sink.record(&PipelineEvent::Recomputed {
            mode: self.state.mode,
            status: self.state.status,
            zeta: self.state.zeta,
            power_total_w: self.state.power_total_w,
            mass_total_kg: self.state.mass_total_kg,
        });
    }
}
