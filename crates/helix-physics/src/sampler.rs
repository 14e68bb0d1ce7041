// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Diagnostic Field Sampler
// ─────────────────────────────────────────────────────────────────────
//! Reconstructs the scalar displacement field over an ellipsoidal shell
//! so an external renderer can be cross-checked for drift.
//!
//! Per sample at (shell s, θ, φ):
//!   p      = s · (a cosφ cosθ, b cosφ sinθ, c sinφ)
//!   ρ      = |p / axes|,  δ = ρ − 1,  δn = δ / w
//!   u      = θ/2π
//!   sign   = −tanh((u − split)/t) · tanh(u/t) · tanh((1 − u)/t)
//!   bell   = exp(−δn²)
//!   window = raised cosine in |δn| between pass and stop
//!   front  = 1 + bias · x/a
//!   v      = gain · γ_geo³ · q_spoil · window · bell · sign · front [· gate]
//!   d      = max_push · tanh(v / (softness · max_push))
//!
//! The sign passes through zero with slope 1/t at the azimuth seam as
//! well as at the split, so the field has no jump at θ = 0.
//!
//! Reads only the configuration. Never touches pipeline state, so it is
//! safe to run concurrently with recomputation.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use helix_types::{
    Configuration, FieldSample, HelixError, HelixResult, SamplerConfig, SectorGateParams,
};

use crate::constants::BELL_WIDTH_FLOOR;
use crate::gate::gate_weight;

/// Largest tanh magnitude used by the soft clamp. Keeps |d| strictly
/// below max_push even where tanh rounds to ±1.
const TANH_CEIL: f64 = 1.0 - f64::EPSILON;

/// Sampler prepared from one configuration.
#[derive(Debug, Clone)]
pub struct FieldSampler {
    axes: [f64; 3],
    effective_radius_m: f64,
    bell_width: f64,
    amplitude: f64,
    settings: SamplerConfig,
}

/// Smooth pass/stop window: 1 inside `pass`, 0 beyond `stop`.
pub fn raised_cosine_window(x: f64, pass: f64, stop: f64) -> f64 {
    let x = x.abs();
    if x <= pass {
        1.0
    } else if x >= stop {
        0.0
    } else {
        0.5 * (1.0 + (PI * (x - pass) / (stop - pass)).cos())
    }
}

/// Bounded soft clamp with |result| < max_push for every input.
pub fn soft_clamp(value: f64, max_push: f64, softness: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let t = (value / (softness * max_push)).tanh();
    max_push * t.clamp(-TANH_CEIL, TANH_CEIL)
}

/// Smooth ±1 sector sign flipping at `split` and at the 0/1 seam, each
/// over `transition`.
pub fn sector_sign(azimuth01: f64, split: f64, transition: f64) -> f64 {
    let flip = -((azimuth01 - split) / transition).tanh();
    let seam = (azimuth01 / transition).tanh() * ((1.0 - azimuth01) / transition).tanh();
    flip * seam
}

impl FieldSampler {
    pub fn new(config: &Configuration) -> HelixResult<Self> {
        config.geometry.validate()?;
        config.sampler.validate()?;
        let axes = config.geometry.hull_half_dims_m;
        let effective_radius_m = (axes[0] * axes[1] * axes[2]).cbrt();
        let thickness = config
            .geometry
            .wall_thickness_m
            .unwrap_or(config.geometry.sag_depth_m);
        let bell_width = (thickness / effective_radius_m).max(BELL_WIDTH_FLOOR);

        let profile = config.mode_profile();
        let amplitude =
            config.sampler.gain * config.knobs.gamma_geo.powi(3) * profile.q_spoil_factor;
        if !amplitude.is_finite() {
            return Err(HelixError::Configuration(format!(
                "sampler amplitude is not finite: {amplitude}"
            )));
        }

        log::debug!(
            "field sampler: R_eff={effective_radius_m:.3} m, bell width={bell_width:.3e}, amplitude={amplitude:.3e}"
        );

        Ok(Self {
            axes,
            effective_radius_m,
            bell_width,
            amplitude,
            settings: config.sampler.clone(),
        })
    }

    pub fn effective_radius_m(&self) -> f64 {
        self.effective_radius_m
    }

    pub fn bell_width(&self) -> f64 {
        self.bell_width
    }

    pub fn sample_count(&self) -> usize {
        self.settings.radial_offsets_bw.len() * self.settings.n_theta * self.settings.n_phi
    }

    /// One sample at shell scale `shell` (1.0 = hull surface).
    pub fn sample_at(&self, shell: f64, theta: f64, phi: f64) -> FieldSample {
        let [a, b, c] = self.axes;
        let cfg = &self.settings;

        let position = [
            shell * a * phi.cos() * theta.cos(),
            shell * b * phi.cos() * theta.sin(),
            shell * c * phi.sin(),
        ];
        let [x, y, z] = position;
        let ellipsoidal_radius = ((x / a).powi(2) + (y / b).powi(2) + (z / c).powi(2)).sqrt();
        let offset_bw = (ellipsoidal_radius - 1.0) / self.bell_width;

        let bell_weight = (-offset_bw * offset_bw).exp();
        let window = raised_cosine_window(offset_bw, cfg.pass_bw, cfg.stop_bw);
        let azimuth01 = theta.rem_euclid(TAU) / TAU;
        let sign = sector_sign(azimuth01, cfg.split_frac, cfg.transition_width);
        let front = 1.0 + cfg.front_bias * (x / a);
        let gate = cfg
            .gate
            .as_ref()
            .map_or(1.0, |gp: &SectorGateParams| gate_weight(azimuth01, gp));

        let value = self.amplitude * window * bell_weight * sign * front * gate;
        let displacement = soft_clamp(value, cfg.max_push, cfg.softness);

        let grad = [x / (a * a), y / (b * b), z / (c * c)];
        let norm = (grad[0] * grad[0] + grad[1] * grad[1] + grad[2] * grad[2]).sqrt();
        let normal = if norm > 0.0 && norm.is_finite() {
            [grad[0] / norm, grad[1] / norm, grad[2] / norm]
        } else {
            [0.0, 0.0, 1.0]
        };

        FieldSample {
            position,
            ellipsoidal_radius,
            bell_weight,
            normal,
            sector_sign: sign,
            displacement,
        }
    }

    /// Full grid: shells × θ × φ, φ fastest.
    pub fn samples(&self) -> Vec<FieldSample> {
        let cfg = &self.settings;
        let mut out = Vec::with_capacity(self.sample_count());
        for &offset in &cfg.radial_offsets_bw {
            let shell = 1.0 + offset * self.bell_width;
            for i in 0..cfg.n_theta {
                let theta = TAU * i as f64 / cfg.n_theta as f64;
                for j in 0..cfg.n_phi {
                    let phi = if cfg.n_phi == 1 {
                        0.0
                    } else {
                        -FRAC_PI_2 + PI * j as f64 / (cfg.n_phi - 1) as f64
                    };
                    out.push(self.sample_at(shell, theta, phi));
                }
            }
        }
        out
    }
}

/// Sample the configured grid.
pub fn sample_field(config: &Configuration) -> HelixResult<Vec<FieldSample>> {
    Ok(FieldSampler::new(config)?.samples())
}
