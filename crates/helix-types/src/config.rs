// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────
//! Declarative device configuration: geometry, operating mode, physical
//! knobs, calibration gating, compliance ceiling and sampler settings.
//!
//! A `Configuration` is immutable for the duration of one pipeline pass.
//! Callers mutate it by whole replacement or by merging a `ConfigPatch`;
//! either way the pipeline recomputes every stage afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HelixError, HelixResult};

// ─── Operating mode ─────────────────────────────────────────────────

/// Operating mode. The four values and their scheduling defaults are a
/// stable contract with external callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Zero-drift station keeping; two sectors live.
    #[default]
    Hover,
    Cruise,
    Emergency,
    Standby,
}

/// Scheduling defaults attached to a mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    /// Sectors driven concurrently.
    pub live_sectors: u32,
    /// User-facing nominal duty cycle (fraction, not percent). Bounds the
    /// effective duty in every mode but standby, which reports 0 while
    /// keeping one sector live.
    pub nominal_duty: f64,
    /// Q-spoiling factor used by the field sampler.
    pub q_spoil_factor: f64,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Hover, Mode::Cruise, Mode::Emergency, Mode::Standby];

    pub fn profile(self) -> ModeProfile {
        match self {
            Mode::Hover => ModeProfile {
                live_sectors: 2,
                nominal_duty: 0.14,
                q_spoil_factor: 1.0,
            },
            Mode::Cruise => ModeProfile {
                live_sectors: 1,
                nominal_duty: 0.005,
                q_spoil_factor: 0.625,
            },
            Mode::Emergency => ModeProfile {
                live_sectors: 1,
                nominal_duty: 0.50,
                q_spoil_factor: 1.0,
            },
            Mode::Standby => ModeProfile {
                live_sectors: 1,
                nominal_duty: 0.0,
                q_spoil_factor: 0.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Hover => "hover",
            Mode::Cruise => "cruise",
            Mode::Emergency => "emergency",
            Mode::Standby => "standby",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = HelixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hover" => Ok(Mode::Hover),
            "cruise" => Ok(Mode::Cruise),
            "emergency" => Ok(Mode::Emergency),
            "standby" => Ok(Mode::Standby),
            other => Err(HelixError::Configuration(format!(
                "unknown mode '{other}' (expected hover|cruise|emergency|standby)"
            ))),
        }
    }
}

// ─── Geometry class ─────────────────────────────────────────────────

/// Geometry class handled by the static field module.
///
/// Parsed from text so that unknown names surface as
/// `HelixError::UnsupportedGeometry` rather than a generic parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeometryClass {
    Flat,
    Spherical,
    /// Shallow bowl; sag depth drives the PFA and area corrections.
    #[default]
    Curved,
}

impl GeometryClass {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryClass::Flat => "flat",
            GeometryClass::Spherical => "spherical",
            GeometryClass::Curved => "curved",
        }
    }
}

impl fmt::Display for GeometryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryClass {
    type Err = HelixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "parallel_plate" => Ok(GeometryClass::Flat),
            "spherical" | "sphere" => Ok(GeometryClass::Spherical),
            "curved" | "bowl" => Ok(GeometryClass::Curved),
            other => Err(HelixError::UnsupportedGeometry(other.to_string())),
        }
    }
}

impl TryFrom<String> for GeometryClass {
    type Error = HelixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeometryClass> for String {
    fn from(value: GeometryClass) -> Self {
        value.as_str().to_string()
    }
}

// ─── Sections ───────────────────────────────────────────────────────

/// Hull and tile geometry. All lengths in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub geometry_class: GeometryClass,
    /// Reference tile area (m²). Default: 25 cm².
    pub tile_area_m2: f64,
    /// Hull half-dimensions `[a, b, c]`. Default: 503.5 × 132 × 86.5 m.
    pub hull_half_dims_m: [f64; 3],
    /// Cavity gap. Default: 1 nm.
    pub gap_m: f64,
    /// Wall thickness used by the field sampler bell width. Default: 1 m.
    pub wall_thickness_m: Option<f64>,
    /// Bowl sag depth. Default: 16 nm.
    pub sag_depth_m: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            geometry_class: GeometryClass::Curved,
            tile_area_m2: 25.0e-4,
            hull_half_dims_m: [503.5, 132.0, 86.5],
            gap_m: 1.0e-9,
            wall_thickness_m: Some(1.0),
            sag_depth_m: 16.0e-9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingConfig {
    pub mode: Mode,
    /// Modulation frequency (Hz). Default: 15 GHz.
    pub modulation_freq_hz: f64,
    /// Temperature (K). Only carried; correction multiplier is 1.0.
    pub temperature_k: f64,
    /// Replaces the mode's nominal duty cycle when set.
    pub nominal_duty_override: Option<f64>,
}

impl Default for OperatingConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Hover,
            modulation_freq_hz: 15.0e9,
            temperature_k: 20.0,
            nominal_duty_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnobConfig {
    /// Geometric amplification γ_geo (≥ 1). Default: 26.
    pub gamma_geo: f64,
    /// Mechanical quality factor. Only enters the power path when
    /// `mechanical_gain` is set.
    pub q_mechanical: f64,
    /// Cavity quality factor (reported, not used by the power path).
    pub q_cavity: f64,
    /// Long-range amplification γ_LR on the mass path. Default: 1e11.
    pub gamma_long_range: f64,
    /// Exotic-mass reference target (kg). Default: 1405 kg.
    pub mass_target_kg: f64,
    /// Averaged-power reference target (W). Default: 83.3 MW.
    pub power_target_w: f64,
    /// Apply `q_mechanical` as a multiplier on the power path.
    pub mechanical_gain: bool,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            gamma_geo: 26.0,
            q_mechanical: 5.0e4,
            q_cavity: 1.0e9,
            gamma_long_range: 1.0e11,
            mass_target_kg: 1405.0,
            power_target_w: 83.3e6,
            mechanical_gain: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub enabled: bool,
    /// The only mode for which calibration scales are computed and applied.
    pub mode: Mode,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: Mode::Hover,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Averaged power at or above this raises WARNING. Default: 120 MW.
    pub power_ceiling_w: f64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            power_ceiling_w: 120.0e6,
        }
    }
}

/// Sector gate window shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    #[default]
    Gaussian,
    Contiguous,
}

/// Azimuthal sector gate applied on the field export path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorGateParams {
    pub total_sectors: u32,
    pub live_sectors: u32,
    pub sector_floor: f64,
    pub lump_exp: f64,
    pub sync_mode: SyncMode,
    pub sector_center01: f64,
    pub sector_sigma01: f64,
    pub phase01: f64,
    pub split_enabled: bool,
    pub split_frac: f64,
}

impl Default for SectorGateParams {
    fn default() -> Self {
        Self {
            total_sectors: 400,
            live_sectors: 1,
            sector_floor: 0.10,
            lump_exp: 1.0,
            sync_mode: SyncMode::Gaussian,
            sector_center01: 0.10,
            sector_sigma01: 0.35,
            phase01: 0.0,
            split_enabled: false,
            split_frac: 0.5,
        }
    }
}

/// Diagnostic field sampler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Azimuthal samples over θ ∈ [0, 2π).
    pub n_theta: usize,
    /// Polar samples over φ ∈ [−π/2, π/2].
    pub n_phi: usize,
    /// Radial shells as offsets from the hull surface, in bell widths.
    pub radial_offsets_bw: Vec<f64>,
    /// Azimuth fraction where the sector sign flips.
    pub split_frac: f64,
    /// Width of the tanh sign transition (azimuth fraction).
    pub transition_width: f64,
    /// Full-pass half-width of the window (bell widths).
    pub pass_bw: f64,
    /// Zero-weight half-width of the window (bell widths).
    pub stop_bw: f64,
    pub gain: f64,
    pub max_push: f64,
    pub softness: f64,
    /// Front/back asymmetry along the long axis.
    pub front_bias: f64,
    pub gate: Option<SectorGateParams>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_theta: 64,
            n_phi: 32,
            radial_offsets_bw: vec![-2.0, -1.0, 0.0, 1.0, 2.0],
            split_frac: 0.5,
            transition_width: 0.02,
            pass_bw: 2.5,
            stop_bw: 4.0,
            gain: 1.0e-5,
            max_push: 0.10,
            softness: 0.5,
            front_bias: 0.0,
            gate: None,
        }
    }
}

// ─── Configuration ──────────────────────────────────────────────────

/// Full device configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub geometry: GeometryConfig,
    pub operating: OperatingConfig,
    pub knobs: KnobConfig,
    pub calibration: CalibrationConfig,
    pub compliance: ComplianceConfig,
    pub sampler: SamplerConfig,
}

fn require_positive(name: &str, value: f64) -> HelixResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(HelixError::Configuration(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

impl GeometryConfig {
    /// Hull, tile and gap dimensions. Shared by the pipeline and the
    /// field sampler.
    pub fn validate(&self) -> HelixResult<()> {
        require_positive("tile_area_m2", self.tile_area_m2)?;
        for (axis, &dim) in ["a", "b", "c"].iter().zip(self.hull_half_dims_m.iter()) {
            require_positive(&format!("hull half-dimension {axis}"), dim)?;
        }
        require_positive("gap_m", self.gap_m)?;
        if !(self.sag_depth_m.is_finite() && self.sag_depth_m >= 0.0) {
            return Err(HelixError::Configuration(format!(
                "sag_depth_m must be >= 0, got {}",
                self.sag_depth_m
            )));
        }
        if let Some(t) = self.wall_thickness_m {
            require_positive("wall_thickness_m", t)?;
        }
        Ok(())
    }
}

impl Configuration {
    /// Mode profile, with the nominal duty override applied.
    pub fn mode_profile(&self) -> ModeProfile {
        let mut profile = self.operating.mode.profile();
        if let Some(duty) = self.operating.nominal_duty_override {
            profile.nominal_duty = duty;
        }
        profile
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> HelixResult<()> {
        self.geometry.validate()?;

        let op = &self.operating;
        require_positive("modulation_freq_hz", op.modulation_freq_hz)?;
        if !op.temperature_k.is_finite() || op.temperature_k < 0.0 {
            return Err(HelixError::Configuration(format!(
                "temperature_k must be >= 0, got {}",
                op.temperature_k
            )));
        }
        if let Some(duty) = op.nominal_duty_override {
            if !(0.0..=1.0).contains(&duty) {
                return Err(HelixError::Configuration(format!(
                    "nominal_duty_override must be in [0, 1], got {duty}"
                )));
            }
        }

        let k = &self.knobs;
        if !(k.gamma_geo.is_finite() && k.gamma_geo >= 1.0) {
            return Err(HelixError::Configuration(format!(
                "gamma_geo must be >= 1, got {}",
                k.gamma_geo
            )));
        }
        require_positive("q_mechanical", k.q_mechanical)?;
        require_positive("q_cavity", k.q_cavity)?;
        require_positive("gamma_long_range", k.gamma_long_range)?;
        require_positive("mass_target_kg", k.mass_target_kg)?;
        require_positive("power_target_w", k.power_target_w)?;

        require_positive("power_ceiling_w", self.compliance.power_ceiling_w)?;

        self.sampler.validate()
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> HelixResult<Self> {
        serde_json::from_str(json).map_err(|e| HelixError::Parse(format!("configuration: {e}")))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> HelixResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HelixError::Parse(e.to_string()))
    }

    /// Return a copy with `patch` merged on top.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next
    }

    /// Apply `HELIX_*` environment overrides.
    ///
    /// `HELIX_CALIB_JSON` names a JSON patch file applied first; discrete
    /// variables (`HELIX_POWER_TARGET_W`, `HELIX_MASS_TARGET_KG`,
    /// `HELIX_CALIBRATION`, `HELIX_MECHANICAL_GAIN`, `HELIX_MODE`) are
    /// applied after it.
    /// Unreadable or malformed values are logged and skipped.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with an
    /// injectable lookup.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("HELIX_CALIB_JSON").filter(|p| !p.trim().is_empty()) {
            match std::fs::read_to_string(path.trim()) {
                Ok(text) => match ConfigPatch::from_json(&text) {
                    Ok(patch) => patch.apply_to(&mut self),
                    Err(e) => log::warn!("HELIX_CALIB_JSON ignored: {e}"),
                },
                Err(e) => log::warn!("HELIX_CALIB_JSON unreadable ({path}): {e}"),
            }
        }

        let mut patch = ConfigPatch::default();
        if let Some(v) = lookup("HELIX_POWER_TARGET_W") {
            match v.trim().parse::<f64>() {
                Ok(w) => patch.power_target_w = Some(w),
                Err(e) => log::warn!("HELIX_POWER_TARGET_W ignored ({v}): {e}"),
            }
        }
        if let Some(v) = lookup("HELIX_MASS_TARGET_KG") {
            match v.trim().parse::<f64>() {
                Ok(kg) => patch.mass_target_kg = Some(kg),
                Err(e) => log::warn!("HELIX_MASS_TARGET_KG ignored ({v}): {e}"),
            }
        }
        if let Some(v) = lookup("HELIX_CALIBRATION") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => patch.calibration_enabled = Some(true),
                "0" | "false" | "off" => patch.calibration_enabled = Some(false),
                other => log::warn!("HELIX_CALIBRATION ignored ({other})"),
            }
        }
        if let Some(v) = lookup("HELIX_MECHANICAL_GAIN") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => patch.mechanical_gain = Some(true),
                "0" | "false" | "off" => patch.mechanical_gain = Some(false),
                other => log::warn!("HELIX_MECHANICAL_GAIN ignored ({other})"),
            }
        }
        if let Some(v) = lookup("HELIX_MODE") {
            match v.parse::<Mode>() {
                Ok(mode) => patch.mode = Some(mode),
                Err(e) => log::warn!("HELIX_MODE ignored: {e}"),
            }
        }
        patch.apply_to(&mut self);
        self
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> HelixResult<()> {
        if self.n_theta == 0 || self.n_phi == 0 {
            return Err(HelixError::Configuration(format!(
                "sampler grid must be non-empty, got {}x{}",
                self.n_theta, self.n_phi
            )));
        }
        if self.radial_offsets_bw.is_empty() || self.radial_offsets_bw.iter().any(|o| !o.is_finite())
        {
            return Err(HelixError::Configuration(
                "sampler radial_offsets_bw must be non-empty and finite".to_string(),
            ));
        }
        require_positive("sampler transition_width", self.transition_width)?;
        require_positive("sampler max_push", self.max_push)?;
        require_positive("sampler softness", self.softness)?;
        if !(self.pass_bw.is_finite() && self.pass_bw >= 0.0 && self.stop_bw > self.pass_bw) {
            return Err(HelixError::Configuration(format!(
                "sampler window needs 0 <= pass_bw < stop_bw, got {} / {}",
                self.pass_bw, self.stop_bw
            )));
        }
        if !self.gain.is_finite() || !self.front_bias.is_finite() || !self.split_frac.is_finite() {
            return Err(HelixError::Configuration(
                "sampler gain, front_bias and split_frac must be finite".to_string(),
            ));
        }
        if let Some(gate) = &self.gate {
            if gate.total_sectors == 0 {
                return Err(HelixError::Configuration(
                    "sector gate total_sectors must be >= 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ─── Partial merge ──────────────────────────────────────────────────

/// Partial configuration update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub geometry_class: Option<GeometryClass>,
    pub tile_area_m2: Option<f64>,
    pub hull_half_dims_m: Option<[f64; 3]>,
    pub gap_m: Option<f64>,
    pub wall_thickness_m: Option<f64>,
    pub sag_depth_m: Option<f64>,
    pub mode: Option<Mode>,
    pub modulation_freq_hz: Option<f64>,
    pub temperature_k: Option<f64>,
    pub nominal_duty_override: Option<f64>,
    pub gamma_geo: Option<f64>,
    pub q_mechanical: Option<f64>,
    pub q_cavity: Option<f64>,
    pub gamma_long_range: Option<f64>,
    pub mass_target_kg: Option<f64>,
    pub power_target_w: Option<f64>,
    pub mechanical_gain: Option<bool>,
    pub calibration_enabled: Option<bool>,
    pub calibration_mode: Option<Mode>,
    pub power_ceiling_w: Option<f64>,
    pub sampler: Option<SamplerConfig>,
}

impl ConfigPatch {
    pub fn from_json(json: &str) -> HelixResult<Self> {
        serde_json::from_str(json).map_err(|e| HelixError::Parse(format!("patch: {e}")))
    }

    /// True if the patch changes anything a held calibration depends on.
    pub fn touches_calibration(&self) -> bool {
        self.mass_target_kg.is_some()
            || self.power_target_w.is_some()
            || self.calibration_enabled.is_some()
            || self.calibration_mode.is_some()
    }

    pub fn apply_to(&self, cfg: &mut Configuration) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        let g = &mut cfg.geometry;
        set(&mut g.geometry_class, &self.geometry_class);
        set(&mut g.tile_area_m2, &self.tile_area_m2);
        set(&mut g.hull_half_dims_m, &self.hull_half_dims_m);
        set(&mut g.gap_m, &self.gap_m);
        set(&mut g.sag_depth_m, &self.sag_depth_m);
        if self.wall_thickness_m.is_some() {
            g.wall_thickness_m = self.wall_thickness_m;
        }

        let op = &mut cfg.operating;
        set(&mut op.mode, &self.mode);
        set(&mut op.modulation_freq_hz, &self.modulation_freq_hz);
        set(&mut op.temperature_k, &self.temperature_k);
        if self.nominal_duty_override.is_some() {
            op.nominal_duty_override = self.nominal_duty_override;
        }

        let k = &mut cfg.knobs;
        set(&mut k.gamma_geo, &self.gamma_geo);
        set(&mut k.q_mechanical, &self.q_mechanical);
        set(&mut k.q_cavity, &self.q_cavity);
        set(&mut k.gamma_long_range, &self.gamma_long_range);
        set(&mut k.mass_target_kg, &self.mass_target_kg);
        set(&mut k.power_target_w, &self.power_target_w);
        set(&mut k.mechanical_gain, &self.mechanical_gain);

        set(&mut cfg.calibration.enabled, &self.calibration_enabled);
        set(&mut cfg.calibration.mode, &self.calibration_mode);
        set(&mut cfg.compliance.power_ceiling_w, &self.power_ceiling_w);
        set(&mut cfg.sampler, &self.sampler);
    }
}
