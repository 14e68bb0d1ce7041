// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Canonical Constants
// ─────────────────────────────────────────────────────────────────────
//! Physical constants and fixed engineering parameters shared by every
//! stage. Nothing here is user-tunable; per-device knobs live in
//! `helix_types::Configuration`.
//!
//! Provenance:
//!   - ħc, c: CODATA 2018.
//!   - Knud–Thomsen exponent: relative error ≤ 1.061 % for any ellipsoid.
//!   - Sector count, local burst duty, burst-window Q: Needle Hull Mk-1
//!     reference design (400 sectors, 1 % local burst, Q ≈ 1e9).
//!   - Radial layers, packing factor: multi-layer tiling with edge losses.
//!   - Q_REFERENCE, ζ warning band, curvature limit: compliance gate design
//!     values.

use std::f64::consts::PI;

/// Reduced Planck constant times the speed of light (J·m).
pub const HBAR_C: f64 = 1.054_571_817e-34 * C_LIGHT;

/// Speed of light (m/s).
pub const C_LIGHT: f64 = 299_792_458.0;

/// Knud–Thomsen exponent for the ellipsoid surface area approximation.
pub const KNUD_THOMSEN_P: f64 = 1.6075;

/// Tile layers stacked through the hull wall.
pub const RADIAL_LAYERS: f64 = 10.0;

/// Fraction of the ideal tiling left after edge losses.
pub const PACKING_FACTOR: f64 = 0.88;

/// Sectors the tile population is partitioned into.
pub const TOTAL_SECTORS: u32 = 400;

/// Local burst duty inside a live sector.
pub const BURST_DUTY_LOCAL: f64 = 0.01;

/// Burst-window quality factor. Distinct from the user cavity/mechanical Q.
pub const Q_BURST: f64 = 1.0e9;

/// Quality factor in the stability ratio ζ = 1 / (d·√Q_ref).
pub const Q_REFERENCE: f64 = 1.0e12;

/// ζ at or above this raises WARNING.
pub const ZETA_WARNING: f64 = 0.8;

/// |E_Q| per tile (J) must stay strictly below this.
pub const CURVATURE_LIMIT_J: f64 = 1.0e3;

/// Flat-plate Casimir prefactor π²/720.
pub const PFA_FLAT_PREFACTOR: f64 = PI * PI / 720.0;

/// Sphere–plate PFA force prefactor π³/360.
pub const PFA_SPHERE_PREFACTOR: f64 = PI * PI * PI / 360.0;

/// Thermal correction at the gaps and temperatures in scope.
pub const TEMPERATURE_CORRECTION: f64 = 1.0;

/// Denominator floor for calibration and the stability ratio.
pub const CALIBRATION_EPSILON: f64 = 1e-30;

/// Floor for gap, radius and sag divisions (m).
pub const LENGTH_FLOOR_M: f64 = 1e-15;

/// Floor for the dimensionless field-sampler bell width.
pub const BELL_WIDTH_FLOOR: f64 = 1e-9;
