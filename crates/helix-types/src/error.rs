// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Helix kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HelixError {
    /// Non-positive or non-finite geometry, tile area, frequency or knob.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Geometry class name not understood by the static field module.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Calibration target cannot be reached by a finite positive scale.
    #[error(
        "calibration degenerate: {quantity} measured {measured:.3e} against target {target:.3e}"
    )]
    CalibrationDegenerate {
        quantity: &'static str,
        measured: f64,
        target: f64,
    },

    /// NaN/Inf reached a stage boundary. Indicates an upstream defect.
    #[error("pipeline invariant violation: {0}")]
    InvariantViolation(String),

    /// Malformed JSON configuration or patch.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type HelixResult<T> = Result<T, HelixError>;

/// Reject non-finite values at a stage boundary.
pub fn ensure_finite(name: &str, value: f64) -> HelixResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HelixError::InvariantViolation(format!(
            "{name} is not finite ({value})"
        )))
    }
}
