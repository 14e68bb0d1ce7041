// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Helix energy kernel, the scalar power/mass/compliance pipeline.

pub mod config;
pub mod error;
pub mod state;

pub use config::{
    CalibrationConfig, ComplianceConfig, ConfigPatch, Configuration, GeometryClass,
    GeometryConfig, KnobConfig, Mode, ModeProfile, OperatingConfig, SamplerConfig,
    SectorGateParams, SyncMode,
};
pub use error::{HelixError, HelixResult};
pub use state::{
    CalibrationState, ComplianceFlags, DerivedState, FieldSample, Status, TripReason,
};
