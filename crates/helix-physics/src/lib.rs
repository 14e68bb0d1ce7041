// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Physics Stages
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Pure stage functions of the energy pipeline: hull tiling, static
//! Casimir field, sector duty, amplification, power/mass, time-scale
//! separation and the compliance gate. Also the diagnostic field
//! sampler with its azimuthal sector gate.
//!
//! Nothing in this crate holds state. Every function maps its inputs to
//! outputs and can be called from any thread.

pub mod amplification;
pub mod compliance;
pub mod constants;
pub mod gate;
pub mod geometry;
pub mod power;
pub mod sampler;
pub mod sectors;
pub mod static_field;
pub mod timescale;

pub use amplification::{amplify, mechanical_multiplier, Amplification};
pub use compliance::{stability_ratio, trip_reason};
pub use gate::gate_weight;
pub use geometry::{knud_thomsen_area, tile_census, TileCensus};
pub use power::{PowerMass, PowerMassInputs};
pub use sampler::{sample_field, FieldSampler};
pub use sectors::{schedule, SectorSchedule};
pub use static_field::{evaluate_geometry, StaticField};
pub use timescale::{time_scales, TimeScales};
