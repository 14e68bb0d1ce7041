// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Pipeline Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Pipeline session, calibration pass, trace sinks, proof pack and
//! viability sweep for the Helix energy kernel.
//!
//! # Invariants
//!
//! 1. **Derived state is a pure function** of `(Configuration,
//!    CalibrationState)`. Calibration multipliers are computed once for
//!    the designated mode and held in the caller-owned context.
//!
//! 2. **Passes are atomic**: a failed merge, replacement or recompute
//!    leaves configuration, calibration and state untouched.
//!
//! 3. **Nothing non-finite reaches the compliance gate**: NaN/Inf at a
//!    stage boundary fails the pass with `InvariantViolation`.
//!
//! 4. **The field sampler never writes pipeline state** and may run
//!    concurrently with recomputation.

pub mod calibration;
pub mod ledger;
pub mod pipeline;
pub mod shared;
pub mod trace;
pub mod viability;

pub use calibration::{calibrate, CalibrationTargets};
pub use ledger::{proof_pack, ProofEntry, ProofPack};
pub use pipeline::{derive_state, PipelineContext};
pub use shared::SharedPipeline;
pub use trace::{LogSink, MemorySink, NullSink, PipelineEvent, TraceSink};
pub use viability::{sweep, SweepRange, ViabilityGrid, ViabilityPoint};
