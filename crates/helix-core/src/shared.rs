// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Shared Pipeline Handle
// ─────────────────────────────────────────────────────────────────────
//! Cloneable handle for callers that share one session across threads.
//!
//! Mutations hold the write lock for the whole merge and recompute, so
//! readers never observe a half-updated state. Snapshots are clones
//! taken under the read lock.

use std::sync::Arc;

use parking_lot::RwLock;

use helix_types::{
    CalibrationState, ConfigPatch, Configuration, DerivedState, FieldSample, HelixResult,
};

use helix_physics::sample_field;

use crate::pipeline::PipelineContext;

#[derive(Debug, Clone)]
pub struct SharedPipeline {
    inner: Arc<RwLock<PipelineContext>>,
}

impl SharedPipeline {
    pub fn new(ctx: PipelineContext) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ctx)),
        }
    }

    pub fn from_config(config: Configuration) -> HelixResult<Self> {
        Ok(Self::new(PipelineContext::new(config)?))
    }

    pub fn snapshot(&self) -> DerivedState {
        self.inner.read().state().clone()
    }

    pub fn configuration(&self) -> Configuration {
        self.inner.read().configuration().clone()
    }

    pub fn calibration(&self) -> CalibrationState {
        *self.inner.read().calibration()
    }

    pub fn merge(&self, patch: &ConfigPatch) -> HelixResult<DerivedState> {
        let mut ctx = self.inner.write();
        let state = ctx.merge(patch)?.clone();
        Ok(state)
    }

    pub fn replace_config(&self, config: Configuration) -> HelixResult<DerivedState> {
        let mut ctx = self.inner.write();
        let state = ctx.replace_config(config)?.clone();
        Ok(state)
    }

    pub fn recompute(&self) -> HelixResult<DerivedState> {
        let mut ctx = self.inner.write();
        let state = ctx.recompute()?.clone();
        Ok(state)
    }

    pub fn reset_calibration(&self) -> HelixResult<DerivedState> {
        let mut ctx = self.inner.write();
        let state = ctx.reset_calibration()?.clone();
        Ok(state)
    }

    /// Sample the field for the current configuration. The lock is only
    /// held while the configuration is cloned.
    pub fn sample_field(&self) -> HelixResult<Vec<FieldSample>> {
        let config = self.configuration();
        sample_field(&config)
    }

    /// Run `f` against the context under the read lock.
    pub fn with_context<R>(&self, f: impl FnOnce(&PipelineContext) -> R) -> R {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_types::Mode;
    use std::thread;

    #[test]
    fn test_snapshot_matches_context() {
        let shared = SharedPipeline::from_config(Configuration::default()).unwrap();
        let direct = PipelineContext::new(Configuration::default()).unwrap();
        assert_eq!(&shared.snapshot(), direct.state());
    }

    #[test]
    fn test_clones_share_state() {
        let a = SharedPipeline::from_config(Configuration::default()).unwrap();
        let b = a.clone();
        a.merge(&ConfigPatch {
            mode: Some(Mode::Cruise),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(b.snapshot().mode, Mode::Cruise);
    }

    #[test]
    fn test_concurrent_merges_and_reads() {
        let shared = SharedPipeline::from_config(Configuration::default()).unwrap();
        let modes = [Mode::Hover, Mode::Cruise, Mode::Emergency, Mode::Standby];

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                let mode = modes[i % modes.len()];
                thread::spawn(move || {
                    for _ in 0..10 {
                        let s = shared
                            .merge(&ConfigPatch {
                                mode: Some(mode),
                                ..Default::default()
                            })
                            .unwrap();
                        assert_eq!(s.mode, mode);
                        let snap = shared.snapshot();
                        // Every snapshot is internally consistent.
                        assert_eq!(snap.live_sectors, snap.mode.profile().live_sectors);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_failed_merge_keeps_shared_state() {
        let shared = SharedPipeline::from_config(Configuration::default()).unwrap();
        let before = shared.snapshot();
        assert!(shared
            .merge(&ConfigPatch {
                gap_m: Some(-1.0),
                ..Default::default()
            })
            .is_err());
        assert_eq!(shared.snapshot(), before);
    }

    #[test]
    fn test_sampler_runs_alongside_writer() {
        let mut cfg = Configuration::default();
        cfg.sampler.n_theta = 8;
        cfg.sampler.n_phi = 4;
        let shared = SharedPipeline::from_config(cfg).unwrap();
        let reader = {
            let shared = shared.clone();
            thread::spawn(move || shared.sample_field().unwrap().len())
        };
        shared.recompute().unwrap();
        assert_eq!(reader.join().unwrap(), 5 * 8 * 4);
    }

    #[test]
    fn test_with_context_reads_calibration() {
        let shared = SharedPipeline::from_config(Configuration::default()).unwrap();
        let calibrated = shared.with_context(|ctx| ctx.state().calibrated);
        assert!(!calibrated);
        assert_eq!(shared.calibration(), CalibrationState::Uncalibrated);
    }
}
