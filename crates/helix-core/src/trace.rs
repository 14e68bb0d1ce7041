// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Pipeline Trace
// ─────────────────────────────────────────────────────────────────────
//! Structured events emitted by a pipeline context.
//!
//! The default `LogSink` forwards to the `log` facade. `MemorySink`
//! keeps events in memory for tests and audit tooling. Custom sinks
//! implement `TraceSink`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use helix_types::{Mode, Status};

/// One pipeline event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A patch was merged into the configuration.
    ConfigMerged { calibration_invalidated: bool },
    /// The configuration was replaced wholesale.
    ConfigReplaced,
    /// A calibration pass produced new multipliers.
    Calibrated {
        mode: Mode,
        power_scale: f64,
        mass_scale: f64,
    },
    CalibrationReset,
    /// A full recomputation finished.
    Recomputed {
        mode: Mode,
        status: Status,
        zeta: f64,
        power_total_w: f64,
        mass_total_kg: f64,
    },
    /// The compliance status differs from the previous pass.
    StatusChanged { from: Status, to: Status },
}

/// Receiver for pipeline events.
pub trait TraceSink: Send + Sync {
    fn record(&self, event: &PipelineEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::ConfigMerged {
                calibration_invalidated,
            } => {
                log::debug!("config merged (calibration invalidated: {calibration_invalidated})")
            }
            PipelineEvent::ConfigReplaced => log::debug!("config replaced"),
            PipelineEvent::Calibrated {
                mode,
                power_scale,
                mass_scale,
            } => log::info!(
                "calibrated for {mode}: power scale {power_scale:.6e}, mass scale {mass_scale:.6e}"
            ),
            PipelineEvent::CalibrationReset => log::info!("calibration reset"),
            PipelineEvent::Recomputed {
                mode,
                status,
                zeta,
                power_total_w,
                mass_total_kg,
            } => log::debug!(
                "recomputed [{mode}]: P={:.3} MW, M={mass_total_kg:.3} kg, ζ={zeta:.4}, {status}",
                power_total_w / 1.0e6
            ),
            PipelineEvent::StatusChanged { from, to } => {
                if *to == Status::Critical {
                    log::warn!("status {from} -> {to}");
                } else {
                    log::info!("status {from} -> {to}");
                }
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&self, _event: &PipelineEvent) {}
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl TraceSink for MemorySink {
    fn record(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.record(&PipelineEvent::ConfigReplaced);
        sink.record(&PipelineEvent::CalibrationReset);
        assert_eq!(
            sink.events(),
            vec![PipelineEvent::ConfigReplaced, PipelineEvent::CalibrationReset]
        );
        sink.clear();
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_string(&PipelineEvent::StatusChanged {
            from: Status::Nominal,
            to: Status::Warning,
        })
        .unwrap();
        assert!(json.contains("\"event\":\"status_changed\""), "{json}");
        assert!(json.contains("\"WARNING\""), "{json}");
    }

    #[test]
    fn test_log_and_null_sinks_accept_every_event() {
        let events = [
            PipelineEvent::ConfigMerged {
                calibration_invalidated: true,
            },
            PipelineEvent::Calibrated {
                mode: Mode::Hover,
                power_scale: 2.0,
                mass_scale: 0.5,
            },
            PipelineEvent::Recomputed {
                mode: Mode::Cruise,
                status: Status::Nominal,
                zeta: 0.1,
                power_total_w: 1.0,
                mass_total_kg: 1.0,
            },
            PipelineEvent::StatusChanged {
                from: Status::Warning,
                to: Status::Critical,
            },
        ];
        for event in &events {
            LogSink.record(event);
            NullSink.record(event);
        }
    }
}
