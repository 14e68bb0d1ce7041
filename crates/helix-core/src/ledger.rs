// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Proof Pack
// ─────────────────────────────────────────────────────────────────────
//! Audit ledger: one entry per stage equation, with the value the pass
//! actually produced.

use serde::{Deserialize, Serialize};

use helix_types::{DerivedState, GeometryClass, HelixError, HelixResult, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofEntry {
    pub stage: String,
    pub symbol: String,
    pub equation: String,
    pub value: f64,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofPack {
    pub status: Status,
    pub calibrated: bool,
    pub entries: Vec<ProofEntry>,
}

impl ProofPack {
    /// First entry carrying `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&ProofEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn to_json(&self) -> HelixResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HelixError::Parse(e.to_string()))
    }
}

struct Builder(Vec<ProofEntry>);

impl Builder {
    fn push(&mut self, stage: &str, symbol: &str, equation: &str, value: f64, units: &str) {
        self.0.push(ProofEntry {
            stage: stage.to_string(),
            symbol: symbol.to_string(),
            equation: equation.to_string(),
            value,
            units: units.to_string(),
        });
    }
}

/// Build the ledger for one derived state.
pub fn proof_pack(s: &DerivedState) -> ProofPack {
    let mut b = Builder(Vec::with_capacity(32));

    b.push("geometry", "A_hull", "4π·(((ab)^p+(ac)^p+(bc)^p)/3)^(1/p)", s.hull_area_m2, "m²");
    b.push("geometry", "N_tiles", "⌊⌊A_hull/A_tile⌋·layers·packing⌋", s.tile_population as f64, "");

    b.push("static", "U_static", static_equation(s.geometry_class), s.static_energy_j, "J");
    b.push("static", "u_static", "U_static / A_tile", s.static_energy_per_area_j_m2, "J/m²");
    b.push("static", "F_static", "Casimir force per tile", s.static_force_n, "N");

    b.push("amplification", "γ_geo", "geometric amplification", s.gamma_geo, "");
    b.push("amplification", "m_Q", "(gain ? Q_mech : 1)·s_P", s.mechanical_multiplier, "");
    b.push("amplification", "U_geo", "U_static·γ_geo", s.energy_geo_j, "J");
    b.push("amplification", "U_Q", "U_geo·m_Q", s.energy_q_j, "J");
    b.push("amplification", "U_cycle", "U_Q·d_eff", s.energy_cycle_j, "J");

    b.push("sectors", "S_live", "mode profile", s.live_sectors as f64, "");
    b.push("sectors", "S_total", "fixed sector count", s.total_sectors as f64, "");
    b.push("sectors", "f_active", "S_live / S_total", s.active_fraction, "");
    b.push("sectors", "N_active", "⌊N_tiles/S_total⌋·S_live", s.active_tiles as f64, "");
    b.push("sectors", "d_eff", "d_burst·S_live/S_total", s.duty_fraction, "");
    b.push("sectors", "d_nominal", "mode nominal duty", s.nominal_duty, "");

    b.push("power", "ω", "2π·f_m", s.omega_rad_s, "rad/s");
    b.push("power", "P_tile", "|U_Q|·ω/Q_burst", s.power_per_tile_w, "W");
    b.push("power", "P_raw", "P_tile·N·d_eff at s_P = 1", s.power_raw_w, "W");
    b.push("power", "P_total", "P_tile·N·d_eff", s.power_total_w, "W");

    b.push("mass", "U_mass", "|U_static|·γ_geo³·Q_burst·γ_LR·s_M·d_eff", s.mass_energy_per_tile_j, "J");
    b.push("mass", "M_raw", "U_mass/c²·N at s_M = 1", s.mass_raw_kg, "kg");
    b.push("mass", "M_total", "U_mass/c²·N", s.mass_total_kg, "kg");

    b.push("calibration", "s_P", "P_target / P_raw", s.power_scale, "");
    b.push("calibration", "s_M", "M_target / M_raw", s.mass_scale, "");

    b.push("timescale", "TS_cons", "(2·min(a,b,c)/c)·f_m", s.ts_ratio_conservative, "");
    b.push("timescale", "TS_geo", "(2·(abc)^(1/3)/c)·f_m", s.ts_ratio_geometric, "");

    b.push("compliance", "ζ", "1 / (d_eff·√Q_ref)", s.zeta, "");

    ProofPack {
        status: s.status,
        calibrated: s.calibrated,
        entries: b.0,
    }
}

fn static_equation(class: GeometryClass) -> &'static str {
    match class {
        GeometryClass::Flat => "−(π²/720)·ħc·A/a³",
        GeometryClass::Spherical => "(π³/360)·ħc·r/a⁴ · a",
        GeometryClass::Curved => "U_flat·(1 + a/(2R_c))·(1 + (s/r)²/2)",
    }
}
