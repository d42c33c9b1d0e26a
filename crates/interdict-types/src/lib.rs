// ─────────────────────────────────────────────────────────────────────
// Interdict — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, calibration tables, configuration and error
//! hierarchy for the Interdict intervention-cost kernel.

pub mod breakdown;
pub mod calibration;
pub mod config;
pub mod error;
pub mod mechanism;
pub mod profile;

pub use breakdown::{CostBreakdown, MechanismCost, Recommendation};
pub use calibration::{
    Calibration, CalibrationOverrides, MechanismOverride, MechanismParams,
    DEFAULT_GOVERNANCE_MINUTES,
};
pub use config::{ModelConfig, RegulatoryPolicyKind};
pub use error::{InterdictError, InterdictResult};
pub use mechanism::{Mechanism, ScopeLevel};
pub use profile::{ProfileBuilder, ProfileSpec, ProtocolProfile, DEFAULT_THREAT_PROBABILITY};
