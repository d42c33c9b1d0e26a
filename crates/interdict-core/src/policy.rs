// ─────────────────────────────────────────────────────────────────────
// Interdict — Regulatory Premium Policies
// ─────────────────────────────────────────────────────────────────────
//! How regulation reshapes the fixed activation penalty.
//!
//! Regulated venues prefer interventions with an accountable operator,
//! so the legitimacy penalty of the authoritative mechanisms (signer set,
//! delegated body) shrinks or turns into a credit. Governance is never
//! transformed. Policies only run for profiles with `is_regulated`.

use std::sync::Arc;

use interdict_types::{Mechanism, ModelConfig, RegulatoryPolicyKind};

/// Trait for regulatory-premium transforms.
pub trait RegulatoryPolicy: Send + Sync {
    /// Transform `penalty` (base fraction × market cap) for `mechanism`.
    fn activation_penalty(&self, mechanism: Mechanism, penalty: f64) -> f64;

    /// Stable name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Penalty becomes a credit of equal size.
pub struct InvertPenalty;

impl RegulatoryPolicy for InvertPenalty {
    fn activation_penalty(&self, mechanism: Mechanism, penalty: f64) -> f64 {
        if mechanism.is_authoritative() {
            -penalty
        } else {
            penalty
        }
    }

    fn name(&self) -> &'static str {
        "invert"
    }
}

/// Penalty is dropped entirely.
pub struct WaivePenalty;

impl RegulatoryPolicy for WaivePenalty {
    fn activation_penalty(&self, mechanism: Mechanism, penalty: f64) -> f64 {
        if mechanism.is_authoritative() {
            0.0
        } else {
            penalty
        }
    }

    fn name(&self) -> &'static str {
        "waive"
    }
}

/// `penalty × (1 - factor)`: 1.0 waives, 2.0 inverts, in between reduces.
pub struct ScaledPremium {
    pub factor: f64,
}

impl RegulatoryPolicy for ScaledPremium {
    fn activation_penalty(&self, mechanism: Mechanism, penalty: f64) -> f64 {
        if mechanism.is_authoritative() {
            penalty * (1.0 - self.factor)
        } else {
            penalty
        }
    }

    fn name(&self) -> &'static str {
        "scaled"
    }
}

/// Identity.
pub struct NoPremium;

impl RegulatoryPolicy for NoPremium {
    fn activation_penalty(&self, _mechanism: Mechanism, penalty: f64) -> f64 {
        penalty
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Build the policy named by `config.regulatory_policy`.
pub fn policy_from_config(config: &ModelConfig) -> Arc<dyn RegulatoryPolicy> {
    match config.regulatory_policy {
        RegulatoryPolicyKind::Invert => Arc::new(InvertPenalty),
        RegulatoryPolicyKind::Waive => Arc::new(WaivePenalty),
        RegulatoryPolicyKind::Scaled => Arc::new(ScaledPremium {
            factor: config.regulatory_premium_factor,
        }),
        RegulatoryPolicyKind::NoPremium => Arc::new(NoPremium),
    }
}
