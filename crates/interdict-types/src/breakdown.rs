// ─────────────────────────────────────────────────────────────────────
// Interdict — Cost Breakdown and Recommendation Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::mechanism::Mechanism;

/// Itemised expected cost of invoking one mechanism.
///
/// All amounts are in the profile's currency unit. Only
/// `centralization_cost` may be negative (regulatory premium).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// (activation penalty + duration erosion) × sentiment factor.
    pub centralization_cost: f64,
    /// One-time market repricing at the profile's scope.
    pub blast_cost: f64,
    /// Containment minutes × damage rate, before threat weighting.
    pub expected_exploit_cost: f64,
    /// centralization + blast + threat_probability × expected_exploit.
    pub total_cost: f64,
    /// Containment window used for this mechanism.
    pub containment_minutes: u32,
    /// Sentiment multiplier applied to centralization and blast.
    pub sentiment_factor: f64,
}

/// One row of the ranked output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MechanismCost {
    pub mechanism: Mechanism,
    pub breakdown: CostBreakdown,
}

impl MechanismCost {
    pub fn total_cost(&self) -> f64 {
        self.breakdown.total_cost
    }
}

/// Ranked evaluation of every mechanism for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Mechanism with the lowest total cost.
    pub mechanism: Mechanism,
    /// Runner-up total minus winner total (≥ 0).
    pub margin: f64,
    /// Every mechanism, ascending by total cost; `ranked[0]` is the pick.
    pub ranked: Vec<MechanismCost>,
}

impl Recommendation {
    /// Row for a specific mechanism.
    pub fn cost_of(&self, mechanism: Mechanism) -> Option<&MechanismCost> {
        self.ranked.iter().find(|c| c.mechanism == mechanism)
    }

    /// 0-based rank of `mechanism` in the ordering.
    pub fn rank_of(&self, mechanism: Mechanism) -> Option<usize> {
        self.ranked.iter().position(|c| c.mechanism == mechanism)
    }
}
