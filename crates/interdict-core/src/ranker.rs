// ─────────────────────────────────────────────────────────────────────
// Interdict — Ranker
// ─────────────────────────────────────────────────────────────────────
//! Orders mechanism costs ascending and selects the cheapest.
//!
//! Equal totals are broken by the fixed priority
//! `[SignerSet, DelegatedBody, Governance]`, so the output never depends
//! on the order in which breakdowns were produced. Losing mechanisms stay
//! in the output: every number behind the pick is visible.

use std::cmp::Ordering;

use interdict_types::{MechanismCost, Recommendation};

// `+ 0.0` folds -0.0 into 0.0 so signed zeros compare as a tie.
fn cost_key(cost: &MechanismCost) -> f64 {
    cost.total_cost() + 0.0
}

/// Total order used by the ranker.
pub fn compare_costs(a: &MechanismCost, b: &MechanismCost) -> Ordering {
    cost_key(a)
        .total_cmp(&cost_key(b))
        .then_with(|| a.mechanism.priority().cmp(&b.mechanism.priority()))
}

/// Sort in place, cheapest first. Idempotent.
pub fn sort_by_cost(costs: &mut [MechanismCost]) {
    costs.sort_by(compare_costs);
}

/// Rank one breakdown per mechanism into a recommendation.
pub fn rank(mut costs: [MechanismCost; 3]) -> Recommendation {
    sort_by_cost(&mut costs);
    let [winner, runner_up, _] = &costs;
    Recommendation {
        mechanism: winner.mechanism,
        margin: runner_up.total_cost() - winner.total_cost(),
        ranked: costs.to_vec(),
    }
}
