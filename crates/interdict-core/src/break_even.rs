// ─────────────────────────────────────────────────────────────────────
// Interdict — Break-even Analysis
// ─────────────────────────────────────────────────────────────────────
//! Damage rates at which the recommendation changes.
//!
//! Total cost is affine in the damage rate:
//! `total(d) = fixed + threat_probability × containment × d` with
//! `fixed = centralization + blast`. Two mechanisms therefore cost the
//! same at exactly one rate (or never, when their slopes match).

use serde::{Deserialize, Serialize};

use interdict_types::{Mechanism, ProtocolProfile};

use crate::CostModel;

/// The next point where a faster mechanism overtakes the current pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    /// Damage rate (per minute) at which both totals are equal.
    pub damage_rate_per_minute: f64,
    pub from: Mechanism,
    pub to: Mechanism,
}

/// Damage rate where `a` and `b` have equal total cost.
///
/// `None` when the lines are parallel (equal containment or zero threat)
/// or cross only at a negative rate.
pub fn break_even_damage_rate(
    model: &CostModel,
    profile: &ProtocolProfile,
    a: Mechanism,
    b: Mechanism,
) -> Option<f64> {
    let ba = model.breakdown(a, profile);
    let bb = model.breakdown(b, profile);

    let p = profile.threat_probability();
    let slope_gap = p * (bb.containment_minutes as f64 - ba.containment_minutes as f64);
    if slope_gap == 0.0 {
        return None;
    }

    let fixed_a = ba.centralization_cost + ba.blast_cost;
    let fixed_b = bb.centralization_cost + bb.blast_cost;
    let rate = (fixed_a - fixed_b) / slope_gap;

    (rate.is_finite() && rate >= 0.0).then_some(rate)
}

/// First damage rate above the profile's own at which the current
/// recommendation loses to another mechanism.
pub fn next_flip(model: &CostModel, profile: &ProtocolProfile) -> Option<Flip> {
    let current = model.recommend(profile).mechanism;
    let current_minutes = model.containment_minutes(current, profile);
    let d0 = profile.damage_rate_per_minute();

    Mechanism::ALL
        .iter()
        .copied()
        // only faster mechanisms gain ground as damage grows
        .filter(|&m| m != current && model.containment_minutes(m, profile) < current_minutes)
        .filter_map(|m| {
            break_even_damage_rate(model, profile, current, m)
                .filter(|&rate| rate > d0)
                .map(|rate| Flip {
                    damage_rate_per_minute: rate,
                    from: current,
                    to: m,
                })
        })
        .min_by(|x, y| {
            x.damage_rate_per_minute
                .total_cmp(&y.damage_rate_per_minute)
                .then_with(|| x.to.priority().cmp(&y.to.priority()))
        })
}
