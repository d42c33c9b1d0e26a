// ─────────────────────────────────────────────────────────────────────
// Interdict — Core Cost Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Cost model and ranker for emergency-intervention mechanisms.
//!
//! Given a validated [`ProtocolProfile`](interdict_types::ProtocolProfile),
//! [`CostModel::recommend`] prices every mechanism and returns them
//! cheapest first, with the full breakdown of each.
//!
//! # Invariants
//!
//! 1. **Evaluation is pure**: a `CostModel` holds no mutable state, so
//!    the same `(mechanism, profile)` always yields a bit-identical
//!    breakdown, from any thread.
//!
//! 2. **Evaluation is total**: every check runs when the profile, the
//!    calibration or the config is built. Nothing here returns `Result`
//!    or panics on a valid profile.
//!
//! 3. **Neutral sentiment is exact**: a sentiment score of 0.0 yields a
//!    factor of exactly 1.0, whatever curve is installed.
//!
//! 4. **Ranking is deterministic**: equal totals fall back to the fixed
//!    `[SignerSet, DelegatedBody, Governance]` priority.

pub mod break_even;
pub mod cost;
pub mod policy;
pub mod ranker;
pub mod sentiment;

pub use break_even::{break_even_damage_rate, next_flip, Flip};
pub use cost::CostModel;
pub use policy::{
    policy_from_config, InvertPenalty, NoPremium, RegulatoryPolicy, ScaledPremium, WaivePenalty,
};
pub use ranker::{compare_costs, rank, sort_by_cost};
pub use sentiment::{ExponentialSentiment, ExternalSentiment, LinearSentiment, SentimentCurve};
