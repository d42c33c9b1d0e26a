// ─────────────────────────────────────────────────────────────────────
// Interdict — Cost Model
// ─────────────────────────────────────────────────────────────────────
//! Expected social cost of each intervention mechanism.
//!
//! For mechanism `m` and profile `p`:
//!
//! ```text
//! centralization = (activation_penalty + duration_erosion) × sentiment
//! blast          = daily_volume × blast_pct(scope) × sentiment
//! exploit        = containment_minutes × damage_rate
//! total          = centralization + blast + threat_probability × exploit
//! ```
//!
//! `duration_erosion = market_cap × (annual_trust_loss / minutes_per_year)
//! × containment_minutes`: the annual trust-loss rate is prorated to the
//! minutes the intervention stays active.

use std::sync::Arc;

use interdict_types::{
    Calibration, CalibrationOverrides, CostBreakdown, InterdictError, InterdictResult, Mechanism,
    MechanismCost, ModelConfig, ProfileBuilder, ProtocolProfile, Recommendation,
};

use crate::policy::{policy_from_config, InvertPenalty, RegulatoryPolicy};
use crate::ranker::rank;
use crate::sentiment::{LinearSentiment, SentimentCurve};

/// Evaluation context: calibration plus the pluggable model terms.
///
/// Immutable and `Send + Sync`; share one instance across threads.
#[derive(Clone)]
pub struct CostModel {
    calibration: Calibration,
    erosion_per_minute: f64,
    sentiment: Arc<dyn SentimentCurve>,
    regulatory: Arc<dyn RegulatoryPolicy>,
}

impl Default for CostModel {
    fn default() -> Self {
        let config = ModelConfig::default();
        Self {
            calibration: Calibration::default(),
            erosion_per_minute: config.annual_trust_loss / config.minutes_per_year,
            sentiment: Arc::new(LinearSentiment::default()),
            regulatory: Arc::new(InvertPenalty),
        }
    }
}

impl CostModel {
    /// `erosion_per_minute` is the share of market cap lost per minute of
    /// intervention; it must be finite and >= 0.
    pub fn new(
        calibration: Calibration,
        erosion_per_minute: f64,
        sentiment: Arc<dyn SentimentCurve>,
        regulatory: Arc<dyn RegulatoryPolicy>,
    ) -> InterdictResult<Self> {
        if !erosion_per_minute.is_finite() || erosion_per_minute < 0.0 {
            return Err(InterdictError::Config(format!(
                "erosion_per_minute must be finite and >= 0, got {erosion_per_minute}"
            )));
        }
        Ok(Self {
            calibration,
            erosion_per_minute,
            sentiment,
            regulatory,
        })
    }

    /// Validate `config` and build the context it describes.
    pub fn from_config(config: &ModelConfig) -> InterdictResult<Self> {
        config.validate()?;
        Self::new(
            config.calibration()?,
            config.annual_trust_loss / config.minutes_per_year,
            Arc::new(LinearSentiment::from_config(config)?),
            policy_from_config(config),
        )
    }

    /// A new context with `overrides` applied; `self` is unchanged.
    pub fn with_overrides(&self, overrides: &CalibrationOverrides) -> InterdictResult<Self> {
        Ok(Self {
            calibration: self.calibration.with_overrides(overrides)?,
            ..self.clone()
        })
    }

    /// Same calibration, different sentiment curve.
    pub fn with_sentiment(&self, sentiment: Arc<dyn SentimentCurve>) -> Self {
        Self {
            sentiment,
            ..self.clone()
        }
    }

    /// Same calibration, different regulatory policy.
    pub fn with_regulatory_policy(&self, regulatory: Arc<dyn RegulatoryPolicy>) -> Self {
        Self {
            regulatory,
            ..self.clone()
        }
    }

    /// Profile builder whose governance window defaults to this
    /// context's calibrated governance containment time.
    pub fn profile_builder(
        &self,
        market_cap: f64,
        daily_volume: f64,
        damage_rate_per_minute: f64,
    ) -> ProfileBuilder {
        let governance = self.calibration.mechanism(Mechanism::Governance);
        ProtocolProfile::builder(market_cap, daily_volume, damage_rate_per_minute)
            .governance_time_minutes(governance.default_containment_minutes)
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn erosion_per_minute(&self) -> f64 {
        self.erosion_per_minute
    }

    pub fn regulatory_policy_name(&self) -> &'static str {
        self.regulatory.name()
    }

    /// Minutes until containment. The profile's governance window
    /// replaces the calibrated value for governance only.
    pub fn containment_minutes(&self, mechanism: Mechanism, profile: &ProtocolProfile) -> u32 {
        match mechanism {
            Mechanism::Governance => profile.governance_time_minutes(),
            other => self.calibration.mechanism(other).default_containment_minutes,
        }
    }

    /// Sentiment multiplier; exactly 1.0 for a neutral score.
    pub fn sentiment_factor(&self, profile: &ProtocolProfile) -> f64 {
        let score = profile.sentiment_score();
        if score == 0.0 {
            return 1.0;
        }
        let factor = self.sentiment.factor(score);
        if !factor.is_finite() || factor < 0.0 {
            log::warn!("sentiment curve returned {factor} for score {score}, using neutral 1.0");
            return 1.0;
        }
        factor
    }

    /// `base_activation_fraction × market_cap`, passed through the
    /// regulatory policy for regulated protocols.
    pub fn activation_penalty(&self, mechanism: Mechanism, profile: &ProtocolProfile) -> f64 {
        let base = self.calibration.mechanism(mechanism).base_activation_fraction
            * profile.market_cap();
        if profile.is_regulated() {
            self.regulatory.activation_penalty(mechanism, base)
        } else {
            base
        }
    }

    /// Trust lost while the intervention is in force.
    pub fn duration_erosion(&self, mechanism: Mechanism, profile: &ProtocolProfile) -> f64 {
        let minutes = self.containment_minutes(mechanism, profile) as f64;
        profile.market_cap() * self.erosion_per_minute * minutes
    }

    /// Full itemised breakdown for one mechanism.
    pub fn breakdown(&self, mechanism: Mechanism, profile: &ProtocolProfile) -> CostBreakdown {
        let sentiment_factor = self.sentiment_factor(profile);
        let containment_minutes = self.containment_minutes(mechanism, profile);

        let centralization_cost = (self.activation_penalty(mechanism, profile)
            + self.duration_erosion(mechanism, profile))
            * sentiment_factor;
        let blast_cost =
            profile.daily_volume() * self.calibration.blast_pct(profile.scope()) * sentiment_factor;
        let expected_exploit_cost = containment_minutes as f64 * profile.damage_rate_per_minute();
        let p = profile.threat_probability();
        // zero threat must not let the exploit term leak in, even as 0 × inf
        let threat_cost = if p > 0.0 { p * expected_exploit_cost } else { 0.0 };
        let total_cost = centralization_cost + blast_cost + threat_cost;

        CostBreakdown {
            centralization_cost,
            blast_cost,
            expected_exploit_cost,
            total_cost,
            containment_minutes,
            sentiment_factor,
        }
    }

    pub fn total_cost(&self, mechanism: Mechanism, profile: &ProtocolProfile) -> f64 {
        self.breakdown(mechanism, profile).total_cost
    }

    /// Breakdown for every mechanism, in declaration order (unranked).
    pub fn evaluate(&self, profile: &ProtocolProfile) -> [MechanismCost; 3] {
        Mechanism::ALL.map(|mechanism| MechanismCost {
            mechanism,
            breakdown: self.breakdown(mechanism, profile),
        })
    }

    /// Rank every mechanism and pick the cheapest.
    pub fn recommend(&self, profile: &ProtocolProfile) -> Recommendation {
        let rec = rank(self.evaluate(profile));
        log::debug!(
            "recommend: {} (margin {:.2}, scope {}, regulated {})",
            rec.mechanism,
            rec.margin,
            profile.scope(),
            profile.is_regulated()
        );
        rec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{NoPremium, WaivePenalty};
    use crate::sentiment::ExternalSentiment;
    use interdict_types::{InterdictError, ScopeLevel};

    fn low_urgency() -> ProfileBuilder {
        ProtocolProfile::builder(100_000_000.0, 1_000_000.0, 10.0).scope(ScopeLevel::Asset)
    }

    #[test]
    fn test_low_urgency_recommends_governance() {
        let model = CostModel::default();
        let rec = model.recommend(&low_urgency().build().unwrap());
        assert_eq!(rec.mechanism, Mechanism::Governance);
    }

    #[test]
    fn test_high_urgency_recommends_signer_set() {
        let model = CostModel::default();
        let profile = ProtocolProfile::builder(100_000_000.0, 1_000_000.0, 10_000.0)
            .scope(ScopeLevel::Protocol)
            .build()
            .unwrap();
        let rec = model.recommend(&profile);
        assert_eq!(rec.mechanism, Mechanism::SignerSet);
    }

    #[test]
    fn test_regulation_shifts_away_from_governance() {
        let model = CostModel::default();
        let base = model.recommend(&low_urgency().build().unwrap());
        let regulated = model.recommend(&low_urgency().regulated(true).build().unwrap());

        assert_eq!(base.mechanism, Mechanism::Governance);
        assert_ne!(regulated.mechanism, Mechanism::Governance);
        assert!(
            regulated.rank_of(Mechanism::Governance) > base.rank_of(Mechanism::Governance),
            "governance should drop in the ranking"
        );
    }

    #[test]
    fn test_regulation_shift_holds_for_waive_policy() {
        let model = CostModel::default().with_regulatory_policy(Arc::new(WaivePenalty));
        let rec = model.recommend(&low_urgency().regulated(true).build().unwrap());
        assert_ne!(rec.mechanism, Mechanism::Governance);
    }

    #[test]
    fn test_no_premium_ignores_regulation() {
        let model = CostModel::default().with_regulatory_policy(Arc::new(NoPremium));
        let a = model.recommend(&low_urgency().build().unwrap());
        let b = model.recommend(&low_urgency().regulated(true).build().unwrap());
        assert_eq!(a.ranked, b.ranked);
    }

    #[test]
    fn test_regulated_centralization_can_go_negative() {
        let model = CostModel::default();
        let profile = low_urgency().regulated(true).build().unwrap();
        let signer = model.breakdown(Mechanism::SignerSet, &profile);
        assert!(signer.centralization_cost < 0.0);
        assert!(signer.blast_cost >= 0.0);
        assert!(signer.expected_exploit_cost >= 0.0);
    }

    #[test]
    fn test_breakdown_values() {
        // SignerSet: 0.0005 × 1e8 = 50 000 penalty, 15 min containment
        let model = CostModel::default();
        let profile = low_urgency().build().unwrap();
        let b = model.breakdown(Mechanism::SignerSet, &profile);

        let erosion = 1e8 * (0.01 / 525_600.0) * 15.0;
        assert!((b.centralization_cost - (50_000.0 + erosion)).abs() < 1e-6);
        assert!((b.blast_cost - 1e6 * 0.01).abs() < 1e-9);
        assert_eq!(b.expected_exploit_cost, 150.0);
        assert_eq!(b.containment_minutes, 15);
        let expected_total = b.centralization_cost + b.blast_cost + 0.01 * 150.0;
        assert_eq!(b.total_cost, expected_total);
    }

    #[test]
    fn test_determinism_bit_identical() {
        let model = CostModel::default();
        let profile = low_urgency().sentiment_score(-0.37).build().unwrap();
        for m in Mechanism::ALL {
            let a = model.total_cost(m, &profile);
            let b = model.total_cost(m, &profile);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_monotonic_in_damage_rate() {
        let model = CostModel::default();
        let rates = [0.0, 1.0, 10.0, 1_000.0, 50_000.0];
        for m in Mechanism::ALL {
            let totals: Vec<f64> = rates
                .iter()
                .map(|&r| {
                    let p = low_urgency().damage_rate_per_minute(r).build().unwrap();
                    model.total_cost(m, &p)
                })
                .collect();
            assert!(totals.windows(2).all(|w| w[0] < w[1]), "{m}: {totals:?}");
        }
    }

    #[test]
    fn test_monotonic_in_containment_time() {
        let model = CostModel::default();
        let short = low_urgency().governance_time_minutes(60).build().unwrap();
        let long = low_urgency().governance_time_minutes(10_080).build().unwrap();
        let a = model.breakdown(Mechanism::Governance, &short);
        let b = model.breakdown(Mechanism::Governance, &long);
        assert!(a.expected_exploit_cost < b.expected_exploit_cost);
    }

    #[test]
    fn test_governance_window_only_affects_governance() {
        let model = CostModel::default();
        let short = low_urgency().governance_time_minutes(60).build().unwrap();
        let long = low_urgency().governance_time_minutes(10_080).build().unwrap();
        for m in [Mechanism::SignerSet, Mechanism::DelegatedBody] {
            assert_eq!(model.breakdown(m, &short), model.breakdown(m, &long));
        }
    }

    #[test]
    fn test_zero_threat_ignores_damage() {
        let model = CostModel::default();
        for rate in [0.0, 10.0, 1e6] {
            let p = low_urgency()
                .threat_probability(0.0)
                .damage_rate_per_minute(rate)
                .build()
                .unwrap();
            for m in Mechanism::ALL {
                let b = model.breakdown(m, &p);
                assert_eq!(b.total_cost, b.centralization_cost + b.blast_cost);
            }
        }
    }

    #[test]
    fn test_zero_threat_with_extreme_damage_rate() {
        let model = CostModel::default();
        let p = low_urgency()
            .threat_probability(0.0)
            .damage_rate_per_minute(1e297)
            .build()
            .unwrap();
        for m in Mechanism::ALL {
            let b = model.breakdown(m, &p);
            assert!(b.expected_exploit_cost.is_finite());
            assert_eq!(b.total_cost, b.centralization_cost + b.blast_cost);
        }
        let rec = model.recommend(&p);
        assert_eq!(rec.mechanism, Mechanism::Governance);
        assert!(rec.margin.is_finite() && rec.margin >= 0.0);
        assert!((rec.ranked[0].total_cost() - 18_219.178).abs() < 0.01);
    }

    #[test]
    fn test_new_rejects_bad_erosion() {
        for erosion in [-1e-8, f64::NAN, f64::INFINITY] {
            let err = CostModel::new(
                Calibration::default(),
                erosion,
                Arc::new(LinearSentiment::default()),
                Arc::new(InvertPenalty),
            )
            .err()
            .unwrap();
            assert!(matches!(err, InterdictError::Config(_)));
        }
        let model = CostModel::new(
            Calibration::default(),
            0.0,
            Arc::new(LinearSentiment::default()),
            Arc::new(InvertPenalty),
        )
        .unwrap();
        assert_eq!(model.erosion_per_minute(), 0.0);
    }

    #[test]
    fn test_neutral_sentiment_factor_is_one() {
        let model = CostModel::default()
            .with_sentiment(Arc::new(ExternalSentiment::new(|_| 7.0)));
        let p = low_urgency().build().unwrap();
        assert_eq!(model.sentiment_factor(&p), 1.0);
    }

    #[test]
    fn test_negative_sentiment_raises_cost() {
        let model = CostModel::default();
        let neutral = low_urgency().build().unwrap();
        let hostile = low_urgency().sentiment_score(-0.8).build().unwrap();
        let friendly = low_urgency().sentiment_score(0.8).build().unwrap();
        for m in Mechanism::ALL {
            let n = model.total_cost(m, &neutral);
            assert!(model.total_cost(m, &hostile) > n);
            assert!(model.total_cost(m, &friendly) < n);
        }
    }

    #[test]
    fn test_bad_sentiment_curve_falls_back_to_neutral() {
        let model = CostModel::default()
            .with_sentiment(Arc::new(ExternalSentiment::new(|_| f64::NAN)));
        let p = low_urgency().sentiment_score(-0.5).build().unwrap();
        assert_eq!(model.sentiment_factor(&p), 1.0);
    }

    #[test]
    fn test_blast_cost_independent_of_mechanism_and_duration() {
        let model = CostModel::default();
        let p = ProtocolProfile::builder(1e8, 1e6, 1.0)
            .scope(ScopeLevel::Network)
            .build()
            .unwrap();
        let blasts: Vec<f64> = model.evaluate(&p).iter().map(|c| c.breakdown.blast_cost).collect();
        assert!(blasts.iter().all(|&b| b == 1e6));
    }

    #[test]
    fn test_overrides_are_context_local() {
        let base = CostModel::default();
        let overrides = CalibrationOverrides::from_json(
            r#"{ "mechanisms": { "signer_set": { "default_containment_minutes": 120 } } }"#,
        )
        .unwrap();
        let tuned = base.with_overrides(&overrides).unwrap();
        let p = low_urgency().build().unwrap();

        assert_eq!(tuned.containment_minutes(Mechanism::SignerSet, &p), 120);
        assert_eq!(base.containment_minutes(Mechanism::SignerSet, &p), 15);
    }

    #[test]
    fn test_profile_builder_uses_calibrated_governance_window() {
        let overrides = CalibrationOverrides::from_json(
            r#"{ "mechanisms": { "governance": { "default_containment_minutes": 10080 } } }"#,
        )
        .unwrap();
        let model = CostModel::default().with_overrides(&overrides).unwrap();
        let p = model.profile_builder(1e8, 1e6, 10.0).build().unwrap();
        assert_eq!(p.governance_time_minutes(), 10_080);
        assert_eq!(model.containment_minutes(Mechanism::Governance, &p), 10_080);
    }

    #[test]
    fn test_from_config() {
        let cfg = ModelConfig::from_json(r#"{ "regulatory_policy": "waive", "annual_trust_loss": 0.02 }"#)
            .unwrap();
        let model = CostModel::from_config(&cfg).unwrap();
        assert_eq!(model.regulatory_policy_name(), "waive");
        assert!((model.erosion_per_minute() - 0.02 / 525_600.0).abs() < 1e-18);
    }

    #[test]
    fn test_from_config_rejects_bad_overrides() {
        let cfg = ModelConfig::from_json(r#"{ "calibration": { "scopes": { "galaxy": 0.5 } } }"#)
            .unwrap();
        assert!(matches!(
            CostModel::from_config(&cfg),
            Err(InterdictError::UnknownScope(_))
        ));
    }

    #[test]
    fn test_default_matches_default_config() {
        let from_cfg = CostModel::from_config(&ModelConfig::default()).unwrap();
        let p = low_urgency().sentiment_score(-0.2).regulated(true).build().unwrap();
        assert_eq!(CostModel::default().evaluate(&p), from_cfg.evaluate(&p));
    }
}
