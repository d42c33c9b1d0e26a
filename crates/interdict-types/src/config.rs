// ─────────────────────────────────────────────────────────────────────
// Interdict — Model Configuration
// ─────────────────────────────────────────────────────────────────────

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calibration::{Calibration, CalibrationOverrides};
use crate::error::{InterdictError, InterdictResult};

/// Which regulatory-premium transform applies to regulated protocols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatoryPolicyKind {
    /// Authoritative mechanisms earn a credit equal to their penalty.
    #[default]
    Invert,
    /// Authoritative mechanisms pay no activation penalty.
    Waive,
    /// Penalty scaled by `1 - regulatory_premium_factor`.
    Scaled,
    /// Regulation has no effect on cost.
    #[serde(rename = "none")]
    NoPremium,
}

impl RegulatoryPolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invert => "invert",
            Self::Waive => "waive",
            Self::Scaled => "scaled",
            Self::NoPremium => "none",
        }
    }
}

impl FromStr for RegulatoryPolicyKind {
    type Err = InterdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invert" => Ok(Self::Invert),
            "waive" => Ok(Self::Waive),
            "scaled" => Ok(Self::Scaled),
            "none" => Ok(Self::NoPremium),
            other => Err(InterdictError::Config(format!(
                "unknown regulatory policy {other:?} (expected invert, waive, scaled or none)"
            ))),
        }
    }
}

/// Tunable parameters of the cost model.
///
/// Everything here is fixed for the lifetime of one evaluation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Fraction of market cap lost per year of sustained intervention.
    /// Default: 0.01 (1% annualised trust loss).
    pub annual_trust_loss: f64,

    /// Minutes per year used to turn the annual rate into a per-minute one.
    /// Default: 525 600.
    pub minutes_per_year: f64,

    /// Linear sentiment slope: factor = 1 - slope * score.
    /// Default: 0.5.
    pub sentiment_slope: f64,

    /// Lower clamp on the sentiment factor. Default: 0.1.
    pub sentiment_floor: f64,

    /// Upper clamp on the sentiment factor. Default: 3.0.
    pub sentiment_ceiling: f64,

    /// Regulatory-premium transform. Default: `invert`.
    pub regulatory_policy: RegulatoryPolicyKind,

    /// Premium multiplier used by the `scaled` policy. Default: 2.0.
    pub regulatory_premium_factor: f64,

    /// Calibration overrides applied on top of the default tables.
    pub calibration: CalibrationOverrides,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            annual_trust_loss: 0.01,
            minutes_per_year: 525_600.0,
            sentiment_slope: 0.5,
            sentiment_floor: 0.1,
            sentiment_ceiling: 3.0,
            regulatory_policy: RegulatoryPolicyKind::Invert,
            regulatory_premium_factor: 2.0,
            calibration: CalibrationOverrides::default(),
        }
    }
}

impl ModelConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> InterdictResult<()> {
        if !self.annual_trust_loss.is_finite() || self.annual_trust_loss < 0.0 {
            return Err(InterdictError::Config(format!(
                "annual_trust_loss must be finite and >= 0, got {}",
                self.annual_trust_loss
            )));
        }
        if !self.minutes_per_year.is_finite() || self.minutes_per_year <= 0.0 {
            return Err(InterdictError::Config(format!(
                "minutes_per_year must be finite and > 0, got {}",
                self.minutes_per_year
            )));
        }
        if !self.sentiment_slope.is_finite() || self.sentiment_slope < 0.0 {
            return Err(InterdictError::Config(format!(
                "sentiment_slope must be finite and >= 0, got {}",
                self.sentiment_slope
            )));
        }
        if !(self.sentiment_floor > 0.0 && self.sentiment_floor <= 1.0) {
            return Err(InterdictError::Config(format!(
                "sentiment_floor must be in (0, 1], got {}",
                self.sentiment_floor
            )));
        }
        if !(self.sentiment_ceiling.is_finite() && self.sentiment_ceiling >= 1.0) {
            return Err(InterdictError::Config(format!(
                "sentiment_ceiling must be finite and >= 1, got {}",
                self.sentiment_ceiling
            )));
        }
        if !self.regulatory_premium_factor.is_finite() || self.regulatory_premium_factor < 0.0 {
            return Err(InterdictError::Config(format!(
                "regulatory_premium_factor must be finite and >= 0, got {}",
                self.regulatory_premium_factor
            )));
        }
        Ok(())
    }

    /// Default calibration with this config's overrides applied.
    pub fn calibration(&self) -> InterdictResult<Calibration> {
        Calibration::default().with_overrides(&self.calibration)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> InterdictResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| InterdictError::Config(format!("JSON parse error: {e}")))
    }
}
