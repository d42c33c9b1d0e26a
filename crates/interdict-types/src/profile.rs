// ─────────────────────────────────────────────────────────────────────
// Interdict — Protocol Profile
// ─────────────────────────────────────────────────────────────────────
//! The validated scenario record every evaluation starts from.
//!
//! Profiles are only obtainable through [`ProfileBuilder::build`] (or
//! [`ProtocolProfile::from_json`], which routes through it), so every
//! field constraint holds for the lifetime of the value.

use serde::{Deserialize, Serialize};

use crate::calibration::DEFAULT_GOVERNANCE_MINUTES;
use crate::error::{InterdictError, InterdictResult};
use crate::mechanism::ScopeLevel;

/// Default probability that the threat materialises.
pub const DEFAULT_THREAT_PROBABILITY: f64 = 0.01;

/// A scenario under evaluation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolProfile {
    market_cap: f64,
    daily_volume: f64,
    damage_rate_per_minute: f64,
    threat_probability: f64,
    sentiment_score: f64,
    scope: ScopeLevel,
    governance_time_minutes: u32,
    is_regulated: bool,
}

impl ProtocolProfile {
    /// Start a builder with the three required fields; everything else
    /// takes its documented default.
    pub fn builder(market_cap: f64, daily_volume: f64, damage_rate_per_minute: f64) -> ProfileBuilder {
        ProfileBuilder::new(market_cap, daily_volume, damage_rate_per_minute)
    }

    /// Parse and validate a profile from JSON.
    pub fn from_json(json: &str) -> InterdictResult<Self> {
        let spec: ProfileSpec = serde_json::from_str(json)
            .map_err(|e| InterdictError::Config(format!("profile JSON parse error: {e}")))?;
        spec.into_builder().build()
    }

    pub fn market_cap(&self) -> f64 {
        self.market_cap
    }

    pub fn daily_volume(&self) -> f64 {
        self.daily_volume
    }

    pub fn damage_rate_per_minute(&self) -> f64 {
        self.damage_rate_per_minute
    }

    pub fn threat_probability(&self) -> f64 {
        self.threat_probability
    }

    pub fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn scope(&self) -> ScopeLevel {
        self.scope
    }

    pub fn governance_time_minutes(&self) -> u32 {
        self.governance_time_minutes
    }

    pub fn is_regulated(&self) -> bool {
        self.is_regulated
    }

    /// A builder pre-filled with this profile's values, for what-if
    /// variations (e.g. sweeping the damage rate).
    pub fn to_builder(&self) -> ProfileBuilder {
        ProfileBuilder {
            market_cap: self.market_cap,
            daily_volume: self.daily_volume,
            damage_rate_per_minute: self.damage_rate_per_minute,
            threat_probability: self.threat_probability,
            sentiment_score: self.sentiment_score,
            scope: ScopeField::Level(self.scope),
            governance_time_minutes: self.governance_time_minutes,
            is_regulated: self.is_regulated,
        }
    }
}

#[derive(Debug, Clone)]
enum ScopeField {
    Level(ScopeLevel),
    Name(String),
}

/// Collects profile fields; [`build`](Self::build) validates them all at once.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    market_cap: f64,
    daily_volume: f64,
    damage_rate_per_minute: f64,
    threat_probability: f64,
    sentiment_score: f64,
    scope: ScopeField,
    governance_time_minutes: u32,
    is_regulated: bool,
}

impl ProfileBuilder {
    pub fn new(market_cap: f64, daily_volume: f64, damage_rate_per_minute: f64) -> Self {
        Self {
            market_cap,
            daily_volume,
            damage_rate_per_minute,
            threat_probability: DEFAULT_THREAT_PROBABILITY,
            sentiment_score: 0.0,
            scope: ScopeField::Level(ScopeLevel::default()),
            governance_time_minutes: DEFAULT_GOVERNANCE_MINUTES,
            is_regulated: false,
        }
    }

    pub fn market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn daily_volume(mut self, daily_volume: f64) -> Self {
        self.daily_volume = daily_volume;
        self
    }

    pub fn damage_rate_per_minute(mut self, rate: f64) -> Self {
        self.damage_rate_per_minute = rate;
        self
    }

    pub fn threat_probability(mut self, p: f64) -> Self {
        self.threat_probability = p;
        self
    }

    pub fn sentiment_score(mut self, score: f64) -> Self {
        self.sentiment_score = score;
        self
    }

    pub fn scope(mut self, scope: ScopeLevel) -> Self {
        self.scope = ScopeField::Level(scope);
        self
    }

    /// Scope by name; an unknown name fails at [`build`](Self::build).
    pub fn scope_name(mut self, name: impl Into<String>) -> Self {
        self.scope = ScopeField::Name(name.into());
        self
    }

    pub fn governance_time_minutes(mut self, minutes: u32) -> Self {
        self.governance_time_minutes = minutes;
        self
    }

    pub fn regulated(mut self, is_regulated: bool) -> Self {
        self.is_regulated = is_regulated;
        self
    }

    /// Validate every field and produce the immutable profile.
    pub fn build(self) -> InterdictResult<ProtocolProfile> {
        if !self.market_cap.is_finite() || self.market_cap <= 0.0 {
            return Err(InterdictError::invalid("market_cap", "finite and > 0", self.market_cap));
        }
        if !self.daily_volume.is_finite() || self.daily_volume <= 0.0 {
            return Err(InterdictError::invalid(
                "daily_volume",
                "finite and > 0",
                self.daily_volume,
            ));
        }
        if !self.damage_rate_per_minute.is_finite() || self.damage_rate_per_minute < 0.0 {
            return Err(InterdictError::invalid(
                "damage_rate_per_minute",
                "finite and >= 0",
                self.damage_rate_per_minute,
            ));
        }
        // containment_minutes is a u32, so this bounds every exploit term.
        if !(self.damage_rate_per_minute * u32::MAX as f64).is_finite() {
            return Err(InterdictError::invalid(
                "damage_rate_per_minute",
                "finite when multiplied by any containment window",
                self.damage_rate_per_minute,
            ));
        }
        if !(0.0..=1.0).contains(&self.threat_probability) {
            return Err(InterdictError::invalid(
                "threat_probability",
                "in [0, 1]",
                self.threat_probability,
            ));
        }
        if !self.sentiment_score.is_finite() {
            return Err(InterdictError::invalid(
                "sentiment_score",
                "finite",
                self.sentiment_score,
            ));
        }
        if self.governance_time_minutes == 0 {
            return Err(InterdictError::invalid(
                "governance_time_minutes",
                "> 0",
                self.governance_time_minutes,
            ));
        }
        let scope = match self.scope {
            ScopeField::Level(level) => level,
            ScopeField::Name(name) => name.parse()?,
        };

        Ok(ProtocolProfile {
            market_cap: self.market_cap,
            daily_volume: self.daily_volume,
            damage_rate_per_minute: self.damage_rate_per_minute,
            threat_probability: self.threat_probability,
            sentiment_score: self.sentiment_score,
            scope,
            governance_time_minutes: self.governance_time_minutes,
            is_regulated: self.is_regulated,
        })
    }
}

fn default_threat_probability() -> f64 {
    DEFAULT_THREAT_PROBABILITY
}

fn default_scope() -> String {
    ScopeLevel::default().to_string()
}

fn default_governance_minutes() -> u32 {
    DEFAULT_GOVERNANCE_MINUTES
}

/// Unvalidated wire form of a profile, with serde defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    pub market_cap: f64,
    pub daily_volume: f64,
    pub damage_rate_per_minute: f64,
    #[serde(default = "default_threat_probability")]
    pub threat_probability: f64,
    #[serde(default)]
    pub sentiment_score: f64,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_governance_minutes")]
    pub governance_time_minutes: u32,
    #[serde(default)]
    pub is_regulated: bool,
}

impl ProfileSpec {
    pub fn into_builder(self) -> ProfileBuilder {
        ProfileBuilder::new(self.market_cap, self.daily_volume, self.damage_rate_per_minute)
            .threat_probability(self.threat_probability)
            .sentiment_score(self.sentiment_score)
            .scope_name(self.scope)
            .governance_time_minutes(self.governance_time_minutes)
            .regulated(self.is_regulated)
    }
}
