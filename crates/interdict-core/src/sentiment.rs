// ─────────────────────────────────────────────────────────────────────
// Interdict — Sentiment Curves
// ─────────────────────────────────────────────────────────────────────
//! Map an externally computed community sentiment score to the cost
//! multiplier applied to centralization and blast cost.
//!
//! Scoring the text itself happens upstream (VADER, an LLM, a forum
//! classifier); this module only shapes the resulting number. Every
//! curve must return exactly 1.0 for a neutral score of 0.0, and
//! [`crate::CostModel`] short-circuits that case so the neutral point
//! holds even for caller-supplied curves.

use interdict_types::{InterdictError, InterdictResult, ModelConfig};

/// Trait for sentiment-to-multiplier curves.
///
/// Negative scores (hostile community) should return factors > 1,
/// positive scores factors < 1.
pub trait SentimentCurve: Send + Sync {
    fn factor(&self, score: f64) -> f64;
}

/// `clamp(1 - slope * score, floor, ceiling)`.
///
/// Bounds are checked on construction, so `clamp` never sees
/// `floor > ceiling` or a NaN bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSentiment {
    slope: f64,
    floor: f64,
    ceiling: f64,
}

impl Default for LinearSentiment {
    fn default() -> Self {
        Self {
            slope: 0.5,
            floor: 0.1,
            ceiling: 3.0,
        }
    }
}

impl LinearSentiment {
    /// Same constraints as the `sentiment_*` keys of [`ModelConfig`].
    pub fn new(slope: f64, floor: f64, ceiling: f64) -> InterdictResult<Self> {
        if !slope.is_finite() || slope < 0.0 {
            return Err(InterdictError::Config(format!(
                "sentiment slope must be finite and >= 0, got {slope}"
            )));
        }
        if !(floor > 0.0 && floor <= 1.0) {
            return Err(InterdictError::Config(format!(
                "sentiment floor must be in (0, 1], got {floor}"
            )));
        }
        if !(ceiling.is_finite() && ceiling >= 1.0) {
            return Err(InterdictError::Config(format!(
                "sentiment ceiling must be finite and >= 1, got {ceiling}"
            )));
        }
        Ok(Self {
            slope,
            floor,
            ceiling,
        })
    }

    pub fn from_config(config: &ModelConfig) -> InterdictResult<Self> {
        Self::new(
            config.sentiment_slope,
            config.sentiment_floor,
            config.sentiment_ceiling,
        )
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }
}

impl SentimentCurve for LinearSentiment {
    fn factor(&self, score: f64) -> f64 {
        (1.0 - self.slope * score).clamp(self.floor, self.ceiling)
    }
}

/// `exp(-sensitivity * score)`; never reaches zero, unbounded above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSentiment {
    pub sensitivity: f64,
}

impl SentimentCurve for ExponentialSentiment {
    fn factor(&self, score: f64) -> f64 {
        (-self.sensitivity * score).exp()
    }
}

/// Curve backed by a caller-supplied function.
///
/// Used by the PyO3 layer to keep fitted curves in Python.
type SentimentFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

pub struct ExternalSentiment {
    factor_fn: SentimentFn,
}

impl ExternalSentiment {
    pub fn new(factor_fn: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            factor_fn: Box::new(factor_fn),
        }
    }
}

impl SentimentCurve for ExternalSentiment {
    fn factor(&self, score: f64) -> f64 {
        (self.factor_fn)(score)
    }
}
