// ─────────────────────────────────────────────────────────────────────
// Interdict — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Interdict failures.
///
/// Every variant is raised at construction time (profile, calibration,
/// config). Once a [`crate::ProtocolProfile`] exists, evaluation is total.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterdictError {
    /// Name is not one of the fixed intervention mechanisms.
    #[error("unknown mechanism: {0:?}")]
    UnknownMechanism(String),

    /// Name is not one of the fixed scope levels.
    #[error("unknown scope: {0:?}")]
    UnknownScope(String),

    /// A profile or calibration field violates its constraint.
    #[error("invalid parameter `{field}`: must be {constraint}, got {value}")]
    InvalidParameter {
        field: &'static str,
        constraint: &'static str,
        value: String,
    },

    /// Model configuration is malformed or fails validation.
    #[error("config error: {0}")]
    Config(String),
}

impl InterdictError {
    pub(crate) fn invalid(
        field: &'static str,
        constraint: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidParameter {
            field,
            constraint,
            value: value.to_string(),
        }
    }
}

pub type InterdictResult<T> = Result<T, InterdictError>;
