// ─────────────────────────────────────────────────────────────────────
// Interdict — Mechanism and Scope Enumerations
// ─────────────────────────────────────────────────────────────────────
//! The closed sets of intervention authorities and blast-radius scopes.
//!
//! Names are parsed case-insensitively with `_`, `-` and whitespace
//! ignored, so `"signer_set"`, `"SignerSet"` and `"Signer Set"` all
//! resolve to [`Mechanism::SignerSet`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InterdictError;

fn normalise(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// An authority able to invoke an emergency intervention.
///
/// Declaration order is the tie-break priority used by the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Small multisig able to pause contracts within minutes.
    SignerSet,
    /// Elected council or security committee.
    DelegatedBody,
    /// Full token-holder vote.
    Governance,
}

impl Mechanism {
    /// All mechanisms in tie-break priority order.
    pub const ALL: [Mechanism; 3] = [
        Mechanism::SignerSet,
        Mechanism::DelegatedBody,
        Mechanism::Governance,
    ];

    /// Tie-break rank (0 = preferred on equal cost).
    pub fn priority(self) -> usize {
        match self {
            Self::SignerSet => 0,
            Self::DelegatedBody => 1,
            Self::Governance => 2,
        }
    }

    /// Whether regulators treat this mechanism as an accountable authority.
    ///
    /// Only authoritative mechanisms are touched by a regulatory premium.
    pub fn is_authoritative(self) -> bool {
        !matches!(self, Self::Governance)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignerSet => "signer_set",
            Self::DelegatedBody => "delegated_body",
            Self::Governance => "governance",
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mechanism {
    type Err = InterdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "signerset" => Ok(Self::SignerSet),
            "delegatedbody" => Ok(Self::DelegatedBody),
            "governance" => Ok(Self::Governance),
            _ => Err(InterdictError::UnknownMechanism(s.to_string())),
        }
    }
}

/// Blast radius of an intervention, ordered by increasing severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    /// A single token or market.
    Asset,
    /// A single account or position.
    Account,
    /// One contract module (e.g. a lending pool).
    Module,
    /// The whole protocol.
    #[default]
    Protocol,
    /// The underlying chain.
    Network,
}

impl ScopeLevel {
    /// All scopes, least to most severe.
    pub const ALL: [ScopeLevel; 5] = [
        ScopeLevel::Asset,
        ScopeLevel::Account,
        ScopeLevel::Module,
        ScopeLevel::Protocol,
        ScopeLevel::Network,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Account => "account",
            Self::Module => "module",
            Self::Protocol => "protocol",
            Self::Network => "network",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeLevel {
    type Err = InterdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "asset" => Ok(Self::Asset),
            "account" => Ok(Self::Account),
            "module" => Ok(Self::Module),
            "protocol" => Ok(Self::Protocol),
            "network" => Ok(Self::Network),
            _ => Err(InterdictError::UnknownScope(s.to_string())),
        }
    }
}
