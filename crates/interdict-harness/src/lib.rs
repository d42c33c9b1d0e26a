// ─────────────────────────────────────────────────────────────────────
// Interdict — Historical Validation
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Batch validation of recommendations against recorded interventions.
//!
//! - `ValidationHarness`: parallel replay of historical cases
//! - `ValidationReport`: agreement rate, mismatches, confusion matrix

pub mod harness;

pub use harness::{ConfusionMatrix, HistoricalCase, Mismatch, ValidationHarness, ValidationReport};
