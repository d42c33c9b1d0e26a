// ─────────────────────────────────────────────────────────────────────
// Interdict — Validation Harness
// ─────────────────────────────────────────────────────────────────────
//! Replays historical incidents through the cost model and compares the
//! recommendation with the mechanism that was actually used.
//!
//! Dataset loading and label cleaning happen upstream; this module takes
//! already-parsed cases. Cases are independent, so they are scored on the
//! rayon pool and collected back in input order.

use rayon::prelude::*;
use serde::Serialize;

use interdict_core::CostModel;
use interdict_types::{InterdictResult, Mechanism, ProtocolProfile, Recommendation};

/// One historical incident with its recorded outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalCase {
    pub id: String,
    pub profile: ProtocolProfile,
    pub observed: Mechanism,
}

impl HistoricalCase {
    pub fn new(id: impl Into<String>, profile: ProtocolProfile, observed: Mechanism) -> Self {
        Self {
            id: id.into(),
            profile,
            observed,
        }
    }

    /// Build from a raw outcome label (same name rules as [`Mechanism`]).
    pub fn from_label(
        id: impl Into<String>,
        profile: ProtocolProfile,
        label: &str,
    ) -> InterdictResult<Self> {
        Ok(Self::new(id, profile, label.parse()?))
    }
}

/// A case where the model disagreed with history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub id: String,
    pub observed: Mechanism,
    pub recommended: Mechanism,
    /// 0-based rank the model gave the observed mechanism.
    pub observed_rank: usize,
    /// Observed mechanism's total minus the recommended one's (≥ 0).
    pub cost_gap: f64,
}

/// Counts of `observed → recommended` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: [[usize; 3]; 3],
}

impl ConfusionMatrix {
    pub fn record(&mut self, observed: Mechanism, recommended: Mechanism) {
        self.counts[observed.priority()][recommended.priority()] += 1;
    }

    pub fn get(&self, observed: Mechanism, recommended: Mechanism) -> usize {
        self.counts[observed.priority()][recommended.priority()]
    }

    /// Cases where `mechanism` was observed.
    pub fn observed_total(&self, mechanism: Mechanism) -> usize {
        self.counts[mechanism.priority()].iter().sum()
    }

    /// Every `(observed, recommended, count)` cell, row-major in
    /// [`Mechanism::ALL`] order, zeros included.
    pub fn cells(&self) -> impl Iterator<Item = (Mechanism, Mechanism, usize)> + '_ {
        Mechanism::ALL.into_iter().flat_map(move |observed| {
            Mechanism::ALL
                .into_iter()
                .map(move |recommended| (observed, recommended, self.get(observed, recommended)))
        })
    }

    /// Share of `mechanism`'s historical cases the model also picked.
    /// `None` when the mechanism never occurs in the batch.
    pub fn recall(&self, mechanism: Mechanism) -> Option<f64> {
        let total = self.observed_total(mechanism);
        (total > 0).then(|| self.get(mechanism, mechanism) as f64 / total as f64)
    }
}

/// Aggregate agreement between model and history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub agreements: usize,
    /// agreements / total; 0.0 for an empty batch.
    pub agreement_rate: f64,
    pub mismatches: Vec<Mismatch>,
    pub confusion: ConfusionMatrix,
}

/// Batch evaluator bound to one cost-model context.
pub struct ValidationHarness {
    model: CostModel,
}

impl ValidationHarness {
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    /// Score every case in parallel and aggregate.
    pub fn run(&self, cases: &[HistoricalCase]) -> ValidationReport {
        let recommendations: Vec<Recommendation> = cases
            .par_iter()
            .map(|case| self.model.recommend(&case.profile))
            .collect();
        self.summarise(cases, &recommendations)
    }

    /// Same as [`run`](Self::run) on the calling thread only.
    pub fn run_sequential(&self, cases: &[HistoricalCase]) -> ValidationReport {
        let recommendations: Vec<Recommendation> = cases
            .iter()
            .map(|case| self.model.recommend(&case.profile))
            .collect();
        self.summarise(cases, &recommendations)
    }

    fn summarise(&self, cases: &[HistoricalCase], recs: &[Recommendation]) -> ValidationReport {
        let mut report = ValidationReport {
            total: cases.len(),
            ..Default::default()
        };

        for (case, rec) in cases.iter().zip(recs) {
            report.confusion.record(case.observed, rec.mechanism);
            if rec.mechanism == case.observed {
                report.agreements += 1;
                continue;
            }
            let observed_rank = rec.rank_of(case.observed).unwrap_or(rec.ranked.len());
            let cost_gap = rec
                .cost_of(case.observed)
                .map(|c| c.total_cost() - rec.ranked[0].total_cost())
                .unwrap_or(f64::INFINITY);
            report.mismatches.push(Mismatch {
                id: case.id.clone(),
                observed: case.observed,
                recommended: rec.mechanism,
                observed_rank,
                cost_gap,
            });
        }

        if report.total == 0 {
            log::warn!("validation batch is empty; agreement rate reported as 0");
        } else {
            report.agreement_rate = report.agreements as f64 / report.total as f64;
        }

        log::info!(
            "validated {} cases: {} agree ({:.1}%), {} mismatches [policy={}]",
            report.total,
            report.agreements,
            report.agreement_rate * 100.0,
            report.mismatches.len(),
            self.model.regulatory_policy_name()
        );
        report
    }
}
