// ─────────────────────────────────────────────────────────────────────
// Interdict — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Interdict cost kernel.
//!
//! Exposes `ModelConfig`, `ProtocolProfile`, `RustCostModel` and
//! `validate_cases` so the Python analysis pipeline (dataset loading,
//! sentiment extraction, plotting) can drive the Rust core.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - A failing sentiment callback yields NaN, which the cost model
//!   replaces with the neutral factor.
//! - Batch validation releases the GIL so rayon workers can re-acquire
//!   it for callbacks without deadlocking.
//! - Every constructor validates; errors surface as `ValueError`.
//!
//! Install: `pip install -e crates/interdict-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from interdict_kernel import ProtocolProfile, RustCostModel
//!
//! model = RustCostModel()
//! profile = ProtocolProfile(1e8, 1e6, 10.0, scope="asset")
//! model.recommend(profile)  # "governance"
//! ```

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use interdict_core::{break_even_damage_rate, next_flip, CostModel, ExternalSentiment};
use interdict_harness::{HistoricalCase, ValidationHarness};
use interdict_types::{
    CalibrationOverrides, InterdictError, Mechanism, MechanismCost, ModelConfig, ProtocolProfile,
    RegulatoryPolicyKind, DEFAULT_GOVERNANCE_MINUTES, DEFAULT_THREAT_PROBABILITY,
};

fn to_py_err(e: InterdictError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_mechanism(name: &str) -> PyResult<Mechanism> {
    name.parse().map_err(to_py_err)
}

fn cost_to_dict<'py>(py: Python<'py>, cost: &MechanismCost) -> PyResult<Bound<'py, PyDict>> {
    let b = &cost.breakdown;
    let breakdown = PyDict::new(py);
    breakdown.set_item("centralization_cost", b.centralization_cost)?;
    breakdown.set_item("blast_cost", b.blast_cost)?;
    breakdown.set_item("expected_exploit_cost", b.expected_exploit_cost)?;
    breakdown.set_item("containment_minutes", b.containment_minutes)?;
    breakdown.set_item("sentiment_factor", b.sentiment_factor)?;

    let dict = PyDict::new(py);
    dict.set_item("mechanism", cost.mechanism.as_str())?;
    dict.set_item("total_cost", b.total_cost)?;
    dict.set_item("breakdown", breakdown)?;
    Ok(dict)
}

// ─── PyModelConfig ──────────────────────────────────────────────────

/// Python-visible cost model configuration.
#[pyclass(name = "ModelConfig")]
#[derive(Clone)]
struct PyModelConfig {
    inner: ModelConfig,
}

#[pymethods]
impl PyModelConfig {
    #[new]
    #[pyo3(signature = (
        annual_trust_loss = 0.01,
        minutes_per_year = 525_600.0,
        sentiment_slope = 0.5,
        sentiment_floor = 0.1,
        sentiment_ceiling = 3.0,
        regulatory_policy = "invert",
        regulatory_premium_factor = 2.0,
        calibration_json = None,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        annual_trust_loss: f64,
        minutes_per_year: f64,
        sentiment_slope: f64,
        sentiment_floor: f64,
        sentiment_ceiling: f64,
        regulatory_policy: &str,
        regulatory_premium_factor: f64,
        calibration_json: Option<&str>,
    ) -> PyResult<Self> {
        let regulatory_policy: RegulatoryPolicyKind =
            regulatory_policy.parse().map_err(to_py_err)?;
        let calibration = match calibration_json {
            Some(json) => CalibrationOverrides::from_json(json).map_err(to_py_err)?,
            None => CalibrationOverrides::default(),
        };
        let config = ModelConfig {
            annual_trust_loss,
            minutes_per_year,
            sentiment_slope,
            sentiment_floor,
            sentiment_ceiling,
            regulatory_policy,
            regulatory_premium_factor,
            calibration,
        };
        config.validate().map_err(to_py_err)?;
        config.calibration().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = ModelConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        config.calibration().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn __repr__(&self) -> String {
        format!(
            "ModelConfig(annual_trust_loss={}, sentiment_slope={}, regulatory_policy={})",
            self.inner.annual_trust_loss,
            self.inner.sentiment_slope,
            self.inner.regulatory_policy.as_str()
        )
    }
}

// ─── PyProtocolProfile ──────────────────────────────────────────────

/// Python-visible validated protocol profile.
#[pyclass(name = "ProtocolProfile")]
#[derive(Clone)]
struct PyProtocolProfile {
    inner: ProtocolProfile,
}

#[pymethods]
impl PyProtocolProfile {
    #[new]
    #[pyo3(signature = (
        market_cap,
        daily_volume,
        damage_rate_per_minute,
        threat_probability = DEFAULT_THREAT_PROBABILITY,
        sentiment_score = 0.0,
        scope = "protocol",
        governance_time_minutes = DEFAULT_GOVERNANCE_MINUTES,
        is_regulated = false,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        market_cap: f64,
        daily_volume: f64,
        damage_rate_per_minute: f64,
        threat_probability: f64,
        sentiment_score: f64,
        scope: &str,
        governance_time_minutes: u32,
        is_regulated: bool,
    ) -> PyResult<Self> {
        let inner = ProtocolProfile::builder(market_cap, daily_volume, damage_rate_per_minute)
            .threat_probability(threat_probability)
            .sentiment_score(sentiment_score)
            .scope_name(scope)
            .governance_time_minutes(governance_time_minutes)
            .regulated(is_regulated)
            .build()
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let inner = ProtocolProfile::from_json(json).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn market_cap(&self) -> f64 {
        self.inner.market_cap()
    }

    #[getter]
    fn daily_volume(&self) -> f64 {
        self.inner.daily_volume()
    }

    #[getter]
    fn damage_rate_per_minute(&self) -> f64 {
        self.inner.damage_rate_per_minute()
    }

    #[getter]
    fn threat_probability(&self) -> f64 {
        self.inner.threat_probability()
    }

    #[getter]
    fn sentiment_score(&self) -> f64 {
        self.inner.sentiment_score()
    }

    #[getter]
    fn scope(&self) -> &'static str {
        self.inner.scope().as_str()
    }

    #[getter]
    fn governance_time_minutes(&self) -> u32 {
        self.inner.governance_time_minutes()
    }

    #[getter]
    fn is_regulated(&self) -> bool {
        self.inner.is_regulated()
    }

    fn __repr__(&self) -> String {
        format!(
            "ProtocolProfile(market_cap={}, damage_rate_per_minute={}, scope={}, regulated={})",
            self.inner.market_cap(),
            self.inner.damage_rate_per_minute(),
            self.inner.scope(),
            self.inner.is_regulated()
        )
    }
}

// ─── RustCostModel ──────────────────────────────────────────────────

/// Python-visible cost model and ranker.
#[pyclass(name = "RustCostModel")]
struct PyCostModel {
    inner: CostModel,
}

#[pymethods]
impl PyCostModel {
    /// Create a cost model.
    ///
    /// If `sentiment_callback` is provided (callable `(score) -> factor`),
    /// it replaces the linear sentiment curve.
    #[new]
    #[pyo3(signature = (config = None, sentiment_callback = None))]
    fn new(config: Option<PyModelConfig>, sentiment_callback: Option<PyObject>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        let mut model = CostModel::from_config(&config).map_err(to_py_err)?;

        if let Some(cb) = sentiment_callback {
            let curve = ExternalSentiment::new(move |score| {
                Python::with_gil(|py| {
                    cb.call1(py, (score,))
                        .and_then(|r| r.extract::<f64>(py))
                        .unwrap_or(f64::NAN)
                })
            });
            model = model.with_sentiment(Arc::new(curve));
        }

        Ok(Self { inner: model })
    }

    /// Every mechanism, cheapest first, as dicts.
    fn evaluate<'py>(
        &self,
        py: Python<'py>,
        profile: &PyProtocolProfile,
    ) -> PyResult<Vec<Bound<'py, PyDict>>> {
        let rec = self.inner.recommend(&profile.inner);
        rec.ranked.iter().map(|c| cost_to_dict(py, c)).collect()
    }

    /// Name of the cheapest mechanism.
    fn recommend(&self, profile: &PyProtocolProfile) -> &'static str {
        self.inner.recommend(&profile.inner).mechanism.as_str()
    }

    /// Full recommendation: mechanism, margin and ranked rows.
    fn recommendation<'py>(
        &self,
        py: Python<'py>,
        profile: &PyProtocolProfile,
    ) -> PyResult<Bound<'py, PyDict>> {
        let rec = self.inner.recommend(&profile.inner);
        let ranked = rec
            .ranked
            .iter()
            .map(|c| cost_to_dict(py, c))
            .collect::<PyResult<Vec<_>>>()?;
        let dict = PyDict::new(py);
        dict.set_item("mechanism", rec.mechanism.as_str())?;
        dict.set_item("margin", rec.margin)?;
        dict.set_item("ranked", ranked)?;
        Ok(dict)
    }

    /// Damage rate at which mechanisms `a` and `b` cost the same.
    fn break_even(&self, profile: &PyProtocolProfile, a: &str, b: &str) -> PyResult<Option<f64>> {
        let a = parse_mechanism(a)?;
        let b = parse_mechanism(b)?;
        Ok(break_even_damage_rate(&self.inner, &profile.inner, a, b))
    }

    /// Next damage rate at which the recommendation changes, if any.
    fn next_flip<'py>(
        &self,
        py: Python<'py>,
        profile: &PyProtocolProfile,
    ) -> PyResult<Option<Bound<'py, PyDict>>> {
        let Some(flip) = next_flip(&self.inner, &profile.inner) else {
            return Ok(None);
        };
        let dict = PyDict::new(py);
        dict.set_item("damage_rate_per_minute", flip.damage_rate_per_minute)?;
        dict.set_item("from", flip.from.as_str())?;
        dict.set_item("to", flip.to.as_str())?;
        Ok(Some(dict))
    }

    #[getter]
    fn regulatory_policy(&self) -> &'static str {
        self.inner.regulatory_policy_name()
    }
}

// ─── validate_cases ─────────────────────────────────────────────────

/// Replay `(profile, observed_label)` pairs and report agreement.
///
/// `ids` defaults to the case index.
#[pyfunction]
#[pyo3(signature = (model, cases, ids = None))]
fn validate_cases<'py>(
    py: Python<'py>,
    model: &PyCostModel,
    cases: Vec<(PyProtocolProfile, String)>,
    ids: Option<Vec<String>>,
) -> PyResult<Bound<'py, PyDict>> {
    if let Some(ids) = &ids {
        if ids.len() != cases.len() {
            return Err(PyValueError::new_err(format!(
                "ids has {} entries but cases has {}",
                ids.len(),
                cases.len()
            )));
        }
    }

    let cases = cases
        .into_iter()
        .enumerate()
        .map(|(i, (profile, label))| {
            let id = ids
                .as_ref()
                .map(|ids| ids[i].clone())
                .unwrap_or_else(|| i.to_string());
            HistoricalCase::from_label(id, profile.inner, &label)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_py_err)?;

    let harness = ValidationHarness::new(model.inner.clone());
    let report = py.allow_threads(|| harness.run(&cases));

    let mut mismatches = Vec::with_capacity(report.mismatches.len());
    for m in &report.mismatches {
        let row = PyDict::new(py);
        row.set_item("id", &m.id)?;
        row.set_item("observed", m.observed.as_str())?;
        row.set_item("recommended", m.recommended.as_str())?;
        row.set_item("observed_rank", m.observed_rank)?;
        row.set_item("cost_gap", m.cost_gap)?;
        mismatches.push(row);
    }

    // confusion[observed][recommended] = count
    let confusion = PyDict::new(py);
    for observed in Mechanism::ALL {
        let row = PyDict::new(py);
        for (_, recommended, count) in report
            .confusion
            .cells()
            .filter(|&(o, _, _)| o == observed)
        {
            row.set_item(recommended.as_str(), count)?;
        }
        confusion.set_item(observed.as_str(), row)?;
    }

    let recall = PyDict::new(py);
    for mechanism in Mechanism::ALL {
        recall.set_item(mechanism.as_str(), report.confusion.recall(mechanism))?;
    }

    let dict = PyDict::new(py);
    dict.set_item("total", report.total)?;
    dict.set_item("agreements", report.agreements)?;
    dict.set_item("agreement_rate", report.agreement_rate)?;
    dict.set_item("mismatches", mismatches)?;
    dict.set_item("confusion", confusion)?;
    dict.set_item("recall", recall)?;
    Ok(dict)
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn interdict_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyModelConfig>()?;
    m.add_class::<PyProtocolProfile>()?;
    m.add_class::<PyCostModel>()?;
    m.add_function(wrap_pyfunction!(validate_cases, m)?)?;
    Ok(())
}
