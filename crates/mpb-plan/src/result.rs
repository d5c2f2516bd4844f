//! The result contract every planner returns.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use mpb_core::Cell;

/// Terminal status of a planning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerStatus {
    /// A validated path from start to goal was found.
    Success,
    /// The search space was exhausted without reaching the goal.
    NoPath,
    /// The endpoints were out of bounds or blocked.
    InvalidInput,
}

/// Algorithm-specific counter attached to a [`PlannerResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    /// Integer counter.
    Int(i64),
    /// Floating point measurement.
    Float(f64),
    /// Boolean flag.
    Flag(bool),
    /// Free-form text.
    Text(String),
    /// Ordered sequence of floats, e.g. a threshold history.
    FloatList(Vec<f64>),
}

/// Uniform planner output: one tagged shape for every algorithm.
///
/// `path` is inclusive of both endpoints and empty unless `status` is
/// [`PlannerStatus::Success`]. Algorithm-specific counters live in
/// `extensions` so downstream consumers never branch on planner identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerResult {
    /// Cells from start to goal, empty on failure.
    pub path: Vec<Cell>,
    /// Terminal status.
    pub status: PlannerStatus,
    /// Number of node expansions performed.
    pub expansions: u64,
    /// Wall-clock planning time in milliseconds.
    pub elapsed_ms: f64,
    /// Cost of the returned path, `None` on failure.
    pub path_cost: Option<f64>,
    /// Detail string for rejected input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Algorithm-specific counters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, MetricValue>,
}

impl PlannerResult {
    /// Builds a successful result.
    pub fn success(path: Vec<Cell>, path_cost: f64, expansions: u64, elapsed_ms: f64) -> Self {
        Self {
            path,
            status: PlannerStatus::Success,
            expansions,
            elapsed_ms,
            path_cost: Some(path_cost),
            error: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Builds a result for an exhausted search.
    pub fn no_path(expansions: u64, elapsed_ms: f64) -> Self {
        Self {
            path: Vec::new(),
            status: PlannerStatus::NoPath,
            expansions,
            elapsed_ms,
            path_cost: None,
            error: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Builds a rejection for invalid endpoints.
    pub fn invalid_input(detail: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            path: Vec::new(),
            status: PlannerStatus::InvalidInput,
            expansions: 0,
            elapsed_ms,
            path_cost: None,
            error: Some(detail.into()),
            extensions: BTreeMap::new(),
        }
    }

    /// Attaches an extension metric.
    pub fn with_metric(mut self, key: impl Into<String>, value: MetricValue) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// True when the attempt produced a path.
    pub fn is_success(&self) -> bool {
        self.status == PlannerStatus::Success
    }
}

/// Monotonic wall-clock timer for planner runs.
#[derive(Debug)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    /// Starts the timer.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1_000.0
    }
}
