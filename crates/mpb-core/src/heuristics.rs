//! Named distance heuristics and their lookup registry.

use std::collections::BTreeMap;

use crate::errors::{ErrorInfo, MpbError};
use crate::types::Cell;

/// Signature shared by all grid heuristics.
pub type HeuristicFn = fn(Cell, Cell) -> f64;

/// Manhattan (L1) distance.
pub fn manhattan(a: Cell, b: Cell) -> f64 {
    let dr = a.row.abs_diff(b.row);
    let dc = a.col.abs_diff(b.col);
    (dr + dc) as f64
}

/// Euclidean (L2) distance.
pub fn euclidean(a: Cell, b: Cell) -> f64 {
    let dr = a.row.abs_diff(b.row) as f64;
    let dc = a.col.abs_diff(b.col) as f64;
    (dr * dr + dc * dc).sqrt()
}

/// Chebyshev (L-infinity) distance.
pub fn chebyshev(a: Cell, b: Cell) -> f64 {
    let dr = a.row.abs_diff(b.row);
    let dc = a.col.abs_diff(b.col);
    dr.max(dc) as f64
}

/// Explicit name-to-heuristic registry.
///
/// Built once at startup and passed by reference so tests can construct
/// isolated registries; there is no process-wide registration.
#[derive(Debug, Clone, Default)]
pub struct HeuristicRegistry {
    entries: BTreeMap<String, HeuristicFn>,
}

impl HeuristicRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard registry with `manhattan`, `euclidean`, and
    /// `chebyshev`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert("manhattan", manhattan);
        registry.insert("euclidean", euclidean);
        registry.insert("chebyshev", chebyshev);
        registry
    }

    /// Registers a heuristic under the given name, replacing any previous
    /// entry.
    pub fn insert(&mut self, name: impl Into<String>, heuristic: HeuristicFn) {
        self.entries.insert(name.into(), heuristic);
    }

    /// Resolves a heuristic by name.
    pub fn resolve(&self, name: &str) -> Result<HeuristicFn, MpbError> {
        self.entries.get(name).copied().ok_or_else(|| {
            MpbError::Planner(
                ErrorInfo::new(
                    "heuristic-unknown",
                    format!(
                        "unknown heuristic '{name}', available: [{}]",
                        self.names().join(", ")
                    ),
                )
                .with_context("requested", name),
            )
        })
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
