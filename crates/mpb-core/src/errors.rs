//! Structured error types shared across the benchmark crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`MpbError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (names, counts, file paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new payload from a code and a message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Attaches a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the benchmark workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum MpbError {
    /// Maze generation and wall-grid errors.
    #[error("maze error: {0}")]
    Maze(ErrorInfo),
    /// Occupancy grid construction and shape errors.
    #[error("grid error: {0}")]
    Grid(ErrorInfo),
    /// Planner configuration and registry errors.
    #[error("planner error: {0}")]
    Planner(ErrorInfo),
    /// Benchmark harness configuration and integrity errors.
    #[error("benchmark error: {0}")]
    Benchmark(ErrorInfo),
    /// Statistical engine input and sanity-gate errors.
    #[error("stats error: {0}")]
    Stats(ErrorInfo),
    /// Filesystem errors surfaced while reading or writing artifacts.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl MpbError {
    /// Returns the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            MpbError::Maze(info)
            | MpbError::Grid(info)
            | MpbError::Planner(info)
            | MpbError::Benchmark(info)
            | MpbError::Stats(info)
            | MpbError::Io(info)
            | MpbError::Serde(info) => info,
        }
    }
}
