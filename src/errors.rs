use std::fmt;

use thiserror::Error;

use crate::domain::{AreaId, RowKey};

pub type Result<T> = std::result::Result<T, CascadeError>;

/// Failures raised by the selection and mapping engine.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("{level} `{id}` is not among the currently available options")]
    InvalidSelection { level: SelectionLevel, id: String },
    #[error("stored selection can no longer be resolved: {0}")]
    StaleSelection(StaleReason),
    #[error("selection is locked and cannot be edited")]
    SelectionLocked,
    #[error("list already holds the maximum of {max} rows")]
    LimitReached { max: usize },
    #[error("list must keep at least {min} row(s)")]
    MinimumRequired { min: usize },
    #[error("{} mapping row(s) are incomplete", .0.len())]
    ValidationErrors(Vec<RowError>),
    #[error("mapping row {0} not found")]
    RowNotFound(RowKey),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl CascadeError {
    pub(crate) fn invalid(level: SelectionLevel, id: impl fmt::Display) -> Self {
        CascadeError::InvalidSelection {
            level,
            id: id.to_string(),
        }
    }

    /// True for failures the host is expected to recover from by falling back
    /// to an empty, editable selection.
    pub fn is_stale(&self) -> bool {
        matches!(self, CascadeError::StaleSelection(_))
    }
}

/// Level of the branch → line → area hierarchy a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionLevel {
    Branch,
    Line,
    Area,
}

impl fmt::Display for SelectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SelectionLevel::Branch => "branch",
            SelectionLevel::Line => "line",
            SelectionLevel::Area => "area",
        };
        f.write_str(label)
    }
}

/// Why a persisted or entity-sourced selection failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    BranchNotFound(String),
    LineNotFound { branch: String, line: String },
    AreaNotFound(AreaId),
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::BranchNotFound(branch) => write!(f, "branch `{branch}` no longer exists"),
            StaleReason::LineNotFound { branch, line } => {
                write!(f, "line `{line}` no longer exists under branch `{branch}`")
            }
            StaleReason::AreaNotFound(area) => {
                write!(f, "area {area} is no longer part of the selected line")
            }
        }
    }
}

/// A single incomplete row reported at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Zero-based position of the row in display order.
    pub index: usize,
    pub key: RowKey,
    pub reason: RowErrorReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorReason {
    MissingLine,
    MissingValues,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.reason {
            RowErrorReason::MissingLine => "select a line",
            RowErrorReason::MissingValues => "select at least one expense",
        };
        write!(f, "Mapping {}: {}", self.index + 1, what)
    }
}
