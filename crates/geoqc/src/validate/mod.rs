//! Validators: curve dictionary checks for LAS, QC metric extraction for
//! SEG-Y 2D/3D.
//!
//! All public entry points are total: they never panic and never return an
//! error for per-metric failures. Each metric extractor is independently
//! guarded, degrading its own slot to `"N/A"` or `"Error"` while the rest
//! of the report completes.

mod curves;
mod seismic2d;
mod seismic3d;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use curves::{CurveDetail, CurveValidator, DepthInfo};
pub use seismic2d::Seismic2dValidator;
pub use seismic3d::Seismic3dValidator;

/// Flat metric-name to pre-formatted-value mapping, in display order.
///
/// Consumed directly by tabular display and export layers; never persisted,
/// recomputed per request.
pub type QcInfo = IndexMap<String, String>;

/// Outcome of a single pass/fail QC check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcCheck {
    pub status: CurveStatus,
    pub reason: String,
}

impl QcCheck {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            status: CurveStatus::Y,
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            status: CurveStatus::N,
            reason: reason.into(),
        }
    }
}

/// Per-curve validation outcome (same shape as any other QC check).
pub type CurveCheck = QcCheck;

/// Pass/fail status of a single QC check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveStatus {
    /// Check passed.
    Y,
    /// Check failed.
    N,
}

impl std::fmt::Display for CurveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveStatus::Y => write!(f, "Y"),
            CurveStatus::N => write!(f, "N"),
        }
    }
}
