//! Geoqc: QC and metadata extraction for subsurface exploration data.
//!
//! Geoqc scans folder trees for well-log (LAS) curve files and seismic
//! (SEG-Y) 2D/3D volumes, extracts standardized metadata and signal
//! statistics per file, and reports completeness/validity against a
//! configurable curve dictionary (for logs) or fixed geophysical
//! heuristics (for seismic).
//!
//! # Core Principles
//!
//! - **Best-effort**: a failure in one metric never aborts a report;
//!   the affected slot degrades to `"N/A"` or `"Error"`
//! - **Bounded**: seismic statistics are computed over a sampled trace
//!   subset and extrapolated, so cost does not grow with file size
//! - **Deterministic**: curve alias resolution is ordered first-match,
//!   never best-match
//!
//! # Example
//!
//! ```no_run
//! use geoqc::{CurveConfig, CurveValidator, LasScanner};
//!
//! let scanner = LasScanner::new("/data/wells");
//! let validator = CurveValidator::new(CurveConfig::default());
//!
//! for path in scanner.discover() {
//!     if let Some(las) = LasScanner::read_las_file(&path) {
//!         let results = validator.validate(&las);
//!         for (curve, check) in &results {
//!             println!("{curve}: {} ({})", check.status, check.reason);
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod las;
pub mod scan;
pub mod segy;
pub mod stats;
pub mod validate;

pub use config::{CurveConfig, CurveDef};
pub use error::{GeoQcError, Result};
pub use las::{LasCurve, LasFile, WellField};
pub use scan::{LasScanner, SegyScanner, SourceMetadata};
pub use segy::{SegyFile, SegyMode, TraceField};
pub use validate::{
    CurveCheck, CurveDetail, CurveStatus, CurveValidator, DepthInfo, QcCheck, QcInfo,
    Seismic2dValidator, Seismic3dValidator,
};

/// Null/sentinel value for missing log curve samples.
pub const LOG_NULL_VALUE: f64 = -999.25;
