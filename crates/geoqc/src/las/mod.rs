//! LAS (Log ASCII Standard) well-log file support.
//!
//! Covers the subset of LAS 1.2/2.0 the QC engine needs: the `~Version`,
//! `~Well`, `~Curve`, `~Parameter` and `~ASCII` sections, with curve data
//! loaded as `f64` sample arrays.

mod file;
mod parser;

pub use file::{LasCurve, LasFile, WellField};
pub use parser::{parse_las, parse_las_str};
