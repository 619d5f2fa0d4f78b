//! Comprehensive QC metric extraction and checklist validation for 3D
//! seismic volumes.
//!
//! Sampling here is stride-based (every `n / sample_size`-th trace) rather
//! than the 2D validator's linspace selection, matching how volumes are
//! usually laid out inline-major on disk.

use indexmap::IndexMap;
use tracing::debug;

use crate::segy::{format_short, sorting_description, SegyFile, TraceField};
use crate::stats;

use super::{QcCheck, QcInfo};

/// Traces sampled for signal and trace-quality statistics.
const STAT_SAMPLE_SIZE: usize = 100;
/// Traces sampled for amplitude statistics and null-trace checks.
const AMP_SAMPLE_SIZE: usize = 50;
/// Trace headers probed when deriving inline/crossline ranges.
const RANGE_PROBE_SIZE: usize = 1000;
/// Leading headers probed by the geometry presence check.
const GEOMETRY_PROBE_SIZE: usize = 100;
/// Within-trace decimation for the amplitude scan.
const AMP_DECIMATION: usize = 10;
/// Cap on total samples gathered by the amplitude scan.
const AMP_SAMPLE_CAP: usize = AMP_SAMPLE_SIZE * 1000;

#[derive(Debug, Clone, Copy, Default)]
struct AmplitudeStats {
    min: f64,
    max: f64,
}

/// Validates and extracts comprehensive QC information from 3D volumes.
pub struct Seismic3dValidator;

impl Seismic3dValidator {
    pub fn new() -> Self {
        Self
    }

    /// Cheap per-file summary for table display.
    pub fn basic_info(&self, segy: &SegyFile) -> QcInfo {
        let mut info = QcInfo::new();

        info.insert("filename".to_string(), segy.file_name());
        info.insert("trace_count".to_string(), segy.trace_count().to_string());
        info.insert(
            "sample_count".to_string(),
            segy.samples_per_trace().to_string(),
        );

        let interval = segy.sample_interval_ms();
        info.insert("sample_interval".to_string(), format!("{interval:.2}"));

        let trace_length = (segy.samples_per_trace().saturating_sub(1)) as f64 * interval;
        info.insert("trace_length".to_string(), format!("{trace_length:.0}"));

        info.insert("format".to_string(), format_short(segy.format_code()));

        let (inline_range, xline_range) = self.probed_3d_ranges(segy);
        info.insert("inline_range".to_string(), inline_range);
        info.insert("crossline_range".to_string(), xline_range);

        info
    }

    /// Full QC report assembled section by section; a failure inside one
    /// section degrades that section's keys only.
    pub fn comprehensive_info(&self, segy: &SegyFile) -> QcInfo {
        if segy.trace_count() == 0 {
            let mut info = QcInfo::new();
            info.insert("Error".to_string(), "no traces".to_string());
            return info;
        }

        debug!(file = %segy.file_name(), "building 3D comprehensive info");
        let mut info = QcInfo::new();
        self.extract_basic_info(segy, &mut info);
        self.extract_3d_geometry(segy, &mut info);
        self.extract_signal_info(segy, &mut info);
        self.extract_trace_quality(segy, &mut info);
        self.extract_binary_header(segy, &mut info);
        self.extract_volume_stats(segy, &mut info);
        info
    }

    /// Validate the volume against the fixed 3D QC checklist.
    ///
    /// Returns one `{status, reason}` entry per criterion, in checklist
    /// order.
    pub fn validate(&self, segy: &SegyFile) -> IndexMap<String, QcCheck> {
        let mut results = IndexMap::new();
        results.insert("format".to_string(), self.format_check(segy));
        results.insert("traces".to_string(), self.trace_count_check(segy));
        results.insert("samples".to_string(), self.sample_count_check(segy));
        results.insert(
            "sample_interval".to_string(),
            self.sample_interval_check(segy),
        );
        results.insert("trace_length".to_string(), self.trace_length_check(segy));
        results.insert("amplitude".to_string(), self.amplitude_check(segy));
        results.insert("null_traces".to_string(), self.null_trace_check(segy));
        results.insert("geometry".to_string(), self.geometry_check(segy));
        results.insert("inline_range".to_string(), self.inline_check(segy));
        results.insert("crossline_range".to_string(), self.crossline_check(segy));
        results
    }

    // ==================== comprehensive sections ====================

    fn extract_basic_info(&self, segy: &SegyFile, info: &mut QcInfo) {
        info.insert("Filename".to_string(), segy.file_name());
        info.insert("Total Traces".to_string(), segy.trace_count().to_string());
        info.insert(
            "Samples per Trace".to_string(),
            segy.samples_per_trace().to_string(),
        );

        let interval_ms = segy.sample_interval_ms();
        info.insert(
            "Sample Interval (ms)".to_string(),
            format!("{interval_ms:.3}"),
        );

        let trace_length_ms = segy.samples_per_trace() as f64 * interval_ms;
        if trace_length_ms > 10_000.0 {
            info.insert(
                "Trace Length (s)".to_string(),
                format!("{:.3}", trace_length_ms / 1000.0),
            );
        } else {
            info.insert(
                "Trace Length (ms)".to_string(),
                format!("{trace_length_ms:.2}"),
            );
        }
        info.insert(
            "Time Range".to_string(),
            format!("0 - {trace_length_ms:.2} ms"),
        );

        info.insert(
            "Data Format".to_string(),
            format_description(segy.format_code()),
        );
        info.insert(
            "Sorting".to_string(),
            sorting_description(segy.sorting_code()),
        );
    }

    fn extract_3d_geometry(&self, segy: &SegyFile, info: &mut QcInfo) {
        let ilines = segy.ilines();
        let xlines = segy.xlines();

        info.insert("Inline Range".to_string(), axis_range(ilines));
        info.insert("Crossline Range".to_string(), axis_range(xlines));
        // Spacing from the first two axis entries; uniform spacing is
        // assumed, not verified against the full axis.
        info.insert("Inline Spacing".to_string(), axis_spacing(ilines));
        info.insert("Crossline Spacing".to_string(), axis_spacing(xlines));
    }

    fn extract_signal_info(&self, segy: &SegyFile, info: &mut QcInfo) {
        let indices = stats::strided_indices(segy.trace_count(), STAT_SAMPLE_SIZE);
        let mut all = Vec::new();
        for &i in &indices {
            if let Ok(trace) = segy.trace(i) {
                all.extend(trace);
            }
        }
        let finite = stats::finite(&all);

        if finite.is_empty() {
            info.insert("Signal Info Error".to_string(), "no finite samples".to_string());
            return;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &finite {
            min = min.min(v);
            max = max.max(v);
        }

        info.insert(
            "Amplitude Range".to_string(),
            format!("{min:.2e} to {max:.2e}"),
        );
        info.insert(
            "Amplitude Mean".to_string(),
            format!("{:.2e}", stats::mean(&finite)),
        );
        info.insert(
            "Amplitude Std Dev".to_string(),
            format!("{:.2e}", stats::std_dev(&finite)),
        );

        let dt = f64::from(segy.sample_interval_us()) * 1e-6;
        if dt > 0.0 {
            info.insert(
                "Nyquist Frequency (Hz)".to_string(),
                format!("{:.2}", stats::nyquist(dt)),
            );
        } else {
            info.insert("Nyquist Frequency (Hz)".to_string(), "N/A".to_string());
        }

        let dominant = indices
            .first()
            .and_then(|&i| segy.trace(i).ok())
            .and_then(|trace| stats::dominant_frequency(&trace, dt));
        match dominant {
            Some(freq) => {
                info.insert("Dominant Frequency (Hz)".to_string(), format!("{freq:.2}"));
            }
            None => {
                info.insert("Dominant Frequency (Hz)".to_string(), "N/A".to_string());
            }
        }
    }

    fn extract_trace_quality(&self, segy: &SegyFile, info: &mut QcInfo) {
        let indices = stats::strided_indices(segy.trace_count(), STAT_SAMPLE_SIZE);
        if indices.is_empty() {
            info.insert("Trace Quality Error".to_string(), "no traces".to_string());
            return;
        }

        let mut zero_traces = 0usize;
        let mut sampled = 0usize;
        for i in indices {
            let Ok(trace) = segy.trace(i) else { continue };
            sampled += 1;
            if trace.iter().all(|&v| v == 0.0) {
                zero_traces += 1;
            }
        }

        if sampled == 0 {
            info.insert("Trace Quality Error".to_string(), "no readable traces".to_string());
            return;
        }

        let total = segy.trace_count();
        // Linear extrapolation from the sampled subset; dead + valid always
        // sums back to the full trace count.
        let estimated = (zero_traces as f64 / sampled as f64 * total as f64).round() as usize;
        info.insert("Null/Dead Traces".to_string(), estimated.to_string());
        info.insert("Valid Traces".to_string(), (total - estimated).to_string());
    }

    fn extract_binary_header(&self, segy: &SegyFile, info: &mut QcInfo) {
        info.insert(
            "Binary Format Code".to_string(),
            segy.format_code().to_string(),
        );
        info.insert(
            "Trace Sorting".to_string(),
            sorting_description(segy.sorting_code()),
        );
        // Always reported as the standard default, unlike the 2D report's
        // interval-plausibility heuristic. Known discrepancy, kept as-is.
        info.insert(
            "Endian Type".to_string(),
            "Big Endian (SEG-Y standard)".to_string(),
        );

        let meas = segy.measurement_system();
        let measurement = match meas {
            1 => "Meters".to_string(),
            2 => "Feet".to_string(),
            other => format!("Unknown ({other})"),
        };
        info.insert("Measurement System".to_string(), measurement);
    }

    fn extract_volume_stats(&self, segy: &SegyFile, info: &mut QcInfo) {
        let ilines = segy.ilines();
        let xlines = segy.xlines();
        if ilines.is_empty() || xlines.is_empty() {
            info.insert("Estimated Volume".to_string(), "N/A".to_string());
            return;
        }
        // A trace-grid proxy, not true fold-corrected volume.
        info.insert(
            "Estimated Volume".to_string(),
            format!("{} x {} traces", ilines.len(), xlines.len()),
        );
    }

    // ==================== QC checks ====================

    fn format_check(&self, segy: &SegyFile) -> QcCheck {
        let code = segy.format_code();
        if matches!(code, 1 | 2 | 3 | 5 | 8) {
            QcCheck::pass(format_short(code))
        } else {
            QcCheck::fail(format!("Unknown: {code}"))
        }
    }

    fn trace_count_check(&self, segy: &SegyFile) -> QcCheck {
        let count = segy.trace_count();
        if count == 0 {
            QcCheck::fail("0")
        } else if count > 10_000 {
            QcCheck::pass(stats::group_thousands(count))
        } else {
            QcCheck::fail(format!("{} (low for 3D)", stats::group_thousands(count)))
        }
    }

    fn sample_count_check(&self, segy: &SegyFile) -> QcCheck {
        let count = segy.samples_per_trace();
        if count > 0 {
            QcCheck::pass(count.to_string())
        } else {
            QcCheck::fail("0")
        }
    }

    fn sample_interval_check(&self, segy: &SegyFile) -> QcCheck {
        let interval_ms = segy.sample_interval_ms();
        let reason = format!("{interval_ms:.2} ms");
        if (0.5..=10.0).contains(&interval_ms) {
            QcCheck::pass(reason)
        } else {
            QcCheck::fail(reason)
        }
    }

    fn trace_length_check(&self, segy: &SegyFile) -> QcCheck {
        let dt = segy.sample_interval_ms();
        let trace_length = (segy.samples_per_trace().saturating_sub(1)) as f64 * dt;
        let reason = format!("{trace_length:.0} ms");
        if (1000.0..=10_000.0).contains(&trace_length) {
            QcCheck::pass(reason)
        } else {
            QcCheck::fail(reason)
        }
    }

    fn amplitude_check(&self, segy: &SegyFile) -> QcCheck {
        let amp = self.amplitude_stats(segy);
        if amp.min == 0.0 && amp.max == 0.0 {
            QcCheck::fail("All zeros")
        } else {
            QcCheck::pass(format!("{:.1} to {:.1}", amp.min, amp.max))
        }
    }

    fn null_trace_check(&self, segy: &SegyFile) -> QcCheck {
        let total = segy.trace_count();
        let null_count = self.count_null_traces(segy);
        let percent = if total > 0 {
            null_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let reason = format!("{null_count} ({percent:.1}%)");
        if percent < 5.0 {
            QcCheck::pass(reason)
        } else {
            QcCheck::fail(reason)
        }
    }

    fn geometry_check(&self, segy: &SegyFile) -> QcCheck {
        let probe = GEOMETRY_PROBE_SIZE.min(segy.trace_count());
        let mut has_inline = false;
        let mut has_xline = false;

        for i in 0..probe {
            if let Ok(il) = segy.header_i32(i, TraceField::Inline3d) {
                has_inline |= il != 0;
            }
            if let Ok(xl) = segy.header_i32(i, TraceField::Crossline3d) {
                has_xline |= xl != 0;
            }
            if has_inline && has_xline {
                break;
            }
        }

        if has_inline && has_xline {
            QcCheck::pass("3D geometry detected")
        } else {
            QcCheck::fail("No 3D geometry info")
        }
    }

    fn inline_check(&self, segy: &SegyFile) -> QcCheck {
        let (inline_range, _) = self.probed_3d_ranges(segy);
        if inline_range != "N/A" {
            QcCheck::pass(inline_range)
        } else {
            QcCheck::fail("Not found")
        }
    }

    fn crossline_check(&self, segy: &SegyFile) -> QcCheck {
        let (_, xline_range) = self.probed_3d_ranges(segy);
        if xline_range != "N/A" {
            QcCheck::pass(xline_range)
        } else {
            QcCheck::fail("Not found")
        }
    }

    // ==================== helpers ====================

    /// Inline/crossline ranges from strided header probing, independent of
    /// whether the handle carries built axes (works on 2D-mode opens too).
    fn probed_3d_ranges(&self, segy: &SegyFile) -> (String, String) {
        let indices = stats::strided_indices(segy.trace_count(), RANGE_PROBE_SIZE);

        let mut inlines: Vec<i32> = Vec::new();
        let mut xlines: Vec<i32> = Vec::new();
        for i in indices {
            if let Ok(il) = segy.header_i32(i, TraceField::Inline3d) {
                if il != 0 {
                    inlines.push(il);
                }
            }
            if let Ok(xl) = segy.header_i32(i, TraceField::Crossline3d) {
                if xl != 0 {
                    xlines.push(xl);
                }
            }
        }

        let inline_range = match (inlines.iter().min(), inlines.iter().max()) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            _ => "N/A".to_string(),
        };
        let xline_range = match (xlines.iter().min(), xlines.iter().max()) {
            (Some(min), Some(max)) => format!("{min}-{max}"),
            _ => "N/A".to_string(),
        };
        (inline_range, xline_range)
    }

    /// Decimated amplitude scan: every `n / 50`-th trace, every 10th sample,
    /// capped at 50k samples total.
    fn amplitude_stats(&self, segy: &SegyFile) -> AmplitudeStats {
        let indices = stats::strided_indices(segy.trace_count(), AMP_SAMPLE_SIZE);
        let mut all = Vec::new();

        'outer: for i in indices {
            let Ok(trace) = segy.trace(i) else { continue };
            for &v in trace.iter().step_by(AMP_DECIMATION) {
                if all.len() >= AMP_SAMPLE_CAP {
                    break 'outer;
                }
                all.push(v);
            }
        }

        let finite = stats::finite(&all);
        if finite.is_empty() {
            return AmplitudeStats::default();
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &finite {
            min = min.min(v);
            max = max.max(v);
        }
        AmplitudeStats { min, max }
    }

    fn count_null_traces(&self, segy: &SegyFile) -> usize {
        let indices = stats::strided_indices(segy.trace_count(), AMP_SAMPLE_SIZE);
        if indices.is_empty() {
            return 0;
        }

        let mut null_count = 0usize;
        let mut sampled = 0usize;
        for i in indices {
            let Ok(trace) = segy.trace(i) else { continue };
            sampled += 1;
            if trace.iter().all(|&v| v == 0.0) || trace.iter().all(|v| v.is_nan()) {
                null_count += 1;
            }
        }

        if sampled == 0 {
            return 0;
        }
        (null_count as f64 / sampled as f64 * segy.trace_count() as f64).round() as usize
    }
}

impl Default for Seismic3dValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn axis_range(axis: &[i32]) -> String {
    match (axis.first(), axis.last()) {
        (Some(min), Some(max)) => format!("{min} - {max}"),
        _ => "Not available".to_string(),
    }
}

fn axis_spacing(axis: &[i32]) -> String {
    if axis.len() > 1 {
        format!("{}", axis[1] - axis[0])
    } else {
        "N/A".to_string()
    }
}

/// Long-form data format description (3D report wording).
fn format_description(format_code: i16) -> String {
    match format_code {
        1 => "IBM Float (32-bit)".to_string(),
        2 => "32-bit Integer".to_string(),
        3 => "16-bit Integer".to_string(),
        5 => "IEEE Float (32-bit)".to_string(),
        8 => "8-bit Integer".to_string(),
        other => format!("Unknown (Code {other})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_range() {
        assert_eq!(axis_range(&[100, 101, 150]), "100 - 150");
        assert_eq!(axis_range(&[]), "Not available");
    }

    #[test]
    fn test_axis_spacing_first_two_entries() {
        assert_eq!(axis_spacing(&[100, 102, 110]), "2");
        assert_eq!(axis_spacing(&[100]), "N/A");
        assert_eq!(axis_spacing(&[]), "N/A");
    }

    #[test]
    fn test_format_description_wording() {
        assert_eq!(format_description(5), "IEEE Float (32-bit)");
        assert_eq!(format_description(1), "IBM Float (32-bit)");
        assert_eq!(format_description(9), "Unknown (Code 9)");
    }
}
