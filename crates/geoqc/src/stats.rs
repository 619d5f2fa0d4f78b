//! Shared numeric helpers for the seismic validators.
//!
//! Everything here operates on bounded, already-sampled slices; callers are
//! responsible for selecting a trace subset first (see [`linspace_indices`]
//! and [`strided_indices`]).

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Evenly spaced trace indices across `0..total`, `count` of them.
///
/// Mirrors `linspace(0, total-1, count)` truncated to integers: first index
/// is always 0 and the last is `total - 1` when `count > 1`.
pub fn linspace_indices(total: usize, count: usize) -> Vec<usize> {
    if total == 0 || count == 0 {
        return Vec::new();
    }
    if count == 1 || total == 1 {
        return vec![0];
    }
    let count = count.min(total);
    (0..count)
        .map(|i| (i as f64 * (total - 1) as f64 / (count - 1) as f64) as usize)
        .collect()
}

/// Strided trace indices: every `max(1, total / count)`-th trace, capped at
/// `count` entries.
pub fn strided_indices(total: usize, count: usize) -> Vec<usize> {
    if total == 0 || count == 0 {
        return Vec::new();
    }
    let step = (total / count).max(1);
    (0..total).step_by(step).take(count).collect()
}

/// Drop NaN and infinite values.
pub fn finite(samples: &[f64]) -> Vec<f64> {
    samples.iter().copied().filter(|v| v.is_finite()).collect()
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation.
pub fn std_dev(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    let var = samples.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / samples.len() as f64;
    var.sqrt()
}

/// Third standardized moment. Zero for degenerate (constant) input.
pub fn skewness(samples: &[f64]) -> f64 {
    let m = mean(samples);
    let sd = std_dev(samples);
    if sd <= 0.0 || samples.is_empty() {
        return 0.0;
    }
    samples
        .iter()
        .map(|v| ((v - m) / sd).powi(3))
        .sum::<f64>()
        / samples.len() as f64
}

/// Excess kurtosis: fourth standardized moment minus 3.
pub fn kurtosis(samples: &[f64]) -> f64 {
    let m = mean(samples);
    let sd = std_dev(samples);
    if sd <= 0.0 || samples.is_empty() {
        return 0.0;
    }
    samples
        .iter()
        .map(|v| ((v - m) / sd).powi(4))
        .sum::<f64>()
        / samples.len() as f64
        - 3.0
}

/// Root mean square.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|v| v * v).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Nyquist frequency in Hz for a sample interval in seconds.
pub fn nyquist(dt_seconds: f64) -> f64 {
    1.0 / (2.0 * dt_seconds)
}

/// Estimate the dominant frequency of one trace in Hz.
///
/// Removes the mean, takes the magnitude spectrum, and returns the bin with
/// the largest magnitude, excluding the DC bin. `None` for traces too short
/// to analyze or a degenerate interval.
pub fn dominant_frequency(trace: &[f64], dt_seconds: f64) -> Option<f64> {
    let n = trace.len();
    if n < 4 || dt_seconds <= 0.0 {
        return None;
    }

    let m = mean(trace);
    let mut buffer: Vec<Complex64> = trace.iter().map(|&v| Complex64::new(v - m, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    // Real input: bins 1..=n/2 cover the positive frequencies.
    let half = n / 2;
    let peak = buffer[1..=half]
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.norm_sqr()
                .partial_cmp(&b.norm_sqr())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i + 1)?;

    Some(peak as f64 / (n as f64 * dt_seconds))
}

/// Format an integer with thousands separators (`12,345`).
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_indices_span() {
        let idx = linspace_indices(1000, 100);
        assert_eq!(idx.len(), 100);
        assert_eq!(idx[0], 0);
        assert_eq!(*idx.last().unwrap(), 999);
        // Strictly non-decreasing.
        assert!(idx.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_linspace_indices_small_population() {
        assert_eq!(linspace_indices(3, 100), vec![0, 1, 2]);
        assert_eq!(linspace_indices(1, 50), vec![0]);
        assert!(linspace_indices(0, 50).is_empty());
    }

    #[test]
    fn test_strided_indices() {
        assert_eq!(strided_indices(10, 5), vec![0, 2, 4, 6, 8]);
        assert_eq!(strided_indices(3, 100), vec![0, 1, 2]);
    }

    #[test]
    fn test_moments() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&data), 5.0);
        assert_eq!(std_dev(&data), 2.0);
        // Symmetric data has zero skewness.
        let sym = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(skewness(&sym).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_moments_are_zero() {
        let flat = [3.0; 10];
        assert_eq!(skewness(&flat), 0.0);
        assert_eq!(kurtosis(&flat), 0.0);
        assert_eq!(std_dev(&flat), 0.0);
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[3.0, -4.0, 3.0, -4.0]), 3.5355339059327378);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_nyquist() {
        // 2 ms sampling -> 250 Hz.
        assert_eq!(nyquist(0.002), 250.0);
    }

    #[test]
    fn test_dominant_frequency_sine() {
        // 50 Hz sine sampled at 1 kHz over 1 s.
        let dt = 0.001;
        let trace: Vec<f64> = (0..1000)
            .map(|i| (2.0 * std::f64::consts::PI * 50.0 * i as f64 * dt).sin())
            .collect();
        let freq = dominant_frequency(&trace, dt).unwrap();
        assert!((freq - 50.0).abs() < 1.5, "got {freq}");
    }

    #[test]
    fn test_dominant_frequency_excludes_dc() {
        // Strong constant offset must not win the peak search.
        let dt = 0.002;
        let trace: Vec<f64> = (0..500)
            .map(|i| 100.0 + (2.0 * std::f64::consts::PI * 30.0 * i as f64 * dt).sin())
            .collect();
        let freq = dominant_frequency(&trace, dt).unwrap();
        assert!((freq - 30.0).abs() < 2.0, "got {freq}");
    }

    #[test]
    fn test_dominant_frequency_degenerate() {
        assert!(dominant_frequency(&[1.0, 2.0], 0.002).is_none());
        assert!(dominant_frequency(&[1.0; 100], 0.0).is_none());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
