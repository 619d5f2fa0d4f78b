//! Log curve validation against a configurable curve dictionary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CurveConfig;
use crate::las::{LasCurve, LasFile};
use crate::error::Result;
use crate::LOG_NULL_VALUE;

use super::{CurveCheck, CurveStatus};

/// Display-ready detail for one logical curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveDetail {
    pub found: bool,
    pub mnemonic: String,
    pub min: String,
    pub max: String,
    pub percent_filled: String,
    pub unit: String,
    pub description: String,
}

/// Well depth/datum header summary; every field is a formatted string,
/// `"N/A"` when absent or `"Error"` when extraction failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthInfo {
    pub depth_unit: String,
    pub pd: String,
    pub epd: String,
    pub ekb: String,
    pub egl: String,
    pub lmf: String,
    pub elz: String,
    pub start: String,
    pub stop: String,
    pub step: String,
}

/// Validates log curves against the configured curve dictionary.
///
/// Alias resolution is deterministic first-match: the alias list is walked
/// in order and the first mnemonic present in the file wins, regardless of
/// how "good" later aliases might be.
pub struct CurveValidator {
    config: CurveConfig,
    null_value: f64,
}

impl CurveValidator {
    /// Create a validator with the given curve dictionary.
    pub fn new(config: CurveConfig) -> Self {
        Self {
            config,
            null_value: LOG_NULL_VALUE,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Atomically replace the curve dictionary.
    ///
    /// The new configuration is structurally validated first; on rejection
    /// the previously active configuration stays in effect.
    pub fn update_config(&mut self, new_config: CurveConfig) -> Result<()> {
        new_config.check()?;
        self.config = new_config;
        Ok(())
    }

    /// Validate all configured curves against a LAS file.
    ///
    /// Returns exactly one result per dictionary key, in dictionary order.
    pub fn validate(&self, las: &LasFile) -> IndexMap<String, CurveCheck> {
        let available = available_curves(las);
        let mut results = IndexMap::new();

        for (key, def) in self.config.iter() {
            let check = match find_curve_alias(&def.aliases, &available) {
                None => CurveCheck {
                    status: CurveStatus::N,
                    reason: "Not found".to_string(),
                },
                Some(curve) => self.check_curve_data(curve),
            };
            results.insert(key.clone(), check);
        }

        debug!(curves = results.len(), "curve validation complete");
        results
    }

    /// Detailed per-curve information for all configured curves.
    ///
    /// A computation failure on one curve marks that curve's numeric slots
    /// `"Error"` without blocking the rest of the report.
    pub fn detailed_curve_info(&self, las: &LasFile) -> IndexMap<String, CurveDetail> {
        let available = available_curves(las);
        let mut details = IndexMap::new();

        for (key, def) in self.config.iter() {
            let detail = match find_curve_alias(&def.aliases, &available) {
                None => CurveDetail {
                    found: false,
                    mnemonic: "N/A".to_string(),
                    min: "N/A".to_string(),
                    max: "N/A".to_string(),
                    percent_filled: "N/A".to_string(),
                    unit: "N/A".to_string(),
                    description: def.description.clone(),
                },
                Some(curve) => self.describe_curve(curve, &def.description),
            };
            details.insert(key.clone(), detail);
        }

        details
    }

    fn check_curve_data(&self, curve: &LasCurve) -> CurveCheck {
        let valid: Vec<f64> = curve
            .data
            .iter()
            .copied()
            .filter(|&v| v != self.null_value)
            .collect();

        if valid.is_empty() {
            return CurveCheck {
                status: CurveStatus::N,
                reason: "No valid data".to_string(),
            };
        }

        match min_max_ignoring_nan(&valid) {
            Some((min, max)) => CurveCheck {
                status: CurveStatus::Y,
                reason: format!("Valid ({min:.2}-{max:.2})"),
            },
            None => CurveCheck {
                status: CurveStatus::N,
                reason: "Error: all-NaN data".to_string(),
            },
        }
    }

    fn describe_curve(&self, curve: &LasCurve, description: &str) -> CurveDetail {
        let total = curve.data.len();
        let valid: Vec<f64> = curve
            .data
            .iter()
            .copied()
            .filter(|&v| v != self.null_value)
            .collect();

        let percent_filled = if total > 0 {
            valid.len() as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let unit = if curve.unit.is_empty() {
            "N/A".to_string()
        } else {
            curve.unit.clone()
        };

        match min_max_ignoring_nan(&valid) {
            Some((min, max)) => CurveDetail {
                found: true,
                mnemonic: curve.mnemonic.to_uppercase(),
                min: format!("{min:.4}"),
                max: format!("{max:.4}"),
                percent_filled: format!("{percent_filled:.2}"),
                unit,
                description: description.to_string(),
            },
            None if valid.is_empty() => CurveDetail {
                found: true,
                mnemonic: curve.mnemonic.to_uppercase(),
                min: "N/A".to_string(),
                max: "N/A".to_string(),
                percent_filled: format!("{percent_filled:.2}"),
                unit,
                description: description.to_string(),
            },
            None => CurveDetail {
                found: true,
                mnemonic: curve.mnemonic.to_uppercase(),
                min: "Error".to_string(),
                max: "Error".to_string(),
                percent_filled: "Error".to_string(),
                unit: "N/A".to_string(),
                description: description.to_string(),
            },
        }
    }

    /// Extract the well name, trying WELL then UWI, API, WELLNAME, NAME.
    pub fn well_name(las: &LasFile) -> String {
        for field_name in ["WELL", "UWI", "API", "WELLNAME", "NAME"] {
            if let Some(field) = las.well_field(field_name) {
                if let Some(text) = field.text() {
                    return text.to_string();
                }
            }
        }
        "N/A".to_string()
    }

    /// Extract depth and datum elevation information from the well header.
    ///
    /// LAS header conventions vary by vendor; each logical quantity is
    /// looked up through an ordered candidate list and the first field
    /// present wins.
    pub fn depth_info(las: &LasFile) -> DepthInfo {
        let na = || "N/A".to_string();
        let mut info = DepthInfo {
            depth_unit: na(),
            pd: na(),
            epd: na(),
            ekb: na(),
            egl: na(),
            lmf: na(),
            elz: na(),
            start: na(),
            stop: na(),
            step: na(),
        };

        if let Some(strt) = las.well_field("STRT") {
            if let Some(v) = strt.numeric() {
                info.start = format!("{v:.2}");
            }
            if !strt.unit.is_empty() {
                info.depth_unit = strt.unit.clone();
            }
        }
        if let Some(v) = las.well_field("STOP").and_then(|f| f.numeric()) {
            info.stop = format!("{v:.2}");
        }
        if let Some(v) = las.well_field("STEP").and_then(|f| f.numeric()) {
            info.step = format!("{v:.2}");
        }

        // Log Measured From and Permanent Datum are free text.
        if let Some(text) = las.well_field("LMF").and_then(|f| f.text()) {
            info.lmf = text.to_string();
        }
        if let Some(text) = las.well_field("PD").and_then(|f| f.text()) {
            info.pd = text.to_string();
        }

        if let Some(v) = first_numeric(las, &["ELZ"]) {
            info.elz = format!("{v:.2}");
        }
        if let Some(v) = first_numeric(las, &["EPD"]) {
            info.epd = format!("{v:.2}");
        }
        // Kelly Bushing elevation.
        if let Some(v) = first_numeric(las, &["KB", "EKB", "EKBD", "EDF"]) {
            info.ekb = format!("{v:.2}");
        }
        // Ground Level elevation.
        if let Some(v) = first_numeric(las, &["GL", "GLE", "GLELEV", "EGL"]) {
            info.egl = format!("{v:.2}");
        }

        info
    }
}

impl Default for CurveValidator {
    fn default() -> Self {
        Self::new(CurveConfig::default())
    }
}

/// Map from uppercased mnemonic to curve, skipping the depth index curve's
/// duplicates implicitly (first definition wins).
fn available_curves(las: &LasFile) -> IndexMap<String, &LasCurve> {
    let mut map = IndexMap::new();
    for curve in &las.curves {
        map.entry(curve.mnemonic.to_uppercase()).or_insert(curve);
    }
    map
}

/// First alias (in order) present among the available curves.
fn find_curve_alias<'a>(
    aliases: &[String],
    available: &IndexMap<String, &'a LasCurve>,
) -> Option<&'a LasCurve> {
    aliases
        .iter()
        .find_map(|alias| available.get(&alias.to_uppercase()).copied())
}

/// First numeric value among an ordered list of candidate header fields.
fn first_numeric(las: &LasFile, candidates: &[&str]) -> Option<f64> {
    candidates
        .iter()
        .find_map(|name| las.well_field(name).and_then(|f| f.numeric()))
}

/// Min and max ignoring NaN samples; `None` when no finite sample exists.
fn min_max_ignoring_nan(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        seen = true;
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    seen.then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveDef;
    use crate::las::parse_las_str;

    fn las_with(curves: &[(&str, &str, &[f64])]) -> LasFile {
        let mut text = String::from("~Curve\n");
        for (mnem, unit, _) in curves {
            text.push_str(&format!("{mnem}.{unit} : {mnem}\n"));
        }
        text.push_str("~ASCII\n");
        let rows = curves[0].2.len();
        for row in 0..rows {
            let line: Vec<String> = curves.iter().map(|(_, _, d)| d[row].to_string()).collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        parse_las_str(&text).unwrap()
    }

    fn config_of(entries: &[(&str, &[&str])]) -> CurveConfig {
        let mut config = CurveConfig::new();
        for (key, aliases) in entries {
            config
                .curves
                .insert(key.to_string(), CurveDef::new(aliases, key));
        }
        config
    }

    #[test]
    fn test_result_per_config_key() {
        let las = las_with(&[("DEPT", "M", &[1.0, 2.0]), ("GR", "GAPI", &[50.0, 60.0])]);
        let config = config_of(&[("GR", &["GR"]), ("DT", &["DT"]), ("RHOB", &["RHOB"])]);
        let validator = CurveValidator::new(config);

        let results = validator.validate(&las);
        assert_eq!(results.len(), 3);
        let keys: Vec<&String> = results.keys().collect();
        assert_eq!(keys, vec!["GR", "DT", "RHOB"]);
    }

    #[test]
    fn test_alias_resolution_is_order_deterministic() {
        // File contains both RD and RT; aliases ["RD", "RT"] must bind RD.
        let las = las_with(&[
            ("DEPT", "M", &[1.0, 2.0]),
            ("RT", "OHMM", &[5.0, 6.0]),
            ("RD", "OHMM", &[7.0, 8.0]),
        ]);
        let config = config_of(&[("RES D", &["RD", "RT"])]);
        let validator = CurveValidator::new(config);

        let details = validator.detailed_curve_info(&las);
        assert_eq!(details["RES D"].mnemonic, "RD");
        assert_eq!(details["RES D"].min, "7.0000");
    }

    #[test]
    fn test_not_found() {
        let las = las_with(&[("DEPT", "M", &[1.0]), ("GR", "GAPI", &[50.0])]);
        let config = config_of(&[("CALI", &["CALI", "CAL"])]);
        let validator = CurveValidator::new(config);

        let results = validator.validate(&las);
        assert_eq!(results["CALI"].status, CurveStatus::N);
        assert_eq!(results["CALI"].reason, "Not found");
    }

    #[test]
    fn test_all_null_curve_is_no_valid_data() {
        let las = las_with(&[
            ("DEPT", "M", &[1.0, 2.0, 3.0]),
            ("GR", "GAPI", &[-999.25, -999.25, -999.25]),
        ]);
        let config = config_of(&[("GR", &["GR"])]);
        let validator = CurveValidator::new(config);

        let results = validator.validate(&las);
        assert_eq!(results["GR"].status, CurveStatus::N);
        assert_eq!(results["GR"].reason, "No valid data");
    }

    #[test]
    fn test_valid_curve_reports_range() {
        let las = las_with(&[
            ("DEPT", "M", &[1.0, 2.0, 3.0]),
            ("GR", "GAPI", &[45.5, -999.25, 120.25]),
        ]);
        let config = config_of(&[("GR", &["GR"])]);
        let validator = CurveValidator::new(config);

        let results = validator.validate(&las);
        assert_eq!(results["GR"].status, CurveStatus::Y);
        assert_eq!(results["GR"].reason, "Valid (45.50-120.25)");
    }

    #[test]
    fn test_percent_filled_bounds() {
        let las = las_with(&[
            ("DEPT", "M", &[1.0, 2.0, 3.0, 4.0]),
            ("GR", "GAPI", &[50.0, -999.25, 60.0, -999.25]),
            ("DT", "US/M", &[100.0, 101.0, 102.0, 103.0]),
        ]);
        let config = config_of(&[("GR", &["GR"]), ("DT", &["DT"])]);
        let validator = CurveValidator::new(config);

        let details = validator.detailed_curve_info(&las);
        assert_eq!(details["GR"].percent_filled, "50.00");
        // No nulls at all -> exactly 100.00.
        assert_eq!(details["DT"].percent_filled, "100.00");
    }

    #[test]
    fn test_missing_unit_falls_back() {
        let las = las_with(&[("DEPT", "M", &[1.0]), ("SP", "", &[12.0])]);
        let config = config_of(&[("SP", &["SP"])]);
        let validator = CurveValidator::new(config);

        let details = validator.detailed_curve_info(&las);
        assert_eq!(details["SP"].unit, "N/A");
    }

    #[test]
    fn test_update_config_rejects_malformed() {
        let mut validator = CurveValidator::default();
        let original_len = validator.config().len();

        let mut bad = CurveConfig::new();
        bad.curves.insert(
            "GR".to_string(),
            CurveDef {
                aliases: vec![],
                description: "Gamma Ray".to_string(),
            },
        );

        assert!(validator.update_config(bad).is_err());
        // Previous config remains active.
        assert_eq!(validator.config().len(), original_len);
    }

    #[test]
    fn test_well_name_candidates() {
        let las = parse_las_str(
            "~Well\nUWI. 100123456789 : UNIQUE ID\n~Curve\nDEPT.M : DEPTH\n~ASCII\n1.0\n",
        )
        .unwrap();
        assert_eq!(CurveValidator::well_name(&las), "100123456789");

        let anon =
            parse_las_str("~Curve\nDEPT.M : DEPTH\n~ASCII\n1.0\n").unwrap();
        assert_eq!(CurveValidator::well_name(&anon), "N/A");
    }

    #[test]
    fn test_depth_info_candidate_priority() {
        let las = parse_las_str(
            "~Well
STRT.M 100.0 : START
STOP.M 500.0 : STOP
STEP.M 0.5 : STEP
EKB. 25.7 : KB ELEVATION
GLE. 12.2 : GROUND LEVEL
LMF. KB : LOG MEASURED FROM
~Curve
DEPT.M : DEPTH
~ASCII
100.0
",
        )
        .unwrap();

        let info = CurveValidator::depth_info(&las);
        assert_eq!(info.start, "100.00");
        assert_eq!(info.stop, "500.00");
        assert_eq!(info.step, "0.50");
        assert_eq!(info.depth_unit, "M");
        // KB absent, EKB is the second candidate.
        assert_eq!(info.ekb, "25.70");
        assert_eq!(info.egl, "12.20");
        assert_eq!(info.lmf, "KB");
        assert_eq!(info.pd, "N/A");
        assert_eq!(info.elz, "N/A");
    }
}
