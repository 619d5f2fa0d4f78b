//! Curve dictionary configuration.
//!
//! A [`CurveConfig`] maps logical curve keys (e.g. `"GR"`) to the set of
//! mnemonics accepted as that curve, plus a human-readable description.
//! The map is ordered: validation results come back in dictionary order,
//! and alias lists are consulted front to back (first match wins).

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GeoQcError, Result};

/// Definition of a single logical curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveDef {
    /// Accepted mnemonics in priority order.
    pub aliases: Vec<String>,
    /// Human-readable curve description.
    pub description: String,
}

impl CurveDef {
    /// Create a curve definition from string slices.
    pub fn new(aliases: &[&str], description: &str) -> Self {
        Self {
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            description: description.to_string(),
        }
    }
}

/// Ordered mapping from logical curve key to its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveConfig {
    pub curves: IndexMap<String, CurveDef>,
}

impl CurveConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            curves: IndexMap::new(),
        }
    }

    /// Load a configuration from a JSON file, validating its structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| GeoQcError::io(path, e))?;
        let config: CurveConfig = serde_json::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| GeoQcError::io(path, e))
    }

    /// Validate structural invariants: every entry must carry at least one
    /// alias and a non-empty description.
    ///
    /// A config that fails this check must not be applied; the previously
    /// active configuration stays in effect.
    pub fn check(&self) -> Result<()> {
        for (key, def) in &self.curves {
            if def.aliases.is_empty() {
                return Err(GeoQcError::Config(format!(
                    "curve '{key}' has an empty alias list"
                )));
            }
            if def.aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(GeoQcError::Config(format!(
                    "curve '{key}' has a blank alias"
                )));
            }
            if def.description.trim().is_empty() {
                return Err(GeoQcError::Config(format!(
                    "curve '{key}' is missing a description"
                )));
            }
        }
        Ok(())
    }

    /// Number of logical curves in the dictionary.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterate over entries in dictionary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CurveDef)> {
        self.curves.iter()
    }
}

impl Default for CurveConfig {
    /// The standard log curve dictionary used when no user configuration
    /// has been loaded.
    fn default() -> Self {
        let mut curves = IndexMap::new();
        curves.insert(
            "CALI".to_string(),
            CurveDef::new(&["CALI", "CAL", "CALIPER", "HCAL", "CALX"], "Caliper"),
        );
        curves.insert(
            "GR".to_string(),
            CurveDef::new(&["GR", "GAMMA", "GAPI"], "Gamma Ray"),
        );
        curves.insert(
            "RES D".to_string(),
            CurveDef::new(
                &["RD", "RT", "LLD", "ILD", "RILD", "ID", "IND", "RDEP"],
                "Resistivity Deep",
            ),
        );
        curves.insert(
            "RES S".to_string(),
            CurveDef::new(
                &["RS", "RSH", "RTS", "RESS", "LLS", "SFL", "MSFL", "SN", "LN"],
                "Resistivity Shallow",
            ),
        );
        curves.insert(
            "DT".to_string(),
            CurveDef::new(&["DT", "DTC", "AC"], "Sonic Transit Time"),
        );
        curves.insert(
            "RHOB".to_string(),
            CurveDef::new(&["RHOB", "RHOZ", "DEN"], "Bulk Density"),
        );
        curves.insert(
            "NPHI".to_string(),
            CurveDef::new(&["NPHI", "NPOR", "PHIN"], "Neutron Porosity"),
        );
        curves.insert("SP".to_string(), CurveDef::new(&["SP"], "Self Potential"));
        curves.insert(
            "PHID".to_string(),
            CurveDef::new(&["PHID", "DPHI"], "PHID"),
        );
        Self { curves }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = CurveConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.len(), 9);
        // Dictionary order is preserved.
        let keys: Vec<&String> = config.curves.keys().collect();
        assert_eq!(keys[0], "CALI");
        assert_eq!(keys[1], "GR");
    }

    #[test]
    fn test_empty_aliases_rejected() {
        let mut config = CurveConfig::new();
        config.curves.insert(
            "GR".to_string(),
            CurveDef {
                aliases: vec![],
                description: "Gamma Ray".to_string(),
            },
        );
        assert!(config.check().is_err());
    }

    #[test]
    fn test_blank_description_rejected() {
        let mut config = CurveConfig::new();
        config
            .curves
            .insert("GR".to_string(), CurveDef::new(&["GR"], "  "));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = CurveConfig::default();
        let file = NamedTempFile::new().unwrap();
        config.save(file.path()).unwrap();
        let loaded = CurveConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_malformed_structure() {
        let mut file = NamedTempFile::new().unwrap();
        // "aliases" must be a list, not a string.
        file.write_all(br#"{"GR": {"aliases": "GR", "description": "Gamma Ray"}}"#)
            .unwrap();
        assert!(CurveConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_missing_description() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"GR": {"aliases": ["GR"]}}"#).unwrap();
        assert!(CurveConfig::load(file.path()).is_err());
    }
}
