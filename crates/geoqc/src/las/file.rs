//! In-memory representation of a parsed LAS file.

use indexmap::IndexMap;

/// A single header field from the `~Well` or `~Parameter` section.
///
/// LAS header conventions are not standardized across vendors, so callers
/// look fields up through [`LasFile::well_field`] with ordered candidate
/// lists rather than assuming any one mnemonic is present.
#[derive(Debug, Clone, PartialEq)]
pub struct WellField {
    /// Field mnemonic as written in the file.
    pub mnemonic: String,
    /// Unit string (may be empty).
    pub unit: String,
    /// Raw value text.
    pub value: String,
    /// Description after the trailing colon.
    pub description: String,
}

impl WellField {
    /// Parse the field value as a number, if possible.
    pub fn numeric(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok()
    }

    /// Trimmed value text, or `None` when blank.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// A logged curve: mnemonic, unit, and its sample array.
#[derive(Debug, Clone)]
pub struct LasCurve {
    pub mnemonic: String,
    pub unit: String,
    pub description: String,
    /// Samples in depth order. Missing values hold the file's null sentinel.
    pub data: Vec<f64>,
}

/// A parsed LAS well-log file.
#[derive(Debug, Clone)]
pub struct LasFile {
    /// LAS version string from the `~Version` section.
    pub version: String,
    /// Null sentinel declared in the `~Well` section (default -999.25).
    pub null_value: f64,
    /// Well-header fields keyed by uppercased mnemonic.
    well: IndexMap<String, WellField>,
    /// Curves in file order; the first curve is the depth index.
    pub curves: Vec<LasCurve>,
}

impl LasFile {
    pub(crate) fn new(
        version: String,
        null_value: f64,
        well: IndexMap<String, WellField>,
        curves: Vec<LasCurve>,
    ) -> Self {
        Self {
            version,
            null_value,
            well,
            curves,
        }
    }

    /// The depth index curve (first curve in the file), if any.
    pub fn index_curve(&self) -> Option<&LasCurve> {
        self.curves.first()
    }

    /// Look up a curve by mnemonic, case-insensitively.
    pub fn curve(&self, mnemonic: &str) -> Option<&LasCurve> {
        self.curves
            .iter()
            .find(|c| c.mnemonic.eq_ignore_ascii_case(mnemonic))
    }

    /// Capability-checked well-header accessor: returns the field if the
    /// file declares it (case-insensitive).
    pub fn well_field(&self, mnemonic: &str) -> Option<&WellField> {
        self.well.get(&mnemonic.to_uppercase())
    }

    /// Walk an ordered candidate list and return the first field present.
    pub fn first_well_field<'a>(&self, candidates: &[&'a str]) -> Option<&WellField> {
        candidates.iter().find_map(|name| self.well_field(name))
    }

    /// All well-header fields in file order.
    pub fn well_fields(&self) -> impl Iterator<Item = &WellField> {
        self.well.values()
    }
}
