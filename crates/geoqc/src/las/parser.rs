//! Line-oriented LAS parser.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{GeoQcError, Result};
use crate::LOG_NULL_VALUE;

use super::file::{LasCurve, LasFile, WellField};

/// Section of a LAS file, selected by `~` marker lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Version,
    Well,
    Curve,
    Parameter,
    Other,
    Ascii,
    None,
}

/// Parse a LAS file from disk.
///
/// Returns an error for unreadable files, files with no `~Curve` section,
/// or files with no data rows. Individual malformed data tokens fall back
/// to the file's null sentinel rather than failing the whole parse.
pub fn parse_las(path: impl AsRef<Path>) -> Result<LasFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| GeoQcError::io(path, e))?;
    parse_las_str(&contents)
}

/// Parse LAS text already in memory.
pub fn parse_las_str(contents: &str) -> Result<LasFile> {
    let mut section = Section::None;
    let mut version = String::new();
    let mut null_value = LOG_NULL_VALUE;
    let mut well: IndexMap<String, WellField> = IndexMap::new();
    let mut curves: Vec<LasCurve> = Vec::new();
    let mut data_tokens: Vec<f64> = Vec::new();

    for (line_no, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('~') {
            section = match rest.chars().next().map(|c| c.to_ascii_uppercase()) {
                Some('V') => Section::Version,
                Some('W') => Section::Well,
                Some('C') => Section::Curve,
                Some('P') => Section::Parameter,
                Some('A') => Section::Ascii,
                _ => Section::Other,
            };
            continue;
        }

        match section {
            Section::Version => {
                if let Some(field) = parse_header_line(line) {
                    if field.mnemonic.eq_ignore_ascii_case("VERS") {
                        version = field.value.trim().to_string();
                    }
                }
            }
            Section::Well => {
                if let Some(field) = parse_header_line(line) {
                    if field.mnemonic.eq_ignore_ascii_case("NULL") {
                        if let Some(v) = field.numeric() {
                            null_value = v;
                        }
                    }
                    well.insert(field.mnemonic.to_uppercase(), field);
                }
            }
            Section::Curve => {
                let field = parse_header_line(line).ok_or_else(|| GeoQcError::LasParse {
                    line: line_no + 1,
                    message: format!("malformed curve definition: '{line}'"),
                })?;
                curves.push(LasCurve {
                    mnemonic: field.mnemonic,
                    unit: field.unit,
                    description: field.description,
                    data: Vec::new(),
                });
            }
            Section::Ascii => {
                for token in line.split_whitespace() {
                    data_tokens.push(token.parse::<f64>().unwrap_or(null_value));
                }
            }
            Section::Parameter | Section::Other | Section::None => {}
        }
    }

    if curves.is_empty() {
        return Err(GeoQcError::EmptyLas("no curve definitions".to_string()));
    }
    if data_tokens.is_empty() {
        return Err(GeoQcError::EmptyLas("no data rows".to_string()));
    }

    // Data tokens stream row-major across curves; this handles both wrapped
    // and unwrapped files. A trailing partial row is dropped.
    let n_curves = curves.len();
    let n_rows = data_tokens.len() / n_curves;
    for (i, token) in data_tokens.into_iter().take(n_rows * n_curves).enumerate() {
        curves[i % n_curves].data.push(token);
    }

    Ok(LasFile::new(version, null_value, well, curves))
}

/// Parse a `MNEM.UNIT  VALUE : DESCRIPTION` header line.
///
/// The unit runs from the first `.` to the first whitespace; the value is
/// everything up to the last `:`, which introduces the description.
fn parse_header_line(line: &str) -> Option<WellField> {
    let dot = line.find('.')?;
    let mnemonic = line[..dot].trim().to_string();
    if mnemonic.is_empty() {
        return None;
    }

    let rest = &line[dot + 1..];
    let unit_end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let unit = rest[..unit_end].trim().to_string();
    let tail = &rest[unit_end..];

    let (value, description) = match tail.rfind(':') {
        Some(colon) => (tail[..colon].trim(), tail[colon + 1..].trim()),
        None => (tail.trim(), ""),
    };

    Some(WellField {
        mnemonic,
        unit,
        value: value.to_string(),
        description: description.to_string(),
    })
}
