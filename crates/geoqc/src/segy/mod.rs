//! SEG-Y seismic trace-data file support.
//!
//! A big-endian reader over a memory-mapped file: 3200-byte textual header
//! (EBCDIC or ASCII), 400-byte binary header, and fixed 240-byte trace
//! headers per SEG-Y Rev 1. Two open modes mirror the QC workflow:
//! [`SegyFile::open_2d`] tolerates irregular line geometry, while
//! [`SegyFile::open_3d`] additionally builds the inline/crossline axes and
//! fails when no 3D geometry is present.

mod file;
mod text;

pub use file::{SegyFile, SegyMode, TraceField};

/// Short name for a SEG-Y trace data format code (Rev 1 conventions).
pub fn format_short(format_code: i16) -> String {
    match format_code {
        1 => "IBM Float".to_string(),
        2 => "4-byte Int".to_string(),
        3 => "2-byte Int".to_string(),
        5 => "IEEE Float".to_string(),
        8 => "1-byte Int".to_string(),
        other => format!("Code {other}"),
    }
}

/// Human-readable trace sorting code description (Rev 1 conventions).
pub fn sorting_description(sorting_code: i16) -> String {
    match sorting_code {
        -1 => "Other".to_string(),
        0 => "Unknown".to_string(),
        1 => "As recorded (no sorting)".to_string(),
        2 => "CDP ensemble".to_string(),
        3 => "Single fold continuous profile".to_string(),
        4 => "Horizontally stacked".to_string(),
        5 => "Common source point".to_string(),
        6 => "Common receiver point".to_string(),
        7 => "Common offset point".to_string(),
        8 => "Common mid-point".to_string(),
        9 => "Common conversion point".to_string(),
        other => format!("Unknown ({other})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_short() {
        assert_eq!(format_short(1), "IBM Float");
        assert_eq!(format_short(5), "IEEE Float");
        assert_eq!(format_short(42), "Code 42");
    }

    #[test]
    fn test_sorting_description() {
        assert_eq!(sorting_description(2), "CDP ensemble");
        assert_eq!(sorting_description(-1), "Other");
        assert_eq!(sorting_description(99), "Unknown (99)");
    }
}
