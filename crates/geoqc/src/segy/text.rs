//! Textual header decoding: EBCDIC (cp037) or ASCII, auto-detected.

/// cp037 code point to ASCII character; unprintable positions map to space.
#[rustfmt::skip]
const EBCDIC_TO_ASCII: [char; 256] = [
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ',
    ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', '.', '<', '(', '+', '|', '&', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', '!', '$', '*', ')', ';', ' ',
    '-', '/', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ',', '%', '_', '>', '?', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', '`', ':', '#', '@', '\'', '=', '"',
    ' ', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', ' ', ' ', ' ', ' ', ' ', ' ', ' ', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', ' ', ' ', ' ', ' ', ' ', ' ',
    ' ', '~', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', ' ', ' ', ' ', ' ', ' ', ' ', '^', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', '[', ']', ' ', ' ', ' ', ' ',
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', ' ', ' ', ' ', ' ', ' ', ' ', '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', ' ', ' ', ' ', ' ', ' ', ' ',
    '\\', ' ', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', ' ', ' ', ' ', ' ', ' ', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ' ', ' ', ' ', ' ', ' ', ' ',
];

/// Decode a 3200-byte textual header into 40 lines of 80 characters.
///
/// Encoding is auto-detected: when the bulk of the bytes are printable
/// ASCII the header is taken as ASCII, otherwise it is decoded as EBCDIC.
pub fn decode_text_header(raw: &[u8]) -> String {
    let decoded: String = if looks_ascii(raw) {
        raw.iter()
            .map(|&b| {
                if (0x20..0x7f).contains(&b) {
                    b as char
                } else {
                    ' '
                }
            })
            .collect()
    } else {
        raw.iter().map(|&b| EBCDIC_TO_ASCII[b as usize]).collect()
    };

    // Card-image layout: 40 rows of 80 columns.
    decoded
        .as_bytes()
        .chunks(80)
        .map(|chunk| String::from_utf8_lossy(chunk).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn looks_ascii(raw: &[u8]) -> bool {
    if raw.is_empty() {
        return true;
    }
    let printable = raw
        .iter()
        .filter(|&&b| (0x20..0x7f).contains(&b) || b == b'\n' || b == b'\r' || b == 0)
        .count();
    printable * 10 >= raw.len() * 9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_header() {
        let mut raw = vec![b' '; 3200];
        raw[..9].copy_from_slice(b"C01 LINE ");
        let text = decode_text_header(&raw);
        assert!(text.starts_with("C01 LINE"));
        assert_eq!(text.split('\n').count(), 40);
    }

    #[test]
    fn test_ebcdic_header() {
        // "C01" in cp037: C=0xC3, 0=0xF0, 1=0xF1; fill is EBCDIC space 0x40.
        let mut raw = vec![0x40u8; 3200];
        raw[0] = 0xC3;
        raw[1] = 0xF0;
        raw[2] = 0xF1;
        let text = decode_text_header(&raw);
        assert!(text.starts_with("C01"));
    }

    #[test]
    fn test_lines_are_80_columns() {
        let raw = vec![b'X'; 3200];
        let text = decode_text_header(&raw);
        for line in text.lines() {
            assert_eq!(line.len(), 80);
        }
    }
}
