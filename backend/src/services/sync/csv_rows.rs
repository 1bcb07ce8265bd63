//! Line-level parsing of the CSV documents a device uploads.
//!
//! The documents are small and hand-assembled by firmware, so they are read
//! one line at a time: the first line is a header and is dropped, blank lines
//! are ignored, and a line that fails to parse is reported as `None` so the
//! caller can skip it without failing the whole sync.

use csv::{ReaderBuilder, StringRecord};

/// Yields the trimmed fields of every data line in `document`.
pub fn data_rows(document: &str) -> impl Iterator<Item = Option<Vec<String>>> + '_ {
    document
        .trim()
        .split('\n')
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
}

fn parse_line(line: &str) -> Option<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Some(record.iter().map(|field| field.trim().to_string()).collect()),
        _ => None,
    }
}

/// Parses the longest leading decimal number of `field`, falling back to 0.
///
/// Sensor firmware occasionally appends units or garbage (`"55.2%"`), and a
/// missing value must not reject the reading.
pub fn lenient_f64(field: &str) -> f64 {
    let s = field.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(document: &str) -> Vec<Option<Vec<String>>> {
        data_rows(document).collect()
    }

    #[test]
    fn header_and_blank_lines_are_dropped() {
        let parsed = rows("id,phone,created\n\nF1,+1555,2024-01-01\n   \nF2,+1666,2024-01-02\n");
        assert_eq!(
            parsed,
            vec![
                Some(vec!["F1".into(), "+1555".into(), "2024-01-01".into()]),
                Some(vec!["F2".into(), "+1666".into(), "2024-01-02".into()]),
            ]
        );
    }

    #[test]
    fn header_only_or_empty_document_has_no_rows() {
        assert!(rows("id,phone,created").is_empty());
        assert!(rows("").is_empty());
        assert!(rows("  \n  ").is_empty());
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let parsed = rows("id,phone,created\r\nF1,+1555,2024-01-01\r\n");
        assert_eq!(
            parsed,
            vec![Some(vec!["F1".into(), "+1555".into(), "2024-01-01".into()])]
        );
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let parsed = rows("h\n\"F,1\",\"+1 555\", 2024-01-01 ,extra");
        assert_eq!(
            parsed,
            vec![Some(vec![
                "F,1".into(),
                "+1 555".into(),
                "2024-01-01".into(),
                "extra".into()
            ])]
        );
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(lenient_f64("55.2"), 55.2);
        assert_eq!(lenient_f64(" -3.5 "), -3.5);
        assert_eq!(lenient_f64("12.5%"), 12.5);
        assert_eq!(lenient_f64("1e2"), 100.0);
        assert_eq!(lenient_f64("7e"), 7.0);
        assert_eq!(lenient_f64(".5"), 0.5);
        assert_eq!(lenient_f64("abc"), 0.0);
        assert_eq!(lenient_f64(""), 0.0);
        assert_eq!(lenient_f64("-"), 0.0);
        assert_eq!(lenient_f64("NaN"), 0.0);
    }
}
