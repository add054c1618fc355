//! Numeric literal rules shared by the scanner, the column builder, and
//! the encoder.

/// The host integer window. `i32::MIN` itself is the integer NA sentinel
/// of the column layer, so a literal equal to it falls through to the
/// double branch.
pub(crate) const INT_NA: i32 = i32::MIN;

/// Decode a strict base-10 integer that fits `(i32::MIN, i32::MAX]`.
///
/// A leading `+`, hexadecimal forms, decimal points, and exponents are
/// all rejected; callers fall back to [`parse_double`].
pub(crate) fn parse_integer(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let digits = if bytes[0] == b'-' { &bytes[1..] } else { bytes };
    if digits.is_empty() || !digits.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = text.parse().ok()?;
    if value > i64::from(INT_NA) && value <= i64::from(i32::MAX) {
        Some(value)
    } else {
        None
    }
}

/// Decode a double using the platform IEEE-754 conversion. A leading `+`
/// is rejected for parity with the integer rule; non-finite results are
/// the caller's concern (strict mode rejects them).
pub(crate) fn parse_double(text: &str) -> Option<f64> {
    if text.is_empty() || text.starts_with('+') {
        return None;
    }
    text.parse().ok()
}

/// Format a finite double as its shortest round-tripping decimal, with a
/// guaranteed `.0` suffix when the result carries no `.` or exponent.
pub(crate) fn format_double(value: f64) -> String {
    debug_assert!(value.is_finite());
    let mut buf = ryu::Buffer::new();
    let raw = buf.format_finite(value);
    if raw.contains('.') || raw.contains(['e', 'E']) {
        raw.to_string()
    } else {
        format!("{raw}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_window_excludes_na_sentinel() {
        assert_eq!(parse_integer("2147483647"), Some(2147483647));
        assert_eq!(parse_integer("-2147483647"), Some(-2147483647));
        assert_eq!(parse_integer("-2147483648"), None);
        assert_eq!(parse_integer("2147483648"), None);
    }

    #[test]
    fn integer_rejects_plus_and_hex() {
        assert_eq!(parse_integer("+5"), None);
        assert_eq!(parse_integer("0x1f"), None);
        assert_eq!(parse_integer("1.0"), None);
        assert_eq!(parse_integer("1e3"), None);
    }

    #[test]
    fn double_rejects_leading_plus() {
        assert_eq!(parse_double("+1.5"), None);
        assert_eq!(parse_double("-1.5"), Some(-1.5));
        assert_eq!(parse_double("1e3"), Some(1000.0));
    }

    #[test]
    fn format_appends_fraction() {
        assert_eq!(format_double(2.0), "2.0");
        assert_eq!(format_double(99.5), "99.5");
        assert_eq!(format_double(-0.25), "-0.25");
    }
}
