/// Clamp a percentage into `[0, 100]`; NaN collapses to 0.
pub fn clamp_percent(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) }
}

/// Parse a `data-percent` attribute value.
///
/// Accepts a leading numeric prefix the way browsers' `parseFloat` does, so
/// `"75%"` reads as 75. Missing, empty or malformed values fall back to 0.
pub fn parse_percent(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let prefix = numeric_prefix(raw.trim());
    match prefix.parse::<f64>() {
        Ok(v) if v.is_finite() => clamp_percent(v),
        _ => 0.0,
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                // only take the exponent when digits follow it
                let mut next = end + 1;
                if matches!(bytes.get(next), Some(b'+' | b'-')) {
                    next += 1;
                }
                if !matches!(bytes.get(next), Some(b'0'..=b'9')) {
                    break;
                }
                seen_exp = true;
                end = next;
            }
            _ => break,
        }
        end += 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_percent(Some("75")), 75.0);
        assert_eq!(parse_percent(Some(" 42.5 ")), 42.5);
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(parse_percent(Some("75%")), 75.0);
        assert_eq!(parse_percent(Some("12.5.3")), 12.5);
        assert_eq!(parse_percent(Some("3e1x")), 30.0);
        assert_eq!(parse_percent(Some("8e")), 8.0);
    }

    #[test]
    fn malformed_values_fall_back_to_zero() {
        assert_eq!(parse_percent(None), 0.0);
        assert_eq!(parse_percent(Some("")), 0.0);
        assert_eq!(parse_percent(Some("abc")), 0.0);
        assert_eq!(parse_percent(Some("-")), 0.0);
        assert_eq!(parse_percent(Some("NaN")), 0.0);
    }

    #[test]
    fn values_are_clamped() {
        assert_eq!(parse_percent(Some("150")), 100.0);
        assert_eq!(parse_percent(Some("-20")), 0.0);
        assert_eq!(clamp_percent(f64::NAN), 0.0);
    }
}
