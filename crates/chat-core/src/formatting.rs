/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use chat_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(12_345), "12,345");
/// ```
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Format a share already rounded by [`share_percent`], e.g. `"33.33%"`.
pub fn format_share(percent: f64) -> String {
    format!("{:.2}%", percent)
}

/// `part` as a percentage of `whole`, rounded to two decimals.
///
/// An empty `whole` yields `0.0`.
///
/// # Examples
///
/// ```
/// use chat_core::formatting::share_percent;
///
/// assert_eq!(share_percent(1, 4), 25.0);
/// assert_eq!(share_percent(3, 0), 0.0);
/// ```
pub fn share_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(123_456), "123,456");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(33.33), "33.33%");
        assert_eq!(format_share(100.0), "100.00%");
        assert_eq!(format_share(0.0), "0.00%");
    }

    #[test]
    fn test_share_percent_rounds_to_two_decimals() {
        assert_eq!(share_percent(1, 3), 33.33);
        assert_eq!(share_percent(2, 3), 66.67);
        assert_eq!(share_percent(3, 3), 100.0);
    }

    #[test]
    fn test_share_percent_empty_whole() {
        assert_eq!(share_percent(0, 0), 0.0);
    }
}
