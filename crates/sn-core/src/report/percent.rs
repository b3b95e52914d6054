//! Two-character percentages for narrow table columns.

/// Format `100 * part / whole` in exactly two characters.
///
/// | ratio | output |
/// |---|---|
/// | whole is zero | two spaces |
/// | below 0.1% | `.0` |
/// | below 1% | `.d` (tenths) |
/// | below 100% | integer, right-aligned |
/// | otherwise | `99` |
pub fn percent(part: f64, whole: f64) -> String {
    if whole == 0.0 {
        return "  ".to_string();
    }
    let r = 100.0 * part / whole;
    if r < 0.1 {
        ".0".to_string()
    } else if r < 1.0 {
        format!(".{}", (r * 10.0) as u64)
    } else if r < 100.0 {
        format!("{:2}", r as u64)
    } else {
        "99".to_string()
    }
}

/// [`percent`] for integer counts.
pub fn percent_of(part: u64, whole: u64) -> String {
    percent(part as f64, whole as f64)
}
