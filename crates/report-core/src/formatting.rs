//! Rendering helpers for the report's answer and runtime lines.

/// Format a floating-point number truncated (not rounded) to a fixed number
/// of decimal places.
///
/// Truncation is toward zero. A half-ULP epsilon is added before truncating
/// so that values sitting just below an exact decimal due to IEEE 754 binary
/// representation (e.g. `1.13` stored as `1.1299999…`) are not cut down a
/// full cent.
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_truncated;
///
/// assert_eq!(format_truncated(2.356, 2), "2.35");
/// assert_eq!(format_truncated(2.0, 2), "2.00");
/// assert_eq!(format_truncated(1.13, 2), "1.13");
/// assert_eq!(format_truncated(-2.356, 2), "-2.35");
/// ```
pub fn format_truncated(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let truncated = ((abs_value * factor) + epsilon).trunc() / factor;

    let rendered = format!("{:.prec$}", truncated, prec = decimals as usize);
    if negative && truncated != 0.0 {
        format!("-{rendered}")
    } else {
        rendered
    }
}

/// Format a wall-clock duration as the report's runtime suffix.
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_seconds;
///
/// assert_eq!(format_seconds(0.1234), "0.123 seconds");
/// assert_eq!(format_seconds(2.0), "2.000 seconds");
/// ```
pub fn format_seconds(secs: f64) -> String {
    format!("{secs:.3} seconds")
}
