//! Numeric rounding and wall-clock formatting helpers.

/// Integer division paired with its remainder.
pub fn div_mod(x: u64, y: u64) -> (u64, u64) {
    (x / y, x % y)
}

/// Rounds half-up, matching the `floor(x + 0.5)` convention used for
/// both significant-figure rounding and second counts.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Rounds `x` to `digits` decimal places. Negative `digits` rounds to the
/// left of the decimal point.
fn round_places(x: f64, digits: i32) -> f64 {
    let shift = 10f64.powi(digits);
    round_half_up(x * shift) / shift
}

/// Returns `x` rounded to `figures` significant figures.
///
/// # Examples
///
/// ```
/// use u_anneal::format::round_figure;
///
/// assert!((round_figure(1111.1111, 3) - 1110.0).abs() < 1e-9);
/// assert!((round_figure(1.1111, 3) - 1.11).abs() < 1e-12);
/// ```
pub fn round_figure(x: f64, figures: i32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let magnitude = x.abs().log10().ceil() as i32;
    round_places(x, figures - magnitude)
}

/// Formats a duration in seconds as `HHHH:MM:SS`, rounded to the nearest
/// second, with the hours field right-justified to width 4.
///
/// # Examples
///
/// ```
/// use u_anneal::format::time_string;
///
/// assert_eq!(time_string(7384.5), "   2:03:05");
/// ```
pub fn time_string(seconds: f64) -> String {
    let total = round_half_up(seconds.max(0.0)) as u64;
    let (hours, rest) = div_mod(total, 3600);
    let (minutes, seconds) = div_mod(rest, 60);
    format!("{hours:4}:{minutes:02}:{seconds:02}")
}
