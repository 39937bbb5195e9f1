/// Countdown display, `MM:SS` with both fields zero padded. Minutes are not
/// folded into hours, so 7200 seconds reads `120:00`.
pub fn format_time(secs: u64) -> String {
    let (mins, secs) = (secs / 60, secs % 60);
    format!("{:02}:{:02}", mins, secs)
}

/// Shortest round-trip rendering of a float. Whole values keep a `.0`, and
/// anything outside `[1e-4, 1e16)` switches to a signed, two digit exponent.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        let (mantissa, exponent) = match scientific.split_once('e') {
            Some(parts) => parts,
            None => return scientific,
        };
        let exponent: i32 = match exponent.parse() {
            Ok(exponent) => exponent,
            Err(_) => return scientific,
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let mut plain = value.to_string();
    if !plain.contains('.') {
        plain.push_str(".0");
    }
    plain
}
