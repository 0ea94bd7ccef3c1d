//! Number and list rendering for user-facing text

/// Render a float the way the dashboard has always shown it: integral
/// values keep one decimal (`98.0`), others use the shortest exact form
/// (`93.3`). Magnitudes below `1e-4` or from `1e16` up switch to exponent
/// form with a signed two-digit exponent (`1e-05`, `1.5e+20`).
pub fn py_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if value != 0.0 && !(-4..16).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs());
            }
        }
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Integer with comma thousands separators: `25000` -> `25,000`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Price band `₹low - ₹high`, each bound rounded half-to-even
pub fn rupee_range(low: f64, high: f64) -> String {
    format!(
        "₹{} - ₹{}",
        group_thousands(low.round_ties_even() as i64),
        group_thousands(high.round_ties_even() as i64)
    )
}

/// Join reasons for a sentence: `a`, `a and b`, `a, b and c`
pub fn join_reasons<S: AsRef<str>>(reasons: &[S]) -> String {
    match reasons {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [head @ .., last] => {
            let head: Vec<&str> = head.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}
