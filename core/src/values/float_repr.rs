/// Shortest round-tripping representation of `x`, laid out like Python's
/// `repr(float)`: positional between `1e-4` and `1e16`, scientific with a
/// signed two-digit exponent outside that range, and always with a `.0` or
/// exponent so a float never reads as an integer.
pub fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sign = if x.is_sign_negative() { "-" } else { "" };
    if x == 0.0 {
        return format!("{}0.0", sign);
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.25e-7".
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        let body = if point <= 0 {
            format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
        } else if point as usize >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
        } else {
            let (int_part, frac_part) = digits.split_at(point as usize);
            format!("{}.{}", int_part, frac_part)
        };
        format!("{}{}", sign, body)
    } else {
        let (first, rest) = digits.split_at(1);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}{}e{}{:02}", sign, first, exp_sign, exp.unsigned_abs())
        } else {
            format!("{}{}.{}e{}{:02}", sign, first, rest, exp_sign, exp.unsigned_abs())
        }
    }
}
