//! Tolerant numeric parsing for form-style text fields.
//!
//! Every numeric input in the tools (gap, custom sizes, custom quantity,
//! invoice quantity and price) arrives as free text. Parsing never fails:
//! the leading number is taken and the rest ignored, and anything without a
//! leading number yields `None` so callers can substitute their default.
//!
//! - `"12"` → 12, `"12.5mm"` → 12.5, `"  7 copies"` → 7
//! - `""`, `"abc"`, `"-"` → `None`
//! - [`leading_int`] stops at the decimal point: `"7.9"` → 7

/// Byte length of the leading decimal number in `s` (sign, digits, fraction, exponent).
fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    // Exponent only counts when followed by at least one digit.
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Parse the leading decimal number of a text field.
pub fn leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let len = float_prefix_len(s);
    if len == 0 {
        return None;
    }
    s[..len].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the leading integer of a text field.
pub fn leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}
