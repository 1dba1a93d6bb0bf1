//! Numeric coercion and rendering
//!
//! Every string-to-number decision in the crate goes through this module so that INI, ENV and
//! CSV agree on edge cases:
//!
//!     | input     | permissive | strict |
//!     |-----------|------------|--------|
//!     | "42"      | 42         | 42     |
//!     | "50%"     | 50         | none   |
//!     | "1,000"   | 1          | none   |
//!     | "$10.50"  | none       | none   |
//!     | "1.2.3"   | 1.2        | none   |
//!     | "0x1F"    | 0          | 31     |
//!
//! Permissive parsing takes the longest valid leading decimal literal and ignores whatever
//! follows. Strict parsing requires the whole trimmed string to be a number literal and is used
//! to recognise documents that are already plain lists of numbers.

/// Trim surrounding whitespace, including a byte-order mark.
pub fn trim_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Length in bytes of the longest decimal literal at the start of `s` (0 when there is none).
///
/// Accepts an optional sign, digits with an optional fraction (`1.`, `.5`, `1.5`) and an
/// optional exponent that is only consumed when it has digits.
fn scan_decimal(s: &str) -> usize {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut i: usize| {
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        let frac_count = frac_end - (end + 1);
        if digit_count > 0 || frac_count > 0 {
            end = frac_end;
            digit_count += frac_count;
        }
    }

    if digit_count == 0 {
        return 0;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_start = end + 1;
        if exp_start < len && matches!(bytes[exp_start], b'+' | b'-') {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    end
}

/// Permissive float parse: leading numeric prefix of the trimmed value, finite results only.
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let s = trim_value(value);
    let end = scan_decimal(s);
    if end == 0 {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Strict parse of a whole trimmed string as a number literal.
///
/// Recognises decimal and exponent notation, `Infinity` with an optional sign, and unsigned
/// `0x`/`0o`/`0b` integer literals. The result may be infinite; callers decide whether to keep
/// it.
pub fn parse_strict(value: &str) -> Option<f64> {
    let s = trim_value(value);
    if s.is_empty() {
        return None;
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        // Wide literals lose precision the same way any float conversion would.
        return Some(
            digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
        );
    }

    if scan_decimal(s) != s.len() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Render a number the way results are written out: integral values without a fraction,
/// shortest round-trip digits otherwise, exponent notation outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if !n.is_finite() {
        return if n.is_nan() {
            "NaN".to_string()
        } else if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}

/// Render a sequence one number per line.
pub fn join_lines(numbers: &[f64]) -> String {
    numbers
        .iter()
        .map(|n| format_number(*n))
        .collect::<Vec<_>>()
        .join("\n")
}
