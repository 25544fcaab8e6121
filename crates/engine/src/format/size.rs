use crate::config::SizeMode;

const PREFIXES: [&str; 9] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y"];

/// Below this many bytes the raw count is the whole story.
const EXACT_SUFFIX_THRESHOLD: u64 = 1000;

/// Size cell text: `999 B`, or `1 kB (1,000 B)` once scaling kicks in.
pub fn format_size(bytes: u64, mode: SizeMode) -> String {
    if bytes < EXACT_SUFFIX_THRESHOLD {
        return format!("{bytes} B");
    }

    format!("{} ({} B)", format_bytes(bytes, mode), group_digits(bytes))
}

/// Scale `bytes` to the largest prefix keeping the value at least one unit.
pub fn format_bytes(bytes: u64, mode: SizeMode) -> String {
    let factor = mode.factor();
    let mut value = bytes as f64;
    let mut scale = 0;

    while value >= factor && scale < PREFIXES.len() - 1 {
        value /= factor;
        scale += 1;
    }

    format!("{} {}B", format_decimal(value), prefix(scale, mode))
}

fn prefix(scale: usize, mode: SizeMode) -> String {
    let base = PREFIXES[scale];
    match mode {
        SizeMode::Decimal => base.to_owned(),
        SizeMode::Binary if base.is_empty() => String::new(),
        SizeMode::Binary => format!("{}i", base.to_ascii_uppercase()),
    }
}

/// Thousands-separated integer.
pub fn group_digits(n: u64) -> String {
    group_integer(&n.to_string())
}

fn group_integer(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Grouped number with at most three fractional digits, trailing zeros cut.
fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let grouped = group_integer(int_part);
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    }
}

#[cfg(test)]
#[path = "size_tests.rs"]
mod tests;
