//! Number formatting for labels, tooltips and axes.

use thousands::Separable;

/// Grouped digits with up to three fraction digits: `1234.5678` -> `1,234.568`.
pub fn format_grouped(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let plain = if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    };

    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let grouped = int_part.separate_with_commas();
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Emission amount with unit, or "No data".
pub fn format_amount(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{} {unit}", format_grouped(v)),
        None => "No data".to_string(),
    }
}

pub fn format_fixed1(v: f64) -> String {
    format!("{v:.1}")
}

/// Integer label, used for year ticks.
pub fn format_integer(v: f64) -> String {
    format!("{}", v.round() as i64)
}

const SI_PREFIXES: [&str; 5] = ["", "k", "M", "G", "T"];

/// SI-prefixed label with trailing zeros trimmed: `1000` -> `1k`.
pub fn format_si(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format_integer(if v.is_finite() { v } else { 0.0 });
    }
    let exp3 = ((v.abs().log10() / 3.0).floor() as i32).clamp(0, SI_PREFIXES.len() as i32 - 1);
    let scaled = v / 1000f64.powi(exp3);
    let mut text = format!("{scaled:.6}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{text}{}", SI_PREFIXES[exp3 as usize])
}
