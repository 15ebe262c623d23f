// Utility helpers for lenient parsing, label resolution and basic statistics.
//
// Inputs come from hand-edited configuration, so all the "dirty" value
// handling lives here and the stages can assume clean, typed values.
use chrono::Weekday;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use serde_json::Value;

/// Calendar days in breakdown order, Monday first.
pub static WEEKDAY_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    let mut day = Weekday::Mon;
    let mut names = Vec::with_capacity(7);
    for _ in 0..7 {
        names.push(weekday_name(day).to_string());
        day = day.succ();
    }
    names
});

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Pick the display label for a configuration entry.
///
/// Precedence is `label`, then `name`, then `fallback` (usually the id).
/// Empty or whitespace-only strings count as missing.
pub fn resolve_label<'a>(label: Option<&'a str>, name: Option<&'a str>, fallback: &'a str) -> &'a str {
    first_present(&[label, name]).unwrap_or(fallback)
}

/// First candidate that is present and not blank.
pub fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

/// Parse a count from a string, forgiving thousands separators and
/// fractional parts. Negative or unparseable values yield `None`.
pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    let v = s.parse::<f64>().ok()?;
    count_from_f64(v)
}

fn count_from_f64(v: f64) -> Option<u32> {
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    Some(v.floor().min(u32::MAX as f64) as u32)
}

/// Read a count out of an arbitrary JSON value; anything unusable is 0.
pub fn count_from_value(v: &Value) -> u32 {
    match v {
        Value::Number(n) => n.as_f64().and_then(count_from_f64).unwrap_or(0),
        Value::String(s) => parse_u32_safe(Some(s)).unwrap_or(0),
        _ => 0,
    }
}

/// Read a rating out of an arbitrary JSON value.
///
/// Only positive integers are ratings; `0`, fractions, negatives and
/// non-numeric values all mean "not rated".
pub fn rating_from_value(v: &Value) -> Option<u8> {
    let raw = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.fract() != 0.0 || raw < 1.0 || raw > u8::MAX as f64 {
        return None;
    }
    Some(raw as u8)
}

/// Identifier from a JSON string or number. Blank strings are absent.
pub fn id_from_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// `part / whole` as a rounded whole percentage, 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234.50`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_label_precedence() {
        assert_eq!(resolve_label(Some("Red Zone"), Some("RZ"), "rz"), "Red Zone");
        assert_eq!(resolve_label(None, Some("RZ"), "rz"), "RZ");
        assert_eq!(resolve_label(Some(""), Some("  "), "rz"), "rz");
    }

    #[test]
    fn test_counts_are_lenient() {
        assert_eq!(count_from_value(&json!(4)), 4);
        assert_eq!(count_from_value(&json!(4.9)), 4);
        assert_eq!(count_from_value(&json!("1,200")), 1200);
        assert_eq!(count_from_value(&json!(-3)), 0);
        assert_eq!(count_from_value(&json!("lots")), 0);
        assert_eq!(count_from_value(&Value::Null), 0);
    }

    #[test]
    fn test_ratings_must_be_positive_integers() {
        assert_eq!(rating_from_value(&json!(5)), Some(5));
        assert_eq!(rating_from_value(&json!("3")), Some(3));
        assert_eq!(rating_from_value(&json!(0)), None);
        assert_eq!(rating_from_value(&json!(3.5)), None);
        assert_eq!(rating_from_value(&json!(true)), None);
    }

    #[test]
    fn test_percent_rounds_and_guards_zero() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 0), 0);
    }

    #[test]
    fn test_weekdays_start_monday() {
        assert_eq!(WEEKDAY_NAMES.len(), 7);
        assert_eq!(WEEKDAY_NAMES[0], "Monday");
        assert_eq!(WEEKDAY_NAMES[6], "Sunday");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234.5, 2), "1,234.50");
        assert_eq!(format_number(-2.0, 0), "-2");
        assert_eq!(format_number(0.0, 2), "0.00");
    }
}
