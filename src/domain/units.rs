// Unit conversion and number formatting helpers

const MPS_TO_MPH: f64 = 2.237;
const PASCALS_PER_MMHG: f64 = 133.322;
const MILLION_KM: f64 = 1_000_000.0;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

pub fn pascals_to_mmhg(pascals: f64) -> f64 {
    pascals / PASCALS_PER_MMHG
}

/// Lenient decimal parse used for provider strings. Anything unparseable is 0.
pub fn parse_or_zero(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Format a kilometre distance: above one million switches to "M km".
pub fn format_distance_km(km: f64) -> String {
    if km > MILLION_KM {
        format!("{:.2}M km", km / MILLION_KM)
    } else {
        format!("{} km", group_thousands(km))
    }
}

/// en-US style grouping with at most three fraction digits, e.g. 1234.5 -> "1,234.5".
pub fn group_thousands(value: f64) -> String {
    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = grouped.chars().all(|c| c == '0' || c == ',' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
