use std::time::Duration;

const NS_PER_US: u128 = 1_000;
const NS_PER_MS: u128 = 1_000_000;
const NS_PER_S: u128 = 1_000_000_000;

fn round_div(value: u128, unit: u128) -> u128 {
    (value + (unit / 2)) / unit
}

/// Single rounded component in `us`, `ms` or `s`.
pub(crate) fn format_duration(d: Duration) -> String {
    let total_ns = d.as_nanos();

    if total_ns >= NS_PER_S {
        return format!("{}s", round_div(total_ns, NS_PER_S));
    }
    if total_ns >= NS_PER_MS {
        return format!("{}ms", round_div(total_ns, NS_PER_MS));
    }
    format!("{}us", round_div(total_ns, NS_PER_US))
}

/// Histogram values are recorded in microseconds.
pub(crate) fn format_micros_opt(v: Option<f64>) -> String {
    match v {
        Some(us) if us.is_finite() && us >= 0.0 => {
            format_duration(Duration::from_nanos((us * 1_000.0).round() as u64))
        }
        _ => "-".to_string(),
    }
}

pub(crate) fn format_rate(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.0}")
    } else {
        "0".to_string()
    }
}

pub(crate) fn format_timestamp(t: std::time::SystemTime) -> String {
    humantime::format_rfc3339_seconds(t).to_string()
}
