//! Serde helper for human-readable durations in config files ("50ms",
//! "30s", "10m"). A bare number is read as seconds; a missing or empty
//! value is `Duration::ZERO` so callers can substitute their defaults.

use serde::{self, Deserialize, Deserializer};
use std::time::Duration;

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_duration(&raw).map_err(serde::de::Error::custom),
        None => Ok(Duration::ZERO),
    }
}

pub(crate) fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Duration::ZERO);
    }

    let split = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    let (value, suffix) = raw.split_at(split);

    let value: f64 = value
        .parse()
        .map_err(|_| format!("invalid duration value: {raw:?}"))?;
    let seconds_per_unit = match suffix.trim() {
        "" | "s" => 1.0,
        "m" => 60.0,
        "h" => 3600.0,
        "ms" => 1e-3,
        "us" | "µs" => 1e-6,
        "ns" => 1e-9,
        other => return Err(format!("unknown duration unit: {other:?}")),
    };

    Ok(Duration::from_secs_f64(value * seconds_per_unit))
}
