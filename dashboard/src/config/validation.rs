//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").unwrap());
static RE_HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*$")
        .unwrap()
});

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "DEVICE_HOST" => validate_host(value)?,
        "DEVICE_PORT" | "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "DEVICE_TIMEOUT_MS" => validate_int_range(value, 100, 120_000)?,
        "POLL_INTERVAL_MS" => validate_int_range(value, 100, 60_000)?,
        "IDLE_CAPTURE_MS" => validate_int_range(value, 0, 600_000)?,
        "NOTIFICATION_CAPACITY" => validate_int_range(value, 1, 100)?,
        "NOTIFICATION_TTL_MS" => validate_int_range(value, 100, 600_000)?,
        _ => {}
    }
    Ok(())
}

fn validate_host(value: &str) -> Result<(), String> {
    if let Some(caps) = RE_IPV4.captures(value) {
        let octets_ok = (1..=4).all(|i| caps[i].parse::<u8>().is_ok());
        if !octets_ok {
            return Err("invalid IPv4 address".into());
        }
        return Ok(());
    }
    if value.len() > 253 || !RE_HOSTNAME.is_match(value) {
        return Err("invalid host (expected hostname or IPv4 address)".into());
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
