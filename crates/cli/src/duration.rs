//! Duration flag values such as `15s`, `500ms` or `1m30s`.

use std::time::Duration;

/// Parse a sequence of `<integer><unit>` pairs, with units `ms`, `s`, `m` and `h`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration '{}': expected a number", input));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|e| format!("invalid duration '{}': {}", input, e))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            "" => return Err(format!("invalid duration '{}': missing unit", input)),
            unit => return Err(format!("invalid duration '{}': unknown unit '{}'", input, unit)),
        };
        rest = &rest[unit_len..];
        total = total.saturating_add(part);
    }

    Ok(total)
}
