//! Clock-time helpers for the control surface

/// Format milliseconds as `HH:MM:SS`.
pub fn format_clock(ms: u64) -> String {
    let total = ms / 1000;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse a dotted clock time into whole seconds.
///
/// Accepts `HH.MM.SS`, `HH.MM` and `HH`, read left to right the way users
/// type them. Returns `None` for empty input, more than three fields, or
/// any field that is not an unsigned integer.
pub fn parse_clock(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut fields = [0u64; 3];
    for (slot, part) in fields.iter_mut().zip(parts.iter()) {
        *slot = part.trim().parse().ok()?;
    }

    let [hours, minutes, seconds] = fields;
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}
