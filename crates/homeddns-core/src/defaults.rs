//! Field defaulting shared by provider adapters
//!
//! Each adapter decides which of these it applies and with which minimum;
//! keeping the arithmetic here means every adapter clamps the same way.

/// Lowest and highest valid port numbers
const PORT_RANGE: std::ops::RangeInclusive<u32> = 1..=65535;

/// Raise `ttl` to `minimum` when it is unset (0) or below the minimum.
pub fn clamp_ttl(ttl: u32, minimum: u32) -> u32 {
    ttl.max(minimum)
}

/// Replace a port outside `[1, 65535]` with `1`.
pub fn normalize_port(port: u32) -> u32 {
    if PORT_RANGE.contains(&port) { port } else { 1 }
}

/// `Some(value)` unless the value is zero
pub fn non_zero(value: u32) -> Option<u32> {
    (value != 0).then_some(value)
}

/// `Some(value)` unless the value is empty
pub fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
