/// Reserved platform value meaning "no data" for signal integer fields.
pub const UNAVAILABLE: i32 = i32::MAX;

/// Strip the platform sentinel from a raw integer reading.
///
/// Every platform-sourced signal integer must pass through here before it is
/// logged or used numerically. A sentinel that leaks into normalization would
/// silently saturate the feature to 1.0 and poison the window.
pub fn clean(raw: i32) -> Option<i32> {
    if raw == UNAVAILABLE {
        None
    } else {
        Some(raw)
    }
}
