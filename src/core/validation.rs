//! Validation utilities for operation inputs
//!
//! Provides validation logic for the values clients hand to the queue engine
//! and registry. All helpers return `Result<_, String>`; callers wrap the
//! message into their own `Validation` error variant.

/// Lowest client-selectable priority level
pub const MIN_PRIORITY_LEVEL: u8 = 1;
/// Highest client-selectable priority level
pub const MAX_PRIORITY_LEVEL: u8 = 4;

/// Maximum length of a service point name
const MAX_POINT_NAME_LEN: usize = 100;

/// Validate a service point name (non-empty, bounded length)
pub fn validate_point_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Service point name cannot be empty".to_string());
    }
    if trimmed.len() > MAX_POINT_NAME_LEN {
        return Err(format!(
            "Service point name exceeds {} characters",
            MAX_POINT_NAME_LEN
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a priority level supplied at join time
pub fn validate_priority_level(level: u8) -> Result<u8, String> {
    if !(MIN_PRIORITY_LEVEL..=MAX_PRIORITY_LEVEL).contains(&level) {
        return Err(format!(
            "Priority level must be between {} and {}, got {}",
            MIN_PRIORITY_LEVEL, MAX_PRIORITY_LEVEL, level
        ));
    }
    Ok(level)
}

/// Validate a queue capacity limit
pub fn validate_max_queue_length(value: u32) -> Result<u32, String> {
    if value == 0 {
        return Err("Maximum queue length must be greater than 0".to_string());
    }
    Ok(value)
}

/// Validate the per-visitor wait estimate used for `estimated_wait_minutes`
pub fn validate_minutes_per_visitor(value: i64) -> Result<i64, String> {
    if value <= 0 {
        return Err(format!(
            "'{}' is not a valid minutes-per-visitor estimate",
            value
        ));
    }
    Ok(value)
}
