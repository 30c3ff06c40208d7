use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Time ordered, so ids sort the same way as creation times.
pub fn new_drawing_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn normalize_drawing_id(value: &str) -> Option<String> {
    let parsed = Uuid::parse_str(value).ok()?;
    Some(parsed.to_string())
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
