use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Every show has exactly this many seats, numbered 1..=80.
pub const SEATS_PER_SHOW: i32 = 80;

/// Client names longer than this are stored truncated, not rejected.
pub const MAX_CLIENT_NAME_CHARS: usize = 100;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub show_time: NaiveDateTime,
    pub seat_number: i32,
    pub reserved: bool,
    pub client_name: Option<String>,
}

/// Truncates by characters, not bytes, so a multi-byte name never splits.
pub fn truncate_client_name(name: &str) -> String {
    name.chars().take(MAX_CLIENT_NAME_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_pass_through() {
        assert_eq!(truncate_client_name("Alice"), "Alice");
    }

    #[test]
    fn long_names_keep_first_100_chars() {
        let name = "x".repeat(250);
        let stored = truncate_client_name(&name);
        assert_eq!(stored.chars().count(), MAX_CLIENT_NAME_CHARS);
        assert_eq!(stored, "x".repeat(100));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let name = "é".repeat(150);
        let stored = truncate_client_name(&name);
        assert_eq!(stored.chars().count(), MAX_CLIENT_NAME_CHARS);
    }
}
