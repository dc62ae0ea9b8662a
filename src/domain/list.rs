use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListId(pub i64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub user_id: UserId,
}

pub const DEFAULT_COLOR: &str = "#BBDEFB";

/// The only colors a list may carry.
pub const PALETTE: [&str; 8] = [
    "#F8BBD9", "#E1BEE7", "#BBDEFB", "#B2DFDB", "#FFF9C4", "#FFCCBC", "#D1C4E9", "#B3E5FC",
];

pub fn in_palette(color: &str) -> bool { PALETTE.contains(&color) }

/// Trims the input and restores a missing `#` on a bare six-digit hex value.
/// Returns `None` for empty input.
pub fn normalize_color(color: &str) -> Option<String> {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(format!("#{trimmed}"));
    }
    Some(trimmed.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateList {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Partial update; absent or empty fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateList {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_color_is_in_palette() {
        assert!(in_palette(DEFAULT_COLOR));
    }

    #[test]
    fn bare_hex_gets_hash_prefix() {
        assert_eq!(normalize_color("BBDEFB").as_deref(), Some("#BBDEFB"));
        assert_eq!(normalize_color("  #E1BEE7 ").as_deref(), Some("#E1BEE7"));
        assert_eq!(normalize_color("   "), None);
        assert_eq!(normalize_color("red").as_deref(), Some("red"));
    }

    #[test]
    fn palette_lookup_is_case_sensitive() {
        assert!(!in_palette("#bbdefb"));
    }
}
