//! Input rules applied by the store before any statement runs.
//!
//! Textual inputs are trimmed first; lengths are counted in characters.

use validator::ValidateEmail;

use super::list::{in_palette, normalize_color, DEFAULT_COLOR};
use crate::error::{Error, Result};

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_LIST_NAME_LENGTH: usize = 50;
pub const MAX_TAG_NAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn todo_title(title: &str) -> Result<String> {
    bounded(title, MAX_TITLE_LENGTH, Error::EmptyTitle, Error::TitleTooLong)
}

pub fn list_name(name: &str) -> Result<String> {
    bounded(name, MAX_LIST_NAME_LENGTH, Error::EmptyListName, Error::ListNameTooLong)
}

pub fn tag_name(name: &str) -> Result<String> {
    bounded(name, MAX_TAG_NAME_LENGTH, Error::EmptyTagName, Error::TagNameTooLong)
}

/// Strict variant used on create: anything outside the palette is rejected.
pub fn list_color_strict(color: &str) -> Result<String> {
    match normalize_color(color) {
        None => Ok(DEFAULT_COLOR.to_string()),
        Some(c) if in_palette(&c) => Ok(c),
        Some(_) => Err(Error::InvalidColor),
    }
}

/// Lenient variant used on update: anything outside the palette becomes the default.
pub fn list_color_coerced(color: &str) -> String {
    match normalize_color(color) {
        Some(c) if in_palette(&c) => c,
        _ => DEFAULT_COLOR.to_string(),
    }
}

pub fn email(email: &str) -> Result<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(Error::EmailRequired);
    }
    let owned = trimmed.to_string();
    if !owned.validate_email() {
        return Err(Error::InvalidEmail);
    }
    Ok(owned)
}

pub fn password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::PasswordTooShort);
    }
    Ok(())
}

fn bounded(input: &str, max: usize, empty: Error, too_long: Error) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(todo_title("  Buy milk  ").unwrap(), "Buy milk");
    }

    #[test]
    fn title_bounds() {
        assert!(matches!(todo_title(" \t\n"), Err(Error::EmptyTitle)));
        assert!(todo_title(&"a".repeat(255)).is_ok());
        assert!(matches!(todo_title(&"a".repeat(256)), Err(Error::TitleTooLong)));
        // surrounding whitespace does not count against the limit
        assert!(todo_title(&format!("  {}  ", "a".repeat(255))).is_ok());
    }

    #[test]
    fn title_length_counts_characters() {
        assert!(todo_title(&"é".repeat(255)).is_ok());
    }

    #[test]
    fn list_name_bounds() {
        assert!(matches!(list_name(""), Err(Error::EmptyListName)));
        assert!(list_name(&"n".repeat(50)).is_ok());
        assert!(matches!(list_name(&"n".repeat(51)), Err(Error::ListNameTooLong)));
    }

    #[test]
    fn strict_color() {
        assert_eq!(list_color_strict("").unwrap(), DEFAULT_COLOR);
        assert_eq!(list_color_strict("F8BBD9").unwrap(), "#F8BBD9");
        assert!(matches!(list_color_strict("#000000"), Err(Error::InvalidColor)));
    }

    #[test]
    fn coerced_color() {
        assert_eq!(list_color_coerced("#000000"), DEFAULT_COLOR);
        assert_eq!(list_color_coerced(""), DEFAULT_COLOR);
        assert_eq!(list_color_coerced("B3E5FC"), "#B3E5FC");
    }

    #[test]
    fn email_rules() {
        assert!(matches!(email("  "), Err(Error::EmailRequired)));
        assert!(matches!(email("not-an-email"), Err(Error::InvalidEmail)));
        assert_eq!(email(" a@x.com ").unwrap(), "a@x.com");
    }

    #[test]
    fn password_rules() {
        assert!(matches!(password("12345"), Err(Error::PasswordTooShort)));
        assert!(password("123456").is_ok());
    }
}
