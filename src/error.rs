use thiserror::Error;

/// Coarse grouping of failures, one per HTTP status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("title exceeds maximum length of 255 characters")]
    TitleTooLong,
    #[error("list name cannot be empty")]
    EmptyListName,
    #[error("list name exceeds maximum length of 50 characters")]
    ListNameTooLong,
    #[error("tag name cannot be empty")]
    EmptyTagName,
    #[error("tag name exceeds maximum length of 50 characters")]
    TagNameTooLong,
    #[error("color must be a valid pastel hex from the palette")]
    InvalidColor,
    #[error("email is required")]
    EmailRequired,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("email and password are required")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// Unknown id, foreign owner and tombstoned todo are reported identically.
    #[error("todo not found")]
    NotFound,
    #[error("list not found")]
    ListNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("user not found")]
    UserNotFound,

    #[error("email already registered")]
    DuplicateEmail,
    #[error("list with this name already exists")]
    DuplicateList,
    #[error("tag with this name already exists")]
    DuplicateTag,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyTitle
            | Error::TitleTooLong
            | Error::EmptyListName
            | Error::ListNameTooLong
            | Error::EmptyTagName
            | Error::TagNameTooLong
            | Error::InvalidColor
            | Error::EmailRequired
            | Error::InvalidEmail
            | Error::PasswordTooShort
            | Error::MissingCredentials => ErrorKind::Validation,
            Error::InvalidCredentials | Error::InvalidOrExpiredToken => ErrorKind::Auth,
            Error::NotFound | Error::ListNotFound | Error::TagNotFound | Error::UserNotFound => {
                ErrorKind::NotFound
            }
            Error::DuplicateEmail | Error::DuplicateList | Error::DuplicateTag => ErrorKind::Conflict,
            Error::PasswordHash(_) | Error::Token(_) | Error::Database(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Maps a unique-constraint violation to `conflict`, passing every other error through.
pub(crate) fn on_unique_violation(err: sqlx::Error, conflict: Error) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => conflict,
        _ => Error::Database(err),
    }
}
