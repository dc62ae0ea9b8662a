pub mod list;
pub mod repository;
pub mod tag;
pub mod todo;
pub mod user;
pub mod validation;
