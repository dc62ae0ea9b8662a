pub mod jwt;
pub mod password;
pub mod schema;
pub mod sqlite_repo;
