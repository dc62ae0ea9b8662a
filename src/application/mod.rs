pub mod auth_service;
pub mod todo_service;

#[cfg(test)]
mod auth_service_tests;
#[cfg(test)]
mod todo_service_tests;
