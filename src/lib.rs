// Library crate for the employee API server
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod db;
pub mod employee;
pub mod router;
pub mod shared;
pub mod user;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use auth::{AuthService, TokenConfig};
pub use config::AppConfig;
pub use employee::{repository::InMemoryEmployeeRepository, EmployeeService};
pub use router::build_router;
pub use shared::{AppError, AppState};
pub use user::InMemoryUserRepository;
