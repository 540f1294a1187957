// Public API - what other modules can use
pub use handlers::{login, me, register};
pub use middleware::jwt_auth;
pub use service::AuthService;
pub use token::TokenConfig;
pub use types::{AccessClaims, TokenResponse, UserResponse};

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod service;
mod token;
pub mod types;
