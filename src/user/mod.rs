// Credential store: user accounts used for authentication
pub use models::UserModel;
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

pub mod models;
pub mod repository;
