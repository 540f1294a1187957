use sqlx::FromRow;

/// Database model for the users table
///
/// Deliberately not `Serialize`: the password hash never leaves the server.
/// Handlers expose users through `auth::types::UserResponse`.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct UserModel {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub hashed_password: String, // Argon2id PHC string
    pub disabled: bool,
}

impl UserModel {
    /// Creates a new, enabled user from an already-hashed password
    pub fn new(username: String, email: String, full_name: String, hashed_password: String) -> Self {
        Self {
            username,
            email,
            full_name,
            hashed_password,
            disabled: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}
