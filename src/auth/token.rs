use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::AccessClaims;
use crate::shared::AppError;

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Configuration for JWT token operations
///
/// The TTL is fixed for the life of the process; it comes from `AppConfig`.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_minutes: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes,
        }
    }

    /// Creates an access token for `username` using the configured TTL
    pub fn create_token(&self, username: &str) -> Result<String, AppError> {
        self.create_token_with_ttl(username, Duration::minutes(self.expiration_minutes))
    }

    /// Creates an access token that expires `ttl` from now
    #[instrument(skip(self, username))]
    pub fn create_token_with_ttl(&self, username: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + ttl).timestamp().max(0) as usize;

        debug!(
            ttl_seconds = ttl.num_seconds(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = AccessClaims {
            sub: username.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid
    ///
    /// Expired, malformed and wrongly-signed tokens are indistinguishable to the caller.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| {
            debug!(
                username = %data.claims.sub,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })
    }
}
