//! Request-level validation.
//!
//! All input checks live here and run before a request reaches a service or a
//! store. The database schema repeats the important constraints, but only as a
//! backstop.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::NaiveDate;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tracing::warn;

use crate::shared::AppError;

pub const JOINING_DATE_FORMAT: &str = "%Y-%m-%d";

/// Implemented by every request body that needs checks beyond deserialization
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

/// Accepts `YYYY-MM-DD` strings that are also real calendar dates
pub fn validate_joining_date(value: &str) -> Result<(), AppError> {
    if !date_pattern().is_match(value)
        || NaiveDate::parse_from_str(value, JOINING_DATE_FORMAT).is_err()
    {
        return Err(AppError::BadRequest(
            "joining_date must be YYYY-MM-DD".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), AppError> {
    if !email_pattern().is_match(value) {
        return Err(AppError::BadRequest("email is not a valid address".to_string()));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// JSON extractor that runs `Validate` after deserializing
///
/// Malformed or mistyped bodies become `AppError::BadRequest` instead of axum's
/// default rejection, so every input error has the same shape.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "Rejected request body");
                AppError::BadRequest(rejection.body_text())
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}
