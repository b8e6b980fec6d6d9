//!
//! # Error Handling
//!
//! This module defines the `AppError` type used throughout the application.
//! Every component returns a recognized error kind from this taxonomy, and
//! the single `ResponseError` implementation below is the only place where
//! kinds are mapped to HTTP status codes, so client-visible behavior stays
//! consistent across handlers and middleware.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! and `bcrypt::BcryptError` feed foreign errors into the taxonomy so `?`
//! works at call sites. Token errors are mapped explicitly by the token
//! service, which needs to tell expiry apart from every other failure.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::models::Role;

/// Every error the application can surface to a client.
#[derive(Debug)]
pub enum AppError {
    /// Malformed input the client can correct (HTTP 400).
    Validation(String),
    /// No user record for the requested username or id (HTTP 404).
    UserNotFound,
    /// No task record for the requested id (HTTP 404).
    TaskNotFound,
    /// An identifier that does not parse as a persistence-layer key (HTTP 404).
    InvalidIdentifier,
    /// Authorization header absent or not `Bearer `-prefixed (HTTP 401).
    MissingOrMalformedToken,
    /// Token verified structurally but is past its expiry (HTTP 401).
    TokenExpired,
    /// Token failed signature, format, or other structural checks (HTTP 401).
    TokenInvalid,
    /// Password did not match the stored hash (HTTP 401).
    IncorrectCredential,
    /// Authenticated user's role is below the required role (HTTP 403).
    /// Carries the role the rejected route required.
    InsufficientPermissions(Role),
    /// Username already registered (HTTP 409).
    UsernameTaken,
    /// Anything unrecognized, including downstream store failures (HTTP 500).
    /// The detail is logged server-side and never sent to the client.
    Unexpected(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::UserNotFound => write!(f, "user not found"),
            AppError::TaskNotFound => write!(f, "task not found"),
            AppError::InvalidIdentifier => write!(f, "invalid identifier"),
            AppError::MissingOrMalformedToken => write!(f, "missing or malformed token"),
            AppError::TokenExpired => write!(f, "token has expired"),
            AppError::TokenInvalid => write!(f, "invalid token"),
            AppError::IncorrectCredential => write!(f, "incorrect username or password"),
            AppError::InsufficientPermissions(Role::Admin) => {
                write!(f, "insufficient permissions, admin access required")
            }
            AppError::InsufficientPermissions(Role::User) => {
                write!(f, "insufficient permissions")
            }
            AppError::UsernameTaken => write!(f, "username is already taken"),
            AppError::Unexpected(msg) => write!(f, "unexpected error: {}", msg),
        }
    }
}

/// The centralized kind -> status table.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::TaskNotFound | AppError::InvalidIdentifier => {
                StatusCode::NOT_FOUND
            }
            AppError::MissingOrMalformedToken
            | AppError::TokenExpired
            | AppError::TokenInvalid
            | AppError::IncorrectCredential => StatusCode::UNAUTHORIZED,
            AppError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Unexpected(detail) = self {
            log::error!("unexpected error: {}", detail);
            return HttpResponse::InternalServerError().json(json!({
                "error": "an internal server error occurred"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::Unexpected(error.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Hashing failures are catastrophic internal errors; mismatches are
/// reported by the hasher itself as `IncorrectCredential`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Unexpected(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let cases = [
            (AppError::Validation("bad".into()), 400),
            (AppError::UserNotFound, 404),
            (AppError::TaskNotFound, 404),
            (AppError::InvalidIdentifier, 404),
            (AppError::MissingOrMalformedToken, 401),
            (AppError::TokenExpired, 401),
            (AppError::TokenInvalid, 401),
            (AppError::IncorrectCredential, 401),
            (AppError::InsufficientPermissions(Role::User), 403),
            (AppError::InsufficientPermissions(Role::Admin), 403),
            (AppError::UsernameTaken, 409),
            (AppError::Unexpected("boom".into()), 500),
        ];

        for (error, expected) in cases {
            assert_eq!(error.error_response().status().as_u16(), expected);
        }
    }

    #[test]
    fn test_expired_and_invalid_are_distinguishable() {
        assert_ne!(
            AppError::TokenExpired.to_string(),
            AppError::TokenInvalid.to_string()
        );
    }

    #[test]
    fn test_admin_rejection_has_distinct_message() {
        let generic = AppError::InsufficientPermissions(Role::User).to_string();
        let admin = AppError::InsufficientPermissions(Role::Admin).to_string();
        assert_ne!(generic, admin);
        assert!(admin.contains("admin access required"));
    }

    #[test]
    fn test_unexpected_detail_not_leaked() {
        let error = AppError::Unexpected("connection refused at 10.0.0.3".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }
}
