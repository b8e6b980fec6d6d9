use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Role, User};

/// Issued tokens expire this long after issuance.
const TOKEN_TTL_HOURS: i64 = 24;

/// The identity fields embedded in a signed token.
///
/// Claims are derived from a `User` at issuance and trusted as-is for the
/// lifetime of the request that presents them, even if the underlying user
/// record changes afterwards. There is no revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's directory id.
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Not valid before, seconds since epoch.
    pub nbf: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies signed, time-bounded identity tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, AppError>;
    fn verify(&self, token: &str) -> Result<Claims, AppError>;
}

/// HS256 JWT implementation. The signing key is handed in exactly once at
/// construction; nothing here reads ambient process state.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry and not-before are enforced to the second.
        validation.leeway = 0;
        validation.validate_nbf = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenService for JwtTokenService {
    /// Signs a fresh token for the user. A signing failure is internal and
    /// fatal, never something a client can correct.
    fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Unexpected(format!("failed to sign token: {}", e)))
    }

    /// Checks signature, expiry, and not-before. Expiry is reported as its
    /// own kind; every other failure collapses into `TokenInvalid`.
    fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid,
            })
    }
}
