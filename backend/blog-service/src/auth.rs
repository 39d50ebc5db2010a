//! Bearer token verification
//!
//! Tokens are HS256 JWTs minted by the identity provider that shares
//! `JWT_SECRET` with this service. The secret is installed once at startup
//! with [`initialize_jwt_secret`] and is immutable afterwards.
//!
//! ```no_run
//! use blog_service::auth;
//!
//! auth::initialize_jwt_secret("shared-secret").expect("JWT secret already set");
//! let token = auth::generate_token(42, "leo", 3600).unwrap();
//! let claims = auth::validate_token(&token).unwrap();
//! assert_eq!(claims.user_id().unwrap(), 42);
//! ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims this service reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's numeric ID as a string
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))
    }
}

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

static JWT_KEYS: OnceCell<JwtKeys> = OnceCell::new();

/// Install the shared secret. Can only be called once.
pub fn initialize_jwt_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(AppError::Internal("JWT secret must not be empty".to_string()));
    }

    JWT_KEYS
        .set(JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
        .map_err(|_| AppError::Internal("JWT secret already initialized".to_string()))
}

fn keys() -> Result<&'static JwtKeys> {
    JWT_KEYS
        .get()
        .ok_or_else(|| AppError::Internal("JWT secret not initialized".to_string()))
}

/// Mint a token for `user_id` valid for `ttl_secs` seconds
pub fn generate_token(user_id: i64, username: &str, ttl_secs: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, &keys()?.encoding)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))
}

/// Verify signature and expiry, returning the claims
pub fn validate_token(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &keys()?.decoding, &validation)?;
    Ok(data.claims)
}
