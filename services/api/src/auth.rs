//! Admin authentication
//!
//! The admin password is checked against a configured argon2 hash and a
//! successful login is answered with an HS256 session token.

use std::time::{SystemTime, UNIX_EPOCH};

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::AdminConfig;
use crate::error::{ApiError, ApiResult};

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// A freshly issued session token
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Credential check and session tokens for the admin dashboard
#[derive(Clone)]
pub struct AdminAuth {
    username: String,
    password_hash: Option<String>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_seconds: u64,
}

impl AdminAuth {
    pub fn new(config: &AdminConfig) -> Self {
        let secret = match &config.token_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                warn!("No admin token secret configured; sessions will not survive a restart");
                let mut secret = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut secret);
                secret
            }
        };

        if config.password_hash.is_none() {
            warn!("No admin password hash configured; admin login is disabled");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
            token_ttl_seconds: config.token_ttl_seconds,
        }
    }

    /// Whether `username` names the configured admin
    pub fn is_admin(&self, username: &str) -> bool {
        username == self.username
    }

    /// Whether the username and password match the configured admin
    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        let Some(hash) = &self.password_hash else {
            return false;
        };

        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Failed to parse admin password hash: {}", e);
                return false;
            }
        };

        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        password_ok && self.is_admin(username)
    }

    pub fn issue_token(&self) -> ApiResult<SessionToken> {
        let now = unix_now()?;
        let claims = Claims {
            sub: self.username.clone(),
            iat: now,
            exp: now + self.token_ttl_seconds,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("Failed to generate session token: {}", e);
                ApiError::InternalServerError
            })?;

        Ok(SessionToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.token_ttl_seconds,
        })
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> ApiResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                warn!("Rejected session token: {}", e);
                ApiError::Unauthorized
            })?;

        if token_data.claims.sub != self.username {
            return Err(ApiError::Unauthorized);
        }

        Ok(token_data.claims)
    }
}

/// Hash a password into the PHC string expected in `admin.password_hash`
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn unix_now() -> ApiResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| {
            error!("Failed to get current time: {}", e);
            ApiError::InternalServerError
        })
}
