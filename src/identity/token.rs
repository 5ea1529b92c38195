use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::app_user;
use serde::{Deserialize, Serialize};

use super::IdentityError;

/// Payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub sub: String,
    pub user_name: String,
    pub email: String,
    pub roles: Vec<String>,
    /// Granted catalog claim types.
    pub claims: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Issues and validates HS256 access tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_hours: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    pub fn ttl_hours(&self) -> i64 {
        self.ttl_hours
    }

    pub fn issue(
        &self,
        user: &app_user::Model,
        roles: Vec<String>,
        claims: Vec<String>,
    ) -> Result<String, IdentityError> {
        let now = Utc::now();
        let payload = TokenClaims {
            sub: user.id.to_string(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            roles,
            claims,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.ttl_hours)).timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    /// Checks signature and expiry.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, IdentityError> {
        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}
