//! User, role and claim management over the `app_*` tables, plus password
//! hashing and access tokens.

pub mod claims;
pub mod password;
pub mod role_manager;
pub mod token;
pub mod user_manager;

pub use password::PasswordPolicy;
pub use role_manager::RoleManager;
pub use token::{TokenClaims, TokenService};
pub use user_manager::{NewUser, UserManager, UserProfile};

use sea_orm::DbErr;
use thiserror::Error;

use crate::repositories::RepositoryError;

/// Role whose members may use the administration endpoints.
pub const ADMIN_ROLE: &str = "Admin";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid user name or password")]
    InvalidCredentials,

    #[error("password does not meet requirements: {}", .0.join("; "))]
    WeakPassword(Vec<String>),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<DbErr> for IdentityError {
    fn from(err: DbErr) -> Self {
        Self::Repository(err.into())
    }
}

/// Case-insensitive lookup key for user names, emails and role names.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}
