//! Bearer-token authentication for the account and administration routes.
//!
//! `require_auth` validates the `Authorization: Bearer <token>` header and
//! stores an [`AuthUser`] in the request extensions; handlers pick it up
//! with `Extension<AuthUser>`. `require_admin` must run after it; it reloads
//! the caller's roles and claims from the database, so a demoted or deleted
//! admin loses access before their token expires.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::handlers::error::ApiError;
use crate::identity::{TokenClaims, ADMIN_ROLE};
use crate::repositories::RepositoryError;
use crate::schemas::AppState;

/// The caller, as described by a validated access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub user_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub claims: Vec<String>,
}

impl TryFrom<TokenClaims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        let user_id = claims
            .user_id()
            .ok_or_else(|| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(Self {
            user_id,
            user_name: claims.user_name,
            email: claims.email,
            roles: claims.roles,
            claims: claims.claims,
        })
    }
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held.eq_ignore_ascii_case(role))
    }

    pub fn has_claim(&self, claim_type: &str) -> bool {
        self.claims.iter().any(|held| held == claim_type)
    }

    /// Fails with 403 unless the caller holds `claim_type`.
    pub fn require_claim(&self, claim_type: &str) -> Result<(), ApiError> {
        if self.has_claim(claim_type) {
            Ok(())
        } else {
            warn!(user_id = self.user_id, claim_type, "Missing claim");
            Err(ApiError::Forbidden(format!("The '{claim_type}' claim is required")))
        }
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        )
    })?;

    let user = AuthUser::try_from(state.tokens.validate(token)?)?;
    debug!(user_id = user.user_id, "Request authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let user = refresh(&state, user).await?;
    if !user.has_role(ADMIN_ROLE) {
        warn!(user_id = user.user_id, "Administration denied");
        return Err(ApiError::Forbidden(format!(
            "The '{ADMIN_ROLE}' role is required"
        )));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Replaces the roles and claims carried by the token with the stored ones.
async fn refresh(state: &AppState, user: AuthUser) -> Result<AuthUser, ApiError> {
    let roles = match state.users.role_names_of(user.user_id).await {
        Ok(roles) => roles,
        Err(RepositoryError::NotFound { .. }) => {
            warn!(user_id = user.user_id, "Token for a deleted user");
            return Err(ApiError::Unauthorized("User no longer exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let claims = state.users.granted_claims_of(user.user_id).await?;
    Ok(AuthUser { roles, claims, ..user })
}
