use chrono::{DateTime, Utc};
use model::entities::app_user;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::identity::{NewUser, UserProfile};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "User name must be between 3 and 64 characters"))]
    #[schema(example = "nancy")]
    pub user_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "nancy@northwind.com", format = "email")]
    pub email: String,
    /// Checked against the password policy
    #[validate(length(min = 1, max = 128))]
    #[schema(example = "Pa$$w0rd", format = "password")]
    pub password: String,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        Self {
            user_name: request.user_name,
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// User name or email
    #[validate(length(min = 1))]
    #[schema(example = "nancy")]
    pub login: String,
    #[validate(length(min = 1))]
    #[schema(format = "password")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

impl From<UpdateUserRequest> for UserProfile {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

/// A user without credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<app_user::Model> for UserResponse {
    fn from(model: app_user::Model) -> Self {
        Self {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            created_at: model.created_at,
        }
    }
}

/// The caller's account with roles and granted claims.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub user: UserResponse,
    pub roles: Vec<String>,
    pub claims: Vec<String>,
}
