use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::identity::IdentityError;
use crate::repositories::RepositoryError;
use crate::schemas::{ApiResponse, ErrorResponse};

/// Handler result: a status plus the response envelope.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "DATABASE_ERROR",
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Validation(message) => Self::Validation(message),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            RepositoryError::Database(e) => {
                error!("Database error: {}", e);
                Self::Internal("Database operation failed".to_string())
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            IdentityError::WeakPassword(_) => Self::Validation(err.to_string()),
            IdentityError::Token(e) => {
                warn!("Rejected access token: {}", e);
                Self::Unauthorized("Invalid or expired token".to_string())
            }
            IdentityError::Hashing(e) => {
                error!("Password hashing failed: {}", e);
                Self::Internal("Password processing failed".to_string())
            }
            IdentityError::Repository(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            code: self.code().to_string(),
            error: self.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        let cases = [
            (RepositoryError::not_found("Category", 1), StatusCode::NOT_FOUND),
            (RepositoryError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (RepositoryError::Conflict("taken".into()), StatusCode::CONFLICT),
            (
                RepositoryError::Database(sea_orm::DbErr::Custom("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_identity_error_mapping() {
        assert_eq!(
            ApiError::from(IdentityError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(IdentityError::WeakPassword(vec!["too short".into()])).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(IdentityError::Repository(RepositoryError::Conflict("taken".into()))).code(),
            "CONFLICT"
        );
    }

    #[test]
    fn test_database_detail_is_not_exposed() {
        let err = ApiError::from(RepositoryError::Database(sea_orm::DbErr::Custom(
            "password=hunter2".into(),
        )));
        assert!(!err.to_string().contains("hunter2"));
    }
}
