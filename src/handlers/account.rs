use axum::{extract::State, http::StatusCode, response::Json, Extension};
use axum_valid::Valid;
use tracing::{debug, info, instrument};

use super::error::{ApiError, ApiResult};
use crate::dto::account::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserResponse,
};
use crate::middleware::AuthUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/account/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid data or weak password", body = ErrorResponse),
        (status = 409, description = "User name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "account"
)]
#[instrument(skip(state, request), fields(user_name = %request.user_name))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> ApiResult<UserResponse> {
    let user = state.users.create(request.into()).await?;

    info!("Account registered with ID: {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(user.into(), "Account registered successfully")),
    ))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/api/v1/account/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Invalid user name or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "account"
)]
#[instrument(skip(state, request), fields(login = %request.login))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> ApiResult<LoginResponse> {
    let user = state
        .users
        .authenticate(&request.login, &request.password)
        .await?;

    let roles = state.users.role_names_of(user.id).await?;
    let claims = state.users.granted_claims_of(user.id).await?;
    debug!("Issuing token with {} roles and {} claims", roles.len(), claims.len());
    let access_token = state.tokens.issue(&user, roles, claims)?;

    info!("User {} signed in", user.id);
    let data = LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl_hours() * 3600,
        user: user.into(),
    };
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Signed in successfully"))))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/v1/account/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "New password does not meet requirements", body = ErrorResponse),
        (status = 401, description = "Missing token or wrong current password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "account"
)]
#[instrument(skip(state, user, request), fields(user_id = user.user_id))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Valid(Json(request)): Valid<Json<ChangePasswordRequest>>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .change_password(user.user_id, &request.current_password, &request.new_password)
        .await?;

    info!("Password changed for user {}", user.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the caller's account with current roles and claims
#[utoipa::path(
    get,
    path = "/api/v1/account/me",
    responses(
        (status = 200, description = "The signed-in account", body = ApiResponse<MeResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "account"
)]
#[instrument(skip(state, user), fields(user_id = user.user_id))]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<MeResponse> {
    let account = state.users.find_by_id(user.user_id).await?;
    let roles = state.users.role_names_of(account.id).await?;
    let claims = state.users.granted_claims_of(account.id).await?;

    let data = MeResponse {
        user: account.into(),
        roles,
        claims,
    };
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Account retrieved successfully"))))
}
