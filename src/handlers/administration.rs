//! Role and user administration. Every route here sits behind
//! `require_auth` and `require_admin`; role mutations additionally need the
//! matching catalog claim.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument};

use super::error::{ApiError, ApiResult};
use crate::dto::account::{UpdateUserRequest, UserResponse};
use crate::dto::admin::{RoleRequest, RoleResponse};
use crate::identity::claims;
use crate::middleware::AuthUser;
use crate::repositories::{UserClaimFlag, UserRoleFlag};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a role
#[utoipa::path(
    post,
    path = "/api/v1/admin/roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<RoleResponse>),
        (status = 400, description = "Invalid role name", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role or 'Create Role' claim missing", body = ErrorResponse),
        (status = 409, description = "Role name already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, caller, request), fields(caller = caller.user_id))]
pub async fn create_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Valid(Json(request)): Valid<Json<RoleRequest>>,
) -> ApiResult<RoleResponse> {
    caller.require_claim(claims::CREATE_ROLE)?;

    let role = state.repositories.authorization.add_role(&request.name).await?;

    info!("Role '{}' created with ID: {}", role.name, role.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(role.into(), "Role created successfully")),
    ))
}

/// Get all roles
#[utoipa::path(
    get,
    path = "/api/v1/admin/roles",
    responses(
        (status = 200, description = "All roles", body = ApiResponse<Vec<RoleResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_roles(State(state): State<AppState>) -> ApiResult<Vec<RoleResponse>> {
    let roles = state.repositories.authorization.get_roles().await?;

    debug!("Retrieved {} roles", roles.len());
    let data = roles.into_iter().map(RoleResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Roles retrieved successfully"))))
}

/// Get a role by ID
#[utoipa::path(
    get,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = ApiResponse<RoleResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_role(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<RoleResponse> {
    let role = state.repositories.authorization.get_role(id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(role.into(), "Role retrieved successfully")),
    ))
}

/// Rename a role
#[utoipa::path(
    put,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role renamed", body = ApiResponse<RoleResponse>),
        (status = 400, description = "Invalid role name", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role or 'Edit Role' claim missing", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 409, description = "Role name already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, caller, request), fields(caller = caller.user_id))]
pub async fn update_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<RoleRequest>>,
) -> ApiResult<RoleResponse> {
    caller.require_claim(claims::EDIT_ROLE)?;

    let role = state
        .repositories
        .authorization
        .update_role(id, &request.name)
        .await?;

    info!("Role {} renamed to '{}'", id, role.name);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(role.into(), "Role updated successfully")),
    ))
}

/// Delete a role and its memberships
#[utoipa::path(
    delete,
    path = "/api/v1/admin/roles/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role or 'Delete Role' claim missing", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, caller), fields(caller = caller.user_id))]
pub async fn delete_role(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    caller.require_claim(claims::DELETE_ROLE)?;

    state.repositories.authorization.delete_role(id).await?;

    info!("Role {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the members of a role
#[utoipa::path(
    get,
    path = "/api/v1/admin/roles/{id}/users",
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Members of the role", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_role_users(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<UserResponse>> {
    let users = state.repositories.authorization.users_in_role(id).await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Users retrieved successfully"))))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    let users = state.users.list().await?;

    debug!("Retrieved {} users", users.len());
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Users retrieved successfully"))))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<UserResponse> {
    let user = state.users.find_by_id(id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(user.into(), "User retrieved successfully")),
    ))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateUserRequest>>,
) -> ApiResult<UserResponse> {
    let user = state.users.update_profile(id, request.into()).await?;

    info!("User {} updated", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(user.into(), "User updated successfully")),
    ))
}

/// Delete a user with their memberships and claims
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Callers cannot delete themselves", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, caller), fields(caller = caller.user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if caller.user_id == id {
        return Err(ApiError::Validation(
            "You cannot delete your own account here".to_string(),
        ));
    }

    state.users.delete(id).await?;

    info!("User {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get every role, flagged with the user's membership
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}/roles",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "One flag per role", body = ApiResponse<Vec<UserRoleFlag>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_user_roles(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<UserRoleFlag>> {
    let flags = state.repositories.authorization.get_roles_by_user(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(flags, "User roles retrieved successfully"))))
}

/// Set the user's role memberships from flags
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/roles",
    params(("id" = i32, Path, description = "User ID")),
    request_body = Vec<UserRoleFlag>,
    responses(
        (status = 200, description = "Memberships after the update", body = ApiResponse<Vec<UserRoleFlag>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User or role not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, flags))]
pub async fn update_user_roles(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(flags): Json<Vec<UserRoleFlag>>,
) -> ApiResult<Vec<UserRoleFlag>> {
    let flags = state
        .repositories
        .authorization
        .update_user_roles(id, &flags)
        .await?;

    info!("Roles of user {} updated", id);
    Ok((StatusCode::OK, Json(ApiResponse::ok(flags, "User roles updated successfully"))))
}

/// Get every catalog claim, flagged with whether the user holds it
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}/claims",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "One flag per catalog claim", body = ApiResponse<Vec<UserClaimFlag>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state))]
pub async fn get_user_claims(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<UserClaimFlag>> {
    let flags = state.repositories.authorization.get_claims_by_user(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(flags, "User claims retrieved successfully"))))
}

/// Replace the user's catalog claims from flags
#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}/claims",
    params(("id" = i32, Path, description = "User ID")),
    request_body = Vec<UserClaimFlag>,
    responses(
        (status = 200, description = "Claims after the update", body = ApiResponse<Vec<UserClaimFlag>>),
        (status = 400, description = "Claim outside the catalog", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role missing", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "administration"
)]
#[instrument(skip(state, flags))]
pub async fn update_user_claims(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(flags): Json<Vec<UserClaimFlag>>,
) -> ApiResult<Vec<UserClaimFlag>> {
    let flags = state
        .repositories
        .authorization
        .update_user_claims(id, &flags)
        .await?;

    info!("Claims of user {} updated", id);
    Ok((StatusCode::OK, Json(ApiResponse::ok(flags, "User claims updated successfully"))))
}
