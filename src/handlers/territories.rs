use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::territory::{TerritoryRequest, TerritoryResponse};
use crate::dto::employee::EmployeeResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new territory
#[utoipa::path(
    post,
    path = "/api/v1/territories",
    request_body = TerritoryRequest,
    responses(
        (status = 201, description = "Territory created successfully", body = ApiResponse<TerritoryResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Territory conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state, request))]
pub async fn create_territory(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<TerritoryRequest>>,
) -> ApiResult<TerritoryResponse> {
    debug!("Creating territory");

    let territory = state
        .repositories
        .territories
        .create(request.into_new_model())
        .await?;

    info!("Territory created successfully with ID: {}", territory.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(territory.into(), "Territory created successfully")),
    ))
}

/// Get all territories
#[utoipa::path(
    get,
    path = "/api/v1/territories",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all territories", body = ApiResponse<Vec<TerritoryResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state))]
pub async fn get_territories(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<TerritoryResponse>>> {
    trace!("Entering get_territories");

    let territories = state.repositories.territories.get_all(&query.options()).await?;

    info!("Retrieved {} territories", territories.len());
    let data = territories
        .into_iter()
        .map(|territory| territory.map(TerritoryResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Territories retrieved successfully"))))
}

/// Get a single territory by ID
#[utoipa::path(
    get,
    path = "/api/v1/territories/{id}",
    params(
        ("id" = i32, Path, description = "Territory ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Territory found", body = ApiResponse<TerritoryResponse>),
        (status = 404, description = "Territory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state))]
pub async fn get_territory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<TerritoryResponse>> {
    let territory = state
        .repositories
        .territories
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found territory {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(territory.map(TerritoryResponse::from), "Territory retrieved successfully")),
    ))
}

/// Replace a territory; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/territories/{id}",
    params(("id" = i32, Path, description = "Territory ID")),
    request_body = TerritoryRequest,
    responses(
        (status = 200, description = "Territory updated successfully", body = ApiResponse<TerritoryResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Territory not found", body = ErrorResponse),
        (status = 409, description = "Territory conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state, request))]
pub async fn update_territory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<TerritoryRequest>>,
) -> ApiResult<TerritoryResponse> {
    let territory = state
        .repositories
        .territories
        .update(request.into_model(id))
        .await?;

    info!("Territory {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(territory.into(), "Territory updated successfully")),
    ))
}

/// Delete a territory
#[utoipa::path(
    delete,
    path = "/api/v1/territories/{id}",
    params(("id" = i32, Path, description = "Territory ID")),
    responses(
        (status = 204, description = "Territory deleted successfully"),
        (status = 404, description = "Territory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state))]
pub async fn delete_territory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.territories.delete_by_id(id).await?;

    info!("Territory {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a territory; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/territories/{id}/archive",
    params(("id" = i32, Path, description = "Territory ID")),
    responses(
        (status = 204, description = "Territory archived successfully"),
        (status = 404, description = "Territory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state))]
pub async fn archive_territory(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.territories.soft_delete_by_id(id).await?;

    info!("Territory {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the employees assigned to a territory
#[utoipa::path(
    get,
    path = "/api/v1/territories/{id}/employees",
    params(("id" = i32, Path, description = "Territory ID")),
    responses(
        (status = 200, description = "Employees covering the territory", body = ApiResponse<Vec<EmployeeResponse>>),
        (status = 404, description = "Territory not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "territories"
)]
#[instrument(skip(state))]
pub async fn get_territory_employees(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<EmployeeResponse>> {
    let employees = state.repositories.territories.employees_of(id).await?;

    debug!("Territory {} has {} employees", id, employees.len());
    let data = employees.into_iter().map(EmployeeResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Employees retrieved successfully"))))
}
