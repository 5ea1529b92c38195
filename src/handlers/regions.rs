use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::region::{RegionRequest, RegionResponse};
use crate::dto::territory::TerritoryResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new region
#[utoipa::path(
    post,
    path = "/api/v1/regions",
    request_body = RegionRequest,
    responses(
        (status = 201, description = "Region created successfully", body = ApiResponse<RegionResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Region conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state, request))]
pub async fn create_region(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegionRequest>>,
) -> ApiResult<RegionResponse> {
    debug!("Creating region");

    let region = state
        .repositories
        .regions
        .create(request.into_new_model())
        .await?;

    info!("Region created successfully with ID: {}", region.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(region.into(), "Region created successfully")),
    ))
}

/// Get all regions
#[utoipa::path(
    get,
    path = "/api/v1/regions",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all regions", body = ApiResponse<Vec<RegionResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state))]
pub async fn get_regions(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<RegionResponse>>> {
    trace!("Entering get_regions");

    let regions = state.repositories.regions.get_all(&query.options()).await?;

    info!("Retrieved {} regions", regions.len());
    let data = regions
        .into_iter()
        .map(|region| region.map(RegionResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Regions retrieved successfully"))))
}

/// Get a single region by ID
#[utoipa::path(
    get,
    path = "/api/v1/regions/{id}",
    params(
        ("id" = i32, Path, description = "Region ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Region found", body = ApiResponse<RegionResponse>),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state))]
pub async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<RegionResponse>> {
    let region = state
        .repositories
        .regions
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found region {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(region.map(RegionResponse::from), "Region retrieved successfully")),
    ))
}

/// Replace a region; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/regions/{id}",
    params(("id" = i32, Path, description = "Region ID")),
    request_body = RegionRequest,
    responses(
        (status = 200, description = "Region updated successfully", body = ApiResponse<RegionResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 409, description = "Region conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state, request))]
pub async fn update_region(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<RegionRequest>>,
) -> ApiResult<RegionResponse> {
    let region = state
        .repositories
        .regions
        .update(request.into_model(id))
        .await?;

    info!("Region {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(region.into(), "Region updated successfully")),
    ))
}

/// Delete a region and its territories
#[utoipa::path(
    delete,
    path = "/api/v1/regions/{id}",
    params(("id" = i32, Path, description = "Region ID")),
    responses(
        (status = 204, description = "Region deleted successfully"),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state))]
pub async fn delete_region(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.regions.delete_by_id(id).await?;

    info!("Region {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a region; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/regions/{id}/archive",
    params(("id" = i32, Path, description = "Region ID")),
    responses(
        (status = 204, description = "Region archived successfully"),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state))]
pub async fn archive_region(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.regions.soft_delete_by_id(id).await?;

    info!("Region {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the territories of a region
#[utoipa::path(
    get,
    path = "/api/v1/regions/{id}/territories",
    params(("id" = i32, Path, description = "Region ID")),
    responses(
        (status = 200, description = "Territories of the region", body = ApiResponse<Vec<TerritoryResponse>>),
        (status = 404, description = "Region not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "regions"
)]
#[instrument(skip(state))]
pub async fn get_region_territories(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<TerritoryResponse>> {
    let territories = state.repositories.regions.territories_of(id).await?;

    debug!("Region {} has {} territories", id, territories.len());
    let data = territories.into_iter().map(TerritoryResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Territories retrieved successfully"))))
}
