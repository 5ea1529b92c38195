use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::shipper::{ShipperRequest, ShipperResponse};
use crate::dto::order::OrderResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new shipper
#[utoipa::path(
    post,
    path = "/api/v1/shippers",
    request_body = ShipperRequest,
    responses(
        (status = 201, description = "Shipper created successfully", body = ApiResponse<ShipperResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Shipper conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "shippers"
)]
#[instrument(skip(state, request))]
pub async fn create_shipper(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ShipperRequest>>,
) -> ApiResult<ShipperResponse> {
    debug!("Creating shipper");

    let shipper = state
        .repositories
        .shippers
        .create(request.into_new_model())
        .await?;

    info!("Shipper created successfully with ID: {}", shipper.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(shipper.into(), "Shipper created successfully")),
    ))
}

/// Get all shippers
#[utoipa::path(
    get,
    path = "/api/v1/shippers",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all shippers", body = ApiResponse<Vec<ShipperResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "shippers"
)]
#[instrument(skip(state))]
pub async fn get_shippers(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<ShipperResponse>>> {
    trace!("Entering get_shippers");

    let shippers = state.repositories.shippers.get_all(&query.options()).await?;

    info!("Retrieved {} shippers", shippers.len());
    let data = shippers
        .into_iter()
        .map(|shipper| shipper.map(ShipperResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Shippers retrieved successfully"))))
}

/// Get a single shipper by ID
#[utoipa::path(
    get,
    path = "/api/v1/shippers/{id}",
    params(
        ("id" = i32, Path, description = "Shipper ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Shipper found", body = ApiResponse<ShipperResponse>),
        (status = 404, description = "Shipper not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "shippers"
)]
#[instrument(skip(state))]
pub async fn get_shipper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<ShipperResponse>> {
    let shipper = state
        .repositories
        .shippers
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found shipper {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(shipper.map(ShipperResponse::from), "Shipper retrieved successfully")),
    ))
}

/// Replace a shipper; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/shippers/{id}",
    params(("id" = i32, Path, description = "Shipper ID")),
    request_body = ShipperRequest,
    responses(
        (status = 200, description = "Shipper updated successfully", body = ApiResponse<ShipperResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Shipper not found", body = ErrorResponse),
        (status = 409, description = "Shipper conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "shippers"
)]
#[instrument(skip(state, request))]
pub async fn update_shipper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<ShipperRequest>>,
) -> ApiResult<ShipperResponse> {
    let shipper = state
        .repositories
        .shippers
        .update(request.into_model(id))
        .await?;

    info!("Shipper {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(shipper.into(), "Shipper updated successfully")),
    ))
}

/// Delete a shipper and its orders
#[utoipa::path(
    delete,
    path = "/api/v1/shippers/{id}",
    params(("id" = i32, Path, description = "Shipper ID")),
    responses(
        (status = 204, description = "Shipper deleted successfully"),
        (status = 404, description = "Shipper not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "shippers"
)]
#[instrument(skip(state))]
pub async fn delete_shipper(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.shippers.delete_by_id(id).await?;

    info!("Shipper {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the orders carried by a shipper
#[utoipa::path(
    get,
    path = "/api/v1/shippers/{id}/orders",
    params(("id" = i32, Path, description = "Shipper ID")),
    responses(
        (status = 200, description = "Orders carried by the shipper", body = ApiResponse<Vec<OrderResponse>>),
        (status = 404, description = "Shipper not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "shippers"
)]
#[instrument(skip(state))]
pub async fn get_shipper_orders(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<OrderResponse>> {
    let orders = state.repositories.shippers.orders_of(id).await?;

    debug!("Shipper {} carries {} orders", id, orders.len());
    let data = orders.into_iter().map(OrderResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Orders retrieved successfully"))))
}
