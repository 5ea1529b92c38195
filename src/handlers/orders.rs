use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::order::{
    CreateOrderRequest, OrderLineRequest, OrderLineResponse, OrderRequest, OrderResponse,
    OrderWithLinesResponse,
};
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Get all orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all orders", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn get_orders(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<OrderResponse>>> {
    trace!("Entering get_orders");

    let orders = state.repositories.orders.get_all(&query.options()).await?;

    info!("Retrieved {} orders", orders.len());
    let data = orders
        .into_iter()
        .map(|order| order.map(OrderResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Orders retrieved successfully"))))
}

/// Get a single order by ID
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<OrderResponse>> {
    let order = state
        .repositories
        .orders
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found order {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(order.map(OrderResponse::from), "Order retrieved successfully")),
    ))
}

/// Replace a order; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Order conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state, request))]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<OrderRequest>>,
) -> ApiResult<OrderResponse> {
    let order = state
        .repositories
        .orders
        .update(request.into_model(id))
        .await?;

    info!("Order {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(order.into(), "Order updated successfully")),
    ))
}

/// Delete a order and its line items
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted successfully"),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.orders.delete_by_id(id).await?;

    info!("Order {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a order; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}/archive",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order archived successfully"),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn archive_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.orders.soft_delete_by_id(id).await?;

    info!("Order {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Create an order together with its line items
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<OrderWithLinesResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Unknown product or duplicate line", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state, request), fields(lines = request.details.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateOrderRequest>>,
) -> ApiResult<OrderWithLinesResponse> {
    debug!("Creating order with {} lines", request.details.len());

    let lines = request
        .details
        .into_iter()
        .map(OrderLineRequest::into_new_model)
        .collect();
    let (order, details) = state
        .repositories
        .orders
        .create_with_details(request.order.into_new_model(), lines)
        .await?;

    info!("Order created successfully with ID: {}", order.id);
    let data = OrderWithLinesResponse {
        order: order.into(),
        details: details.into_iter().map(OrderLineResponse::from).collect(),
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(data, "Order created successfully")),
    ))
}

/// Get the line items of an order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/details",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Line items of the order", body = ApiResponse<Vec<OrderLineResponse>>),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn get_order_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<OrderLineResponse>> {
    let details = state.repositories.orders.details_of(id).await?;

    debug!("Order {} has {} lines", id, details.len());
    let data = details.into_iter().map(OrderLineResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Order lines retrieved successfully"))))
}

/// Add a line item to an order
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/details",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = OrderLineRequest,
    responses(
        (status = 201, description = "Line added", body = ApiResponse<OrderLineResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Product already on the order", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state, request))]
pub async fn add_order_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<OrderLineRequest>>,
) -> ApiResult<OrderLineResponse> {
    let detail = state
        .repositories
        .orders
        .add_detail(id, request.into_new_model())
        .await?;

    info!("Product {} added to order {}", detail.product_id, id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(detail.into(), "Order line added successfully")),
    ))
}

/// Remove a line item from an order
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}/details/{product_id}",
    params(
        ("id" = i32, Path, description = "Order ID"),
        ("product_id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Line removed"),
        (status = 404, description = "No such line", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn remove_order_detail(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state.repositories.orders.remove_detail(id, product_id).await?;

    info!("Product {} removed from order {}", product_id, id);
    Ok(StatusCode::NO_CONTENT)
}
