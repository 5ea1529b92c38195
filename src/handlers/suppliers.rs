use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::supplier::{SupplierRequest, SupplierResponse};
use crate::dto::product::ProductResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new supplier
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Supplier created successfully", body = ApiResponse<SupplierResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Supplier conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state, request))]
pub async fn create_supplier(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SupplierRequest>>,
) -> ApiResult<SupplierResponse> {
    debug!("Creating supplier");

    let supplier = state
        .repositories
        .suppliers
        .create(request.into_new_model())
        .await?;

    info!("Supplier created successfully with ID: {}", supplier.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(supplier.into(), "Supplier created successfully")),
    ))
}

/// Get all suppliers
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all suppliers", body = ApiResponse<Vec<SupplierResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state))]
pub async fn get_suppliers(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<SupplierResponse>>> {
    trace!("Entering get_suppliers");

    let suppliers = state.repositories.suppliers.get_all(&query.options()).await?;

    info!("Retrieved {} suppliers", suppliers.len());
    let data = suppliers
        .into_iter()
        .map(|supplier| supplier.map(SupplierResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Suppliers retrieved successfully"))))
}

/// Get a single supplier by ID
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}",
    params(
        ("id" = i32, Path, description = "Supplier ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Supplier found", body = ApiResponse<SupplierResponse>),
        (status = 404, description = "Supplier not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state))]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<SupplierResponse>> {
    let supplier = state
        .repositories
        .suppliers
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found supplier {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(supplier.map(SupplierResponse::from), "Supplier retrieved successfully")),
    ))
}

/// Replace a supplier; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    request_body = SupplierRequest,
    responses(
        (status = 200, description = "Supplier updated successfully", body = ApiResponse<SupplierResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Supplier not found", body = ErrorResponse),
        (status = 409, description = "Supplier conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state, request))]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<SupplierRequest>>,
) -> ApiResult<SupplierResponse> {
    let supplier = state
        .repositories
        .suppliers
        .update(request.into_model(id))
        .await?;

    info!("Supplier {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(supplier.into(), "Supplier updated successfully")),
    ))
}

/// Delete a supplier and its products
#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 204, description = "Supplier deleted successfully"),
        (status = 404, description = "Supplier not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state))]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.suppliers.delete_by_id(id).await?;

    info!("Supplier {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a supplier; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}/archive",
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 204, description = "Supplier archived successfully"),
        (status = 404, description = "Supplier not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state))]
pub async fn archive_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.suppliers.soft_delete_by_id(id).await?;

    info!("Supplier {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the products of a supplier
#[utoipa::path(
    get,
    path = "/api/v1/suppliers/{id}/products",
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Products of the supplier", body = ApiResponse<Vec<ProductResponse>>),
        (status = 404, description = "Supplier not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "suppliers"
)]
#[instrument(skip(state))]
pub async fn get_supplier_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<ProductResponse>> {
    let products = state.repositories.suppliers.products_of(id).await?;

    debug!("Supplier {} has {} products", id, products.len());
    let data = products.into_iter().map(ProductResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Products retrieved successfully"))))
}
