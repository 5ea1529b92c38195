use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::product::{ProductListQuery, ProductRequest, ProductResponse};
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Product conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state, request))]
pub async fn create_product(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ProductRequest>>,
) -> ApiResult<ProductResponse> {
    debug!("Creating product");

    let product = state
        .repositories
        .products
        .create(request.into_new_model())
        .await?;

    info!("Product created successfully with ID: {}", product.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(product.into(), "Product created successfully")),
    ))
}

/// Get a single product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<ProductResponse>> {
    let product = state
        .repositories
        .products
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found product {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(product.map(ProductResponse::from), "Product retrieved successfully")),
    ))
}

/// Replace a product; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Product conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state, request))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<ProductRequest>>,
) -> ApiResult<ProductResponse> {
    let product = state
        .repositories
        .products
        .update(request.into_model(id))
        .await?;

    info!("Product {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(product.into(), "Product updated successfully")),
    ))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.products.delete_by_id(id).await?;

    info!("Product {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a product; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}/archive",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product archived successfully"),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state))]
pub async fn archive_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.products.soft_delete_by_id(id).await?;

    info!("Product {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get all products, optionally filtered by category, supplier or status
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Vec<Expanded<ProductResponse>>> {
    trace!("Entering get_products");

    let products = state.repositories.products.get_all(&query.options()).await?;

    info!("Retrieved {} products", products.len());
    let data = products
        .into_iter()
        .map(|product| product.map(ProductResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Products retrieved successfully"))))
}

/// Get the discontinued products
#[utoipa::path(
    get,
    path = "/api/v1/products/discontinued",
    responses(
        (status = 200, description = "Discontinued products", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
#[instrument(skip(state))]
pub async fn get_discontinued_products(
    State(state): State<AppState>,
) -> ApiResult<Vec<ProductResponse>> {
    let products = state.repositories.products.discontinued().await?;

    debug!("{} products are discontinued", products.len());
    let data = products.into_iter().map(ProductResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Products retrieved successfully"))))
}
