use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::category::{CategoryRequest, CategoryResponse};
use crate::dto::product::ProductResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
#[instrument(skip(state, request))]
pub async fn create_category(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CategoryRequest>>,
) -> ApiResult<CategoryResponse> {
    debug!("Creating category with name: {}", request.name);

    let category = state
        .repositories
        .categories
        .create(request.into_new_model())
        .await?;

    info!("Category created successfully with ID: {}", category.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(category.into(), "Category created successfully")),
    ))
}

/// Get all categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all categories", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<CategoryResponse>>> {
    trace!("Entering get_categories");

    let categories = state.repositories.categories.get_all(&query.options()).await?;

    info!("Retrieved {} categories", categories.len());
    let data = categories
        .into_iter()
        .map(|category| category.map(CategoryResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Categories retrieved successfully"))))
}

/// Get a single category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<CategoryResponse>> {
    let category = state
        .repositories
        .categories
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found category {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(category.map(CategoryResponse::from), "Category retrieved successfully")),
    ))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
#[instrument(skip(state, request))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<CategoryRequest>>,
) -> ApiResult<CategoryResponse> {
    let category = state
        .repositories
        .categories
        .update(request.into_model(id))
        .await?;

    info!("Category {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(category.into(), "Category updated successfully")),
    ))
}

/// Delete a category and its products
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.categories.delete_by_id(id).await?;

    info!("Category {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the products of a category
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/products",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Products of the category", body = ApiResponse<Vec<ProductResponse>>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
#[instrument(skip(state))]
pub async fn get_category_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<ProductResponse>> {
    let products = state.repositories.categories.products_of(id).await?;

    debug!("Category {} has {} products", id, products.len());
    let data = products.into_iter().map(ProductResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Products retrieved successfully"))))
}
