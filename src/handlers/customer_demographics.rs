use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::customer_demographic::{CustomerDemographicRequest, CustomerDemographicResponse};
use crate::dto::customer::CustomerResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new customer demographic
#[utoipa::path(
    post,
    path = "/api/v1/customer-demographics",
    request_body = CustomerDemographicRequest,
    responses(
        (status = 201, description = "Customer demographic created successfully", body = ApiResponse<CustomerDemographicResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Customer demographic conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state, request))]
pub async fn create_customer_demographic(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CustomerDemographicRequest>>,
) -> ApiResult<CustomerDemographicResponse> {
    debug!("Creating customer demographic");

    let demographic = state
        .repositories
        .customer_demographics
        .create(request.into_new_model())
        .await?;

    info!("Customer demographic created successfully with ID: {}", demographic.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(demographic.into(), "Customer demographic created successfully")),
    ))
}

/// Get all customer demographics
#[utoipa::path(
    get,
    path = "/api/v1/customer-demographics",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all customer demographics", body = ApiResponse<Vec<CustomerDemographicResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state))]
pub async fn get_customer_demographics(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<CustomerDemographicResponse>>> {
    trace!("Entering get_customer_demographics");

    let demographics = state.repositories.customer_demographics.get_all(&query.options()).await?;

    info!("Retrieved {} customer demographics", demographics.len());
    let data = demographics
        .into_iter()
        .map(|demographic| demographic.map(CustomerDemographicResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Customer demographics retrieved successfully"))))
}

/// Get a single customer demographic by ID
#[utoipa::path(
    get,
    path = "/api/v1/customer-demographics/{id}",
    params(
        ("id" = i32, Path, description = "Customer demographic ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Customer demographic found", body = ApiResponse<CustomerDemographicResponse>),
        (status = 404, description = "Customer demographic not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state))]
pub async fn get_customer_demographic(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<CustomerDemographicResponse>> {
    let demographic = state
        .repositories
        .customer_demographics
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found customer demographic {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(demographic.map(CustomerDemographicResponse::from), "Customer demographic retrieved successfully")),
    ))
}

/// Replace a customer demographic; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/customer-demographics/{id}",
    params(("id" = i32, Path, description = "Customer demographic ID")),
    request_body = CustomerDemographicRequest,
    responses(
        (status = 200, description = "Customer demographic updated successfully", body = ApiResponse<CustomerDemographicResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Customer demographic not found", body = ErrorResponse),
        (status = 409, description = "Customer demographic conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state, request))]
pub async fn update_customer_demographic(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<CustomerDemographicRequest>>,
) -> ApiResult<CustomerDemographicResponse> {
    let demographic = state
        .repositories
        .customer_demographics
        .update(request.into_model(id))
        .await?;

    info!("Customer demographic {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(demographic.into(), "Customer demographic updated successfully")),
    ))
}

/// Delete a customer demographic
#[utoipa::path(
    delete,
    path = "/api/v1/customer-demographics/{id}",
    params(("id" = i32, Path, description = "Customer demographic ID")),
    responses(
        (status = 204, description = "Customer demographic deleted successfully"),
        (status = 404, description = "Customer demographic not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state))]
pub async fn delete_customer_demographic(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.customer_demographics.delete_by_id(id).await?;

    info!("Customer demographic {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a customer demographic; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/customer-demographics/{id}/archive",
    params(("id" = i32, Path, description = "Customer demographic ID")),
    responses(
        (status = 204, description = "Customer demographic archived successfully"),
        (status = 404, description = "Customer demographic not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state))]
pub async fn archive_customer_demographic(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.customer_demographics.soft_delete_by_id(id).await?;

    info!("Customer demographic {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the customers in a demographic
#[utoipa::path(
    get,
    path = "/api/v1/customer-demographics/{id}/customers",
    params(("id" = i32, Path, description = "Customer demographic ID")),
    responses(
        (status = 200, description = "Customers in the demographic", body = ApiResponse<Vec<CustomerResponse>>),
        (status = 404, description = "Customer demographic not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customer-demographics"
)]
#[instrument(skip(state))]
pub async fn get_customer_demographic_customers(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<CustomerResponse>> {
    let customers = state.repositories.customer_demographics.customers_of(id).await?;

    debug!("Demographic {} has {} customers", id, customers.len());
    let data = customers.into_iter().map(CustomerResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Customers retrieved successfully"))))
}
