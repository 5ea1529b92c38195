use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::customer::{CustomerRequest, CustomerResponse};
use crate::dto::customer_demographic::CustomerDemographicResponse;
use crate::dto::order::OrderResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created successfully", body = ApiResponse<CustomerResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Customer conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state, request))]
pub async fn create_customer(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CustomerRequest>>,
) -> ApiResult<CustomerResponse> {
    debug!("Creating customer");

    let customer = state
        .repositories
        .customers
        .create(request.into_new_model())
        .await?;

    info!("Customer created successfully with ID: {}", customer.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(customer.into(), "Customer created successfully")),
    ))
}

/// Get all customers
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all customers", body = ApiResponse<Vec<CustomerResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn get_customers(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<CustomerResponse>>> {
    trace!("Entering get_customers");

    let customers = state.repositories.customers.get_all(&query.options()).await?;

    info!("Retrieved {} customers", customers.len());
    let data = customers
        .into_iter()
        .map(|customer| customer.map(CustomerResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Customers retrieved successfully"))))
}

/// Get a single customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(
        ("id" = i32, Path, description = "Customer ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<CustomerResponse>> {
    let customer = state
        .repositories
        .customers
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found customer {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(customer.map(CustomerResponse::from), "Customer retrieved successfully")),
    ))
}

/// Replace a customer; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated successfully", body = ApiResponse<CustomerResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 409, description = "Customer conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state, request))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<CustomerRequest>>,
) -> ApiResult<CustomerResponse> {
    let customer = state
        .repositories
        .customers
        .update(request.into_model(id))
        .await?;

    info!("Customer {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(customer.into(), "Customer updated successfully")),
    ))
}

/// Delete a customer and its orders
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted successfully"),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.customers.delete_by_id(id).await?;

    info!("Customer {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Look a customer up by its code
#[utoipa::path(
    get,
    path = "/api/v1/customers/by-code/{code}",
    params(("code" = String, Path, description = "Customer code, e.g. ALFKI")),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn get_customer_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<CustomerResponse> {
    let customer = state.repositories.customers.find_by_code(&code).await?;

    debug!("Customer code {} resolved to {}", code, customer.id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(customer.into(), "Customer retrieved successfully")),
    ))
}

/// Get the orders of a customer
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/orders",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Orders of the customer", body = ApiResponse<Vec<OrderResponse>>),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn get_customer_orders(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<OrderResponse>> {
    let orders = state.repositories.customers.orders_of(id).await?;

    debug!("Customer {} has {} orders", id, orders.len());
    let data = orders.into_iter().map(OrderResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Orders retrieved successfully"))))
}

/// Get the demographics a customer belongs to
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/demographics",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Demographics of the customer", body = ApiResponse<Vec<CustomerDemographicResponse>>),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn get_customer_demographics(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<CustomerDemographicResponse>> {
    let demographics = state.repositories.customers.demographics_of(id).await?;

    let data = demographics
        .into_iter()
        .map(CustomerDemographicResponse::from)
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Demographics retrieved successfully"))))
}

/// Put a customer into a demographic
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}/demographics/{demographic_id}",
    params(
        ("id" = i32, Path, description = "Customer ID"),
        ("demographic_id" = i32, Path, description = "Customer demographic ID")
    ),
    responses(
        (status = 204, description = "Customer assigned"),
        (status = 404, description = "Customer or demographic not found", body = ErrorResponse),
        (status = 409, description = "Customer already in the demographic", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn assign_customer_demographic(
    State(state): State<AppState>,
    Path((id, demographic_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .repositories
        .customer_demographics
        .assign(id, demographic_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Take a customer out of a demographic
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}/demographics/{demographic_id}",
    params(
        ("id" = i32, Path, description = "Customer ID"),
        ("demographic_id" = i32, Path, description = "Customer demographic ID")
    ),
    responses(
        (status = 204, description = "Customer unassigned"),
        (status = 404, description = "Customer is not in the demographic", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "customers"
)]
#[instrument(skip(state))]
pub async fn unassign_customer_demographic(
    State(state): State<AppState>,
    Path((id, demographic_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .repositories
        .customer_demographics
        .unassign(id, demographic_id)
        .await?;

    info!("Customer {} removed from demographic {}", id, demographic_id);
    Ok(StatusCode::NO_CONTENT)
}
