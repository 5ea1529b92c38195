use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use tracing::{debug, info, instrument, trace};

use super::error::{ApiError, ApiResult};
use crate::dto::employee::{EmployeeRequest, EmployeeResponse};
use crate::dto::order::OrderResponse;
use crate::dto::territory::TerritoryResponse;
use crate::dto::IncludeQuery;
use crate::repositories::Expanded;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Create a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created successfully", body = ApiResponse<EmployeeResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Employee conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state, request))]
pub async fn create_employee(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<EmployeeRequest>>,
) -> ApiResult<EmployeeResponse> {
    debug!("Creating employee");

    let employee = state
        .repositories
        .employees
        .create(request.into_new_model())
        .await?;

    info!("Employee created successfully with ID: {}", employee.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(employee.into(), "Employee created successfully")),
    ))
}

/// Get all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(IncludeQuery),
    responses(
        (status = 200, description = "List of all employees", body = ApiResponse<Vec<EmployeeResponse>>),
        (status = 400, description = "Unknown relation in include", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employees(
    State(state): State<AppState>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Vec<Expanded<EmployeeResponse>>> {
    trace!("Entering get_employees");

    let employees = state.repositories.employees.get_all(&query.options()).await?;

    info!("Retrieved {} employees", employees.len());
    let data = employees
        .into_iter()
        .map(|employee| employee.map(EmployeeResponse::from))
        .collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Employees retrieved successfully"))))
}

/// Get a single employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(
        ("id" = i32, Path, description = "Employee ID"),
        IncludeQuery
    ),
    responses(
        (status = 200, description = "Employee found", body = ApiResponse<EmployeeResponse>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Expanded<EmployeeResponse>> {
    let employee = state
        .repositories
        .employees
        .get_by_id_with(id, &query.paths())
        .await?;

    debug!("Found employee {}", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(employee.map(EmployeeResponse::from), "Employee retrieved successfully")),
    ))
}

/// Replace a employee; every field is overwritten
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee updated successfully", body = ApiResponse<EmployeeResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 409, description = "Employee conflicts with existing data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state, request))]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Valid(Json(request)): Valid<Json<EmployeeRequest>>,
) -> ApiResult<EmployeeResponse> {
    let employee = state
        .repositories
        .employees
        .update(request.into_model(id))
        .await?;

    info!("Employee {} updated successfully", id);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(employee.into(), "Employee updated successfully")),
    ))
}

/// Delete a employee; direct reports lose their manager
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted successfully"),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.employees.delete_by_id(id).await?;

    info!("Employee {} deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a employee; it disappears from every read
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}/archive",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee archived successfully"),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn archive_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.repositories.employees.soft_delete_by_id(id).await?;

    info!("Employee {} archived", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Get the orders taken by an employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/orders",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get the orders taken by an employee", body = ApiResponse<Vec<OrderResponse>>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employee_orders(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<OrderResponse>> {
    let orders = state.repositories.employees.orders_of(id).await?;

    debug!("Employee {} took {} orders", id, orders.len());
    let data = orders.into_iter().map(OrderResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Orders retrieved successfully"))))
}

/// Get the territories covered by an employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/territories",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get the territories covered by an employee", body = ApiResponse<Vec<TerritoryResponse>>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employee_territories(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<TerritoryResponse>> {
    let territories = state.repositories.employees.territories_of(id).await?;

    debug!("Employee {} covers {} territories", id, territories.len());
    let data = territories.into_iter().map(TerritoryResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Territories retrieved successfully"))))
}

/// Get the employees reporting directly to an employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/direct-reports",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get the employees reporting directly to an employee", body = ApiResponse<Vec<EmployeeResponse>>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employee_direct_reports(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<EmployeeResponse>> {
    let reports = state.repositories.employees.direct_reports(id).await?;

    debug!("Employee {} has {} direct reports", id, reports.len());
    let data = reports.into_iter().map(EmployeeResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Direct reports retrieved successfully"))))
}

/// Get the managers above an employee, nearest first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/management-chain",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get the managers above an employee, nearest first", body = ApiResponse<Vec<EmployeeResponse>>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employee_management_chain(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<EmployeeResponse>> {
    let managers = state.repositories.employees.management_chain(id).await?;

    debug!("Employee {} has {} managers above", id, managers.len());
    let data = managers.into_iter().map(EmployeeResponse::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::ok(data, "Managers retrieved successfully"))))
}

/// Get the manager of an employee; `data` is null at the top of the hierarchy
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/manager",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Manager of the employee, if any", body = ApiResponse<EmployeeResponse>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn get_employee_manager(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Option<EmployeeResponse>> {
    let manager = state.repositories.employees.manager_of(id).await?;

    let message = match &manager {
        Some(_) => "Manager retrieved successfully",
        None => "Employee has no manager",
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(manager.map(EmployeeResponse::from), message)),
    ))
}

/// Assign a territory to an employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}/territories/{territory_id}",
    params(
        ("id" = i32, Path, description = "Employee ID"),
        ("territory_id" = i32, Path, description = "Territory ID")
    ),
    responses(
        (status = 204, description = "Territory assigned"),
        (status = 404, description = "Employee or territory not found", body = ErrorResponse),
        (status = 409, description = "Territory already assigned", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn assign_employee_territory(
    State(state): State<AppState>,
    Path((id, territory_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .repositories
        .employees
        .assign_territory(id, territory_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a territory from an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}/territories/{territory_id}",
    params(
        ("id" = i32, Path, description = "Employee ID"),
        ("territory_id" = i32, Path, description = "Territory ID")
    ),
    responses(
        (status = 204, description = "Territory unassigned"),
        (status = 404, description = "Territory is not assigned to the employee", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "employees"
)]
#[instrument(skip(state))]
pub async fn unassign_employee_territory(
    State(state): State<AppState>,
    Path((id, territory_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .repositories
        .employees
        .unassign_territory(id, territory_id)
        .await?;

    info!("Territory {} removed from employee {}", territory_id, id);
    Ok(StatusCode::NO_CONTENT)
}
