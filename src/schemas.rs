use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::dto;
use crate::identity::{TokenService, UserManager};
use crate::repositories::{Repositories, UserClaimFlag, UserRoleFlag};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Per-entity repositories and the authorization repository
    pub repositories: Repositories,
    /// Account management
    pub users: UserManager,
    /// Access token issuing and validation
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, tokens: TokenService) -> Self {
        Self {
            repositories: Repositories::new(db.clone()),
            users: UserManager::new(db.clone()),
            db,
            tokens,
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::categories::get_category_products,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::get_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,
        crate::handlers::customers::get_customer_by_code,
        crate::handlers::customers::get_customer_orders,
        crate::handlers::customers::get_customer_demographics,
        crate::handlers::customers::assign_customer_demographic,
        crate::handlers::customers::unassign_customer_demographic,
        crate::handlers::customer_demographics::create_customer_demographic,
        crate::handlers::customer_demographics::get_customer_demographics,
        crate::handlers::customer_demographics::get_customer_demographic,
        crate::handlers::customer_demographics::update_customer_demographic,
        crate::handlers::customer_demographics::delete_customer_demographic,
        crate::handlers::customer_demographics::archive_customer_demographic,
        crate::handlers::customer_demographics::get_customer_demographic_customers,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::get_employees,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::update_employee,
        crate::handlers::employees::delete_employee,
        crate::handlers::employees::archive_employee,
        crate::handlers::employees::get_employee_orders,
        crate::handlers::employees::get_employee_territories,
        crate::handlers::employees::get_employee_direct_reports,
        crate::handlers::employees::get_employee_management_chain,
        crate::handlers::employees::get_employee_manager,
        crate::handlers::employees::assign_employee_territory,
        crate::handlers::employees::unassign_employee_territory,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::archive_order,
        crate::handlers::orders::get_order_details,
        crate::handlers::orders::add_order_detail,
        crate::handlers::orders::remove_order_detail,
        crate::handlers::products::create_product,
        crate::handlers::products::get_products,
        crate::handlers::products::get_discontinued_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::archive_product,
        crate::handlers::regions::create_region,
        crate::handlers::regions::get_regions,
        crate::handlers::regions::get_region,
        crate::handlers::regions::update_region,
        crate::handlers::regions::delete_region,
        crate::handlers::regions::archive_region,
        crate::handlers::regions::get_region_territories,
        crate::handlers::shippers::create_shipper,
        crate::handlers::shippers::get_shippers,
        crate::handlers::shippers::get_shipper,
        crate::handlers::shippers::update_shipper,
        crate::handlers::shippers::delete_shipper,
        crate::handlers::shippers::get_shipper_orders,
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::get_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,
        crate::handlers::suppliers::archive_supplier,
        crate::handlers::suppliers::get_supplier_products,
        crate::handlers::territories::create_territory,
        crate::handlers::territories::get_territories,
        crate::handlers::territories::get_territory,
        crate::handlers::territories::update_territory,
        crate::handlers::territories::delete_territory,
        crate::handlers::territories::archive_territory,
        crate::handlers::territories::get_territory_employees,
        crate::handlers::account::register,
        crate::handlers::account::login,
        crate::handlers::account::change_password,
        crate::handlers::account::me,
        crate::handlers::administration::create_role,
        crate::handlers::administration::get_roles,
        crate::handlers::administration::get_role,
        crate::handlers::administration::update_role,
        crate::handlers::administration::delete_role,
        crate::handlers::administration::get_role_users,
        crate::handlers::administration::get_users,
        crate::handlers::administration::get_user,
        crate::handlers::administration::update_user,
        crate::handlers::administration::delete_user,
        crate::handlers::administration::get_user_roles,
        crate::handlers::administration::update_user_roles,
        crate::handlers::administration::get_user_claims,
        crate::handlers::administration::update_user_claims,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            dto::category::CategoryRequest,
            dto::category::CategoryResponse,
            dto::customer::CustomerRequest,
            dto::customer::CustomerResponse,
            dto::customer_demographic::CustomerDemographicRequest,
            dto::customer_demographic::CustomerDemographicResponse,
            dto::employee::EmployeeRequest,
            dto::employee::EmployeeResponse,
            dto::order::OrderRequest,
            dto::order::CreateOrderRequest,
            dto::order::OrderLineRequest,
            dto::order::OrderResponse,
            dto::order::OrderLineResponse,
            dto::order::OrderWithLinesResponse,
            dto::product::ProductRequest,
            dto::product::ProductResponse,
            dto::region::RegionRequest,
            dto::region::RegionResponse,
            dto::shipper::ShipperRequest,
            dto::shipper::ShipperResponse,
            dto::supplier::SupplierRequest,
            dto::supplier::SupplierResponse,
            dto::territory::TerritoryRequest,
            dto::territory::TerritoryResponse,
            dto::account::RegisterRequest,
            dto::account::LoginRequest,
            dto::account::LoginResponse,
            dto::account::ChangePasswordRequest,
            dto::account::UpdateUserRequest,
            dto::account::UserResponse,
            dto::account::MeResponse,
            dto::admin::RoleRequest,
            dto::admin::RoleResponse,
            UserRoleFlag,
            UserClaimFlag,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "categories", description = "Product categories"),
        (name = "customers", description = "Customers and their demographics"),
        (name = "customer-demographics", description = "Customer demographic groups"),
        (name = "employees", description = "Employees, reporting lines and territories"),
        (name = "orders", description = "Orders and their line items"),
        (name = "products", description = "Products"),
        (name = "regions", description = "Sales regions"),
        (name = "shippers", description = "Shipping companies"),
        (name = "suppliers", description = "Suppliers"),
        (name = "territories", description = "Sales territories"),
        (name = "account", description = "Registration, sign-in and the caller's account"),
        (name = "administration", description = "Role, user and claim administration"),
    ),
    info(
        title = "Northwind API",
        description = "CRUD API over the Northwind trading database with user, role and claim administration",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
