use crate::handlers::{
    account::{change_password, login, me, register},
    administration::{
        create_role, delete_role, delete_user, get_role, get_role_users, get_roles, get_user,
        get_user_claims, get_user_roles, get_users, update_role, update_user, update_user_claims,
        update_user_roles,
    },
    categories::{
        create_category, delete_category, get_categories, get_category, get_category_products,
        update_category,
    },
    customer_demographics::{
        archive_customer_demographic, create_customer_demographic, delete_customer_demographic,
        get_customer_demographic, get_customer_demographic_customers, get_customer_demographics,
        update_customer_demographic,
    },
    customers::{
        assign_customer_demographic, create_customer, delete_customer, get_customer,
        get_customer_by_code, get_customer_demographics as get_demographics_of_customer,
        get_customer_orders, get_customers, unassign_customer_demographic, update_customer,
    },
    employees::{
        archive_employee, assign_employee_territory, create_employee, delete_employee,
        get_employee, get_employee_direct_reports, get_employee_management_chain,
        get_employee_manager, get_employee_orders, get_employee_territories, get_employees,
        unassign_employee_territory, update_employee,
    },
    health::health_check,
    orders::{
        add_order_detail, archive_order, create_order, delete_order, get_order, get_order_details,
        get_orders, remove_order_detail, update_order,
    },
    products::{
        archive_product, create_product, delete_product, get_discontinued_products, get_product,
        get_products, update_product,
    },
    regions::{
        archive_region, create_region, delete_region, get_region, get_region_territories,
        get_regions, update_region,
    },
    shippers::{
        create_shipper, delete_shipper, get_shipper, get_shipper_orders, get_shippers,
        update_shipper,
    },
    suppliers::{
        archive_supplier, create_supplier, delete_supplier, get_supplier, get_supplier_products,
        get_suppliers, update_supplier,
    },
    territories::{
        archive_territory, create_territory, delete_territory, get_territories, get_territory,
        get_territory_employees, update_territory,
    },
};
use crate::middleware::{require_admin, require_auth};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    create_router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

pub fn create_router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Category routes
        .route("/api/v1/categories", post(create_category).get(get_categories))
        .route(
            "/api/v1/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/api/v1/categories/:id/products", get(get_category_products))
        // Customer routes
        .route("/api/v1/customers", post(create_customer).get(get_customers))
        .route("/api/v1/customers/by-code/:code", get(get_customer_by_code))
        .route(
            "/api/v1/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/api/v1/customers/:id/orders", get(get_customer_orders))
        .route("/api/v1/customers/:id/demographics", get(get_demographics_of_customer))
        .route(
            "/api/v1/customers/:id/demographics/:demographic_id",
            put(assign_customer_demographic).delete(unassign_customer_demographic),
        )
        // Customer demographic routes
        .route(
            "/api/v1/customer-demographics",
            post(create_customer_demographic).get(get_customer_demographics),
        )
        .route(
            "/api/v1/customer-demographics/:id",
            get(get_customer_demographic)
                .put(update_customer_demographic)
                .delete(delete_customer_demographic),
        )
        .route(
            "/api/v1/customer-demographics/:id/archive",
            delete(archive_customer_demographic),
        )
        .route(
            "/api/v1/customer-demographics/:id/customers",
            get(get_customer_demographic_customers),
        )
        // Employee routes
        .route("/api/v1/employees", post(create_employee).get(get_employees))
        .route(
            "/api/v1/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/api/v1/employees/:id/archive", delete(archive_employee))
        .route("/api/v1/employees/:id/orders", get(get_employee_orders))
        .route("/api/v1/employees/:id/territories", get(get_employee_territories))
        .route(
            "/api/v1/employees/:id/territories/:territory_id",
            put(assign_employee_territory).delete(unassign_employee_territory),
        )
        .route("/api/v1/employees/:id/direct-reports", get(get_employee_direct_reports))
        .route(
            "/api/v1/employees/:id/management-chain",
            get(get_employee_management_chain),
        )
        .route("/api/v1/employees/:id/manager", get(get_employee_manager))
        // Order routes
        .route("/api/v1/orders", post(create_order).get(get_orders))
        .route(
            "/api/v1/orders/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/api/v1/orders/:id/archive", delete(archive_order))
        .route(
            "/api/v1/orders/:id/details",
            get(get_order_details).post(add_order_detail),
        )
        .route(
            "/api/v1/orders/:id/details/:product_id",
            delete(remove_order_detail),
        )
        // Product routes
        .route("/api/v1/products", post(create_product).get(get_products))
        .route("/api/v1/products/discontinued", get(get_discontinued_products))
        .route(
            "/api/v1/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/v1/products/:id/archive", delete(archive_product))
        // Region routes
        .route("/api/v1/regions", post(create_region).get(get_regions))
        .route(
            "/api/v1/regions/:id",
            get(get_region).put(update_region).delete(delete_region),
        )
        .route("/api/v1/regions/:id/archive", delete(archive_region))
        .route("/api/v1/regions/:id/territories", get(get_region_territories))
        // Shipper routes
        .route("/api/v1/shippers", post(create_shipper).get(get_shippers))
        .route(
            "/api/v1/shippers/:id",
            get(get_shipper).put(update_shipper).delete(delete_shipper),
        )
        .route("/api/v1/shippers/:id/orders", get(get_shipper_orders))
        // Supplier routes
        .route("/api/v1/suppliers", post(create_supplier).get(get_suppliers))
        .route(
            "/api/v1/suppliers/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/api/v1/suppliers/:id/archive", delete(archive_supplier))
        .route("/api/v1/suppliers/:id/products", get(get_supplier_products))
        // Territory routes
        .route("/api/v1/territories", post(create_territory).get(get_territories))
        .route(
            "/api/v1/territories/:id",
            get(get_territory).put(update_territory).delete(delete_territory),
        )
        .route("/api/v1/territories/:id/archive", delete(archive_territory))
        .route("/api/v1/territories/:id/employees", get(get_territory_employees))
        // Account routes
        .route("/api/v1/account/register", post(register))
        .route("/api/v1/account/login", post(login))
        .merge(account_router(state.clone()))
        // Administration routes
        .nest("/api/v1/admin", admin_router(state.clone()))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Routes acting on the signed-in caller
fn account_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/account/change-password", post(change_password))
        .route("/api/v1/account/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Routes for members of the admin role. Layers run bottom-up, so the token
/// is validated before the role is checked.
fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/roles", post(create_role).get(get_roles))
        .route("/roles/:id", get(get_role).put(update_role).delete(delete_role))
        .route("/roles/:id/users", get(get_role_users))
        .route("/users", get(get_users))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/users/:id/roles", get(get_user_roles).put(update_user_roles))
        .route("/users/:id/claims", get(get_user_claims).put(update_user_claims))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
