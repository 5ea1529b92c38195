//! Data access for the Northwind tables and the identity store.

pub mod authorization;
pub mod base;
pub mod category;
pub mod customer;
pub mod customer_customer_demographic;
pub mod customer_demographic;
pub mod employee;
pub mod employee_territory;
pub mod error;
pub mod order;
pub mod product;
pub mod region;
pub mod shipper;
pub mod supplier;
pub mod territory;

pub use authorization::{AuthorizationRepository, UserClaimFlag, UserRoleFlag};
pub use base::{live_query, BaseEntity, EntityRepository, Expanded, QueryOptions};
pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use customer_demographic::CustomerDemographicRepository;
pub use employee::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use region::RegionRepository;
pub use shipper::ShipperRepository;
pub use supplier::SupplierRepository;
pub use territory::TerritoryRepository;

use sea_orm::DatabaseConnection;

/// One repository per resource, sharing a connection pool.
#[derive(Clone)]
pub struct Repositories {
    pub categories: CategoryRepository,
    pub customers: CustomerRepository,
    pub customer_demographics: CustomerDemographicRepository,
    pub employees: EmployeeRepository,
    pub orders: OrderRepository,
    pub products: ProductRepository,
    pub regions: RegionRepository,
    pub shippers: ShipperRepository,
    pub suppliers: SupplierRepository,
    pub territories: TerritoryRepository,
    pub authorization: AuthorizationRepository,
}

impl Repositories {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            categories: CategoryRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            customer_demographics: CustomerDemographicRepository::new(db.clone()),
            employees: EmployeeRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            regions: RegionRepository::new(db.clone()),
            shippers: ShipperRepository::new(db.clone()),
            suppliers: SupplierRepository::new(db.clone()),
            territories: TerritoryRepository::new(db.clone()),
            authorization: AuthorizationRepository::new(db),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
