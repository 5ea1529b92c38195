pub mod account;
pub mod administration;
pub mod categories;
pub mod customer_demographics;
pub mod customers;
pub mod employees;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod regions;
pub mod shippers;
pub mod suppliers;
pub mod territories;
