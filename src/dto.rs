//! Request and response bodies, with the mapping to and from entities.
//!
//! Request types map into active models (`into_new_model` for inserts,
//! `into_model(id)` for full overwrites); response types are built from
//! models with `From`.

pub mod account;
pub mod admin;
pub mod category;
pub mod customer;
pub mod customer_demographic;
pub mod employee;
pub mod order;
pub mod product;
pub mod region;
pub mod shipper;
pub mod supplier;
pub mod territory;

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::ValidationError;

use crate::repositories::QueryOptions;

/// `?include=` for reads that can embed related rows.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IncludeQuery {
    /// Comma-separated relation names to embed, e.g. `products,supplier`
    pub include: Option<String>,
}

impl IncludeQuery {
    pub fn paths(&self) -> Vec<String> {
        self.include
            .as_deref()
            .map(QueryOptions::include_paths)
            .unwrap_or_default()
    }

    pub fn options(&self) -> QueryOptions {
        QueryOptions {
            include: self.paths(),
            ..QueryOptions::default()
        }
    }
}

/// Largest amount a `DECIMAL(16, 4)` money column holds.
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_874_919_423, 2_328_306, 0, false, 4);

/// Prices and freight: never negative, never wider than the column.
pub(crate) fn money(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    if *value > MAX_MONEY {
        return Err(ValidationError::new("max_money"));
    }
    Ok(())
}

pub(crate) fn fraction(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE {
        return Err(ValidationError::new("fraction"));
    }
    Ok(())
}
