use chrono::{DateTime, Utc};
use model::entities::product;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::ColumnTrait;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::money;
use crate::repositories::QueryOptions;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 40))]
    #[schema(example = "Chai")]
    pub name: String,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    #[validate(length(max = 20))]
    #[schema(example = "10 boxes x 20 bags")]
    pub quantity_per_unit: Option<String>,
    #[validate(custom(function = "money"))]
    pub unit_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub units_in_stock: Option<i32>,
    #[validate(range(min = 0))]
    pub units_on_order: Option<i32>,
    #[validate(range(min = 0))]
    pub reorder_level: Option<i32>,
    #[serde(default)]
    pub discontinued: bool,
}

impl ProductRequest {
    pub fn into_new_model(self) -> product::ActiveModel {
        product::ActiveModel {
            name: Set(self.name),
            supplier_id: Set(self.supplier_id),
            category_id: Set(self.category_id),
            quantity_per_unit: Set(self.quantity_per_unit),
            unit_price: Set(self.unit_price),
            units_in_stock: Set(self.units_in_stock),
            units_on_order: Set(self.units_on_order),
            reorder_level: Set(self.reorder_level),
            discontinued: Set(self.discontinued),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> product::ActiveModel {
        product::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub quantity_per_unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub units_in_stock: Option<i32>,
    pub units_on_order: Option<i32>,
    pub reorder_level: Option<i32>,
    pub discontinued: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            supplier_id: model.supplier_id,
            category_id: model.category_id,
            quantity_per_unit: model.quantity_per_unit,
            unit_price: model.unit_price,
            units_in_stock: model.units_in_stock,
            units_on_order: model.units_on_order,
            reorder_level: model.reorder_level,
            discontinued: model.discontinued,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Filters for the product list.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductListQuery {
    pub category_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub discontinued: Option<bool>,
    /// Comma-separated relation names to embed
    pub include: Option<String>,
}

impl ProductListQuery {
    pub fn options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        if let Some(category_id) = self.category_id {
            options = options.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(supplier_id) = self.supplier_id {
            options = options.filter(product::Column::SupplierId.eq(supplier_id));
        }
        if let Some(discontinued) = self.discontinued {
            options = options.filter(product::Column::Discontinued.eq(discontinued));
        }
        match &self.include {
            Some(paths) => options.include(paths),
            None => options,
        }
    }
}
