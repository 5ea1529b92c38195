use chrono::{DateTime, NaiveDate, Utc};
use model::entities::{order, order_detail};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{fraction, money};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct OrderRequest {
    pub customer_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<NaiveDate>,
    /// Shipper id
    pub ship_via: Option<i32>,
    #[validate(custom(function = "money"))]
    pub freight: Option<Decimal>,
    #[validate(length(max = 40))]
    pub ship_name: Option<String>,
    #[validate(length(max = 60))]
    pub ship_address: Option<String>,
    #[validate(length(max = 15))]
    pub ship_city: Option<String>,
    #[validate(length(max = 15))]
    pub ship_region: Option<String>,
    #[validate(length(max = 10))]
    pub ship_postal_code: Option<String>,
    #[validate(length(max = 15))]
    pub ship_country: Option<String>,
}

impl OrderRequest {
    pub fn into_new_model(self) -> order::ActiveModel {
        order::ActiveModel {
            customer_id: Set(self.customer_id),
            employee_id: Set(self.employee_id),
            order_date: Set(self.order_date),
            required_date: Set(self.required_date),
            shipped_date: Set(self.shipped_date),
            ship_via: Set(self.ship_via),
            freight: Set(self.freight),
            ship_name: Set(self.ship_name),
            ship_address: Set(self.ship_address),
            ship_city: Set(self.ship_city),
            ship_region: Set(self.ship_region),
            ship_postal_code: Set(self.ship_postal_code),
            ship_country: Set(self.ship_country),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> order::ActiveModel {
        order::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

/// An order together with its line items, inserted in one transaction.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub order: OrderRequest,
    #[serde(default)]
    #[validate(nested)]
    pub details: Vec<OrderLineRequest>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct OrderLineRequest {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(custom(function = "money"))]
    #[schema(example = "18.00")]
    pub unit_price: Decimal,
    #[validate(range(min = 1, max = 32767))]
    pub quantity: i32,
    /// Fraction between 0 and 1
    #[serde(default)]
    #[validate(custom(function = "fraction"))]
    pub discount: Decimal,
}

impl OrderLineRequest {
    /// The order key is filled in by the repository.
    pub fn into_new_model(self) -> order_detail::ActiveModel {
        order_detail::ActiveModel {
            product_id: Set(self.product_id),
            unit_price: Set(self.unit_price),
            quantity: Set(self.quantity),
            discount: Set(self.discount),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<NaiveDate>,
    pub ship_via: Option<i32>,
    pub freight: Option<Decimal>,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            employee_id: model.employee_id,
            order_date: model.order_date,
            required_date: model.required_date,
            shipped_date: model.shipped_date,
            ship_via: model.ship_via,
            freight: model.freight,
            ship_name: model.ship_name,
            ship_address: model.ship_address,
            ship_city: model.ship_city,
            ship_region: model.ship_region,
            ship_postal_code: model.ship_postal_code,
            ship_country: model.ship_country,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub order_id: i32,
    pub product_id: i32,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub discount: Decimal,
    /// unit_price * quantity * (1 - discount); null if it overflows
    pub line_total: Option<Decimal>,
}

impl From<order_detail::Model> for OrderLineResponse {
    fn from(model: order_detail::Model) -> Self {
        Self {
            line_total: model.line_total(),
            order_id: model.order_id,
            product_id: model.product_id,
            unit_price: model.unit_price,
            quantity: model.quantity,
            discount: model.discount,
        }
    }
}

/// A created order and its lines.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderWithLinesResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub details: Vec<OrderLineResponse>,
}
