use chrono::{DateTime, Utc};
use model::entities::supplier;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct SupplierRequest {
    #[validate(length(min = 1, max = 40))]
    #[schema(example = "Exotic Liquids")]
    pub company_name: String,
    #[validate(length(max = 30))]
    pub contact_name: Option<String>,
    #[validate(length(max = 30))]
    pub contact_title: Option<String>,
    #[validate(length(max = 60))]
    pub address: Option<String>,
    #[validate(length(max = 15))]
    pub city: Option<String>,
    #[validate(length(max = 15))]
    pub region: Option<String>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
    #[validate(length(max = 15))]
    pub country: Option<String>,
    #[validate(length(max = 24))]
    pub phone: Option<String>,
    #[validate(length(max = 24))]
    pub fax: Option<String>,
    #[validate(url)]
    pub home_page: Option<String>,
}

impl SupplierRequest {
    pub fn into_new_model(self) -> supplier::ActiveModel {
        supplier::ActiveModel {
            company_name: Set(self.company_name),
            contact_name: Set(self.contact_name),
            contact_title: Set(self.contact_title),
            address: Set(self.address),
            city: Set(self.city),
            region: Set(self.region),
            postal_code: Set(self.postal_code),
            country: Set(self.country),
            phone: Set(self.phone),
            fax: Set(self.fax),
            home_page: Set(self.home_page),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> supplier::ActiveModel {
        supplier::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplierResponse {
    pub id: i32,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub home_page: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<supplier::Model> for SupplierResponse {
    fn from(model: supplier::Model) -> Self {
        Self {
            id: model.id,
            company_name: model.company_name,
            contact_name: model.contact_name,
            contact_title: model.contact_title,
            address: model.address,
            city: model.city,
            region: model.region,
            postal_code: model.postal_code,
            country: model.country,
            phone: model.phone,
            fax: model.fax,
            home_page: model.home_page,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
