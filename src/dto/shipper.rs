use model::entities::shipper;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ShipperRequest {
    #[validate(length(min = 1, max = 40))]
    #[schema(example = "Speedy Express")]
    pub company_name: String,
    #[validate(length(max = 24))]
    pub phone: Option<String>,
}

impl ShipperRequest {
    pub fn into_new_model(self) -> shipper::ActiveModel {
        shipper::ActiveModel {
            company_name: Set(self.company_name),
            phone: Set(self.phone),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> shipper::ActiveModel {
        shipper::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShipperResponse {
    pub id: i32,
    pub company_name: String,
    pub phone: Option<String>,
}

impl From<shipper::Model> for ShipperResponse {
    fn from(model: shipper::Model) -> Self {
        Self {
            id: model.id,
            company_name: model.company_name,
            phone: model.phone,
        }
    }
}
