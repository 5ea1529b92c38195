use chrono::{DateTime, Utc};
use model::entities::customer_demographic;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CustomerDemographicRequest {
    #[validate(length(min = 1))]
    #[schema(example = "Small business owners")]
    pub description: String,
}

impl CustomerDemographicRequest {
    pub fn into_new_model(self) -> customer_demographic::ActiveModel {
        customer_demographic::ActiveModel {
            description: Set(self.description),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> customer_demographic::ActiveModel {
        customer_demographic::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerDemographicResponse {
    pub id: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<customer_demographic::Model> for CustomerDemographicResponse {
    fn from(model: customer_demographic::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
