use chrono::{DateTime, Utc};
use model::entities::region;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegionRequest {
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "Eastern")]
    pub description: String,
}

impl RegionRequest {
    pub fn into_new_model(self) -> region::ActiveModel {
        region::ActiveModel {
            description: Set(self.description),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> region::ActiveModel {
        region::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionResponse {
    pub id: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<region::Model> for RegionResponse {
    fn from(model: region::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
