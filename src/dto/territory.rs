use chrono::{DateTime, Utc};
use model::entities::territory;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct TerritoryRequest {
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "Westboro")]
    pub description: String,
    #[validate(range(min = 1))]
    pub region_id: i32,
}

impl TerritoryRequest {
    pub fn into_new_model(self) -> territory::ActiveModel {
        territory::ActiveModel {
            description: Set(self.description),
            region_id: Set(self.region_id),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> territory::ActiveModel {
        territory::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TerritoryResponse {
    pub id: i32,
    pub description: String,
    pub region_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<territory::Model> for TerritoryResponse {
    fn from(model: territory::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            region_id: model.region_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
