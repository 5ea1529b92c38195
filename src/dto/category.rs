use model::entities::category;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body of category create and update requests.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 15))]
    #[schema(example = "Beverages")]
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn into_new_model(self) -> category::ActiveModel {
        category::ActiveModel {
            name: Set(self.name),
            description: Set(self.description),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> category::ActiveModel {
        category::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}
