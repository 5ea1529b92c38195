use model::entities::app_role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 256))]
    #[schema(example = "Sales")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
}

impl From<app_role::Model> for RoleResponse {
    fn from(model: app_role::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
