use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub normalized_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::app_user_role::Entity")]
    AppUserRole,
}

impl Related<super::app_user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUserRole.def()
    }
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        super::app_user_role::Relation::AppUser.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::app_user_role::Relation::AppRole.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
