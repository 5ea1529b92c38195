use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An application login. Names and emails are matched through their
/// upper-cased `normalized_*` columns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_name: String,
    #[sea_orm(unique)]
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::app_user_role::Entity")]
    AppUserRole,
    #[sea_orm(has_many = "super::app_user_claim::Entity")]
    AppUserClaim,
}

impl Related<super::app_user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUserRole.def()
    }
}

impl Related<super::app_user_claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUserClaim.def()
    }
}

impl Related<super::app_role::Entity> for Entity {
    fn to() -> RelationDef {
        super::app_user_role::Relation::AppRole.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::app_user_role::Relation::AppUser.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
