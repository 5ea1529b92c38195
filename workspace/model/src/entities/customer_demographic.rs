use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A customer segment (e.g. "Retail", "Wholesale").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_demographics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_customer_demographic::Entity")]
    CustomerCustomerDemographic,
}

impl Related<super::customer_customer_demographic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerCustomerDemographic.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_customer_demographic::Relation::Customer.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_customer_demographic::Relation::CustomerDemographic.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
