use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A customer company placing orders.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Five letter customer code, e.g. "ALFKI".
    #[sea_orm(unique)]
    pub code: String,
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
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
    #[sea_orm(has_many = "super::customer_customer_demographic::Entity")]
    CustomerCustomerDemographic,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::customer_customer_demographic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerCustomerDemographic.def()
    }
}

// Many-to-many through customer_customer_demographics.
impl Related<super::customer_demographic::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_customer_demographic::Relation::CustomerDemographic.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_customer_demographic::Relation::Customer.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
