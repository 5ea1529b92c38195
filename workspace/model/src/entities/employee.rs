use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An employee handling orders.
///
/// `reports_to` points at the employee's manager. It is a plain identifier,
/// the hierarchy is walked with explicit lookups.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub title: Option<String>,
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<Date>,
    pub hire_date: Option<Date>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub home_phone: Option<String>,
    pub extension: Option<String>,
    pub notes: Option<String>,
    pub reports_to: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ReportsTo",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Manager,
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
    #[sea_orm(has_many = "super::employee_territory::Entity")]
    EmployeeTerritory,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::employee_territory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeTerritory.def()
    }
}

impl Related<super::territory::Entity> for Entity {
    fn to() -> RelationDef {
        super::employee_territory::Relation::Territory.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::employee_territory::Relation::Employee.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Full display name, e.g. "Nancy Davolio".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
