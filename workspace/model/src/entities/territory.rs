use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sales territory within a region.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "territories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub region_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::region::Entity",
        from = "Column::RegionId",
        to = "super::region::Column::Id",
        on_delete = "Cascade"
    )]
    Region,
    #[sea_orm(has_many = "super::employee_territory::Entity")]
    EmployeeTerritory,
}

impl Related<super::region::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Region.def()
    }
}

impl Related<super::employee_territory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeTerritory.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        super::employee_territory::Relation::Employee.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::employee_territory::Relation::Territory.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
