use async_trait::async_trait;
use model::entities::{employee, employee_territory, territory};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;

use super::base::{
    embed, group_through, live_query, unknown_relation, AuditColumns, BaseEntity,
};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for employee_territory::Entity {
    const NAME: &'static str = "EmployeeTerritory";
    const RELATIONS: &'static [&'static str] = &["employee", "territory"];

    fn audit_columns() -> Option<AuditColumns<employee_territory::Column>> {
        Some(AuditColumns {
            created_at: employee_territory::Column::CreatedAt,
            updated_at: employee_territory::Column::UpdatedAt,
            deleted_at: employee_territory::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[employee_territory::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "employee" => embed(models.load_one(live_query::<employee::Entity>(), db).await?),
            "territory" => embed(models.load_one(live_query::<territory::Entity>(), db).await?),
            other => Err(unknown_relation::<employee_territory::Entity>(other)),
        }
    }
}

/// Territories of each employee, following live assignments only.
pub(crate) async fn territories_for(
    db: &DatabaseConnection,
    employee_ids: &[i32],
) -> RepositoryResult<Vec<Vec<territory::Model>>> {
    let links: Vec<(i32, i32)> = live_query::<employee_territory::Entity>()
        .filter(employee_territory::Column::EmployeeId.is_in(employee_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|link| (link.employee_id, link.territory_id))
        .collect();
    let territories = live_query::<territory::Entity>()
        .filter(territory::Column::Id.is_in(links.iter().map(|(_, t)| *t)))
        .all(db)
        .await?;
    Ok(group_through(employee_ids, &links, &territories, |t| t.id))
}

/// Employees assigned to each territory, following live assignments only.
pub(crate) async fn employees_for(
    db: &DatabaseConnection,
    territory_ids: &[i32],
) -> RepositoryResult<Vec<Vec<employee::Model>>> {
    let links: Vec<(i32, i32)> = live_query::<employee_territory::Entity>()
        .filter(employee_territory::Column::TerritoryId.is_in(territory_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|link| (link.territory_id, link.employee_id))
        .collect();
    let employees = live_query::<employee::Entity>()
        .filter(employee::Column::Id.is_in(links.iter().map(|(_, e)| *e)))
        .all(db)
        .await?;
    Ok(group_through(territory_ids, &links, &employees, |e| e.id))
}
