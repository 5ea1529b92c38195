use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{employee, region, territory};
use sea_orm::{DatabaseConnection, LoaderTrait};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::employee_territory::employees_for;
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for territory::Entity {
    const NAME: &'static str = "Territory";
    const RELATIONS: &'static [&'static str] = &["region", "employees"];

    fn audit_columns() -> Option<AuditColumns<territory::Column>> {
        Some(AuditColumns {
            created_at: territory::Column::CreatedAt,
            updated_at: territory::Column::UpdatedAt,
            deleted_at: territory::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[territory::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "region" => embed(models.load_one(live_query::<region::Entity>(), db).await?),
            "employees" => {
                let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
                embed(employees_for(db, &ids).await?)
            }
            other => Err(unknown_relation::<territory::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct TerritoryRepository {
    base: EntityRepository<territory::Entity>,
}

impl TerritoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    /// Employees currently assigned to a territory.
    #[instrument(skip(self))]
    pub async fn employees_of(&self, territory_id: i32) -> RepositoryResult<Vec<employee::Model>> {
        self.get_by_id(territory_id).await?;
        Ok(employees_for(self.db(), &[territory_id])
            .await?
            .pop()
            .unwrap_or_default())
    }
}

impl Deref for TerritoryRepository {
    type Target = EntityRepository<territory::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
