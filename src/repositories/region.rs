use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{region, territory};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for region::Entity {
    const NAME: &'static str = "Region";
    const RELATIONS: &'static [&'static str] = &["territories"];

    fn audit_columns() -> Option<AuditColumns<region::Column>> {
        Some(AuditColumns {
            created_at: region::Column::CreatedAt,
            updated_at: region::Column::UpdatedAt,
            deleted_at: region::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[region::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "territories" => embed(models.load_many(live_query::<territory::Entity>(), db).await?),
            other => Err(unknown_relation::<region::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct RegionRepository {
    base: EntityRepository<region::Entity>,
}

impl RegionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn territories_of(&self, region_id: i32) -> RepositoryResult<Vec<territory::Model>> {
        self.get_by_id(region_id).await?;
        Ok(live_query::<territory::Entity>()
            .filter(territory::Column::RegionId.eq(region_id))
            .all(self.db())
            .await?)
    }
}

impl Deref for RegionRepository {
    type Target = EntityRepository<region::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
