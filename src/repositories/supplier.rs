use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{product, supplier};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for supplier::Entity {
    const NAME: &'static str = "Supplier";
    const RELATIONS: &'static [&'static str] = &["products"];

    fn audit_columns() -> Option<AuditColumns<supplier::Column>> {
        Some(AuditColumns {
            created_at: supplier::Column::CreatedAt,
            updated_at: supplier::Column::UpdatedAt,
            deleted_at: supplier::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[supplier::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "products" => embed(models.load_many(live_query::<product::Entity>(), db).await?),
            other => Err(unknown_relation::<supplier::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct SupplierRepository {
    base: EntityRepository<supplier::Entity>,
}

impl SupplierRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn products_of(&self, supplier_id: i32) -> RepositoryResult<Vec<product::Model>> {
        self.get_by_id(supplier_id).await?;
        Ok(live_query::<product::Entity>()
            .filter(product::Column::SupplierId.eq(supplier_id))
            .all(self.db())
            .await?)
    }
}

impl Deref for SupplierRepository {
    type Target = EntityRepository<supplier::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
