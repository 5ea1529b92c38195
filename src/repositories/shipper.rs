use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{order, shipper};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, BaseEntity, EntityRepository};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for shipper::Entity {
    const NAME: &'static str = "Shipper";
    const RELATIONS: &'static [&'static str] = &["orders"];

    async fn expand(
        db: &DatabaseConnection,
        models: &[shipper::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "orders" => embed(models.load_many(live_query::<order::Entity>(), db).await?),
            other => Err(unknown_relation::<shipper::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct ShipperRepository {
    base: EntityRepository<shipper::Entity>,
}

impl ShipperRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    /// Orders carried by a shipper.
    #[instrument(skip(self))]
    pub async fn orders_of(&self, shipper_id: i32) -> RepositoryResult<Vec<order::Model>> {
        self.get_by_id(shipper_id).await?;
        Ok(live_query::<order::Entity>()
            .filter(order::Column::ShipVia.eq(shipper_id))
            .all(self.db())
            .await?)
    }
}

impl Deref for ShipperRepository {
    type Target = EntityRepository<shipper::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
