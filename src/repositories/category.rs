use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{category, product};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, BaseEntity, EntityRepository};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for category::Entity {
    const NAME: &'static str = "Category";
    const RELATIONS: &'static [&'static str] = &["products"];

    async fn expand(
        db: &DatabaseConnection,
        models: &[category::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "products" => embed(models.load_many(live_query::<product::Entity>(), db).await?),
            other => Err(unknown_relation::<category::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct CategoryRepository {
    base: EntityRepository<category::Entity>,
}

impl CategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    /// Products of a category, by id ascending.
    #[instrument(skip(self))]
    pub async fn products_of(&self, category_id: i32) -> RepositoryResult<Vec<product::Model>> {
        self.get_by_id(category_id).await?;
        Ok(live_query::<product::Entity>()
            .filter(product::Column::CategoryId.eq(category_id))
            .all(self.db())
            .await?)
    }
}

impl Deref for CategoryRepository {
    type Target = EntityRepository<category::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
