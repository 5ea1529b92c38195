use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{customer, customer_demographic, order};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, BaseEntity, EntityRepository};
use super::customer_customer_demographic::demographics_for;
use super::error::{RepositoryError, RepositoryResult};

#[async_trait]
impl BaseEntity for customer::Entity {
    const NAME: &'static str = "Customer";
    const RELATIONS: &'static [&'static str] = &["orders", "customer_demographics"];

    async fn expand(
        db: &DatabaseConnection,
        models: &[customer::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "orders" => embed(models.load_many(live_query::<order::Entity>(), db).await?),
            "customer_demographics" => {
                let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
                embed(demographics_for(db, &ids).await?)
            }
            other => Err(unknown_relation::<customer::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct CustomerRepository {
    base: EntityRepository<customer::Entity>,
}

impl CustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    /// Looks a customer up by its short code, e.g. "ALFKI".
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &str) -> RepositoryResult<customer::Model> {
        self.find_all(customer::Column::Code.eq(code))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::not_found(customer::Entity::NAME, code))
    }

    #[instrument(skip(self))]
    pub async fn orders_of(&self, customer_id: i32) -> RepositoryResult<Vec<order::Model>> {
        self.get_by_id(customer_id).await?;
        Ok(live_query::<order::Entity>()
            .filter(order::Column::CustomerId.eq(customer_id))
            .all(self.db())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn demographics_of(
        &self,
        customer_id: i32,
    ) -> RepositoryResult<Vec<customer_demographic::Model>> {
        self.get_by_id(customer_id).await?;
        Ok(demographics_for(self.db(), &[customer_id])
            .await?
            .pop()
            .unwrap_or_default())
    }
}

impl Deref for CustomerRepository {
    type Target = EntityRepository<customer::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
