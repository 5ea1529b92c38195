use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{customer, customer_customer_demographic as link, customer_demographic};
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use serde_json::Value as JsonValue;
use tracing::{info, instrument};

use super::base::{embed, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::customer_customer_demographic::customers_for;
use super::error::{RepositoryError, RepositoryResult};

#[async_trait]
impl BaseEntity for customer_demographic::Entity {
    const NAME: &'static str = "CustomerDemographic";
    const RELATIONS: &'static [&'static str] = &["customers"];

    fn audit_columns() -> Option<AuditColumns<customer_demographic::Column>> {
        Some(AuditColumns {
            created_at: customer_demographic::Column::CreatedAt,
            updated_at: customer_demographic::Column::UpdatedAt,
            deleted_at: customer_demographic::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[customer_demographic::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "customers" => {
                let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
                embed(customers_for(db, &ids).await?)
            }
            other => Err(unknown_relation::<customer_demographic::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct CustomerDemographicRepository {
    base: EntityRepository<customer_demographic::Entity>,
    customers: EntityRepository<customer::Entity>,
    links: EntityRepository<link::Entity>,
}

impl CustomerDemographicRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db.clone()),
            customers: EntityRepository::new(db.clone()),
            links: EntityRepository::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn customers_of(&self, demographic_id: i32) -> RepositoryResult<Vec<customer::Model>> {
        self.get_by_id(demographic_id).await?;
        Ok(customers_for(self.db(), &[demographic_id])
            .await?
            .pop()
            .unwrap_or_default())
    }

    /// Links a customer to a demographic. An archived link is restored.
    #[instrument(skip(self))]
    pub async fn assign(&self, customer_id: i32, demographic_id: i32) -> RepositoryResult<link::Model> {
        self.customers.get_by_id(customer_id).await?;
        self.get_by_id(demographic_id).await?;

        match self.links.get_by_id((customer_id, demographic_id)).await {
            Ok(_) => {
                return Err(RepositoryError::Conflict(format!(
                    "customer {customer_id} is already in demographic {demographic_id}"
                )));
            }
            Err(RepositoryError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let assigned = match self.links.restore_by_id((customer_id, demographic_id)).await {
            Err(RepositoryError::NotFound { .. }) => {
                self.links
                    .create(link::ActiveModel {
                        customer_id: Set(customer_id),
                        customer_demographic_id: Set(demographic_id),
                        ..Default::default()
                    })
                    .await?
            }
            other => other?,
        };
        info!("Customer {} assigned to demographic {}", customer_id, demographic_id);
        Ok(assigned)
    }

    #[instrument(skip(self))]
    pub async fn unassign(&self, customer_id: i32, demographic_id: i32) -> RepositoryResult<()> {
        self.links.delete_by_id((customer_id, demographic_id)).await
    }
}

impl Deref for CustomerDemographicRepository {
    type Target = EntityRepository<customer_demographic::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::CustomerRepository;
    use crate::test_utils::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_assign_and_unassign_demographics() {
        let db = setup_test_db().await;
        let customers = CustomerRepository::new(db.clone());
        let demographics = CustomerDemographicRepository::new(db);

        let alfki = customers
            .create(customer::ActiveModel {
                code: Set("ALFKI".to_string()),
                company_name: Set("Alfreds Futterkiste".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let retail = demographics
            .create(customer_demographic::ActiveModel {
                description: Set("Retail".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        demographics.assign(alfki.id, retail.id).await.unwrap();
        assert!(matches!(
            demographics.assign(alfki.id, retail.id).await,
            Err(RepositoryError::Conflict(_))
        ));

        let members = demographics.customers_of(retail.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].code, "ALFKI");
        assert_eq!(customers.demographics_of(alfki.id).await.unwrap(), vec![retail.clone()]);
        assert_eq!(customers.find_by_code("ALFKI").await.unwrap().id, alfki.id);

        demographics.unassign(alfki.id, retail.id).await.unwrap();
        assert!(customers.demographics_of(alfki.id).await.unwrap().is_empty());
        assert!(matches!(
            demographics.unassign(alfki.id, retail.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_assign_unknown_customer() {
        let db = setup_test_db().await;
        let demographics = CustomerDemographicRepository::new(db);
        let retail = demographics
            .create(customer_demographic::ActiveModel {
                description: Set("Retail".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(
            demographics.assign(404, retail.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
