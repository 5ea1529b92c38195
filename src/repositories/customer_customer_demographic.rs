use async_trait::async_trait;
use model::entities::{customer, customer_customer_demographic as link, customer_demographic};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait, QueryFilter};
use serde_json::Value as JsonValue;

use super::base::{
    embed, group_through, live_query, unknown_relation, AuditColumns, BaseEntity,
};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for link::Entity {
    const NAME: &'static str = "CustomerCustomerDemographic";
    const RELATIONS: &'static [&'static str] = &["customer", "customer_demographic"];

    fn audit_columns() -> Option<AuditColumns<link::Column>> {
        Some(AuditColumns {
            created_at: link::Column::CreatedAt,
            updated_at: link::Column::UpdatedAt,
            deleted_at: link::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[link::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "customer" => embed(models.load_one(live_query::<customer::Entity>(), db).await?),
            "customer_demographic" => {
                embed(models.load_one(live_query::<customer_demographic::Entity>(), db).await?)
            }
            other => Err(unknown_relation::<link::Entity>(other)),
        }
    }
}

/// Demographics of each customer, following live links only.
pub(crate) async fn demographics_for(
    db: &DatabaseConnection,
    customer_ids: &[i32],
) -> RepositoryResult<Vec<Vec<customer_demographic::Model>>> {
    let links: Vec<(i32, i32)> = live_query::<link::Entity>()
        .filter(link::Column::CustomerId.is_in(customer_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|l| (l.customer_id, l.customer_demographic_id))
        .collect();
    let demographics = live_query::<customer_demographic::Entity>()
        .filter(customer_demographic::Column::Id.is_in(links.iter().map(|(_, d)| *d)))
        .all(db)
        .await?;
    Ok(group_through(customer_ids, &links, &demographics, |d| d.id))
}

/// Customers in each demographic, following live links only.
pub(crate) async fn customers_for(
    db: &DatabaseConnection,
    demographic_ids: &[i32],
) -> RepositoryResult<Vec<Vec<customer::Model>>> {
    let links: Vec<(i32, i32)> = live_query::<link::Entity>()
        .filter(link::Column::CustomerDemographicId.is_in(demographic_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|l| (l.customer_demographic_id, l.customer_id))
        .collect();
    let customers = live_query::<customer::Entity>()
        .filter(customer::Column::Id.is_in(links.iter().map(|(_, c)| *c)))
        .all(db)
        .await?;
    Ok(group_through(demographic_ids, &links, &customers, |c| c.id))
}
