use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{customer, employee, order, order_detail, product, shipper};
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, LoaderTrait};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument};

use super::base::{embed, live_query, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for order::Entity {
    const NAME: &'static str = "Order";
    const RELATIONS: &'static [&'static str] = &["customer", "employee", "shipper", "order_details"];

    fn audit_columns() -> Option<AuditColumns<order::Column>> {
        Some(AuditColumns {
            created_at: order::Column::CreatedAt,
            updated_at: order::Column::UpdatedAt,
            deleted_at: order::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[order::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "customer" => embed(models.load_one(live_query::<customer::Entity>(), db).await?),
            "employee" => embed(models.load_one(live_query::<employee::Entity>(), db).await?),
            "shipper" => embed(models.load_one(live_query::<shipper::Entity>(), db).await?),
            "order_details" => {
                embed(models.load_many(live_query::<order_detail::Entity>(), db).await?)
            }
            other => Err(unknown_relation::<order::Entity>(other)),
        }
    }
}

#[async_trait]
impl BaseEntity for order_detail::Entity {
    const NAME: &'static str = "OrderDetail";
    const RELATIONS: &'static [&'static str] = &["order", "product"];

    fn audit_columns() -> Option<AuditColumns<order_detail::Column>> {
        Some(AuditColumns {
            created_at: order_detail::Column::CreatedAt,
            updated_at: order_detail::Column::UpdatedAt,
            deleted_at: order_detail::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[order_detail::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "order" => embed(models.load_one(live_query::<order::Entity>(), db).await?),
            "product" => embed(models.load_one(live_query::<product::Entity>(), db).await?),
            other => Err(unknown_relation::<order_detail::Entity>(other)),
        }
    }
}

/// Orders and their line items.
#[derive(Clone)]
pub struct OrderRepository {
    base: EntityRepository<order::Entity>,
    details: EntityRepository<order_detail::Entity>,
}

impl OrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db.clone()),
            details: EntityRepository::new(db),
        }
    }

    /// Line items of an order, by product id.
    #[instrument(skip(self))]
    pub async fn details_of(&self, order_id: i32) -> RepositoryResult<Vec<order_detail::Model>> {
        self.get_by_id(order_id).await?;
        self.details
            .find_all(order_detail::Column::OrderId.eq(order_id))
            .await
    }

    /// Inserts an order and its lines atomically; any failing line rolls
    /// the whole order back.
    #[instrument(skip(self, order, lines), fields(lines = lines.len()))]
    pub async fn create_with_details(
        &self,
        order: order::ActiveModel,
        lines: Vec<order_detail::ActiveModel>,
    ) -> RepositoryResult<(order::Model, Vec<order_detail::Model>)> {
        let txn = self.begin().await?;

        let created = self.create_in(&txn, order).await?;
        debug!("Order {} inserted, adding {} lines", created.id, lines.len());

        let mut details = Vec::with_capacity(lines.len());
        for mut line in lines {
            line.order_id = Set(created.id);
            details.push(self.details.create_in(&txn, line).await?);
        }

        txn.commit().await?;
        info!("Order {} created with {} lines", created.id, details.len());
        Ok((created, details))
    }

    #[instrument(skip(self, line))]
    pub async fn add_detail(
        &self,
        order_id: i32,
        mut line: order_detail::ActiveModel,
    ) -> RepositoryResult<order_detail::Model> {
        self.get_by_id(order_id).await?;
        line.order_id = Set(order_id);
        self.details.create(line).await
    }

    #[instrument(skip(self))]
    pub async fn remove_detail(&self, order_id: i32, product_id: i32) -> RepositoryResult<()> {
        self.details.delete_by_id((order_id, product_id)).await
    }
}

impl Deref for OrderRepository {
    type Target = EntityRepository<order::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{CustomerRepository, QueryOptions, RepositoryError};
    use crate::test_utils::test_utils::setup_test_db;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait};

    async fn seed_products(db: &DatabaseConnection) -> (i32, i32) {
        let mut ids = Vec::new();
        for name in ["Chai", "Chang"] {
            let product = product::ActiveModel {
                name: Set(name.to_string()),
                discontinued: Set(false),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap();
            ids.push(product.id);
        }
        (ids[0], ids[1])
    }

    fn line(product_id: i32, quantity: i32) -> order_detail::ActiveModel {
        order_detail::ActiveModel {
            product_id: Set(product_id),
            unit_price: Set(Decimal::new(185, 1)),
            quantity: Set(quantity),
            discount: Set(Decimal::ZERO),
            ..Default::default()
        }
    }

    fn new_order(customer_id: i32) -> order::ActiveModel {
        order::ActiveModel {
            customer_id: Set(Some(customer_id)),
            ship_city: Set(Some("Berlin".to_string())),
            ..Default::default()
        }
    }

    async fn seed_customer(db: &DatabaseConnection) -> i32 {
        CustomerRepository::new(db.clone())
            .create(customer::ActiveModel {
                code: Set("ALFKI".to_string()),
                company_name: Set("Alfreds Futterkiste".to_string()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_with_details() {
        let db = setup_test_db().await;
        let orders = OrderRepository::new(db.clone());
        let customer_id = seed_customer(&db).await;
        let (chai, chang) = seed_products(&db).await;

        let (order, details) = orders
            .create_with_details(new_order(customer_id), vec![line(chai, 4), line(chang, 2)])
            .await
            .unwrap();
        assert_eq!(details.len(), 2);
        assert!(details.iter().all(|d| d.order_id == order.id));

        let stored = orders.details_of(order.id).await.unwrap();
        assert_eq!(
            stored.iter().map(|d| d.product_id).collect::<Vec<_>>(),
            vec![chai, chang]
        );

        let expanded = orders
            .get_by_id_with(order.id, &QueryOptions::include_paths("customer,order_details"))
            .await
            .unwrap();
        assert_eq!(expanded.related["customer"]["code"], "ALFKI");
        assert_eq!(expanded.related["order_details"].as_array().map(Vec::len), Some(2));

        let customers = CustomerRepository::new(db);
        assert_eq!(customers.orders_of(customer_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_order() {
        let db = setup_test_db().await;
        let orders = OrderRepository::new(db.clone());
        let customer_id = seed_customer(&db).await;
        let (chai, _) = seed_products(&db).await;

        // The same product twice violates the line item key.
        let result = orders
            .create_with_details(new_order(customer_id), vec![line(chai, 1), line(chai, 2)])
            .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        assert_eq!(order::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(order_detail::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_and_remove_detail() {
        let db = setup_test_db().await;
        let orders = OrderRepository::new(db.clone());
        let customer_id = seed_customer(&db).await;
        let (chai, chang) = seed_products(&db).await;

        let (order, _) = orders
            .create_with_details(new_order(customer_id), vec![line(chai, 1)])
            .await
            .unwrap();

        let added = orders.add_detail(order.id, line(chang, 6)).await.unwrap();
        assert_eq!(added.order_id, order.id);
        assert_eq!(orders.details_of(order.id).await.unwrap().len(), 2);

        orders.remove_detail(order.id, chai).await.unwrap();
        assert_eq!(orders.details_of(order.id).await.unwrap().len(), 1);
        assert!(matches!(
            orders.remove_detail(order.id, chai).await,
            Err(RepositoryError::NotFound { .. })
        ));

        assert!(matches!(
            orders.add_detail(404, line(chai, 1)).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_deleting_order_removes_details() {
        let db = setup_test_db().await;
        let orders = OrderRepository::new(db.clone());
        let customer_id = seed_customer(&db).await;
        let (chai, chang) = seed_products(&db).await;

        let (order, _) = orders
            .create_with_details(new_order(customer_id), vec![line(chai, 1), line(chang, 1)])
            .await
            .unwrap();
        orders.delete_by_id(order.id).await.unwrap();

        assert_eq!(order_detail::Entity::find().count(&db).await.unwrap(), 0);
    }
}
