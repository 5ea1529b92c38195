use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{category, order_detail, product, supplier};
use sea_orm::{ColumnTrait, DatabaseConnection, LoaderTrait};
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::base::{embed, live_query, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::error::RepositoryResult;

#[async_trait]
impl BaseEntity for product::Entity {
    const NAME: &'static str = "Product";
    const RELATIONS: &'static [&'static str] = &["category", "supplier", "order_details"];

    fn audit_columns() -> Option<AuditColumns<product::Column>> {
        Some(AuditColumns {
            created_at: product::Column::CreatedAt,
            updated_at: product::Column::UpdatedAt,
            deleted_at: product::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[product::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        match relation {
            "category" => embed(models.load_one(live_query::<category::Entity>(), db).await?),
            "supplier" => embed(models.load_one(live_query::<supplier::Entity>(), db).await?),
            "order_details" => {
                embed(models.load_many(live_query::<order_detail::Entity>(), db).await?)
            }
            other => Err(unknown_relation::<product::Entity>(other)),
        }
    }
}

#[derive(Clone)]
pub struct ProductRepository {
    base: EntityRepository<product::Entity>,
}

impl ProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn by_category(&self, category_id: i32) -> RepositoryResult<Vec<product::Model>> {
        self.find_all(product::Column::CategoryId.eq(category_id)).await
    }

    #[instrument(skip(self))]
    pub async fn by_supplier(&self, supplier_id: i32) -> RepositoryResult<Vec<product::Model>> {
        self.find_all(product::Column::SupplierId.eq(supplier_id)).await
    }

    /// Products no longer sold.
    #[instrument(skip(self))]
    pub async fn discontinued(&self) -> RepositoryResult<Vec<product::Model>> {
        self.find_all(product::Column::Discontinued.eq(true)).await
    }
}

impl Deref for ProductRepository {
    type Target = EntityRepository<product::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{CategoryRepository, SupplierRepository};
    use crate::test_utils::test_utils::setup_test_db;
    use crate::repositories::QueryOptions;
    use rust_decimal::Decimal;
    use sea_orm::ActiveValue::Set;

    #[tokio::test]
    async fn test_product_lookups() {
        let db = setup_test_db().await;
        let categories = CategoryRepository::new(db.clone());
        let suppliers = SupplierRepository::new(db.clone());
        let products = ProductRepository::new(db);

        let beverages = categories
            .create(category::ActiveModel {
                name: Set("Beverages".to_string()),
                description: Set(None),
                ..Default::default()
            })
            .await
            .unwrap();
        let condiments = categories
            .create(category::ActiveModel {
                name: Set("Condiments".to_string()),
                description: Set(None),
                ..Default::default()
            })
            .await
            .unwrap();
        let exotic = suppliers
            .create(supplier::ActiveModel {
                company_name: Set("Exotic Liquids".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        for (name, category_id, discontinued) in [
            ("Chai", beverages.id, false),
            ("Aniseed Syrup", condiments.id, false),
            ("Chang", beverages.id, true),
        ] {
            products
                .create(product::ActiveModel {
                    name: Set(name.to_string()),
                    supplier_id: Set(Some(exotic.id)),
                    category_id: Set(Some(category_id)),
                    unit_price: Set(Some(Decimal::new(185, 1))),
                    discontinued: Set(discontinued),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let drinks = products.by_category(beverages.id).await.unwrap();
        assert_eq!(
            drinks.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["Chai", "Chang"]
        );
        assert_eq!(categories.products_of(beverages.id).await.unwrap(), drinks);

        assert_eq!(products.by_supplier(exotic.id).await.unwrap().len(), 3);
        assert_eq!(suppliers.products_of(exotic.id).await.unwrap().len(), 3);

        let retired = products.discontinued().await.unwrap();
        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].name, "Chang");

        let chai = products
            .get(&QueryOptions::new().include("category,supplier"))
            .await
            .unwrap()
            .expect("chai");
        assert_eq!(chai.related["category"]["name"], "Beverages");
        assert_eq!(chai.related["supplier"]["company_name"], "Exotic Liquids");
    }

    #[tokio::test]
    async fn test_products_of_missing_category() {
        let db = setup_test_db().await;
        let categories = CategoryRepository::new(db);

        assert!(categories.products_of(99).await.is_err());
    }
}
