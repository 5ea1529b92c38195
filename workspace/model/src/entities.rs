//! SeaORM entities for the Northwind sales schema and the identity tables
//! backing user accounts.

pub mod app_role;
pub mod app_user;
pub mod app_user_claim;
pub mod app_user_role;
pub mod category;
pub mod customer;
pub mod customer_customer_demographic;
pub mod customer_demographic;
pub mod employee;
pub mod employee_territory;
pub mod order;
pub mod order_detail;
pub mod product;
pub mod region;
pub mod shipper;
pub mod supplier;
pub mod territory;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::app_role::Entity as AppRole;
    pub use super::app_user::Entity as AppUser;
    pub use super::app_user_claim::Entity as AppUserClaim;
    pub use super::app_user_role::Entity as AppUserRole;
    pub use super::category::Entity as Category;
    pub use super::customer::Entity as Customer;
    pub use super::customer_customer_demographic::Entity as CustomerCustomerDemographic;
    pub use super::customer_demographic::Entity as CustomerDemographic;
    pub use super::employee::Entity as Employee;
    pub use super::employee_territory::Entity as EmployeeTerritory;
    pub use super::order::Entity as Order;
    pub use super::order_detail::Entity as OrderDetail;
    pub use super::product::Entity as Product;
    pub use super::region::Entity as Region;
    pub use super::shipper::Entity as Shipper;
    pub use super::supplier::Entity as Supplier;
    pub use super::territory::Entity as Territory;
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, Utc};
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_employee(
        db: &DatabaseConnection,
        first: &str,
        last: &str,
        reports_to: Option<i32>,
    ) -> Result<employee::Model, DbErr> {
        employee::ActiveModel {
            first_name: Set(first.to_string()),
            last_name: Set(last.to_string()),
            reports_to: Set(reports_to),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let beverages = category::ActiveModel {
            name: Set("Beverages".to_string()),
            description: Set(Some("Soft drinks, coffees, teas".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let exotic = supplier::ActiveModel {
            company_name: Set("Exotic Liquids".to_string()),
            city: Set(Some("London".to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let chai = product::ActiveModel {
            name: Set("Chai".to_string()),
            supplier_id: Set(Some(exotic.id)),
            category_id: Set(Some(beverages.id)),
            unit_price: Set(Some(Decimal::new(185, 1))),
            discontinued: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let alfki = customer::ActiveModel {
            code: Set("ALFKI".to_string()),
            company_name: Set("Alfreds Futterkiste".to_string()),
            country: Set(Some("Germany".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let fuller = insert_employee(&db, "Andrew", "Fuller", None).await?;
        let davolio = insert_employee(&db, "Nancy", "Davolio", Some(fuller.id)).await?;
        assert_eq!(davolio.full_name(), "Nancy Davolio");

        let speedy = shipper::ActiveModel {
            company_name: Set("Speedy Express".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let order = order::ActiveModel {
            customer_id: Set(Some(alfki.id)),
            employee_id: Set(Some(davolio.id)),
            ship_via: Set(Some(speedy.id)),
            order_date: Set(NaiveDate::from_ymd_opt(1996, 7, 4)),
            freight: Set(Some(Decimal::new(3225, 2))),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let line = order_detail::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(chai.id),
            unit_price: Set(Decimal::new(185, 1)),
            quantity: Set(4),
            discount: Set(Decimal::new(25, 2)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        assert_eq!(line.line_total(), Some(Decimal::new(555, 1)));

        let eastern = region::ActiveModel {
            description: Set("Eastern".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        let westboro = territory::ActiveModel {
            description: Set("Westboro".to_string()),
            region_id: Set(eastern.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        employee_territory::ActiveModel {
            employee_id: Set(davolio.id),
            territory_id: Set(westboro.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let retail = customer_demographic::ActiveModel {
            description: Set("Retail".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        customer_customer_demographic::ActiveModel {
            customer_id: Set(alfki.id),
            customer_demographic_id: Set(retail.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Relations
        let products = beverages.find_related(Product).all(&db).await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Chai");

        let territories = davolio.find_related(Territory).all(&db).await?;
        assert_eq!(territories.len(), 1);
        assert_eq!(territories[0].description, "Westboro");

        let demographics = alfki.find_related(CustomerDemographic).all(&db).await?;
        assert_eq!(demographics.len(), 1);
        assert_eq!(demographics[0].description, "Retail");

        let reports = Employee::find()
            .filter(employee::Column::ReportsTo.eq(fuller.id))
            .all(&db)
            .await?;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, davolio.id);

        // Deleting the order removes its line items.
        order.delete(&db).await?;
        assert_eq!(OrderDetail::find().count(&db).await?, 0);

        // Deleting a manager detaches the direct reports.
        fuller.delete(&db).await?;
        let davolio = Employee::find_by_id(davolio.id).one(&db).await?.expect("employee");
        assert_eq!(davolio.reports_to, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_code_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        for name in ["Alfreds Futterkiste", "Ana Trujillo"] {
            let result = customer::ActiveModel {
                code: Set("ALFKI".to_string()),
                company_name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(&db)
            .await;
            if name == "Ana Trujillo" {
                assert!(result.is_err());
            } else {
                result?;
            }
        }

        assert_eq!(Customer::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_user_roles_and_claims() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let user = app_user::ActiveModel {
            user_name: Set("alice".to_string()),
            normalized_user_name: Set("ALICE".to_string()),
            email: Set("alice@example.com".to_string()),
            normalized_email: Set("ALICE@EXAMPLE.COM".to_string()),
            password_hash: Set("hash".to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        let admin = app_role::ActiveModel {
            name: Set("Admin".to_string()),
            normalized_name: Set("ADMIN".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        app_user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(admin.id),
        }
        .insert(&db)
        .await?;
        app_user_claim::ActiveModel {
            user_id: Set(user.id),
            claim_type: Set("Create Role".to_string()),
            claim_value: Set("true".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let roles = user.find_related(AppRole).all(&db).await?;
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "Admin");

        let json = serde_json::to_value(&user).expect("serialize");
        assert!(json.get("password_hash").is_none());

        user.delete(&db).await?;
        assert_eq!(AppUserRole::find().count(&db).await?, 0);
        assert_eq!(AppUserClaim::find().count(&db).await?, 0);
        Ok(())
    }
}
