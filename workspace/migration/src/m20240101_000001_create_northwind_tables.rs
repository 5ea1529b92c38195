use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Appends the `created_at`/`updated_at`/`deleted_at` columns shared by the
/// audited tables.
fn audited(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(timestamp_with_time_zone(Audit::CreatedAt))
        .col(timestamp_with_time_zone_null(Audit::UpdatedAt))
        .col(timestamp_with_time_zone_null(Audit::DeletedAt))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create regions table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(Regions::Table)
                        .if_not_exists()
                        .col(pk_auto(Regions::Id))
                        .col(string(Regions::Description)),
                )
                .to_owned(),
            )
            .await?;

        // Create territories table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(Territories::Table)
                        .if_not_exists()
                        .col(pk_auto(Territories::Id))
                        .col(string(Territories::Description))
                        .col(integer(Territories::RegionId))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_territories_region")
                                .from(Territories::Table, Territories::RegionId)
                                .to(Regions::Table, Regions::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::Name))
                    .col(string_null(Categories::Description))
                    .to_owned(),
            )
            .await?;

        // Create suppliers table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(pk_auto(Suppliers::Id))
                        .col(string(Suppliers::CompanyName))
                        .col(string_null(Suppliers::ContactName))
                        .col(string_null(Suppliers::ContactTitle))
                        .col(string_null(Suppliers::Address))
                        .col(string_null(Suppliers::City))
                        .col(string_null(Suppliers::Region))
                        .col(string_null(Suppliers::PostalCode))
                        .col(string_null(Suppliers::Country))
                        .col(string_null(Suppliers::Phone))
                        .col(string_null(Suppliers::Fax))
                        .col(string_null(Suppliers::HomePage)),
                )
                .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(pk_auto(Products::Id))
                        .col(string(Products::Name))
                        .col(integer_null(Products::SupplierId))
                        .col(integer_null(Products::CategoryId))
                        .col(string_null(Products::QuantityPerUnit))
                        .col(decimal_null(Products::UnitPrice).decimal_len(16, 4))
                        .col(integer_null(Products::UnitsInStock))
                        .col(integer_null(Products::UnitsOnOrder))
                        .col(integer_null(Products::ReorderLevel))
                        .col(boolean(Products::Discontinued).default(false))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_supplier")
                                .from(Products::Table, Products::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string(Customers::Code).unique_key())
                    .col(string(Customers::CompanyName))
                    .col(string_null(Customers::ContactName))
                    .col(string_null(Customers::ContactTitle))
                    .col(string_null(Customers::Address))
                    .col(string_null(Customers::City))
                    .col(string_null(Customers::Region))
                    .col(string_null(Customers::PostalCode))
                    .col(string_null(Customers::Country))
                    .col(string_null(Customers::Phone))
                    .col(string_null(Customers::Fax))
                    .to_owned(),
            )
            .await?;

        // Create customer_demographics table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(CustomerDemographics::Table)
                        .if_not_exists()
                        .col(pk_auto(CustomerDemographics::Id))
                        .col(string(CustomerDemographics::Description)),
                )
                .to_owned(),
            )
            .await?;

        // Create customer_customer_demographics table (join table)
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(CustomerCustomerDemographics::Table)
                        .if_not_exists()
                        .col(integer(CustomerCustomerDemographics::CustomerId))
                        .col(integer(CustomerCustomerDemographics::CustomerDemographicId))
                        .primary_key(
                            Index::create()
                                .name("pk_customer_customer_demographics")
                                .col(CustomerCustomerDemographics::CustomerId)
                                .col(CustomerCustomerDemographics::CustomerDemographicId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customer_customer_demographics_customer")
                                .from(
                                    CustomerCustomerDemographics::Table,
                                    CustomerCustomerDemographics::CustomerId,
                                )
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_customer_customer_demographics_demographic")
                                .from(
                                    CustomerCustomerDemographics::Table,
                                    CustomerCustomerDemographics::CustomerDemographicId,
                                )
                                .to(CustomerDemographics::Table, CustomerDemographics::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create employees table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(pk_auto(Employees::Id))
                        .col(string(Employees::LastName))
                        .col(string(Employees::FirstName))
                        .col(string_null(Employees::Title))
                        .col(string_null(Employees::TitleOfCourtesy))
                        .col(date_null(Employees::BirthDate))
                        .col(date_null(Employees::HireDate))
                        .col(string_null(Employees::Address))
                        .col(string_null(Employees::City))
                        .col(string_null(Employees::Region))
                        .col(string_null(Employees::PostalCode))
                        .col(string_null(Employees::Country))
                        .col(string_null(Employees::HomePhone))
                        .col(string_null(Employees::Extension))
                        .col(text_null(Employees::Notes))
                        .col(integer_null(Employees::ReportsTo))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_reports_to")
                                .from(Employees::Table, Employees::ReportsTo)
                                .to(Employees::Table, Employees::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create employee_territories table (join table)
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(EmployeeTerritories::Table)
                        .if_not_exists()
                        .col(integer(EmployeeTerritories::EmployeeId))
                        .col(integer(EmployeeTerritories::TerritoryId))
                        .primary_key(
                            Index::create()
                                .name("pk_employee_territories")
                                .col(EmployeeTerritories::EmployeeId)
                                .col(EmployeeTerritories::TerritoryId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employee_territories_employee")
                                .from(EmployeeTerritories::Table, EmployeeTerritories::EmployeeId)
                                .to(Employees::Table, Employees::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employee_territories_territory")
                                .from(EmployeeTerritories::Table, EmployeeTerritories::TerritoryId)
                                .to(Territories::Table, Territories::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create shippers table
        manager
            .create_table(
                Table::create()
                    .table(Shippers::Table)
                    .if_not_exists()
                    .col(pk_auto(Shippers::Id))
                    .col(string(Shippers::CompanyName))
                    .col(string_null(Shippers::Phone))
                    .to_owned(),
            )
            .await?;

        // Create orders table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(pk_auto(Orders::Id))
                        .col(integer_null(Orders::CustomerId))
                        .col(integer_null(Orders::EmployeeId))
                        .col(date_null(Orders::OrderDate))
                        .col(date_null(Orders::RequiredDate))
                        .col(date_null(Orders::ShippedDate))
                        .col(integer_null(Orders::ShipVia))
                        .col(decimal_null(Orders::Freight).decimal_len(16, 4))
                        .col(string_null(Orders::ShipName))
                        .col(string_null(Orders::ShipAddress))
                        .col(string_null(Orders::ShipCity))
                        .col(string_null(Orders::ShipRegion))
                        .col(string_null(Orders::ShipPostalCode))
                        .col(string_null(Orders::ShipCountry))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_employee")
                                .from(Orders::Table, Orders::EmployeeId)
                                .to(Employees::Table, Employees::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_shipper")
                                .from(Orders::Table, Orders::ShipVia)
                                .to(Shippers::Table, Shippers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create order_details table
        manager
            .create_table(
                audited(
                    Table::create()
                        .table(OrderDetails::Table)
                        .if_not_exists()
                        .col(integer(OrderDetails::OrderId))
                        .col(integer(OrderDetails::ProductId))
                        .col(decimal(OrderDetails::UnitPrice).decimal_len(16, 4))
                        .col(integer(OrderDetails::Quantity).default(1))
                        .col(decimal(OrderDetails::Discount).decimal_len(16, 4).default(0))
                        .primary_key(
                            Index::create()
                                .name("pk_order_details")
                                .col(OrderDetails::OrderId)
                                .col(OrderDetails::ProductId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_order")
                                .from(OrderDetails::Table, OrderDetails::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_details_product")
                                .from(OrderDetails::Table, OrderDetails::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(OrderDetails::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Shippers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EmployeeTerritories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CustomerCustomerDemographics::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CustomerDemographics::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Territories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Regions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Audit {
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Regions {
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum Territories {
    Table,
    Id,
    Description,
    RegionId,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    CompanyName,
    ContactName,
    ContactTitle,
    Address,
    City,
    Region,
    PostalCode,
    Country,
    Phone,
    Fax,
    HomePage,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    SupplierId,
    CategoryId,
    QuantityPerUnit,
    UnitPrice,
    UnitsInStock,
    UnitsOnOrder,
    ReorderLevel,
    Discontinued,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Code,
    CompanyName,
    ContactName,
    ContactTitle,
    Address,
    City,
    Region,
    PostalCode,
    Country,
    Phone,
    Fax,
}

#[derive(DeriveIden)]
enum CustomerDemographics {
    Table,
    Id,
    Description,
}

#[derive(DeriveIden)]
enum CustomerCustomerDemographics {
    Table,
    CustomerId,
    CustomerDemographicId,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    LastName,
    FirstName,
    Title,
    TitleOfCourtesy,
    BirthDate,
    HireDate,
    Address,
    City,
    Region,
    PostalCode,
    Country,
    HomePhone,
    Extension,
    Notes,
    ReportsTo,
}

#[derive(DeriveIden)]
enum EmployeeTerritories {
    Table,
    EmployeeId,
    TerritoryId,
}

#[derive(DeriveIden)]
enum Shippers {
    Table,
    Id,
    CompanyName,
    Phone,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    CustomerId,
    EmployeeId,
    OrderDate,
    RequiredDate,
    ShippedDate,
    ShipVia,
    Freight,
    ShipName,
    ShipAddress,
    ShipCity,
    ShipRegion,
    ShipPostalCode,
    ShipCountry,
}

#[derive(DeriveIden)]
enum OrderDetails {
    Table,
    OrderId,
    ProductId,
    UnitPrice,
    Quantity,
    Discount,
}
