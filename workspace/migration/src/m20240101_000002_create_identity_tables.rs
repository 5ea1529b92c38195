use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create app_users table
        manager
            .create_table(
                Table::create()
                    .table(AppUsers::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUsers::Id))
                    .col(string(AppUsers::UserName).unique_key())
                    .col(string(AppUsers::NormalizedUserName).unique_key())
                    .col(string(AppUsers::Email))
                    .col(string(AppUsers::NormalizedEmail))
                    .col(string(AppUsers::PasswordHash))
                    .col(string_null(AppUsers::FirstName))
                    .col(string_null(AppUsers::LastName))
                    .col(timestamp_with_time_zone(AppUsers::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_app_users_normalized_email")
                    .table(AppUsers::Table)
                    .col(AppUsers::NormalizedEmail)
                    .to_owned(),
            )
            .await?;

        // Create app_roles table
        manager
            .create_table(
                Table::create()
                    .table(AppRoles::Table)
                    .if_not_exists()
                    .col(pk_auto(AppRoles::Id))
                    .col(string(AppRoles::Name))
                    .col(string(AppRoles::NormalizedName).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create app_user_roles table (join table)
        manager
            .create_table(
                Table::create()
                    .table(AppUserRoles::Table)
                    .if_not_exists()
                    .col(integer(AppUserRoles::UserId))
                    .col(integer(AppUserRoles::RoleId))
                    .primary_key(
                        Index::create()
                            .name("pk_app_user_roles")
                            .col(AppUserRoles::UserId)
                            .col(AppUserRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_roles_user")
                            .from(AppUserRoles::Table, AppUserRoles::UserId)
                            .to(AppUsers::Table, AppUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_roles_role")
                            .from(AppUserRoles::Table, AppUserRoles::RoleId)
                            .to(AppRoles::Table, AppRoles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create app_user_claims table
        manager
            .create_table(
                Table::create()
                    .table(AppUserClaims::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUserClaims::Id))
                    .col(integer(AppUserClaims::UserId))
                    .col(string(AppUserClaims::ClaimType))
                    .col(string(AppUserClaims::ClaimValue))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_claims_user")
                            .from(AppUserClaims::Table, AppUserClaims::UserId)
                            .to(AppUsers::Table, AppUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppUserClaims::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AppUserRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AppRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AppUsers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AppUsers {
    Table,
    Id,
    UserName,
    NormalizedUserName,
    Email,
    NormalizedEmail,
    PasswordHash,
    FirstName,
    LastName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AppRoles {
    Table,
    Id,
    Name,
    NormalizedName,
}

#[derive(DeriveIden)]
enum AppUserRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum AppUserClaims {
    Table,
    Id,
    UserId,
    ClaimType,
    ClaimValue,
}
