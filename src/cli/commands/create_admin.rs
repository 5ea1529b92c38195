use anyhow::{Context, Result};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info};

use crate::identity::{claims, NewUser, RoleManager, UserManager, ADMIN_ROLE};

/// Creates `user_name` in the Admin role with every catalog claim granted.
pub async fn create_admin(
    database_url: &str,
    user_name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to database '{database_url}'"))?;

    let user_id = bootstrap_admin(&db, user_name, email, password).await?;

    info!("Administrator '{}' created with ID {}", user_name, user_id);
    Ok(())
}

pub(crate) async fn bootstrap_admin(
    db: &DatabaseConnection,
    user_name: &str,
    email: &str,
    password: &str,
) -> Result<i32> {
    let roles = RoleManager::new(db.clone());
    if roles.find_by_name(ADMIN_ROLE).await?.is_none() {
        roles.create(ADMIN_ROLE).await?;
        debug!("Created the {} role", ADMIN_ROLE);
    }

    let users = UserManager::new(db.clone());
    let user = users
        .create(NewUser {
            user_name: user_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        })
        .await?;
    users.add_to_role(user.id, ADMIN_ROLE).await?;
    for claim_type in claims::ALL {
        users.add_claim(user.id, claim_type, claims::GRANTED).await?;
    }

    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_bootstrap_admin() {
        let db = setup_test_db().await;

        let id = bootstrap_admin(&db, "admin", "admin@northwind.com", "Adm1n!pass")
            .await
            .unwrap();

        let users = UserManager::new(db.clone());
        assert!(users.is_in_role(id, ADMIN_ROLE).await.unwrap());
        assert_eq!(users.granted_claims_of(id).await.unwrap().len(), claims::ALL.len());

        // A second admin reuses the role; the same name is a conflict.
        assert!(bootstrap_admin(&db, "admin2", "admin2@northwind.com", "Adm1n!pass")
            .await
            .is_ok());
        assert!(bootstrap_admin(&db, "admin", "x@northwind.com", "Adm1n!pass")
            .await
            .is_err());
    }
}
