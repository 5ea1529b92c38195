use chrono::Utc;
use model::entities::{app_role, app_user, app_user_claim, app_user_role};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use super::password::{hash_password, verify_password, PasswordPolicy};
use super::{claims, normalize, IdentityError};
use crate::repositories::{RepositoryError, RepositoryResult};

/// Registration input. The password is checked against the policy and
/// never stored in clear.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Fields a user may change on their profile.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Users, their passwords, role memberships and claims.
#[derive(Debug, Clone)]
pub struct UserManager {
    db: DatabaseConnection,
    policy: PasswordPolicy,
}

impl UserManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_policy(db, PasswordPolicy::default())
    }

    pub fn with_policy(db: DatabaseConnection, policy: PasswordPolicy) -> Self {
        Self { db, policy }
    }

    #[instrument(skip(self, new_user), fields(user_name = %new_user.user_name))]
    pub async fn create(&self, new_user: NewUser) -> Result<app_user::Model, IdentityError> {
        self.policy.check(&new_user.password)?;
        if self.find_by_name(&new_user.user_name).await?.is_some() {
            warn!("User name already taken");
            return Err(RepositoryError::Conflict(format!(
                "user name '{}' is already taken",
                new_user.user_name
            ))
            .into());
        }

        let password_hash = hash_password(&new_user.password)?;
        let user = app_user::ActiveModel {
            normalized_user_name: Set(normalize(&new_user.user_name)),
            user_name: Set(new_user.user_name.trim().to_string()),
            normalized_email: Set(normalize(&new_user.email)),
            email: Set(new_user.email.trim().to_string()),
            password_hash: Set(password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> RepositoryResult<app_user::Model> {
        app_user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("User", id))
    }

    pub async fn find_by_name(&self, user_name: &str) -> RepositoryResult<Option<app_user::Model>> {
        Ok(app_user::Entity::find()
            .filter(app_user::Column::NormalizedUserName.eq(normalize(user_name)))
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<app_user::Model>> {
        Ok(app_user::Entity::find()
            .filter(app_user::Column::NormalizedEmail.eq(normalize(email)))
            .order_by_asc(app_user::Column::Id)
            .one(&self.db)
            .await?)
    }

    pub async fn list(&self) -> RepositoryResult<Vec<app_user::Model>> {
        Ok(app_user::Entity::find()
            .order_by_asc(app_user::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self, profile))]
    pub async fn update_profile(
        &self,
        user_id: i32,
        profile: UserProfile,
    ) -> RepositoryResult<app_user::Model> {
        let mut active = self.find_by_id(user_id).await?.into_active_model();
        active.normalized_email = Set(normalize(&profile.email));
        active.email = Set(profile.email.trim().to_string());
        active.first_name = Set(profile.first_name);
        active.last_name = Set(profile.last_name);

        let updated = active.update(&self.db).await?;
        debug!("Profile updated");
        Ok(updated)
    }

    /// Deletes the user together with their role links and claims.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i32) -> RepositoryResult<()> {
        let user = self.find_by_id(user_id).await?;
        user.delete(&self.db).await?;
        info!("User deleted");
        Ok(())
    }

    pub fn check_password(&self, user: &app_user::Model, password: &str) -> Result<bool, IdentityError> {
        verify_password(password, &user.password_hash)
    }

    /// Replaces the password after verifying the current one.
    #[instrument(skip(self, current, new_password))]
    pub async fn change_password(
        &self,
        user_id: i32,
        current: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let user = self.find_by_id(user_id).await?;
        if !self.check_password(&user, current)? {
            warn!("Current password did not match");
            return Err(IdentityError::InvalidCredentials);
        }
        self.policy.check(new_password)?;

        let mut active = user.into_active_model();
        active.password_hash = Set(hash_password(new_password)?);
        active.update(&self.db).await?;
        info!("Password changed");
        Ok(())
    }

    /// Resolves a login by user name or email. Unknown users and wrong
    /// passwords give the same error.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<app_user::Model, IdentityError> {
        let user = match self.find_by_name(login).await? {
            Some(user) => Some(user),
            None => self.find_by_email(login).await?,
        };
        let Some(user) = user else {
            debug!("No such user");
            return Err(IdentityError::InvalidCredentials);
        };

        if self.check_password(&user, password)? {
            Ok(user)
        } else {
            debug!(user_id = user.id, "Wrong password");
            Err(IdentityError::InvalidCredentials)
        }
    }

    async fn role_named(&self, role_name: &str) -> RepositoryResult<app_role::Model> {
        app_role::Entity::find()
            .filter(app_role::Column::NormalizedName.eq(normalize(role_name)))
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Role", role_name))
    }

    async fn has_role(&self, user_id: i32, role_id: i32) -> RepositoryResult<bool> {
        Ok(app_user_role::Entity::find_by_id((user_id, role_id))
            .count(&self.db)
            .await?
            > 0)
    }

    #[instrument(skip(self))]
    pub async fn add_to_role(&self, user_id: i32, role_name: &str) -> RepositoryResult<()> {
        let user = self.find_by_id(user_id).await?;
        let role = self.role_named(role_name).await?;
        if self.has_role(user.id, role.id).await? {
            return Err(RepositoryError::Conflict(format!(
                "user '{}' is already in role '{}'",
                user.user_name, role.name
            )));
        }

        app_user_role::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(role.id),
        }
        .insert(&self.db)
        .await?;
        debug!("Added to role {}", role.name);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_from_role(&self, user_id: i32, role_name: &str) -> RepositoryResult<()> {
        let role = self.role_named(role_name).await?;
        let result = app_user_role::Entity::delete_by_id((user_id, role.id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(
                "UserRole",
                format!("{user_id}/{}", role.name),
            ));
        }
        debug!("Removed from role {}", role.name);
        Ok(())
    }

    pub async fn is_in_role(&self, user_id: i32, role_name: &str) -> RepositoryResult<bool> {
        match self.role_named(role_name).await {
            Ok(role) => self.has_role(user_id, role.id).await,
            Err(RepositoryError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Roles held by the user, by role id.
    pub async fn roles_of(&self, user_id: i32) -> RepositoryResult<Vec<app_role::Model>> {
        let user = self.find_by_id(user_id).await?;
        Ok(user
            .find_related(app_role::Entity)
            .order_by_asc(app_role::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn role_names_of(&self, user_id: i32) -> RepositoryResult<Vec<String>> {
        Ok(self
            .roles_of(user_id)
            .await?
            .into_iter()
            .map(|role| role.name)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn add_claim(
        &self,
        user_id: i32,
        claim_type: &str,
        claim_value: &str,
    ) -> RepositoryResult<app_user_claim::Model> {
        let user = self.find_by_id(user_id).await?;
        let claim = app_user_claim::ActiveModel {
            user_id: Set(user.id),
            claim_type: Set(claim_type.to_string()),
            claim_value: Set(claim_value.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        debug!(claim_id = claim.id, "Claim added");
        Ok(claim)
    }

    /// Removes every claim of `claim_type` from the user.
    #[instrument(skip(self))]
    pub async fn remove_claim(&self, user_id: i32, claim_type: &str) -> RepositoryResult<()> {
        let result = app_user_claim::Entity::delete_many()
            .filter(app_user_claim::Column::UserId.eq(user_id))
            .filter(app_user_claim::Column::ClaimType.eq(claim_type))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(
                "UserClaim",
                format!("{user_id}/{claim_type}"),
            ));
        }
        debug!("Removed {} claims", result.rows_affected);
        Ok(())
    }

    /// Grants and revokes memberships by role id in one transaction.
    #[instrument(skip(self, grant, revoke))]
    pub async fn set_roles(&self, user_id: i32, grant: &[i32], revoke: &[i32]) -> RepositoryResult<()> {
        let txn = self.db.begin().await?;
        if !revoke.is_empty() {
            app_user_role::Entity::delete_many()
                .filter(app_user_role::Column::UserId.eq(user_id))
                .filter(app_user_role::Column::RoleId.is_in(revoke.iter().copied()))
                .exec(&txn)
                .await?;
        }
        for role_id in grant {
            app_user_role::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(*role_id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        debug!(granted = grant.len(), revoked = revoke.len(), "Roles changed");
        Ok(())
    }

    /// Drops the user's claims of every type in `claim_types`, then grants
    /// `granted`, in one transaction.
    #[instrument(skip(self, claim_types, granted))]
    pub async fn replace_claims(
        &self,
        user_id: i32,
        claim_types: &[&str],
        granted: &[&str],
    ) -> RepositoryResult<()> {
        let txn = self.db.begin().await?;
        app_user_claim::Entity::delete_many()
            .filter(app_user_claim::Column::UserId.eq(user_id))
            .filter(app_user_claim::Column::ClaimType.is_in(claim_types.iter().copied()))
            .exec(&txn)
            .await?;
        for claim_type in granted {
            app_user_claim::ActiveModel {
                user_id: Set(user_id),
                claim_type: Set(claim_type.to_string()),
                claim_value: Set(claims::GRANTED.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        debug!(granted = granted.len(), "Claims replaced");
        Ok(())
    }

    /// Claims held by the user, by claim id.
    pub async fn claims_of(&self, user_id: i32) -> RepositoryResult<Vec<app_user_claim::Model>> {
        let user = self.find_by_id(user_id).await?;
        Ok(user
            .find_related(app_user_claim::Entity)
            .order_by_asc(app_user_claim::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Claim types the user holds with the granted value, as carried in
    /// access tokens.
    pub async fn granted_claims_of(&self, user_id: i32) -> RepositoryResult<Vec<String>> {
        let mut granted: Vec<String> = self
            .claims_of(user_id)
            .await?
            .into_iter()
            .filter(|claim| claim.claim_value == claims::GRANTED)
            .map(|claim| claim.claim_type)
            .collect();
        granted.sort();
        granted.dedup();
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RoleManager;
    use crate::test_utils::test_utils::setup_test_db;

    fn nancy() -> NewUser {
        NewUser {
            user_name: "nancy".to_string(),
            email: "Nancy@Northwind.com".to_string(),
            password: "Pa$$w0rd".to_string(),
            first_name: Some("Nancy".to_string()),
            last_name: Some("Davolio".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = setup_test_db().await;
        let users = UserManager::new(db);

        let created = users.create(nancy()).await.unwrap();
        assert_eq!(created.normalized_user_name, "NANCY");
        assert_eq!(created.normalized_email, "NANCY@NORTHWIND.COM");
        assert_ne!(created.password_hash, "Pa$$w0rd");

        assert_eq!(users.find_by_name("NANCY").await.unwrap(), Some(created.clone()));
        assert_eq!(
            users.find_by_email("nancy@northwind.com").await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(users.find_by_id(created.id).await.unwrap(), created);
        assert_eq!(users.list().await.unwrap().len(), 1);

        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_weak_passwords() {
        let db = setup_test_db().await;
        let users = UserManager::new(db);
        users.create(nancy()).await.unwrap();

        let duplicate = NewUser {
            user_name: "NANCY".to_string(),
            ..nancy()
        };
        assert!(matches!(
            users.create(duplicate).await,
            Err(IdentityError::Repository(RepositoryError::Conflict(_)))
        ));

        let weak = NewUser {
            user_name: "andrew".to_string(),
            password: "password".to_string(),
            ..nancy()
        };
        assert!(matches!(users.create(weak).await, Err(IdentityError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_authenticate_and_change_password() {
        let db = setup_test_db().await;
        let users = UserManager::new(db);
        let created = users.create(nancy()).await.unwrap();

        assert_eq!(users.authenticate("nancy", "Pa$$w0rd").await.unwrap().id, created.id);
        assert_eq!(
            users.authenticate("nancy@northwind.com", "Pa$$w0rd").await.unwrap().id,
            created.id
        );
        assert!(matches!(
            users.authenticate("nancy", "wrong").await,
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            users.authenticate("nobody", "Pa$$w0rd").await,
            Err(IdentityError::InvalidCredentials)
        ));

        assert!(matches!(
            users.change_password(created.id, "wrong", "N3w#Secret").await,
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            users.change_password(created.id, "Pa$$w0rd", "weak").await,
            Err(IdentityError::WeakPassword(_))
        ));
        users
            .change_password(created.id, "Pa$$w0rd", "N3w#Secret")
            .await
            .unwrap();
        assert!(users.authenticate("nancy", "N3w#Secret").await.is_ok());
        assert!(users.authenticate("nancy", "Pa$$w0rd").await.is_err());
    }

    #[tokio::test]
    async fn test_update_profile_and_delete() {
        let db = setup_test_db().await;
        let users = UserManager::new(db);
        let created = users.create(nancy()).await.unwrap();

        let updated = users
            .update_profile(
                created.id,
                UserProfile {
                    email: "ndavolio@northwind.com".to_string(),
                    first_name: None,
                    last_name: Some("Davolio".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.normalized_email, "NDAVOLIO@NORTHWIND.COM");
        assert_eq!(updated.first_name, None);
        assert_eq!(updated.password_hash, created.password_hash);

        users.delete(created.id).await.unwrap();
        assert!(matches!(
            users.find_by_id(created.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            users.delete(created.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_role_membership() {
        let db = setup_test_db().await;
        let users = UserManager::new(db.clone());
        let roles = RoleManager::new(db);
        let user = users.create(nancy()).await.unwrap();
        roles.create("Admin").await.unwrap();
        roles.create("Sales").await.unwrap();

        users.add_to_role(user.id, "sales").await.unwrap();
        users.add_to_role(user.id, "Admin").await.unwrap();
        assert!(matches!(
            users.add_to_role(user.id, "Admin").await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(matches!(
            users.add_to_role(user.id, "Marketing").await,
            Err(RepositoryError::NotFound { .. })
        ));

        assert_eq!(users.role_names_of(user.id).await.unwrap(), vec!["Admin", "Sales"]);
        assert!(users.is_in_role(user.id, "ADMIN").await.unwrap());
        assert!(!users.is_in_role(user.id, "Marketing").await.unwrap());

        users.remove_from_role(user.id, "Admin").await.unwrap();
        assert!(!users.is_in_role(user.id, "Admin").await.unwrap());
        assert!(users.remove_from_role(user.id, "Admin").await.is_err());
    }

    #[tokio::test]
    async fn test_set_roles_is_all_or_nothing() {
        let db = setup_test_db().await;
        let users = UserManager::new(db.clone());
        let roles = RoleManager::new(db);
        let user = users.create(nancy()).await.unwrap();
        let admin = roles.create("Admin").await.unwrap();
        let sales = roles.create("Sales").await.unwrap();
        users.add_to_role(user.id, "Admin").await.unwrap();
        users.add_to_role(user.id, "Sales").await.unwrap();

        // Granting a role already held fails after the revoke ran.
        assert!(users.set_roles(user.id, &[sales.id], &[admin.id]).await.is_err());
        assert_eq!(users.role_names_of(user.id).await.unwrap(), vec!["Admin", "Sales"]);

        users.set_roles(user.id, &[], &[sales.id]).await.unwrap();
        assert_eq!(users.role_names_of(user.id).await.unwrap(), vec!["Admin"]);
        users.set_roles(user.id, &[sales.id], &[admin.id]).await.unwrap();
        assert_eq!(users.role_names_of(user.id).await.unwrap(), vec!["Sales"]);
    }

    #[tokio::test]
    async fn test_replace_claims_keeps_other_types() {
        let db = setup_test_db().await;
        let users = UserManager::new(db);
        let user = users.create(nancy()).await.unwrap();
        users.add_claim(user.id, "Create Role", "true").await.unwrap();
        users.add_claim(user.id, "Department", "Sales").await.unwrap();

        users
            .replace_claims(user.id, &claims::ALL, &["Edit Role"])
            .await
            .unwrap();

        let types: Vec<String> = users
            .claims_of(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.claim_type)
            .collect();
        assert_eq!(types, vec!["Department", "Edit Role"]);
    }

    #[tokio::test]
    async fn test_claims() {
        let db = setup_test_db().await;
        let users = UserManager::new(db);
        let user = users.create(nancy()).await.unwrap();

        users.add_claim(user.id, "Create Role", "true").await.unwrap();
        users.add_claim(user.id, "Edit Role", "true").await.unwrap();
        let types: Vec<String> = users
            .claims_of(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.claim_type)
            .collect();
        assert_eq!(types, vec!["Create Role", "Edit Role"]);

        users.remove_claim(user.id, "Create Role").await.unwrap();
        assert_eq!(users.claims_of(user.id).await.unwrap().len(), 1);
        assert!(matches!(
            users.remove_claim(user.id, "Create Role").await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(users.add_claim(99, "Edit Role", "true").await.is_err());

        users.add_claim(user.id, "Delete Role", "false").await.unwrap();
        assert_eq!(
            users.granted_claims_of(user.id).await.unwrap(),
            vec!["Edit Role"]
        );
    }
}
