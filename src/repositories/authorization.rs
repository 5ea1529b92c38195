//! Role administration and per-user role/claim projections.

use std::collections::HashSet;

use model::entities::{app_role, app_user};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use super::error::{RepositoryError, RepositoryResult};
use crate::identity::{claims, RoleManager, UserManager};

/// One role, flagged with whether a given user holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRoleFlag {
    pub role_id: i32,
    pub role_name: String,
    pub is_selected: bool,
}

/// One catalog claim, flagged with whether a given user holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserClaimFlag {
    pub claim_type: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone)]
pub struct AuthorizationRepository {
    users: UserManager,
    roles: RoleManager,
}

impl AuthorizationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_managers(UserManager::new(db.clone()), RoleManager::new(db))
    }

    pub fn with_managers(users: UserManager, roles: RoleManager) -> Self {
        Self { users, roles }
    }

    pub async fn add_role(&self, name: &str) -> RepositoryResult<app_role::Model> {
        self.roles.create(name).await
    }

    pub async fn get_roles(&self) -> RepositoryResult<Vec<app_role::Model>> {
        self.roles.list().await
    }

    pub async fn get_role(&self, role_id: i32) -> RepositoryResult<app_role::Model> {
        self.roles.find_by_id(role_id).await
    }

    #[instrument(skip(self))]
    pub async fn update_role(&self, role_id: i32, name: &str) -> RepositoryResult<app_role::Model> {
        let role = self.roles.find_by_id(role_id).await?;
        self.roles.update(role, name).await
    }

    #[instrument(skip(self))]
    pub async fn delete_role(&self, role_id: i32) -> RepositoryResult<()> {
        let role = self.roles.find_by_id(role_id).await?;
        self.roles.delete(role).await
    }

    pub async fn users_in_role(&self, role_id: i32) -> RepositoryResult<Vec<app_user::Model>> {
        let role = self.roles.find_by_id(role_id).await?;
        self.roles.users_in(&role).await
    }

    /// Every defined role, flagged with the user's membership.
    #[instrument(skip(self))]
    pub async fn get_roles_by_user(&self, user_id: i32) -> RepositoryResult<Vec<UserRoleFlag>> {
        let held: HashSet<i32> = self
            .users
            .roles_of(user_id)
            .await?
            .into_iter()
            .map(|role| role.id)
            .collect();

        Ok(self
            .roles
            .list()
            .await?
            .into_iter()
            .map(|role| UserRoleFlag {
                is_selected: held.contains(&role.id),
                role_id: role.id,
                role_name: role.name,
            })
            .collect())
    }

    /// Makes the user's memberships match `flags`. Roles not mentioned
    /// are left as they are. Unknown role ids are rejected before anything
    /// changes, and the changes apply together or not at all.
    #[instrument(skip(self, flags))]
    pub async fn update_user_roles(
        &self,
        user_id: i32,
        flags: &[UserRoleFlag],
    ) -> RepositoryResult<Vec<UserRoleFlag>> {
        let current = self.get_roles_by_user(user_id).await?;

        let mut grant = Vec::new();
        let mut revoke = Vec::new();
        for flag in flags {
            let existing = current
                .iter()
                .find(|role| role.role_id == flag.role_id)
                .ok_or_else(|| RepositoryError::not_found("Role", flag.role_id))?;

            match (existing.is_selected, flag.is_selected) {
                (false, true) if !grant.contains(&existing.role_id) => grant.push(existing.role_id),
                (true, false) => revoke.push(existing.role_id),
                _ => {}
            }
        }
        self.users.set_roles(user_id, &grant, &revoke).await?;

        info!("User roles updated");
        self.get_roles_by_user(user_id).await
    }

    /// Every catalog claim, flagged with whether the user holds it.
    #[instrument(skip(self))]
    pub async fn get_claims_by_user(&self, user_id: i32) -> RepositoryResult<Vec<UserClaimFlag>> {
        let held: HashSet<String> = self
            .users
            .claims_of(user_id)
            .await?
            .into_iter()
            .filter(|claim| claim.claim_value == claims::GRANTED)
            .map(|claim| claim.claim_type)
            .collect();

        Ok(claims::ALL
            .iter()
            .map(|claim_type| UserClaimFlag {
                claim_type: claim_type.to_string(),
                is_selected: held.contains(*claim_type),
            })
            .collect())
    }

    /// Replaces the user's catalog claims with the selected `flags`.
    /// Claims outside the catalog are rejected before anything changes.
    #[instrument(skip(self, flags))]
    pub async fn update_user_claims(
        &self,
        user_id: i32,
        flags: &[UserClaimFlag],
    ) -> RepositoryResult<Vec<UserClaimFlag>> {
        if let Some(unknown) = flags.iter().find(|flag| !claims::is_known(&flag.claim_type)) {
            return Err(RepositoryError::Validation(format!(
                "unknown claim '{}' (expected one of: {})",
                unknown.claim_type,
                claims::ALL.join(", ")
            )));
        }

        self.users.find_by_id(user_id).await?;
        let granted: Vec<&str> = claims::ALL
            .iter()
            .copied()
            .filter(|claim_type| {
                flags
                    .iter()
                    .any(|flag| flag.claim_type == *claim_type && flag.is_selected)
            })
            .collect();
        self.users
            .replace_claims(user_id, &claims::ALL, &granted)
            .await?;

        debug!("User claims replaced");
        self.get_claims_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::NewUser;
    use crate::test_utils::test_utils::setup_test_db;

    async fn setup() -> (AuthorizationRepository, UserManager) {
        let db = setup_test_db().await;
        let users = UserManager::new(db.clone());
        let repo = AuthorizationRepository::with_managers(users.clone(), RoleManager::new(db));
        for name in ["Admin", "Sales", "Marketing"] {
            repo.add_role(name).await.unwrap();
        }
        (repo, users)
    }

    async fn new_user(users: &UserManager, user_name: &str) -> i32 {
        users
            .create(NewUser {
                user_name: user_name.to_string(),
                email: format!("{user_name}@northwind.com"),
                password: "Pa$$w0rd".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap()
            .id
    }

    fn selected(flags: &[UserRoleFlag]) -> Vec<&str> {
        flags
            .iter()
            .filter(|flag| flag.is_selected)
            .map(|flag| flag.role_name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_roles_by_user_with_zero_one_and_all_roles() {
        let (repo, users) = setup().await;
        let none = new_user(&users, "none").await;
        let one = new_user(&users, "one").await;
        let all = new_user(&users, "all").await;

        users.add_to_role(one, "Sales").await.unwrap();
        for role in ["Admin", "Sales", "Marketing"] {
            users.add_to_role(all, role).await.unwrap();
        }

        let flags = repo.get_roles_by_user(none).await.unwrap();
        assert_eq!(flags.len(), 3);
        assert!(selected(&flags).is_empty());

        let flags = repo.get_roles_by_user(one).await.unwrap();
        assert_eq!(flags.len(), 3);
        assert_eq!(selected(&flags), vec!["Sales"]);

        let flags = repo.get_roles_by_user(all).await.unwrap();
        assert_eq!(selected(&flags), vec!["Admin", "Sales", "Marketing"]);

        assert!(matches!(
            repo.get_roles_by_user(404).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_user_roles() {
        let (repo, users) = setup().await;
        let user = new_user(&users, "nancy").await;
        users.add_to_role(user, "Admin").await.unwrap();

        let mut flags = repo.get_roles_by_user(user).await.unwrap();
        for flag in flags.iter_mut() {
            flag.is_selected = flag.role_name != "Admin";
        }
        let updated = repo.update_user_roles(user, &flags).await.unwrap();
        assert_eq!(selected(&updated), vec!["Sales", "Marketing"]);

        let unknown = UserRoleFlag {
            role_id: 99,
            role_name: "Ghost".to_string(),
            is_selected: true,
        };
        assert!(matches!(
            repo.update_user_roles(user, &[unknown.clone()]).await,
            Err(RepositoryError::NotFound { .. })
        ));

        // A bad flag anywhere in the request leaves memberships untouched.
        let mut mixed = repo.get_roles_by_user(user).await.unwrap();
        for flag in mixed.iter_mut() {
            flag.is_selected = !flag.is_selected;
        }
        mixed.push(unknown);
        assert!(repo.update_user_roles(user, &mixed).await.is_err());
        assert_eq!(
            selected(&repo.get_roles_by_user(user).await.unwrap()),
            vec!["Sales", "Marketing"]
        );
    }

    #[tokio::test]
    async fn test_role_crud_prefetches_by_id() {
        let (repo, _) = setup().await;
        let roles = repo.get_roles().await.unwrap();
        assert_eq!(roles.len(), 3);

        let renamed = repo.update_role(roles[1].id, "Sales EMEA").await.unwrap();
        assert_eq!(repo.get_role(renamed.id).await.unwrap().name, "Sales EMEA");

        repo.delete_role(roles[0].id).await.unwrap();
        assert_eq!(repo.get_roles().await.unwrap().len(), 2);
        assert!(matches!(
            repo.delete_role(roles[0].id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update_role(404, "Nobody").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_users_in_role() {
        let (repo, users) = setup().await;
        let nancy = new_user(&users, "nancy").await;
        new_user(&users, "andrew").await;
        users.add_to_role(nancy, "Marketing").await.unwrap();

        let marketing = &repo.get_roles().await.unwrap()[2];
        let members = repo.users_in_role(marketing.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_name, "nancy");
    }

    #[tokio::test]
    async fn test_claims_by_user() {
        let (repo, users) = setup().await;
        let user = new_user(&users, "nancy").await;

        let flags = repo.get_claims_by_user(user).await.unwrap();
        assert_eq!(
            flags.iter().map(|f| f.claim_type.as_str()).collect::<Vec<_>>(),
            claims::ALL.to_vec()
        );
        assert!(flags.iter().all(|f| !f.is_selected));

        let request = vec![
            UserClaimFlag {
                claim_type: claims::CREATE_ROLE.to_string(),
                is_selected: true,
            },
            UserClaimFlag {
                claim_type: claims::DELETE_ROLE.to_string(),
                is_selected: true,
            },
        ];
        let updated = repo.update_user_claims(user, &request).await.unwrap();
        let granted: Vec<&str> = updated
            .iter()
            .filter(|f| f.is_selected)
            .map(|f| f.claim_type.as_str())
            .collect();
        assert_eq!(granted, vec![claims::CREATE_ROLE, claims::DELETE_ROLE]);

        // Submitting again replaces rather than accumulates.
        let updated = repo.update_user_claims(user, &request[..1]).await.unwrap();
        assert_eq!(updated.iter().filter(|f| f.is_selected).count(), 1);
        assert_eq!(users.claims_of(user).await.unwrap().len(), 1);

        let bogus = UserClaimFlag {
            claim_type: "Launch Rockets".to_string(),
            is_selected: true,
        };
        assert!(matches!(
            repo.update_user_claims(user, &[bogus]).await,
            Err(RepositoryError::Validation(_))
        ));
        assert_eq!(users.claims_of(user).await.unwrap().len(), 1);
    }
}
