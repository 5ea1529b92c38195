use model::entities::{app_role, app_user};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, info, instrument, warn};

use super::normalize;
use crate::repositories::{RepositoryError, RepositoryResult};

/// Role lifecycle. Names are unique ignoring case.
#[derive(Debug, Clone)]
pub struct RoleManager {
    db: DatabaseConnection,
}

impl RoleManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn clean_name(name: &str) -> RepositoryResult<&str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::Validation("role name must not be empty".to_string()));
        }
        Ok(name)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> RepositoryResult<app_role::Model> {
        let name = Self::clean_name(name)?;
        if self.find_by_name(name).await?.is_some() {
            warn!("Role already exists");
            return Err(RepositoryError::Conflict(format!("role '{name}' already exists")));
        }

        let role = app_role::ActiveModel {
            name: Set(name.to_string()),
            normalized_name: Set(normalize(name)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        info!(role_id = role.id, "Role created");
        Ok(role)
    }

    pub async fn find_by_id(&self, id: i32) -> RepositoryResult<app_role::Model> {
        app_role::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Role", id))
    }

    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<app_role::Model>> {
        Ok(app_role::Entity::find()
            .filter(app_role::Column::NormalizedName.eq(normalize(name)))
            .one(&self.db)
            .await?)
    }

    pub async fn list(&self) -> RepositoryResult<Vec<app_role::Model>> {
        Ok(app_role::Entity::find()
            .order_by_asc(app_role::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Renames `role`; the new name must not belong to another role.
    #[instrument(skip(self, role), fields(role_id = role.id))]
    pub async fn update(&self, role: app_role::Model, name: &str) -> RepositoryResult<app_role::Model> {
        let name = Self::clean_name(name)?;
        if let Some(existing) = self.find_by_name(name).await? {
            if existing.id != role.id {
                warn!("Role name taken by role {}", existing.id);
                return Err(RepositoryError::Conflict(format!("role '{name}' already exists")));
            }
        }

        let mut active = role.into_active_model();
        active.name = Set(name.to_string());
        active.normalized_name = Set(normalize(name));
        let updated = active.update(&self.db).await?;
        debug!("Role renamed to {}", updated.name);
        Ok(updated)
    }

    /// Deletes `role`; memberships go with it.
    #[instrument(skip(self, role), fields(role_id = role.id))]
    pub async fn delete(&self, role: app_role::Model) -> RepositoryResult<()> {
        let name = role.name.clone();
        role.delete(&self.db).await?;
        info!("Role {} deleted", name);
        Ok(())
    }

    /// Members of `role`, by user id.
    pub async fn users_in(&self, role: &app_role::Model) -> RepositoryResult<Vec<app_user::Model>> {
        Ok(role
            .find_related(app_user::Entity)
            .order_by_asc(app_user::Column::Id)
            .all(&self.db)
            .await?)
    }
}
