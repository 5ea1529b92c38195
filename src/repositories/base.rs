//! Generic data access shared by every entity repository.
//!
//! [`EntityRepository`] implements reads, existence checks, writes and soft
//! deletes for any entity implementing [`BaseEntity`]. Per-entity
//! repositories wrap it and add their relationship lookups.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::ops::Deref;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::IntoCondition;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel, Iterable, ModelTrait,
    PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, Select,
    TransactionTrait, Value,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, trace};

use super::error::{RepositoryError, RepositoryResult};

/// Primary key value type of an entity (`i32`, or a tuple for join tables).
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// The audit timestamp columns of an entity.
#[derive(Debug, Clone, Copy)]
pub struct AuditColumns<C> {
    pub created_at: C,
    pub updated_at: C,
    pub deleted_at: C,
}

/// Capabilities an entity needs to be served by [`EntityRepository`].
#[async_trait]
pub trait BaseEntity: EntityTrait {
    /// Display name used in errors and logs.
    const NAME: &'static str;

    /// Relation names accepted by [`BaseEntity::expand`].
    const RELATIONS: &'static [&'static str];

    /// Audit columns, for entities that carry them. Audited entities get
    /// their timestamps stamped on write and support soft delete.
    fn audit_columns() -> Option<AuditColumns<Self::Column>> {
        None
    }

    /// Loads the rows related to `models` through `relation`, one JSON value
    /// per model in the same order.
    async fn expand(
        db: &DatabaseConnection,
        models: &[Self::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>>;
}

/// A model with related rows embedded next to its own fields.
#[derive(Debug, Clone, Serialize)]
pub struct Expanded<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(flatten)]
    pub related: BTreeMap<String, JsonValue>,
}

impl<T> Expanded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Expanded<U> {
        Expanded {
            item: f(self.item),
            related: self.related,
        }
    }
}

impl<T> Deref for Expanded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

/// Filtering, eager loading and soft-delete visibility for a read.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub filter: Option<Condition>,
    pub include: Vec<String>,
    pub with_deleted: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate; repeated calls are combined with AND.
    pub fn filter(mut self, condition: impl IntoCondition) -> Self {
        let condition = condition.into_condition();
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.add(condition),
            None => condition,
        });
        self
    }

    /// Eager-loads the relations named in a comma-separated list.
    pub fn include(mut self, paths: &str) -> Self {
        self.include.extend(Self::include_paths(paths));
        self
    }

    pub fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }

    /// Splits `"products, supplier,"` into `["products", "supplier"]`.
    pub fn include_paths(paths: &str) -> Vec<String> {
        paths
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn scoped_query<R: BaseEntity>(with_deleted: bool) -> Select<R> {
    let mut select = R::find();
    if !with_deleted {
        if let Some(audit) = R::audit_columns() {
            select = select.filter(audit.deleted_at.is_null());
        }
    }
    for key in R::PrimaryKey::iter() {
        select = select.order_by_asc(key.into_column());
    }
    select
}

/// All rows of `R` that are not soft-deleted, by primary key ascending.
pub fn live_query<R: BaseEntity>() -> Select<R> {
    scoped_query::<R>(false)
}

/// Serializes loaded rows for embedding into an [`Expanded`] value.
pub(crate) fn embed<T: Serialize>(rows: Vec<T>) -> RepositoryResult<Vec<JsonValue>> {
    rows.into_iter()
        .map(|row| {
            serde_json::to_value(row)
                .map_err(|e| RepositoryError::Validation(format!("unserializable row: {e}")))
        })
        .collect()
}

/// Groups `targets` under each owner following `(owner, target)` link rows.
/// Links whose target is missing from `targets` are skipped.
pub(crate) fn group_through<T: Clone>(
    owners: &[i32],
    links: &[(i32, i32)],
    targets: &[T],
    target_id: impl Fn(&T) -> i32,
) -> Vec<Vec<T>> {
    let by_id: HashMap<i32, &T> = targets.iter().map(|t| (target_id(t), t)).collect();
    owners
        .iter()
        .map(|owner| {
            links
                .iter()
                .filter(|(link_owner, _)| link_owner == owner)
                .filter_map(|(_, target)| by_id.get(target).map(|t| (*t).clone()))
                .collect()
        })
        .collect()
}

pub(crate) fn unknown_relation<E: BaseEntity>(relation: &str) -> RepositoryError {
    RepositoryError::Validation(format!(
        "{} has no relation named '{}' (expected one of: {})",
        E::NAME,
        relation,
        E::RELATIONS.join(", ")
    ))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Int(Some(v)) => v.to_string(),
        Value::BigInt(Some(v)) => v.to_string(),
        Value::String(Some(v)) => v.to_string(),
        other => format!("{other:?}"),
    }
}

/// Generic CRUD over a single entity type.
pub struct EntityRepository<E> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> EntityRepository<E>
where
    E: BaseEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn select(&self, options: &QueryOptions) -> Select<E> {
        let select = scoped_query::<E>(options.with_deleted);
        match &options.filter {
            Some(filter) => select.filter(filter.clone()),
            None => select,
        }
    }

    async fn expand_all(
        &self,
        models: Vec<E::Model>,
        include: &[String],
    ) -> RepositoryResult<Vec<Expanded<E::Model>>> {
        if let Some(unknown) = include
            .iter()
            .find(|name| !E::RELATIONS.contains(&name.as_str()))
        {
            return Err(unknown_relation::<E>(unknown));
        }

        let mut related = vec![BTreeMap::new(); models.len()];
        for name in include {
            trace!(entity = E::NAME, relation = %name, "loading related rows");
            let values = E::expand(&self.db, &models, name).await?;
            for (slot, value) in related.iter_mut().zip(values) {
                slot.insert(name.clone(), value);
            }
        }

        Ok(models
            .into_iter()
            .zip(related)
            .map(|(item, related)| Expanded { item, related })
            .collect())
    }

    /// All matching rows, by primary key ascending.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn get_all(&self, options: &QueryOptions) -> RepositoryResult<Vec<Expanded<E::Model>>> {
        let models = self.select(options).all(&self.db).await?;
        debug!("Fetched {} rows", models.len());
        self.expand_all(models, &options.include).await
    }

    /// First matching row, or `None`.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn get(&self, options: &QueryOptions) -> RepositoryResult<Option<Expanded<E::Model>>> {
        match self.select(options).one(&self.db).await? {
            Some(model) => Ok(self
                .expand_all(vec![model], &options.include)
                .await?
                .into_iter()
                .next()),
            None => Ok(None),
        }
    }

    /// Plain matching rows without eager loading.
    pub async fn find_all(&self, filter: impl IntoCondition) -> RepositoryResult<Vec<E::Model>> {
        Ok(self
            .select(&QueryOptions::new().filter(filter))
            .all(&self.db)
            .await?)
    }

    pub async fn get_by_id(&self, id: PrimaryKeyOf<E>) -> RepositoryResult<E::Model> {
        let key = format!("{id:?}");
        let mut select = E::find_by_id(id);
        if let Some(audit) = E::audit_columns() {
            select = select.filter(audit.deleted_at.is_null());
        }
        select
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(E::NAME, key))
    }

    /// Like [`Self::get_by_id`], with the named relations embedded.
    pub async fn get_by_id_with(
        &self,
        id: PrimaryKeyOf<E>,
        include: &[String],
    ) -> RepositoryResult<Expanded<E::Model>> {
        let model = self.get_by_id(id).await?;
        let mut expanded = self.expand_all(vec![model], include).await?;
        expanded
            .pop()
            .ok_or_else(|| RepositoryError::Validation(format!("{} expansion lost its row", E::NAME)))
    }

    /// Whether at least one row matches, counted in the database.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn exists(&self, options: &QueryOptions) -> RepositoryResult<bool> {
        let count = self.select(options).count(&self.db).await?;
        Ok(count > 0)
    }

    /// Tracked read: the returned active model starts with every field
    /// `Unchanged`, so a later [`Self::update`] writes only what was modified.
    pub async fn get_tracked(&self, options: &QueryOptions) -> RepositoryResult<Option<E::ActiveModel>> {
        Ok(self
            .select(options)
            .one(&self.db)
            .await?
            .map(IntoActiveModel::into_active_model))
    }

    pub async fn get_all_tracked(&self, options: &QueryOptions) -> RepositoryResult<Vec<E::ActiveModel>> {
        Ok(self
            .select(options)
            .all(&self.db)
            .await?
            .into_iter()
            .map(IntoActiveModel::into_active_model)
            .collect())
    }

    pub async fn create(&self, model: E::ActiveModel) -> RepositoryResult<E::Model> {
        self.create_in(&self.db, model).await
    }

    /// Inserts on `conn`, which may be a transaction from [`Self::begin`].
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        mut model: E::ActiveModel,
    ) -> RepositoryResult<E::Model> {
        if let Some(audit) = E::audit_columns() {
            model.set(audit.created_at, Value::from(Utc::now()));
            model.not_set(audit.updated_at);
            model.not_set(audit.deleted_at);
        }
        let created = model.insert(conn).await?;
        debug!(entity = E::NAME, "Row created");
        Ok(created)
    }

    fn key_condition(model: &E::ActiveModel) -> RepositoryResult<(Condition, String)> {
        let mut condition = Condition::all();
        let mut parts = Vec::new();
        for key in E::PrimaryKey::iter() {
            let column = key.into_column();
            let value = model.get(column).into_value().ok_or_else(|| {
                RepositoryError::Validation(format!("{} primary key must be set", E::NAME))
            })?;
            parts.push(display_value(&value));
            condition = condition.add(column.eq(value));
        }
        Ok((condition, parts.join("/")))
    }

    /// Overwrites every column supplied as `Set`. The row must exist and not
    /// be soft-deleted; `created_at` is never rewritten.
    pub async fn update(&self, model: E::ActiveModel) -> RepositoryResult<E::Model> {
        self.update_in(&self.db, model).await
    }

    pub async fn update_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        mut model: E::ActiveModel,
    ) -> RepositoryResult<E::Model> {
        let (condition, key) = Self::key_condition(&model)?;
        let exists = self
            .select(&QueryOptions::new().filter(condition))
            .count(conn)
            .await?
            > 0;
        if !exists {
            return Err(RepositoryError::not_found(E::NAME, key));
        }

        if let Some(audit) = E::audit_columns() {
            model.not_set(audit.created_at);
            model.not_set(audit.deleted_at);
            model.set(audit.updated_at, Value::from(Utc::now()));
        }
        let updated = model.update(conn).await?;
        debug!(entity = E::NAME, key = %key, "Row updated");
        Ok(updated)
    }

    /// Hard delete; dependent rows go with it through the foreign keys.
    pub async fn delete(&self, model: E::Model) -> RepositoryResult<()> {
        let key = E::PrimaryKey::iter()
            .map(|key| display_value(&model.get(key.into_column())))
            .collect::<Vec<_>>()
            .join("/");
        let result = model.delete(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(E::NAME, key));
        }
        debug!(entity = E::NAME, key = %key, "Row deleted");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: PrimaryKeyOf<E>) -> RepositoryResult<()> {
        let key = format!("{id:?}");
        let result = E::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(E::NAME, key));
        }
        debug!(entity = E::NAME, key = %key, "Row deleted");
        Ok(())
    }

    /// Stamps `deleted_at`, hiding the row from every later read.
    pub async fn soft_delete_by_id(&self, id: PrimaryKeyOf<E>) -> RepositoryResult<E::Model> {
        let audit = E::audit_columns().ok_or_else(|| {
            RepositoryError::Validation(format!("{} does not support soft delete", E::NAME))
        })?;
        let model = self.get_by_id(id).await?;

        let mut active = model.into_active_model();
        active.set(audit.deleted_at, Value::from(Utc::now()));
        let archived = active.update(&self.db).await?;
        debug!(entity = E::NAME, "Row soft-deleted");
        Ok(archived)
    }

    /// Clears `deleted_at` on a soft-deleted row.
    pub async fn restore_by_id(&self, id: PrimaryKeyOf<E>) -> RepositoryResult<E::Model> {
        let audit = E::audit_columns().ok_or_else(|| {
            RepositoryError::Validation(format!("{} does not support soft delete", E::NAME))
        })?;
        let key = format!("{id:?}");
        let model = E::find_by_id(id)
            .filter(audit.deleted_at.is_not_null())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(E::NAME, key))?;

        let mut active = model.into_active_model();
        active.set(audit.deleted_at, Value::ChronoDateTimeUtc(None));
        active.set(audit.updated_at, Value::from(Utc::now()));
        let restored = active.update(&self.db).await?;
        debug!(entity = E::NAME, "Row restored");
        Ok(restored)
    }

    pub async fn begin(&self) -> RepositoryResult<DatabaseTransaction> {
        Ok(self.db.begin().await?)
    }
}
