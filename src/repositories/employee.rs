use std::collections::HashSet;
use std::ops::Deref;

use async_trait::async_trait;
use model::entities::{employee, employee_territory, order, territory};
use sea_orm::{
    ActiveValue::{self, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use super::base::{embed, live_query, unknown_relation, AuditColumns, BaseEntity, EntityRepository};
use super::employee_territory::territories_for;
use super::error::{RepositoryError, RepositoryResult};

#[async_trait]
impl BaseEntity for employee::Entity {
    const NAME: &'static str = "Employee";
    const RELATIONS: &'static [&'static str] = &["manager", "direct_reports", "orders", "territories"];

    fn audit_columns() -> Option<AuditColumns<employee::Column>> {
        Some(AuditColumns {
            created_at: employee::Column::CreatedAt,
            updated_at: employee::Column::UpdatedAt,
            deleted_at: employee::Column::DeletedAt,
        })
    }

    async fn expand(
        db: &DatabaseConnection,
        models: &[employee::Model],
        relation: &str,
    ) -> RepositoryResult<Vec<JsonValue>> {
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        match relation {
            "manager" => {
                let manager_ids: Vec<i32> = models.iter().filter_map(|m| m.reports_to).collect();
                let managers = live_query::<employee::Entity>()
                    .filter(employee::Column::Id.is_in(manager_ids))
                    .all(db)
                    .await?;
                embed(
                    models
                        .iter()
                        .map(|m| {
                            m.reports_to
                                .and_then(|id| managers.iter().find(|manager| manager.id == id))
                        })
                        .collect(),
                )
            }
            "direct_reports" => {
                let reports = live_query::<employee::Entity>()
                    .filter(employee::Column::ReportsTo.is_in(ids.clone()))
                    .all(db)
                    .await?;
                embed(
                    ids.iter()
                        .map(|id| {
                            reports
                                .iter()
                                .filter(|r| r.reports_to == Some(*id))
                                .collect::<Vec<_>>()
                        })
                        .collect(),
                )
            }
            "orders" => embed(models.load_many(live_query::<order::Entity>(), db).await?),
            "territories" => embed(territories_for(db, &ids).await?),
            other => Err(unknown_relation::<employee::Entity>(other)),
        }
    }
}

/// Employees, their reporting hierarchy and territory assignments.
///
/// `create` and `update` shadow the generic versions to keep the
/// `reports_to` hierarchy acyclic.
#[derive(Clone)]
pub struct EmployeeRepository {
    base: EntityRepository<employee::Entity>,
    territories: EntityRepository<territory::Entity>,
    assignments: EntityRepository<employee_territory::Entity>,
}

impl EmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: EntityRepository::new(db.clone()),
            territories: EntityRepository::new(db.clone()),
            assignments: EntityRepository::new(db),
        }
    }

    #[instrument(skip(self, model))]
    pub async fn create(&self, model: employee::ActiveModel) -> RepositoryResult<employee::Model> {
        if let ActiveValue::Set(reports_to) = &model.reports_to {
            self.check_manager(None, *reports_to).await?;
        }
        self.base.create(model).await
    }

    #[instrument(skip(self, model))]
    pub async fn update(&self, model: employee::ActiveModel) -> RepositoryResult<employee::Model> {
        if let ActiveValue::Set(reports_to) = &model.reports_to {
            let id = match &model.id {
                ActiveValue::Set(id) | ActiveValue::Unchanged(id) => Some(*id),
                ActiveValue::NotSet => None,
            };
            self.check_manager(id, *reports_to).await?;
        }
        self.base.update(model).await
    }

    /// Rejects a manager that is missing, the employee itself, or one of
    /// its (transitive) subordinates.
    async fn check_manager(&self, employee_id: Option<i32>, manager_id: Option<i32>) -> RepositoryResult<()> {
        let Some(manager_id) = manager_id else {
            return Ok(());
        };
        if employee_id == Some(manager_id) {
            return Err(RepositoryError::Validation(
                "an employee cannot report to themselves".to_string(),
            ));
        }

        let manager = match self.base.get_by_id(manager_id).await {
            Ok(manager) => manager,
            Err(RepositoryError::NotFound { .. }) => {
                return Err(RepositoryError::Validation(format!(
                    "manager {manager_id} does not exist"
                )));
            }
            Err(e) => return Err(e),
        };

        let Some(employee_id) = employee_id else {
            return Ok(());
        };
        let chain = self.chain_above(manager, true).await?;
        if chain.iter().any(|m| m.id == employee_id) {
            warn!("Rejected reports_to {} for employee {}: cycle", manager_id, employee_id);
            return Err(RepositoryError::Validation(format!(
                "employee {employee_id} cannot report to its subordinate {manager_id}"
            )));
        }
        Ok(())
    }

    /// `start` followed by every manager above it, stopping at the top or at
    /// the first repeated employee. Archived managers end the chain unless
    /// `with_deleted` is set.
    async fn chain_above(
        &self,
        start: employee::Model,
        with_deleted: bool,
    ) -> RepositoryResult<Vec<employee::Model>> {
        let mut seen = HashSet::from([start.id]);
        let mut next = start.reports_to;
        let mut chain = vec![start];
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            let manager = if with_deleted {
                employee::Entity::find_by_id(id).one(self.db()).await?
            } else {
                self.manager(id).await?
            };
            match manager {
                Some(manager) => {
                    next = manager.reports_to;
                    chain.push(manager);
                }
                None => break,
            }
        }
        Ok(chain)
    }

    async fn manager(&self, id: i32) -> RepositoryResult<Option<employee::Model>> {
        Ok(live_query::<employee::Entity>()
            .filter(employee::Column::Id.eq(id))
            .one(self.db())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn manager_of(&self, employee_id: i32) -> RepositoryResult<Option<employee::Model>> {
        let employee = self.get_by_id(employee_id).await?;
        match employee.reports_to {
            Some(manager_id) => self.manager(manager_id).await,
            None => Ok(None),
        }
    }

    /// Managers from the direct manager up to the top of the hierarchy.
    #[instrument(skip(self))]
    pub async fn management_chain(&self, employee_id: i32) -> RepositoryResult<Vec<employee::Model>> {
        let employee = self.get_by_id(employee_id).await?;
        let mut chain = self.chain_above(employee, false).await?;
        chain.remove(0);
        debug!("Employee {} has {} managers above", employee_id, chain.len());
        Ok(chain)
    }

    #[instrument(skip(self))]
    pub async fn direct_reports(&self, employee_id: i32) -> RepositoryResult<Vec<employee::Model>> {
        self.get_by_id(employee_id).await?;
        self.find_all(employee::Column::ReportsTo.eq(employee_id)).await
    }

    #[instrument(skip(self))]
    pub async fn orders_of(&self, employee_id: i32) -> RepositoryResult<Vec<order::Model>> {
        self.get_by_id(employee_id).await?;
        Ok(live_query::<order::Entity>()
            .filter(order::Column::EmployeeId.eq(employee_id))
            .all(self.db())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn territories_of(&self, employee_id: i32) -> RepositoryResult<Vec<territory::Model>> {
        self.get_by_id(employee_id).await?;
        Ok(territories_for(self.db(), &[employee_id])
            .await?
            .pop()
            .unwrap_or_default())
    }

    /// Assigns a territory. An archived assignment is restored.
    #[instrument(skip(self))]
    pub async fn assign_territory(
        &self,
        employee_id: i32,
        territory_id: i32,
    ) -> RepositoryResult<employee_territory::Model> {
        self.get_by_id(employee_id).await?;
        self.territories.get_by_id(territory_id).await?;

        match self.assignments.get_by_id((employee_id, territory_id)).await {
            Ok(_) => {
                return Err(RepositoryError::Conflict(format!(
                    "employee {employee_id} is already assigned to territory {territory_id}"
                )));
            }
            Err(RepositoryError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let assigned = match self.assignments.restore_by_id((employee_id, territory_id)).await {
            Err(RepositoryError::NotFound { .. }) => {
                self.assignments
                    .create(employee_territory::ActiveModel {
                        employee_id: Set(employee_id),
                        territory_id: Set(territory_id),
                        ..Default::default()
                    })
                    .await?
            }
            other => other?,
        };
        info!("Employee {} assigned to territory {}", employee_id, territory_id);
        Ok(assigned)
    }

    #[instrument(skip(self))]
    pub async fn unassign_territory(&self, employee_id: i32, territory_id: i32) -> RepositoryResult<()> {
        self.assignments.delete_by_id((employee_id, territory_id)).await
    }
}

impl Deref for EmployeeRepository {
    type Target = EntityRepository<employee::Entity>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
