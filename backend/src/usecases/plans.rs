use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    entities::plans::{EditPlanRow, NewPlanRow},
    repositories::plans::PlanRepository,
    value_objects::plans::{EditPlanModel, InsertPlanModel, PlanDto},
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("subscription plan not found")]
    PlanNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PlanError::PlanNotFound => StatusCode::NOT_FOUND,
            PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Admin CRUD over the subscription plan reference data.
pub struct PlansUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
}

impl<P> PlansUseCase<P>
where
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>) -> Self {
        Self { plan_repo }
    }

    pub async fn list_plans(&self) -> PlanResult<Vec<PlanDto>> {
        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(db_error = ?err, "plans: failed to list active plans");
            PlanError::Internal(err)
        })?;

        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn get_plan(&self, plan_id: Uuid) -> PlanResult<PlanDto> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(PlanError::Internal)?
            .ok_or(PlanError::PlanNotFound)?;

        Ok(PlanDto::from(plan))
    }

    pub async fn create_plan(&self, insert_plan_model: InsertPlanModel) -> PlanResult<PlanDto> {
        let entitlements = serde_json::to_value(&insert_plan_model.entitlements)
            .map_err(|err| anyhow::anyhow!("failed to serialize entitlements: {}", err))?;

        let row = NewPlanRow {
            id: Uuid::new_v4(),
            kind: insert_plan_model.kind.to_string(),
            price_minor: insert_plan_model.price_minor,
            entitlements,
            is_active: true,
            created_at: Utc::now(),
        };

        let plan_id = self.plan_repo.create(row).await.map_err(|err| {
            error!(db_error = ?err, "plans: failed to create plan");
            PlanError::Internal(err)
        })?;

        info!(%plan_id, "plans: plan created");
        self.get_plan(plan_id).await
    }

    pub async fn update_plan(
        &self,
        plan_id: Uuid,
        edit_plan_model: EditPlanModel,
    ) -> PlanResult<PlanDto> {
        if self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(PlanError::Internal)?
            .is_none()
        {
            return Err(PlanError::PlanNotFound);
        }

        let entitlements = match &edit_plan_model.entitlements {
            Some(value) => Some(
                serde_json::to_value(value)
                    .map_err(|err| anyhow::anyhow!("failed to serialize entitlements: {}", err))?,
            ),
            None => None,
        };

        let row = EditPlanRow {
            kind: edit_plan_model.kind.map(|kind| kind.to_string()),
            price_minor: edit_plan_model.price_minor,
            entitlements,
            is_active: edit_plan_model.is_active,
        };

        self.plan_repo.update(plan_id, row).await.map_err(|err| {
            error!(%plan_id, db_error = ?err, "plans: failed to update plan");
            PlanError::Internal(err)
        })?;

        info!(%plan_id, "plans: plan updated");
        self.get_plan(plan_id).await
    }

    /// Plans are reference data pointed at by users and payments; removal is
    /// a deactivation, not a row delete.
    pub async fn deactivate_plan(&self, plan_id: Uuid) -> PlanResult<()> {
        let deactivated = self.plan_repo.deactivate(plan_id).await.map_err(|err| {
            error!(%plan_id, db_error = ?err, "plans: failed to deactivate plan");
            PlanError::Internal(err)
        })?;

        if !deactivated {
            warn!(%plan_id, "plans: deactivate for unknown plan");
            return Err(PlanError::PlanNotFound);
        }

        info!(%plan_id, "plans: plan deactivated");
        Ok(())
    }
}
