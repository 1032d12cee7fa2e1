use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::plans::{EditPlanRow, NewPlanRow, PlanEntity};

#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>>;
    async fn create(&self, new_plan_row: NewPlanRow) -> Result<Uuid>;
    async fn update(&self, plan_id: Uuid, edit_plan_row: EditPlanRow) -> Result<()>;
    async fn deactivate(&self, plan_id: Uuid) -> Result<bool>;
}
