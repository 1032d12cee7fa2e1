use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::plans},
};
use domain::{
    entities::plans::{EditPlanRow, NewPlanRow, PlanEntity, PlanRow},
    repositories::plans::PlanRepository,
};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .filter(plans::id.eq(plan_id))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn list_active_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = plans::table
            .filter(plans::is_active.eq(true))
            .order(plans::price_minor.asc())
            .select(PlanRow::as_select())
            .load::<PlanRow>(&mut conn)?;

        Ok(rows.into_iter().map(PlanEntity::from).collect())
    }

    async fn create(&self, new_plan_row: NewPlanRow) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(plans::table)
            .values(&new_plan_row)
            .returning(plans::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn update(&self, plan_id: Uuid, edit_plan_row: EditPlanRow) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(plans::table)
            .filter(plans::id.eq(plan_id))
            .set(&edit_plan_row)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn deactivate(&self, plan_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(plans::table)
            .filter(plans::id.eq(plan_id))
            .set(plans::is_active.eq(false))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }
}
