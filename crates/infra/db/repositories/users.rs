use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::users},
};
use domain::{
    entities::users::{EditUserEntity, RegisterUserEntity, UserEntity},
    repositories::users::UserRepository,
};

#[derive(QueryableByName)]
struct SkipCounterRow {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    skips_today: i32,
}

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn register(&self, register_user_entity: RegisterUserEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(users::table)
            .values(&register_user_entity)
            .returning(users::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::id.eq(user_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::email.eq(email))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self) -> Result<Vec<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = users::table
            .order(users::created_at.asc())
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, user_id: Uuid, edit_user_entity: EditUserEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .set(&edit_user_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(users::table.filter(users::id.eq(user_id)))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn set_plan(&self, user_id: Uuid, plan_id: Option<Uuid>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .set(users::plan_id.eq(plan_id))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn roll_skip_counter(&self, user_id: Uuid, today: NaiveDate) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Single round trip so concurrent readers cannot lose the reset.
        let row = diesel::sql_query(
            "UPDATE users \
             SET skips_today = CASE WHEN last_skip_date IS DISTINCT FROM $2 \
                 THEN 0 ELSE skips_today END, \
                 last_skip_date = $2 \
             WHERE id = $1 \
             RETURNING skips_today",
        )
        .bind::<diesel::sql_types::Uuid, _>(user_id)
        .bind::<diesel::sql_types::Date, _>(today)
        .get_result::<SkipCounterRow>(&mut conn)
        .optional()?;

        Ok(row.map(|row| row.skips_today))
    }

    async fn increment_skip_counter(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = diesel::sql_query(
            "UPDATE users \
             SET skips_today = CASE WHEN last_skip_date IS DISTINCT FROM $2 \
                 THEN 1 ELSE skips_today + 1 END, \
                 last_skip_date = $2, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING skips_today",
        )
        .bind::<diesel::sql_types::Uuid, _>(user_id)
        .bind::<diesel::sql_types::Date, _>(today)
        .get_result::<SkipCounterRow>(&mut conn)
        .optional()?;

        Ok(row.map(|row| row.skips_today))
    }
}
