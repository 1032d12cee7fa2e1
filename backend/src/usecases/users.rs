use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    entities::users::EditUserEntity,
    repositories::{plans::PlanRepository, users::UserRepository},
    value_objects::users::{EditUserModel, UserDto},
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,
    #[error("subscription plan not found")]
    PlanNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserError::UserNotFound | UserError::PlanNotFound => StatusCode::NOT_FOUND,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UserResult<T> = std::result::Result<T, UserError>;

pub struct UserUseCase<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    plan_repo: Arc<P>,
}

impl<U, P> UserUseCase<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, plan_repo: Arc<P>) -> Self {
        Self {
            user_repo,
            plan_repo,
        }
    }

    pub async fn list(&self) -> UserResult<Vec<UserDto>> {
        let users = self.user_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "users: failed to list users");
            UserError::Internal(err)
        })?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn get(&self, user_id: Uuid) -> UserResult<UserDto> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(UserError::Internal)?
            .ok_or(UserError::UserNotFound)?;

        Ok(UserDto::from(user))
    }

    pub async fn update(&self, user_id: Uuid, edit_user_model: EditUserModel) -> UserResult<UserDto> {
        if self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(UserError::Internal)?
            .is_none()
        {
            return Err(UserError::UserNotFound);
        }

        let entity = EditUserEntity {
            username: edit_user_model.username,
            email: edit_user_model.email,
            password_hash: None,
            role: None,
            updated_at: Utc::now(),
        };

        self.user_repo
            .update(user_id, entity)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update user");
                UserError::Internal(err)
            })?;

        info!(%user_id, "users: user updated");
        self.get(user_id).await
    }

    pub async fn delete(&self, user_id: Uuid) -> UserResult<()> {
        let deleted = self.user_repo.delete(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "users: failed to delete user");
            UserError::Internal(err)
        })?;

        if !deleted {
            warn!(%user_id, "users: delete for unknown user");
            return Err(UserError::UserNotFound);
        }

        info!(%user_id, "users: user deleted");
        Ok(())
    }

    /// Self-service plan switch; the plan must exist and be active.
    pub async fn change_plan(&self, user_id: Uuid, plan_id: Uuid) -> UserResult<()> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(UserError::Internal)?
            .filter(|plan| plan.is_active)
            .ok_or_else(|| {
                warn!(%user_id, %plan_id, "users: plan change to unknown or inactive plan");
                UserError::PlanNotFound
            })?;

        if self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(UserError::Internal)?
            .is_none()
        {
            return Err(UserError::UserNotFound);
        }

        self.user_repo
            .set_plan(user_id, Some(plan.id))
            .await
            .map_err(|err| {
                error!(%user_id, %plan_id, db_error = ?err, "users: failed to set plan");
                UserError::Internal(err)
            })?;

        info!(%user_id, %plan_id, "users: subscription plan changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use tunedeck_core::domain::{
        entities::{plans::PlanEntity, users::UserEntity},
        repositories::{plans::MockPlanRepository, users::MockUserRepository},
        value_objects::{
            enums::{plan_kinds::PlanKind, user_roles::UserRole},
            plans::Entitlements,
        },
    };

    fn sample_user(id: Uuid) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            username: "listener".to_string(),
            email: "listener@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User.to_string(),
            plan_id: None,
            skips_today: 0,
            last_skip_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_plan(id: Uuid, is_active: bool) -> PlanEntity {
        PlanEntity {
            id,
            kind: PlanKind::Premium.to_string(),
            price_minor: 999,
            entitlements: Entitlements::for_kind(PlanKind::Premium),
            is_active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn change_plan_rejects_inactive_plans() {
        let user_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();

        let user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let plan = sample_plan(plan_id, false);
        plan_repo
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = UserUseCase::new(Arc::new(user_repo), Arc::new(plan_repo));
        let result = usecase.change_plan(user_id, plan_id).await;

        assert!(matches!(result, Err(UserError::PlanNotFound)));
    }

    #[tokio::test]
    async fn change_plan_points_the_user_at_the_plan() {
        let user_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let user = sample_user(user_id);
        user_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });
        user_repo
            .expect_set_plan()
            .with(eq(user_id), eq(Some(plan_id)))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let mut plan_repo = MockPlanRepository::new();
        let plan = sample_plan(plan_id, true);
        plan_repo
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = UserUseCase::new(Arc::new(user_repo), Arc::new(plan_repo));
        usecase.change_plan(user_id, plan_id).await.unwrap();
    }

    #[tokio::test]
    async fn get_maps_missing_row_to_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = UserUseCase::new(Arc::new(user_repo), Arc::new(MockPlanRepository::new()));
        let result = usecase.get(Uuid::new_v4()).await;

        assert!(matches!(result, Err(UserError::UserNotFound)));
    }
}
