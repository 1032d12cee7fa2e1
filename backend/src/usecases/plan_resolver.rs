use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    repositories::{plans::PlanRepository, users::UserRepository},
    value_objects::{
        enums::plan_kinds::PlanKind,
        plans::{Entitlements, FREE_PLAN_ID},
    },
};

/// Resolves the effective entitlements for a user: their plan row, or the
/// free plan when none is assigned. Resolved once per request and threaded
/// through, so no call site re-derives capabilities from plan names.
pub struct PlanResolver<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    plan_repo: Arc<P>,
}

impl<U, P> PlanResolver<U, P>
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

    pub async fn resolve_entitlements_for_user(&self, user_id: Uuid) -> Result<Entitlements> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let plan_id = user.plan_id.unwrap_or(FREE_PLAN_ID);

        if let Some(plan) = self.plan_repo.find_by_id(plan_id).await? {
            debug!(%user_id, %plan_id, "plan_resolver: using assigned plan");
            return Ok(plan.entitlements);
        }

        if plan_id != FREE_PLAN_ID {
            warn!(
                %user_id,
                %plan_id,
                "plan_resolver: assigned plan row missing, falling back to free plan"
            );
            if let Some(free_plan) = self.plan_repo.find_by_id(FREE_PLAN_ID).await? {
                return Ok(free_plan.entitlements);
            }
        }

        warn!(%user_id, "plan_resolver: free plan row missing, using provisioning defaults");
        Ok(Entitlements::for_kind(PlanKind::Free))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;
    use tunedeck_core::domain::{
        entities::{plans::PlanEntity, users::UserEntity},
        repositories::{plans::MockPlanRepository, users::MockUserRepository},
        value_objects::enums::user_roles::UserRole,
    };

    fn sample_user(id: Uuid, plan_id: Option<Uuid>) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            username: "listener".to_string(),
            email: "listener@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User.to_string(),
            plan_id,
            skips_today: 0,
            last_skip_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_plan(id: Uuid, kind: PlanKind) -> PlanEntity {
        PlanEntity {
            id,
            kind: kind.to_string(),
            price_minor: 999,
            entitlements: Entitlements::for_kind(kind),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn returns_assigned_plan_entitlements() {
        let user_id = Uuid::new_v4();
        let premium_plan_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        let user = sample_user(user_id, Some(premium_plan_id));
        user_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });

        let plan = sample_plan(premium_plan_id, PlanKind::Premium);
        plan_repo
            .expect_find_by_id()
            .with(eq(premium_plan_id))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let resolver = PlanResolver::new(Arc::new(user_repo), Arc::new(plan_repo));
        let entitlements = resolver
            .resolve_entitlements_for_user(user_id)
            .await
            .unwrap();

        assert!(entitlements.unlimited_skips());
        assert!(!entitlements.is_ad_supported());
    }

    #[tokio::test]
    async fn falls_back_to_free_plan_when_no_plan_assigned() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        let user = sample_user(user_id, None);
        user_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });

        let free_plan = sample_plan(FREE_PLAN_ID, PlanKind::Free);
        plan_repo
            .expect_find_by_id()
            .with(eq(FREE_PLAN_ID))
            .returning(move |_| {
                let plan = free_plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let resolver = PlanResolver::new(Arc::new(user_repo), Arc::new(plan_repo));
        let entitlements = resolver
            .resolve_entitlements_for_user(user_id)
            .await
            .unwrap();

        assert_eq!(entitlements.max_skips_per_day, Some(3));
        assert!(entitlements.is_ad_supported());
    }

    #[tokio::test]
    async fn uses_provisioning_defaults_when_plan_rows_are_missing() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();

        let user = sample_user(user_id, None);
        user_repo
            .expect_find_by_id()
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });

        plan_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let resolver = PlanResolver::new(Arc::new(user_repo), Arc::new(plan_repo));
        let entitlements = resolver
            .resolve_entitlements_for_user(user_id)
            .await
            .unwrap();

        assert_eq!(entitlements, Entitlements::for_kind(PlanKind::Free));
    }

    #[tokio::test]
    async fn errors_when_user_is_missing() {
        let mut user_repo = MockUserRepository::new();
        let plan_repo = MockPlanRepository::new();

        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let resolver = PlanResolver::new(Arc::new(user_repo), Arc::new(plan_repo));
        let result = resolver
            .resolve_entitlements_for_user(Uuid::new_v4())
            .await;

        assert!(result.is_err());
    }
}
