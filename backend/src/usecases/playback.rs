use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    repositories::{plans::PlanRepository, users::UserRepository},
    value_objects::playback::{Decision, PlaybackPolicy, TransportAction},
};

use crate::usecases::{
    plan_resolver::PlanResolver,
    skip_quota::{SkipQuotaError, SkipQuotaTracker},
};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlaybackError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PlaybackError::UserNotFound => StatusCode::NOT_FOUND,
            PlaybackError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SkipQuotaError> for PlaybackError {
    fn from(value: SkipQuotaError) -> Self {
        match value {
            SkipQuotaError::UserNotFound => PlaybackError::UserNotFound,
            SkipQuotaError::Internal(err) => PlaybackError::Internal(err),
        }
    }
}

pub type PlaybackResult<T> = std::result::Result<T, PlaybackError>;

#[derive(Debug, Clone, Copy)]
pub struct PlaybackOutcome {
    pub decision: Decision,
    pub skips_today: i32,
}

/// Server-side rendition of the playback policy: resolves entitlements and
/// the rolled quota, runs the pure decision, and persists the skip side
/// effect at most once per invocation.
pub struct PlaybackUseCase<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    plan_resolver: Arc<PlanResolver<U, P>>,
    skip_quota: Arc<SkipQuotaTracker<U>>,
}

impl<U, P> PlaybackUseCase<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(
        plan_resolver: Arc<PlanResolver<U, P>>,
        skip_quota: Arc<SkipQuotaTracker<U>>,
    ) -> Self {
        Self {
            plan_resolver,
            skip_quota,
        }
    }

    pub async fn decide(
        &self,
        user_id: Uuid,
        action: TransportAction,
        today: NaiveDate,
    ) -> PlaybackResult<PlaybackOutcome> {
        let skips_so_far = self.skip_quota.skips_today(user_id, today).await?;

        let entitlements = self
            .plan_resolver
            .resolve_entitlements_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "playback: failed to resolve entitlements");
                PlaybackError::Internal(err)
            })?;

        let decision = PlaybackPolicy::decide(&action, &entitlements, skips_so_far);

        let skips_today = if decision.allowed && decision.counts_against_quota {
            self.skip_quota.record_skip(user_id, today).await?
        } else {
            skips_so_far
        };

        if decision.allowed {
            info!(
                %user_id,
                ?action,
                requires_ad = decision.requires_ad,
                skips_today,
                "playback: action allowed"
            );
        } else {
            warn!(
                %user_id,
                ?action,
                deny_reason = ?decision.deny_reason,
                skips_today,
                "playback: action denied"
            );
        }

        Ok(PlaybackOutcome {
            decision,
            skips_today,
        })
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
        value_objects::{
            enums::{plan_kinds::PlanKind, user_roles::UserRole},
            playback::{DenyReason, SkipDirection},
            plans::{Entitlements, FREE_PLAN_ID},
        },
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
            price_minor: 0,
            entitlements: Entitlements::for_kind(kind),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn manual_forward_skip() -> TransportAction {
        TransportAction::Skip {
            direction: SkipDirection::Forward,
            manual: true,
        }
    }

    struct Fixture {
        user_id: Uuid,
        plan_id: Uuid,
        kind: PlanKind,
        skips_so_far: i32,
        expected_increments: usize,
    }

    fn build_usecase(
        fixture: &Fixture,
    ) -> PlaybackUseCase<MockUserRepository, MockPlanRepository> {
        let Fixture {
            user_id,
            plan_id,
            kind,
            skips_so_far,
            expected_increments,
        } = *fixture;

        let mut quota_users = MockUserRepository::new();
        quota_users
            .expect_roll_skip_counter()
            .with(eq(user_id), mockall::predicate::always())
            .returning(move |_, _| Box::pin(async move { Ok(Some(skips_so_far)) }));
        quota_users
            .expect_increment_skip_counter()
            .times(expected_increments)
            .returning(move |_, _| Box::pin(async move { Ok(Some(skips_so_far + 1)) }));

        let mut resolver_users = MockUserRepository::new();
        let user = sample_user(user_id, Some(plan_id));
        resolver_users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });

        let mut plan_repo = MockPlanRepository::new();
        let plan = sample_plan(plan_id, kind);
        plan_repo
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

        let plan_resolver = Arc::new(PlanResolver::new(
            Arc::new(resolver_users),
            Arc::new(plan_repo),
        ));
        let skip_quota = Arc::new(SkipQuotaTracker::new(Arc::new(quota_users)));

        PlaybackUseCase::new(plan_resolver, skip_quota)
    }

    #[tokio::test]
    async fn allowed_manual_skip_records_exactly_one_increment() {
        let fixture = Fixture {
            user_id: Uuid::new_v4(),
            plan_id: FREE_PLAN_ID,
            kind: PlanKind::Free,
            skips_so_far: 1,
            expected_increments: 1,
        };
        let usecase = build_usecase(&fixture);

        let outcome = usecase
            .decide(fixture.user_id, manual_forward_skip(), Utc::now().date_naive())
            .await
            .unwrap();

        assert!(outcome.decision.allowed);
        assert!(outcome.decision.requires_ad);
        assert_eq!(outcome.skips_today, 2);
    }

    #[tokio::test]
    async fn denied_skip_never_touches_the_counter() {
        let fixture = Fixture {
            user_id: Uuid::new_v4(),
            plan_id: FREE_PLAN_ID,
            kind: PlanKind::Free,
            skips_so_far: 3,
            expected_increments: 0,
        };
        let usecase = build_usecase(&fixture);

        let outcome = usecase
            .decide(fixture.user_id, manual_forward_skip(), Utc::now().date_naive())
            .await
            .unwrap();

        assert!(!outcome.decision.allowed);
        assert_eq!(
            outcome.decision.deny_reason,
            Some(DenyReason::SkipQuotaExceeded)
        );
        assert_eq!(outcome.skips_today, 3);
    }

    #[tokio::test]
    async fn premium_skips_never_count_or_require_ads() {
        let fixture = Fixture {
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            kind: PlanKind::Premium,
            skips_so_far: 50,
            expected_increments: 0,
        };
        let usecase = build_usecase(&fixture);

        let outcome = usecase
            .decide(fixture.user_id, manual_forward_skip(), Utc::now().date_naive())
            .await
            .unwrap();

        assert!(outcome.decision.allowed);
        assert!(!outcome.decision.requires_ad);
        assert_eq!(outcome.skips_today, 50);
    }

    #[tokio::test]
    async fn natural_end_requires_ad_without_counting() {
        let fixture = Fixture {
            user_id: Uuid::new_v4(),
            plan_id: FREE_PLAN_ID,
            kind: PlanKind::Free,
            skips_so_far: 3,
            expected_increments: 0,
        };
        let usecase = build_usecase(&fixture);

        let outcome = usecase
            .decide(
                fixture.user_id,
                TransportAction::NaturalEnd,
                Utc::now().date_naive(),
            )
            .await
            .unwrap();

        assert!(outcome.decision.allowed);
        assert!(outcome.decision.requires_ad);
        assert_eq!(outcome.skips_today, 3);
    }

    #[tokio::test]
    async fn seek_denial_for_free_plan_has_no_side_effects() {
        let fixture = Fixture {
            user_id: Uuid::new_v4(),
            plan_id: FREE_PLAN_ID,
            kind: PlanKind::Free,
            skips_so_far: 0,
            expected_increments: 0,
        };
        let usecase = build_usecase(&fixture);

        let outcome = usecase
            .decide(
                fixture.user_id,
                TransportAction::Seek { target_secs: 90 },
                Utc::now().date_naive(),
            )
            .await
            .unwrap();

        assert!(!outcome.decision.allowed);
        assert_eq!(
            outcome.decision.deny_reason,
            Some(DenyReason::SeekNotAllowed)
        );
    }

    #[tokio::test]
    async fn missing_user_maps_to_not_found() {
        let mut quota_users = MockUserRepository::new();
        quota_users
            .expect_roll_skip_counter()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let resolver_users = MockUserRepository::new();
        let plan_repo = MockPlanRepository::new();

        let usecase = PlaybackUseCase::new(
            Arc::new(PlanResolver::new(
                Arc::new(resolver_users),
                Arc::new(plan_repo),
            )),
            Arc::new(SkipQuotaTracker::new(Arc::new(quota_users))),
        );

        let result = usecase
            .decide(
                Uuid::new_v4(),
                manual_forward_skip(),
                Utc::now().date_naive(),
            )
            .await;

        assert!(matches!(result, Err(PlaybackError::UserNotFound)));
    }
}
