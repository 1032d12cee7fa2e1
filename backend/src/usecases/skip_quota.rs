use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use tunedeck_core::domain::repositories::users::UserRepository;

#[derive(Debug, Error)]
pub enum SkipQuotaError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SkipQuotaError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SkipQuotaError::UserNotFound => StatusCode::NOT_FOUND,
            SkipQuotaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type SkipQuotaResult<T> = std::result::Result<T, SkipQuotaError>;

/// Per-user daily skip counter. Both operations are single atomic statements
/// at the storage layer, so concurrent requests from multiple devices cannot
/// lose a rollover or an increment. The counter day is the UTC calendar day.
pub struct SkipQuotaTracker<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> SkipQuotaTracker<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Current count for `today`, applying the day-boundary reset as a read
    /// side effect.
    pub async fn skips_today(&self, user_id: Uuid, today: NaiveDate) -> SkipQuotaResult<i32> {
        let skips = self
            .user_repo
            .roll_skip_counter(user_id, today)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "skip_quota: failed to roll skip counter");
                SkipQuotaError::Internal(err)
            })?
            .ok_or(SkipQuotaError::UserNotFound)?;

        Ok(skips)
    }

    /// Records one consumed skip, rolling the day boundary first when needed.
    pub async fn record_skip(&self, user_id: Uuid, today: NaiveDate) -> SkipQuotaResult<i32> {
        let skips = self
            .user_repo
            .increment_skip_counter(user_id, today)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "skip_quota: failed to increment skip counter");
                SkipQuotaError::Internal(err)
            })?
            .ok_or(SkipQuotaError::UserNotFound)?;

        info!(%user_id, skips_today = skips, "skip_quota: skip recorded");
        Ok(skips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tunedeck_core::domain::{
        entities::users::{EditUserEntity, RegisterUserEntity, UserEntity},
        repositories::users::MockUserRepository,
    };

    /// In-memory stand-in with the same day-boundary semantics as the SQL
    /// `CASE WHEN last_skip_date IS DISTINCT FROM today` statement.
    struct InMemoryUsers {
        counters: Mutex<HashMap<Uuid, (i32, Option<NaiveDate>)>>,
    }

    impl InMemoryUsers {
        fn with_user(user_id: Uuid) -> Self {
            let mut counters = HashMap::new();
            counters.insert(user_id, (0, None));
            Self {
                counters: Mutex::new(counters),
            }
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUsers {
        async fn register(&self, _entity: RegisterUserEntity) -> Result<Uuid> {
            unimplemented!()
        }
        async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<UserEntity>> {
            unimplemented!()
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<UserEntity>> {
            unimplemented!()
        }
        async fn list(&self) -> Result<Vec<UserEntity>> {
            unimplemented!()
        }
        async fn update(&self, _user_id: Uuid, _entity: EditUserEntity) -> Result<()> {
            unimplemented!()
        }
        async fn delete(&self, _user_id: Uuid) -> Result<bool> {
            unimplemented!()
        }
        async fn set_plan(&self, _user_id: Uuid, _plan_id: Option<Uuid>) -> Result<()> {
            unimplemented!()
        }

        async fn roll_skip_counter(
            &self,
            user_id: Uuid,
            today: NaiveDate,
        ) -> Result<Option<i32>> {
            let mut counters = self.counters.lock().unwrap();
            Ok(counters.get_mut(&user_id).map(|(skips, last_day)| {
                if *last_day != Some(today) {
                    *skips = 0;
                    *last_day = Some(today);
                }
                *skips
            }))
        }

        async fn increment_skip_counter(
            &self,
            user_id: Uuid,
            today: NaiveDate,
        ) -> Result<Option<i32>> {
            let mut counters = self.counters.lock().unwrap();
            Ok(counters.get_mut(&user_id).map(|(skips, last_day)| {
                if *last_day != Some(today) {
                    *skips = 1;
                    *last_day = Some(today);
                } else {
                    *skips += 1;
                }
                *skips
            }))
        }
    }

    fn day(offset: i64) -> NaiveDate {
        Utc::now().date_naive() + chrono::Duration::days(offset)
    }

    #[tokio::test]
    async fn counts_accumulate_within_a_day() {
        let user_id = Uuid::new_v4();
        let tracker = SkipQuotaTracker::new(Arc::new(InMemoryUsers::with_user(user_id)));

        assert_eq!(tracker.skips_today(user_id, day(0)).await.unwrap(), 0);
        assert_eq!(tracker.record_skip(user_id, day(0)).await.unwrap(), 1);
        assert_eq!(tracker.record_skip(user_id, day(0)).await.unwrap(), 2);
        assert_eq!(tracker.record_skip(user_id, day(0)).await.unwrap(), 3);
        assert_eq!(tracker.skips_today(user_id, day(0)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn counter_resets_when_the_read_crosses_the_day_boundary() {
        let user_id = Uuid::new_v4();
        let tracker = SkipQuotaTracker::new(Arc::new(InMemoryUsers::with_user(user_id)));

        for _ in 0..3 {
            tracker.record_skip(user_id, day(0)).await.unwrap();
        }

        assert_eq!(tracker.skips_today(user_id, day(1)).await.unwrap(), 0);
        // Re-reading the same day must not reset again.
        assert_eq!(tracker.record_skip(user_id, day(1)).await.unwrap(), 1);
        assert_eq!(tracker.skips_today(user_id, day(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn counter_resets_when_the_increment_crosses_the_day_boundary() {
        let user_id = Uuid::new_v4();
        let tracker = SkipQuotaTracker::new(Arc::new(InMemoryUsers::with_user(user_id)));

        for _ in 0..3 {
            tracker.record_skip(user_id, day(0)).await.unwrap();
        }

        // First touch on the new day is the increment, not the read.
        assert_eq!(tracker.record_skip(user_id, day(1)).await.unwrap(), 1);
        assert_eq!(tracker.skips_today(user_id, day(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_user_maps_to_not_found() {
        let tracker = SkipQuotaTracker::new(Arc::new(InMemoryUsers::with_user(Uuid::new_v4())));

        let result = tracker.skips_today(Uuid::new_v4(), day(0)).await;
        assert!(matches!(result, Err(SkipQuotaError::UserNotFound)));
    }

    #[tokio::test]
    async fn repository_errors_surface_as_internal() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_roll_skip_counter()
            .returning(|_, _| Box::pin(async { Err(anyhow::anyhow!("connection refused")) }));

        let tracker = SkipQuotaTracker::new(Arc::new(user_repo));
        let result = tracker.skips_today(Uuid::new_v4(), day(0)).await;

        assert!(matches!(result, Err(SkipQuotaError::Internal(_))));
    }
}
