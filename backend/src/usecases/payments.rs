use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    entities::payments::NewPaymentEntity,
    repositories::{payments::PaymentRepository, plans::PlanRepository, users::UserRepository},
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        payments::{PaymentDto, RecordPaymentModel},
    },
};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("subscription plan not found")]
    PlanNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::PlanNotFound | PaymentError::UserNotFound => StatusCode::NOT_FOUND,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

/// Append-mostly payment ledger; a succeeded payment also switches the
/// payer's plan.
pub struct PaymentUseCase<Pay, U, P>
where
    Pay: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    payment_repo: Arc<Pay>,
    user_repo: Arc<U>,
    plan_repo: Arc<P>,
}

impl<Pay, U, P> PaymentUseCase<Pay, U, P>
where
    Pay: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(payment_repo: Arc<Pay>, user_repo: Arc<U>, plan_repo: Arc<P>) -> Self {
        Self {
            payment_repo,
            user_repo,
            plan_repo,
        }
    }

    pub async fn record(
        &self,
        user_id: Uuid,
        record_payment_model: RecordPaymentModel,
    ) -> PaymentResult<PaymentDto> {
        let plan = self
            .plan_repo
            .find_by_id(record_payment_model.plan_id)
            .await
            .map_err(PaymentError::Internal)?
            .filter(|plan| plan.is_active)
            .ok_or_else(|| {
                warn!(
                    %user_id,
                    plan_id = %record_payment_model.plan_id,
                    "payments: payment for unknown or inactive plan"
                );
                PaymentError::PlanNotFound
            })?;

        if self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(PaymentError::Internal)?
            .is_none()
        {
            return Err(PaymentError::UserNotFound);
        }

        let now = Utc::now();
        let entity = NewPaymentEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id: plan.id,
            amount_minor: record_payment_model.amount_minor,
            status: PaymentStatus::Succeeded.to_string(),
            transaction_ref: record_payment_model.transaction_ref,
            paid_at: now,
            created_at: now,
        };

        let payment_id = self.payment_repo.record(entity.clone()).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "payments: failed to record payment");
            PaymentError::Internal(err)
        })?;

        // The successful payment is what triggers the plan change.
        self.user_repo
            .set_plan(user_id, Some(plan.id))
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %payment_id,
                    db_error = ?err,
                    "payments: payment recorded but plan switch failed"
                );
                PaymentError::Internal(err)
            })?;

        info!(%user_id, %payment_id, plan_id = %plan.id, "payments: payment recorded");

        Ok(PaymentDto {
            id: payment_id,
            user_id,
            plan_id: plan.id,
            amount_minor: entity.amount_minor,
            status: PaymentStatus::Succeeded,
            transaction_ref: entity.transaction_ref,
            paid_at: entity.paid_at,
        })
    }

    pub async fn history(&self, user_id: Uuid) -> PaymentResult<Vec<PaymentDto>> {
        let payments = self
            .payment_repo
            .list_by_user(user_id)
            .await
            .map_err(PaymentError::Internal)?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    pub async fn list_all(&self) -> PaymentResult<Vec<PaymentDto>> {
        let payments = self
            .payment_repo
            .list_all()
            .await
            .map_err(PaymentError::Internal)?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use tunedeck_core::domain::{
        entities::{plans::PlanEntity, users::UserEntity},
        repositories::{
            payments::MockPaymentRepository, plans::MockPlanRepository,
            users::MockUserRepository,
        },
        value_objects::{
            enums::{plan_kinds::PlanKind, user_roles::UserRole},
            plans::Entitlements,
        },
    };

    fn sample_plan(id: Uuid) -> PlanEntity {
        PlanEntity {
            id,
            kind: PlanKind::Premium.to_string(),
            price_minor: 999,
            entitlements: Entitlements::for_kind(PlanKind::Premium),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn sample_user(id: Uuid) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            username: "payer".to_string(),
            email: "payer@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User.to_string(),
            plan_id: None,
            skips_today: 0,
            last_skip_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn successful_payment_switches_the_plan() {
        let user_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        let plan = sample_plan(plan_id);
        plan_repo
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |_| {
                let plan = plan.clone();
                Box::pin(async move { Ok(Some(plan)) })
            });

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

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_record()
            .times(1)
            .returning(|entity| Box::pin(async move { Ok(entity.id) }));

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(user_repo),
            Arc::new(plan_repo),
        );

        let payment = usecase
            .record(
                user_id,
                RecordPaymentModel {
                    plan_id,
                    amount_minor: 999,
                    transaction_ref: Some("txn_123".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Succeeded);
        assert_eq!(payment.plan_id, plan_id);
    }

    #[tokio::test]
    async fn payment_for_unknown_plan_is_rejected_before_the_ledger() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_record().times(0);

        let usecase = PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(MockUserRepository::new()),
            Arc::new(plan_repo),
        );

        let result = usecase
            .record(
                Uuid::new_v4(),
                RecordPaymentModel {
                    plan_id: Uuid::new_v4(),
                    amount_minor: 999,
                    transaction_ref: None,
                },
            )
            .await;

        assert!(matches!(result, Err(PaymentError::PlanNotFound)));
    }
}
