use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::payments::PaymentEntity,
    value_objects::enums::payment_statuses::PaymentStatus,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentModel {
    pub plan_id: Uuid,
    pub amount_minor: i32,
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub amount_minor: i32,
    pub status: PaymentStatus,
    pub transaction_ref: Option<String>,
    pub paid_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            amount_minor: value.amount_minor,
            status: PaymentStatus::from_str(&value.status),
            transaction_ref: value.transaction_ref,
            paid_at: value.paid_at,
        }
    }
}
