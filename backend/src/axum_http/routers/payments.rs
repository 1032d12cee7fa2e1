use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use uuid::Uuid;

use tunedeck_core::{
    domain::{
        repositories::{
            payments::PaymentRepository, plans::PlanRepository, users::UserRepository,
        },
        value_objects::payments::RecordPaymentModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            payments::PaymentPostgres, plans::PlanPostgres, users::UserPostgres,
        },
    },
};

use crate::{auth::AuthUser, axum_http::error_responses, usecases::payments::PaymentUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let payment_usecase = PaymentUseCase::new(
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route(
            "/",
            get(list_all::<PaymentPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/",
            post(record::<PaymentPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/user/:user_id",
            get(history::<PaymentPostgres, UserPostgres, PlanPostgres>),
        )
        .with_state(Arc::new(payment_usecase))
}

pub async fn list_all<Pay, U, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<Pay, U, P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return error_responses::forbidden();
    }

    match payment_usecase.list_all().await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn history<Pay, U, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<Pay, U, P>>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    if auth.user_id != user_id && !auth.is_admin() {
        return error_responses::forbidden();
    }

    match payment_usecase.history(user_id).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn record<Pay, U, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<Pay, U, P>>>,
    auth: AuthUser,
    Json(record_payment_model): Json<RecordPaymentModel>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match payment_usecase
        .record(auth.user_id, record_payment_model)
        .await
    {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}
