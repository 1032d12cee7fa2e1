use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use tunedeck_core::{
    domain::{
        repositories::{plans::PlanRepository, users::UserRepository},
        value_objects::users::{EditUserModel, SkipCountDto},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{plans::PlanPostgres, users::UserPostgres},
    },
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses,
    usecases::{skip_quota::SkipQuotaTracker, users::UserUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let skip_quota =
        SkipQuotaTracker::new(Arc::new(UserPostgres::new(Arc::clone(&db_pool))));
    let quota_routes = Router::new()
        .route("/skip-count", get(skip_count::<UserPostgres>))
        .route("/increment-skip", post(increment_skip::<UserPostgres>))
        .with_state(Arc::new(skip_quota));

    let user_usecase = UserUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
    );
    let user_routes = Router::new()
        .route("/", get(list::<UserPostgres, PlanPostgres>))
        .route("/:user_id", get(get_user::<UserPostgres, PlanPostgres>))
        .route("/:user_id", put(update::<UserPostgres, PlanPostgres>))
        .route("/:user_id", delete(delete_user::<UserPostgres, PlanPostgres>))
        .route(
            "/subscription/:plan_id",
            put(change_subscription::<UserPostgres, PlanPostgres>),
        )
        .with_state(Arc::new(user_usecase));

    Router::new().merge(quota_routes).merge(user_routes)
}

pub async fn list<U, P>(
    State(user_usecase): State<Arc<UserUseCase<U, P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return error_responses::forbidden();
    }

    match user_usecase.list().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn get_user<U, P>(
    State(user_usecase): State<Arc<UserUseCase<U, P>>>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match user_usecase.get(user_id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn update<U, P>(
    State(user_usecase): State<Arc<UserUseCase<U, P>>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(edit_user_model): Json<EditUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    if auth.user_id != user_id && !auth.is_admin() {
        return error_responses::forbidden();
    }

    match user_usecase.update(user_id, edit_user_model).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn delete_user<U, P>(
    State(user_usecase): State<Arc<UserUseCase<U, P>>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return error_responses::forbidden();
    }

    match user_usecase.delete(user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn change_subscription<U, P>(
    State(user_usecase): State<Arc<UserUseCase<U, P>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match user_usecase.change_plan(auth.user_id, plan_id).await {
        Ok(()) => (StatusCode::OK, "Subscription updated successfully").into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

/// Applies the day-boundary rollover as a read side effect.
pub async fn skip_count<U>(
    State(skip_quota): State<Arc<SkipQuotaTracker<U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match skip_quota
        .skips_today(auth.user_id, Utc::now().date_naive())
        .await
    {
        Ok(skips_today) => (StatusCode::OK, Json(SkipCountDto { skips_today })).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn increment_skip<U>(
    State(skip_quota): State<Arc<SkipQuotaTracker<U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
{
    match skip_quota
        .record_skip(auth.user_id, Utc::now().date_naive())
        .await
    {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}
