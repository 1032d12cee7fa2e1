use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use uuid::Uuid;

use tunedeck_core::{
    domain::{
        repositories::plans::PlanRepository,
        value_objects::plans::{EditPlanModel, InsertPlanModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres,
    },
};

use crate::{auth::AuthUser, axum_http::error_responses, usecases::plans::PlansUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plans_usecase = PlansUseCase::new(Arc::new(PlanPostgres::new(Arc::clone(&db_pool))));

    Router::new()
        .route("/", get(list_plans::<PlanPostgres>))
        .route("/", post(create_plan::<PlanPostgres>))
        .route("/:plan_id", get(get_plan::<PlanPostgres>))
        .route("/:plan_id", put(update_plan::<PlanPostgres>))
        .route("/:plan_id", delete(deactivate_plan::<PlanPostgres>))
        .with_state(Arc::new(plans_usecase))
}

// Plan listings are public so the subscription page can render before login.
pub async fn list_plans<T>(
    State(plans_usecase): State<Arc<PlansUseCase<T>>>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync + 'static,
{
    match plans_usecase.list_plans().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn get_plan<T>(
    State(plans_usecase): State<Arc<PlansUseCase<T>>>,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync + 'static,
{
    match plans_usecase.get_plan(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn create_plan<T>(
    State(plans_usecase): State<Arc<PlansUseCase<T>>>,
    auth: AuthUser,
    Json(insert_plan_model): Json<InsertPlanModel>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return error_responses::forbidden();
    }

    match plans_usecase.create_plan(insert_plan_model).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn update_plan<T>(
    State(plans_usecase): State<Arc<PlansUseCase<T>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(edit_plan_model): Json<EditPlanModel>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return error_responses::forbidden();
    }

    match plans_usecase.update_plan(plan_id, edit_plan_model).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn deactivate_plan<T>(
    State(plans_usecase): State<Arc<PlansUseCase<T>>>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync + 'static,
{
    if !auth.is_admin() {
        return error_responses::forbidden();
    }

    match plans_usecase.deactivate_plan(plan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}
