use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use std::sync::Arc;

use tunedeck_core::{
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, RegisterUserModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres,
    },
};

use crate::{
    axum_http::error_responses,
    config::config_loader,
    usecases::auth::AuthUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let auth_secret = config_loader::get_auth_secret().expect("JWT_AUTH_SECRET is invalid");
    let auth_usecase = AuthUseCase::new(Arc::new(user_repository), auth_secret);

    Router::new()
        .route("/register", post(register::<UserPostgres>))
        .route("/login", post(login::<UserPostgres>))
        .with_state(Arc::new(auth_usecase))
}

pub async fn register<T>(
    State(auth_usecase): State<Arc<AuthUseCase<T>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match auth_usecase.register(register_user_model).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn login<T>(
    State(auth_usecase): State<Arc<AuthUseCase<T>>>,
    Json(login_model): Json<LoginModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync + 'static,
{
    match auth_usecase.login(login_model).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}
