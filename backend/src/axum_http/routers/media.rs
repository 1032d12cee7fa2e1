use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use uuid::Uuid;

use tunedeck_core::{
    domain::{
        repositories::media::MediaRepository,
        value_objects::media::{EditMediaModel, InsertMediaModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::media::MediaPostgres,
    },
};

use crate::{auth::AuthUser, axum_http::error_responses, usecases::media::MediaUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let media_usecase = MediaUseCase::new(Arc::new(MediaPostgres::new(Arc::clone(&db_pool))));

    Router::new()
        .route("/", get(list::<MediaPostgres>))
        .route("/", post(create::<MediaPostgres>))
        .route("/my-uploads", get(my_uploads::<MediaPostgres>))
        .route("/:media_id", get(get_media::<MediaPostgres>))
        .route("/:media_id", put(update::<MediaPostgres>))
        .route("/:media_id", delete(delete_media::<MediaPostgres>))
        .route("/:media_id/thumbnail", get(thumbnail::<MediaPostgres>))
        .with_state(Arc::new(media_usecase))
}

pub async fn list<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase.list().await {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn get_media<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    _auth: AuthUser,
    Path(media_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase.get(media_id).await {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn my_uploads<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase.my_uploads(auth.user_id).await {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn create<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    auth: AuthUser,
    Json(insert_media_model): Json<InsertMediaModel>,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase
        .create(auth.user_id, auth.role, insert_media_model)
        .await
    {
        Ok(media) => (StatusCode::CREATED, Json(media)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn update<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    auth: AuthUser,
    Path(media_id): Path<Uuid>,
    Json(edit_media_model): Json<EditMediaModel>,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase
        .update(auth.user_id, auth.role, media_id, edit_media_model)
        .await
    {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn delete_media<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    auth: AuthUser,
    Path(media_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase.delete(auth.user_id, auth.role, media_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

// Unauthenticated: thumbnails are loaded via plain <img> tags.
pub async fn thumbnail<T>(
    State(media_usecase): State<Arc<MediaUseCase<T>>>,
    Path(media_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: MediaRepository + Send + Sync + 'static,
{
    match media_usecase.thumbnail(media_id).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/jpeg")],
            bytes,
        )
            .into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}
