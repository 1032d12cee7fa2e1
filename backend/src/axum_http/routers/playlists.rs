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
        repositories::{
            plans::PlanRepository, playlists::PlaylistRepository, users::UserRepository,
        },
        value_objects::playlists::{
            CreatePlaylistModel, RenamePlaylistModel, ReorderPlaylistModel,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            plans::PlanPostgres, playlists::PlaylistPostgres, users::UserPostgres,
        },
    },
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses,
    usecases::{plan_resolver::PlanResolver, playlists::PlaylistUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_resolver = Arc::new(PlanResolver::new(
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
    ));
    let playlist_usecase = PlaylistUseCase::new(
        Arc::new(PlaylistPostgres::new(Arc::clone(&db_pool))),
        plan_resolver,
    );

    Router::new()
        .route(
            "/create",
            post(create::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/my-playlists",
            get(my_playlists::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/liked-music",
            get(liked_music::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/like/:media_id",
            post(like::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/unlike/:media_id",
            delete(unlike::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/:playlist_id",
            get(get_playlist::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/:playlist_id",
            put(rename::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/:playlist_id",
            delete(delete_playlist::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/:playlist_id/add-media/:media_id",
            post(add_media::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .route(
            "/:playlist_id/reorder",
            put(reorder::<PlaylistPostgres, UserPostgres, PlanPostgres>),
        )
        .with_state(Arc::new(playlist_usecase))
}

pub async fn create<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
    Json(create_playlist_model): Json<CreatePlaylistModel>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase
        .create(auth.user_id, create_playlist_model)
        .await
    {
        Ok(playlist) => (StatusCode::CREATED, Json(playlist)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn get_playlist<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    _auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase.get(playlist_id).await {
        Ok(playlist) => (StatusCode::OK, Json(playlist)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn my_playlists<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase.my_playlists(auth.user_id).await {
        Ok(playlists) => (StatusCode::OK, Json(playlists)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn liked_music<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase.liked_music(auth.user_id).await {
        Ok(playlist) => (StatusCode::OK, Json(playlist)).into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn like<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
    Path(media_id): Path<Uuid>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase.like(auth.user_id, media_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn unlike<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
    Path(media_id): Path<Uuid>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase.unlike(auth.user_id, media_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn add_media<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    _auth: AuthUser,
    Path((playlist_id, media_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase.add_media(playlist_id, media_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn reorder<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    _auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
    Json(reorder_playlist_model): Json<ReorderPlaylistModel>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase
        .reorder(playlist_id, reorder_playlist_model.media_ids)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn rename<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
    Json(rename_playlist_model): Json<RenamePlaylistModel>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase
        .rename(
            auth.user_id,
            auth.role,
            playlist_id,
            rename_playlist_model.name,
        )
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}

pub async fn delete_playlist<PL, U, P>(
    State(playlist_usecase): State<Arc<PlaylistUseCase<PL, U, P>>>,
    auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
) -> impl IntoResponse
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match playlist_usecase
        .delete(auth.user_id, auth.role, playlist_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_responses::from_status(err.status_code(), err.to_string()),
    }
}
