use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{UserCreate, UserDisplay, UserUpdate};
use crate::{announcements::dto::AnnouncementDisplay, error::ApiError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/get_or_create", post(get_or_create_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/region", put(update_user_region))
        .route("/users/:id/announcements", get(list_user_announcements))
}

#[instrument(skip(state, payload))]
pub async fn get_or_create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<Json<UserDisplay>, ApiError> {
    let user = state.users.get_or_create(payload.into()).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDisplay>, ApiError> {
    let user = state.users.find_by_id(id).await?.ok_or_else(|| {
        warn!(user_id = id, "user not found");
        ApiError::NotFound("User not found")
    })?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserDisplay>, ApiError> {
    let Some(user) = state.users.update_region(id, payload.region).await? else {
        warn!(user_id = id, "region update for unknown user");
        return Err(ApiError::NotFound("User not found"));
    };
    info!(user_id = id, region = ?user.region, "user region updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_user_announcements(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AnnouncementDisplay>>, ApiError> {
    let items = state.announcements.list_by_owner(id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
