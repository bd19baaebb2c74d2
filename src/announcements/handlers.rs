use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AnnouncementDisplay, ListQuery};
use super::extract::AnnouncementForm;
use super::repo_types::ListFilter;
use super::services::create_announcement;
use crate::{error::ApiError, state::AppState};

pub fn announcement_routes() -> Router<AppState> {
    let collection = get(list_announcements).post(create_announcement_handler);
    Router::new()
        .route("/announcements", collection.clone())
        .route("/announcements/", collection)
        .route("/announcements/:id", get(get_announcement))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, form))]
pub async fn create_announcement_handler(
    State(state): State<AppState>,
    AnnouncementForm(form): AnnouncementForm,
) -> Result<(StatusCode, HeaderMap, Json<AnnouncementDisplay>), ApiError> {
    let announcement = create_announcement(&state, form).await?;
    info!(
        announcement_id = announcement.id,
        owner_id = announcement.owner_id,
        has_image = announcement.image_url.is_some(),
        "announcement published"
    );

    let mut headers = HeaderMap::new();
    let location = format!("/api/announcements/{}", announcement.id);
    if let Ok(location) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(announcement.into())))
}

#[instrument(skip(state))]
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<AnnouncementDisplay>>, ApiError> {
    let filter = ListFilter::try_from(q)?;
    let items = state.announcements.list(filter).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AnnouncementDisplay>, ApiError> {
    let Some(announcement) = state.announcements.find_by_id(id).await? else {
        warn!(announcement_id = id, "announcement not found");
        return Err(ApiError::NotFound("Announcement not found"));
    };
    Ok(Json(announcement.into()))
}
