use anyhow::Context;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::AnnouncementCreate;
use super::repo_types::Announcement;
use crate::{error::ApiError, state::AppState};

pub struct UploadItem {
    pub file_name: Option<String>,
    pub content_type: String,
    pub body: Bytes,
}

/// Everything `POST /announcements` needs, whichever body format it came in.
pub struct CreateAnnouncementInput {
    pub fields: AnnouncementCreate,
    pub owner_id: i64,
    pub image: Option<UploadItem>,
}

pub async fn create_announcement(
    st: &AppState,
    input: CreateAnnouncementInput,
) -> Result<Announcement, ApiError> {
    let new = input.fields.validate()?;

    let owner = st.users.find_by_id(input.owner_id).await?.ok_or_else(|| {
        warn!(owner_id = input.owner_id, "announcement for unknown author");
        ApiError::NotFound("Author (user) not found")
    })?;

    let uploaded = match input.image {
        Some(img) => {
            let key = object_key(img.file_name.as_deref(), &img.content_type);
            st.storage
                .put_object(&key, img.body, &img.content_type)
                .await
                .with_context(|| format!("put_object {}", key))?;
            info!(%key, "image stored");
            Some(key)
        }
        None => None,
    };
    let image_url = uploaded.as_deref().map(|k| st.storage.public_url(k));

    match st.announcements.create(new, &owner, image_url).await {
        Ok(a) => Ok(a),
        Err(e) => {
            if let Some(key) = uploaded {
                if let Err(del) = st.storage.delete_object(&key).await {
                    warn!(error = %del, %key, "orphaned image left in storage");
                }
            }
            Err(e.into())
        }
    }
}

/// `{uuid}_{name}` with the original name made path- and URL-safe.
pub fn object_key(file_name: Option<&str>, content_type: &str) -> String {
    let id = Uuid::new_v4();
    match file_name.map(sanitize_file_name).filter(|n| !n.is_empty()) {
        Some(name) => format!("{}_{}", id, name),
        None => format!("{}.{}", id, ext_from_mime(content_type).unwrap_or("bin")),
    }
}

fn sanitize_file_name(name: &str) -> String {
    lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
    }
    // keep only the last path component, whatever separator the client used
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE_RE.replace_all(base, "_");
    cleaned.trim_start_matches('.').to_string()
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
