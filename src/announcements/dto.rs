use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{Announcement, ListFilter, NewAnnouncement};
use crate::{error::ApiError, users::dto::UserDisplay};

const TITLE_MIN: usize = 3;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Serialize)]
pub struct AnnouncementDisplay {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub region: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub owner: UserDisplay,
}

impl From<Announcement> for AnnouncementDisplay {
    fn from(a: Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            price: a.price,
            region: a.region,
            image_url: a.image_url,
            owner_id: a.owner_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
            owner: a.owner.into(),
        }
    }
}

/// User-supplied announcement fields, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl AnnouncementCreate {
    pub fn validate(self) -> Result<NewAnnouncement, ApiError> {
        let title_len = self.title.chars().count();
        if !(TITLE_MIN..=TITLE_MAX).contains(&title_len) {
            return Err(ApiError::Validation(format!(
                "title must be between {TITLE_MIN} and {TITLE_MAX} characters"
            )));
        }
        if let Some(d) = &self.description {
            if d.chars().count() > DESCRIPTION_MAX {
                return Err(ApiError::Validation(format!(
                    "description must be at most {DESCRIPTION_MAX} characters"
                )));
            }
        }
        if let Some(p) = self.price {
            if !p.is_finite() || p <= 0.0 {
                return Err(ApiError::Validation("price must be greater than zero".into()));
            }
        }
        Ok(NewAnnouncement {
            title: self.title,
            description: self.description,
            price: self.price,
        })
    }
}

/// JSON variant of `POST /announcements`.
#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementJson {
    #[serde(flatten)]
    pub fields: AnnouncementCreate,
    #[serde(alias = "owner_id")]
    pub current_user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub region: Option<String>,
}

fn default_limit() -> i64 {
    100
}

impl TryFrom<ListQuery> for ListFilter {
    type Error = ApiError;

    fn try_from(q: ListQuery) -> Result<Self, Self::Error> {
        if q.skip < 0 || q.limit < 0 {
            return Err(ApiError::Validation("skip and limit must be non-negative".into()));
        }
        Ok(ListFilter {
            skip: q.skip,
            limit: q.limit,
            region: q.region.filter(|r| !r.is_empty()),
        })
    }
}
