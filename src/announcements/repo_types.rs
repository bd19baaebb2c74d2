use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::repo_types::User;

/// Announcement joined with its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub region: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner: User,
}

/// Flat row as returned by the `announcements JOIN users` queries.
#[derive(Debug, FromRow)]
pub struct AnnouncementRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub region: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_username: Option<String>,
    pub owner_first_name: String,
    pub owner_last_name: Option<String>,
    pub owner_region: Option<String>,
    pub owner_created_at: OffsetDateTime,
    pub owner_updated_at: OffsetDateTime,
}

impl From<AnnouncementRow> for Announcement {
    fn from(r: AnnouncementRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            price: r.price,
            region: r.region,
            image_url: r.image_url,
            owner_id: r.owner_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
            owner: User {
                id: r.owner_id,
                username: r.owner_username,
                first_name: r.owner_first_name,
                last_name: r.owner_last_name,
                region: r.owner_region,
                created_at: r.owner_created_at,
                updated_at: r.owner_updated_at,
            },
        }
    }
}

/// Validated input; region is never taken from here, only from the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnouncement {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub skip: i64,
    pub limit: i64,
    pub region: Option<String>,
}
