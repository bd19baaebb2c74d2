use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::repo_types::{Announcement, AnnouncementRow, ListFilter, NewAnnouncement};
use crate::users::repo_types::User;

#[async_trait]
pub trait AnnouncementRepo: Send + Sync {
    /// Stores the announcement with `owner.region` as its region.
    async fn create(
        &self,
        new: NewAnnouncement,
        owner: &User,
        image_url: Option<String>,
    ) -> anyhow::Result<Announcement>;

    async fn list(&self, filter: ListFilter) -> anyhow::Result<Vec<Announcement>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Announcement>>;

    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Announcement>>;
}

const JOINED_COLUMNS: &str = r#"
    a.id, a.title, a.description, a.price, a.region, a.image_url, a.owner_id,
    a.created_at, a.updated_at,
    u.username AS owner_username, u.first_name AS owner_first_name,
    u.last_name AS owner_last_name, u.region AS owner_region,
    u.created_at AS owner_created_at, u.updated_at AS owner_updated_at
"#;

#[derive(Clone)]
pub struct PgAnnouncementRepo {
    db: PgPool,
}

impl PgAnnouncementRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnnouncementRepo for PgAnnouncementRepo {
    async fn create(
        &self,
        new: NewAnnouncement,
        owner: &User,
        image_url: Option<String>,
    ) -> anyhow::Result<Announcement> {
        let sql = format!(
            r#"
            WITH a AS (
                INSERT INTO announcements (title, description, price, region, image_url, owner_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {JOINED_COLUMNS}
            FROM a
            JOIN users u ON u.id = a.owner_id
            "#
        );
        let row = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.price)
            .bind(&owner.region)
            .bind(&image_url)
            .bind(owner.id)
            .fetch_one(&self.db)
            .await
            .context("insert announcement")?;
        info!(announcement_id = row.id, owner_id = owner.id, "announcement created");
        Ok(row.into())
    }

    async fn list(&self, filter: ListFilter) -> anyhow::Result<Vec<Announcement>> {
        let sql = format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM announcements a
            JOIN users u ON u.id = a.owner_id
            WHERE ($1::text IS NULL OR a.region = $1)
            ORDER BY a.id
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(&filter.region)
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&self.db)
            .await
            .context("list announcements")?;
        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Announcement>> {
        let sql = format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM announcements a
            JOIN users u ON u.id = a.owner_id
            WHERE a.id = $1
            "#
        );
        let row = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("select announcement by id")?;
        Ok(row.map(Announcement::from))
    }

    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Announcement>> {
        let sql = format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM announcements a
            JOIN users u ON u.id = a.owner_id
            WHERE a.owner_id = $1
            ORDER BY a.id
            "#
        );
        let rows = sqlx::query_as::<_, AnnouncementRow>(&sql)
            .bind(owner_id)
            .fetch_all(&self.db)
            .await
            .context("list announcements by owner")?;
        Ok(rows.into_iter().map(Announcement::from).collect())
    }
}
