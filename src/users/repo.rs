use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;

    /// Inserts with the externally assigned id. A taken id or username is a storage error.
    async fn create(&self, new: NewUser) -> anyhow::Result<User>;

    /// Returns `None` when the user does not exist.
    async fn update_region(&self, id: i64, region: Option<String>) -> anyhow::Result<Option<User>>;

    async fn get_or_create(&self, new: NewUser) -> anyhow::Result<User> {
        if let Some(user) = self.find_by_id(new.id).await? {
            return Ok(user);
        }
        self.create(new).await
    }
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, region, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("select user by id")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, first_name, last_name, region, created_at, updated_at
            "#,
        )
        .bind(new.id)
        .bind(&new.username)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    async fn update_region(&self, id: i64, region: Option<String>) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET region = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, username, first_name, last_name, region, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(region)
        .fetch_optional(&self.db)
        .await
        .context("update user region")?;
        Ok(user)
    }
}
