use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{NewUser, User};

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl From<UserCreate> for NewUser {
    fn from(u: UserCreate) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

/// `null` or a missing field clears the region.
#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDisplay {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub region: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserDisplay {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            region: u.region,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
