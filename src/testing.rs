//! In-memory stand-ins for the database and object storage, used by unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;

use crate::announcements::repo::AnnouncementRepo;
use crate::announcements::repo_types::{Announcement, ListFilter, NewAnnouncement};
use crate::storage::StorageClient;
use crate::users::repo::UserRepo;
use crate::users::repo_types::{NewUser, User};

#[derive(Clone)]
struct StoredAnnouncement {
    id: i64,
    new: NewAnnouncement,
    region: Option<String>,
    image_url: Option<String>,
    owner_id: i64,
    created_at: OffsetDateTime,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    announcements: Vec<StoredAnnouncement>,
    user_inserts: usize,
    fail_announcement_inserts: bool,
}

impl Tables {
    fn join(&self, a: &StoredAnnouncement) -> Option<Announcement> {
        let owner = self.users.get(&a.owner_id)?.clone();
        Some(Announcement {
            id: a.id,
            title: a.new.title.clone(),
            description: a.new.description.clone(),
            price: a.new.price,
            region: a.region.clone(),
            image_url: a.image_url.clone(),
            owner_id: a.owner_id,
            created_at: a.created_at,
            updated_at: a.created_at,
            owner,
        })
    }
}

#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    pub fn user_inserts(&self) -> usize {
        self.tables.lock().unwrap().user_inserts
    }

    pub fn announcement_count(&self) -> usize {
        self.tables.lock().unwrap().announcements.len()
    }

    pub fn fail_announcement_inserts(&self) {
        self.tables.lock().unwrap().fail_announcement_inserts = true;
    }
}

#[async_trait]
impl UserRepo for MemoryDb {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.tables.lock().unwrap().users.get(&id).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let mut t = self.tables.lock().unwrap();
        anyhow::ensure!(!t.users.contains_key(&new.id), "duplicate key users_pkey");
        if new.username.is_some() {
            anyhow::ensure!(
                t.users.values().all(|u| u.username != new.username),
                "duplicate key users_username_key"
            );
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: new.id,
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            region: None,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        t.user_inserts += 1;
        Ok(user)
    }

    async fn update_region(&self, id: i64, region: Option<String>) -> anyhow::Result<Option<User>> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.users.get_mut(&id).map(|u| {
            u.region = region;
            u.updated_at = OffsetDateTime::now_utc();
            u.clone()
        }))
    }
}

#[async_trait]
impl AnnouncementRepo for MemoryDb {
    async fn create(
        &self,
        new: NewAnnouncement,
        owner: &User,
        image_url: Option<String>,
    ) -> anyhow::Result<Announcement> {
        let mut t = self.tables.lock().unwrap();
        anyhow::ensure!(!t.fail_announcement_inserts, "connection reset");
        anyhow::ensure!(
            t.users.contains_key(&owner.id),
            "foreign key violation announcements_owner_id_fkey"
        );
        let stored = StoredAnnouncement {
            id: t.announcements.len() as i64 + 1,
            new,
            region: owner.region.clone(),
            image_url,
            owner_id: owner.id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.announcements.push(stored.clone());
        t.join(&stored)
            .ok_or_else(|| anyhow::anyhow!("owner vanished"))
    }

    async fn list(&self, filter: ListFilter) -> anyhow::Result<Vec<Announcement>> {
        let t = self.tables.lock().unwrap();
        Ok(t.announcements
            .iter()
            .filter(|a| filter.region.is_none() || a.region == filter.region)
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .filter_map(|a| t.join(a))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Announcement>> {
        let t = self.tables.lock().unwrap();
        Ok(t.announcements
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| t.join(a)))
    }

    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Announcement>> {
        let t = self.tables.lock().unwrap();
        Ok(t.announcements
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .filter_map(|a| t.join(a))
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct FakeStorage {
    puts: Arc<Mutex<Vec<(String, Bytes, String)>>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

impl FakeStorage {
    pub fn puts(&self) -> Vec<(String, Bytes, String)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageClient for FakeStorage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), body, content_type.to_string()));
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://fake.local/{}", key)
    }
}
