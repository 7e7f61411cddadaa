use std::collections::BTreeMap;

use async_trait::async_trait;
use beatstore_core::search::{genre_matches, matches_listing};
use beatstore_core::types::DbId;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult, EMAIL_TAKEN};
use crate::models::account::{Account, CreateAccount, EnsureAdmin};
use crate::models::beat::{Beat, CreateBeat, UpdateBeat};
use crate::models::stats::StoreStats;

/// A [`Store`] that keeps everything in process memory.
///
/// Ids are assigned sequentially from 1, like BIGSERIAL. Contents are lost on
/// restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<DbId, Account>,
    beats: BTreeMap<DbId, Beat>,
    last_account_id: DbId,
    last_beat_id: DbId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.email == email)
    }

    fn insert_account(
        &mut self,
        username: &str,
        email: &str,
        hash: &str,
        is_admin: bool,
    ) -> Account {
        self.last_account_id += 1;
        let now = Utc::now();
        let account = Account {
            id: self.last_account_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash.to_string(),
            is_admin,
            created_at: now,
            updated_at: now,
        };
        self.accounts.insert(account.id, account.clone());
        account
    }

    fn beats_where(&self, predicate: impl Fn(&Beat) -> bool) -> Vec<Beat> {
        self.beats.values().filter(|&b| predicate(b)).cloned().collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_account(&self, input: &CreateAccount) -> StoreResult<Account> {
        let mut tables = self.inner.write().await;
        if tables.account_by_email(&input.email).is_some() {
            return Err(StoreError::Conflict(EMAIL_TAKEN.to_string()));
        }
        Ok(tables.insert_account(
            &input.username,
            &input.email,
            &input.password_hash,
            input.is_admin,
        ))
    }

    async fn find_account_by_id(&self, id: DbId) -> StoreResult<Option<Account>> {
        Ok(self.inner.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.inner.read().await.account_by_email(email).cloned())
    }

    async fn promote_account(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.inner.write().await;
        match tables.accounts.get_mut(&id) {
            Some(account) if !account.is_admin => {
                account.is_admin = true;
                account.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        let mut tables = self.inner.write().await;
        match tables.accounts.get_mut(&id) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ensure_admin(&self, input: &EnsureAdmin) -> StoreResult<Account> {
        let mut tables = self.inner.write().await;
        let existing = tables.account_by_email(&input.email).map(|a| a.id);
        if let Some(account) = existing.and_then(|id| tables.accounts.get_mut(&id)) {
            if !account.is_admin {
                account.is_admin = true;
                account.updated_at = Utc::now();
            }
            return Ok(account.clone());
        }
        Ok(tables.insert_account(&input.username, &input.email, &input.password_hash, true))
    }

    async fn create_beat(&self, input: &CreateBeat) -> StoreResult<Beat> {
        let mut tables = self.inner.write().await;
        tables.last_beat_id += 1;
        let now = Utc::now();
        let beat = Beat {
            id: tables.last_beat_id,
            title: input.title.clone(),
            bpm: input.bpm,
            price: input.price,
            genre: input.genre.clone(),
            picture: input.picture.clone(),
            audio: input.audio.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.beats.insert(beat.id, beat.clone());
        Ok(beat)
    }

    async fn find_beat(&self, id: DbId) -> StoreResult<Option<Beat>> {
        Ok(self.inner.read().await.beats.get(&id).cloned())
    }

    async fn list_beats(&self) -> StoreResult<Vec<Beat>> {
        Ok(self.inner.read().await.beats_where(|_| true))
    }

    async fn search_beats(&self, query: &str) -> StoreResult<Vec<Beat>> {
        let tables = self.inner.read().await;
        Ok(tables.beats_where(|b| matches_listing(&b.title, &b.genre, query)))
    }

    async fn list_beats_by_genre(&self, genre: &str) -> StoreResult<Vec<Beat>> {
        let tables = self.inner.read().await;
        Ok(tables.beats_where(|b| genre_matches(&b.genre, genre)))
    }

    async fn update_beat(&self, id: DbId, input: &UpdateBeat) -> StoreResult<Option<Beat>> {
        let mut tables = self.inner.write().await;
        let Some(beat) = tables.beats.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            beat.title = title.clone();
        }
        if let Some(bpm) = input.bpm {
            beat.bpm = bpm;
        }
        if let Some(price) = input.price {
            beat.price = price;
        }
        if let Some(genre) = &input.genre {
            beat.genre = genre.clone();
        }
        if let Some(picture) = &input.picture {
            beat.picture = picture.clone();
        }
        if let Some(audio) = &input.audio {
            beat.audio = audio.clone();
        }
        beat.updated_at = Utc::now();
        Ok(Some(beat.clone()))
    }

    async fn delete_beat(&self, id: DbId) -> StoreResult<Option<Beat>> {
        Ok(self.inner.write().await.beats.remove(&id))
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let tables = self.inner.read().await;
        Ok(StoreStats {
            beat_count: tables.beats.len() as i64,
            account_count: tables.accounts.len() as i64,
            admin_count: tables.accounts.values().filter(|a| a.is_admin).count() as i64,
        })
    }
}
