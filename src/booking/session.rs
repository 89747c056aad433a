//! Per-conversation sessions and per-identity profiles.
//!
//! Each conversation owns one [`Session`] behind its own mutex, so events of
//! one conversation are applied one at a time while different conversations
//! proceed in parallel. Sessions are in-memory only and are evicted once idle;
//! the durable parts (contact profile, language) live in the settings table.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::model::{settings_keys, Draft, IdentityContext, Profile};
use super::state::BookingState;
use crate::i18n::Language;
use crate::store::Database;

/// Identifies one conversation: a user on a given channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(channel: &str, user_id: &str) -> Self {
        Self(format!("{channel}:{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable state of one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: ConversationId,
    pub identity: IdentityContext,
    pub language: Language,
    pub state: BookingState,
    pub draft: Draft,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: ConversationId, identity: IdentityContext, language: Language) -> Self {
        let now = Utc::now();
        Self {
            id,
            identity,
            language,
            state: BookingState::default(),
            draft: Draft::default(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Record activity for idle tracking.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Drop the draft. Identity and language are kept.
    pub fn reset_draft(&mut self) {
        self.draft = Draft::default();
    }

    pub fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_activity > timeout
    }
}

/// All live conversations.
pub struct SessionStore {
    sessions: RwLock<HashMap<ConversationId, Arc<Mutex<Session>>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub async fn get(&self, id: &ConversationId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Return the existing session, or insert the one built by `make`.
    pub async fn get_or_insert_with(
        &self,
        id: &ConversationId,
        make: impl FnOnce() -> Session,
    ) -> Arc<Mutex<Session>> {
        if let Some(existing) = self.get(id).await {
            return existing;
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(conversation = %id, "Session created");
                Arc::new(Mutex::new(make()))
            })
            .clone()
    }

    /// Whether `handle` is still the live session for `id`. A handle fetched
    /// before an eviction sweep may have been detached from the store.
    pub async fn holds(&self, id: &ConversationId, handle: &Arc<Mutex<Session>>) -> bool {
        self.sessions
            .read()
            .await
            .get(id)
            .is_some_and(|live| Arc::ptr_eq(live, handle))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than the timeout. Sessions currently
    /// locked by a handler are in use and always kept.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => !s.is_idle(now, self.idle_timeout),
            Err(_) => true,
        });
        before - sessions.len()
    }
}

/// Spawn a background task that evicts idle sessions on a fixed interval.
pub fn spawn_sweep_task(
    store: Arc<SessionStore>,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = store.evict_idle(Utc::now()).await;
            if evicted > 0 {
                let remaining = store.len().await;
                info!(evicted, remaining, "Evicted idle sessions");
            }
        }
    })
}

/// Contact profiles of returning customers, cached in memory and written
/// through to the settings table.
pub struct ProfileStore {
    db: Arc<dyn Database>,
    cache: RwLock<HashMap<String, Profile>>,
}

impl ProfileStore {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the saved profile of a user. Storage errors are logged and
    /// treated as "no profile".
    pub async fn get(&self, user_id: &str) -> Option<Profile> {
        if let Some(profile) = self.cache.read().await.get(user_id) {
            return Some(profile.clone());
        }

        let value = match self.db.get_setting(user_id, settings_keys::CONTACT_PROFILE).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to load contact profile");
                return None;
            }
        };

        match serde_json::from_value::<Profile>(value) {
            Ok(profile) => {
                self.cache
                    .write()
                    .await
                    .insert(user_id.to_string(), profile.clone());
                Some(profile)
            }
            Err(e) => {
                warn!(user_id, error = %e, "Stored contact profile is malformed, ignoring");
                None
            }
        }
    }

    /// Overwrite the profile of a user. Last writer wins.
    ///
    /// The in-memory copy is always updated; a failed write to storage is
    /// logged since the request it came from is already persisted.
    pub async fn put(&self, user_id: &str, profile: Profile) {
        match serde_json::to_value(&profile) {
            Ok(value) => {
                if let Err(e) = self
                    .db
                    .set_setting(user_id, settings_keys::CONTACT_PROFILE, &value)
                    .await
                {
                    warn!(user_id, error = %e, "Failed to persist contact profile");
                }
            }
            Err(e) => warn!(user_id, error = %e, "Failed to serialize contact profile"),
        }
        self.cache.write().await.insert(user_id.to_string(), profile);
    }
}

/// Load a user's language preference, falling back to `default`.
pub async fn load_language(db: &dyn Database, user_id: &str, default: Language) -> Language {
    match db.get_setting(user_id, settings_keys::LANGUAGE).await {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or(default),
        Ok(None) => default,
        Err(e) => {
            warn!(user_id, error = %e, "Failed to load language preference");
            default
        }
    }
}

/// Persist a user's language preference.
pub async fn save_language(db: &dyn Database, user_id: &str, language: Language) {
    let value = serde_json::Value::String(language.to_string());
    if let Err(e) = db.set_setting(user_id, settings_keys::LANGUAGE, &value).await {
        warn!(user_id, error = %e, "Failed to persist language preference");
    }
}
