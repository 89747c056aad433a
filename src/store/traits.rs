//! `Database` trait: the single async interface for all persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::booking::model::{IdentityContext, RequestRecord};
use crate::error::DatabaseError;

/// A persisted service request together with its generated id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRequest {
    pub request_id: String,
    pub record: RequestRecord,
}

/// A known customer, as last reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user_id: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic database trait covering users, requests, and settings.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Users ───────────────────────────────────────────────────────

    /// Insert or refresh the user row for an identity.
    async fn save_identity(&self, identity: &IdentityContext) -> Result<(), DatabaseError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>, DatabaseError>;

    // ── Service requests ────────────────────────────────────────────

    /// Persist a submitted request. Returns the generated request id.
    async fn save_request(&self, record: &RequestRecord) -> Result<String, DatabaseError>;

    /// Get a request by id.
    async fn get_request(&self, request_id: &str) -> Result<Option<StoredRequest>, DatabaseError>;

    /// All requests of one user, newest first.
    async fn list_requests_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<StoredRequest>, DatabaseError>;

    // ── Settings ────────────────────────────────────────────────────

    /// Get a per-user setting value.
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Set (upsert) a per-user setting value.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    /// Delete a setting. Returns true if a row was removed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError>;
}
