//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::model::{IdentityContext, Phone, RequestRecord};
use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{Database, StoredRequest, StoredUser};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

/// Convert `Option<&str>` to libsql Value.
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

/// Store a unit enum as its serde string form.
fn enum_to_text<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(DatabaseError::Serialization(format!(
            "expected a string enum, got {other}"
        ))),
        Err(e) => Err(DatabaseError::Serialization(e.to_string())),
    }
}

fn text_to_enum<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Serialization(format!("{s}: {e}")))
}

const REQUEST_COLUMNS: &str = "request_id, user_id, service_type, services, name, phone, \
     phone_source, location, location_source, submitted_at";

fn row_to_request(row: &libsql::Row) -> Result<StoredRequest, DatabaseError> {
    let get = |i: i32| {
        row.get::<String>(i)
            .map_err(|e| DatabaseError::Query(format!("service_requests column {i}: {e}")))
    };
    let location_source: Option<String> = row.get(8).ok();

    Ok(StoredRequest {
        request_id: get(0)?,
        record: RequestRecord {
            user_id: get(1)?,
            service_type: text_to_enum(&get(2)?)?,
            services: get(3)?,
            name: get(4)?,
            phone: Phone::from_canonical(get(5)?),
            phone_source: text_to_enum(&get(6)?)?,
            location: row.get(7).ok(),
            location_source: location_source
                .as_deref()
                .map(text_to_enum)
                .transpose()?,
            submitted_at: parse_datetime(&get(9)?),
        },
    })
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Users ───────────────────────────────────────────────────────

    async fn save_identity(&self, identity: &IdentityContext) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO users (user_id, username, first_name, last_name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT (user_id) DO UPDATE SET
                    username = ?2, first_name = ?3, last_name = ?4, updated_at = ?5",
                params![
                    identity.user_id.as_str(),
                    opt_text(identity.username.as_deref()),
                    identity.first_name.as_str(),
                    opt_text(identity.last_name.as_deref()),
                    now
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_identity: {e}")))?;
        debug!(user_id = %identity.user_id, "Saved identity");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, username, first_name, last_name, created_at
                 FROM users WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_user: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let created: String = row
                    .get(4)
                    .map_err(|e| DatabaseError::Query(format!("get_user: {e}")))?;
                Ok(Some(StoredUser {
                    user_id: row
                        .get(0)
                        .map_err(|e| DatabaseError::Query(format!("get_user: {e}")))?,
                    username: row.get(1).ok(),
                    first_name: row.get(2).unwrap_or_default(),
                    last_name: row.get(3).ok(),
                    created_at: parse_datetime(&created),
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_user: {e}"))),
        }
    }

    // ── Service requests ────────────────────────────────────────────

    async fn save_request(&self, record: &RequestRecord) -> Result<String, DatabaseError> {
        let request_id = Uuid::new_v4().to_string();
        let location_source = record
            .location_source
            .as_ref()
            .map(enum_to_text)
            .transpose()?;

        self.conn()
            .execute(
                "INSERT INTO service_requests (request_id, user_id, service_type, services, name, phone, phone_source, location, location_source, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    request_id.as_str(),
                    record.user_id.as_str(),
                    enum_to_text(&record.service_type)?,
                    record.services.as_str(),
                    record.name.as_str(),
                    record.phone.as_str(),
                    enum_to_text(&record.phone_source)?,
                    opt_text(record.location.as_deref()),
                    opt_text(location_source.as_deref()),
                    record.submitted_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_request: {e}")))?;

        debug!(request_id = %request_id, user_id = %record.user_id, "Inserted service request");
        Ok(request_id)
    }

    async fn get_request(&self, request_id: &str) -> Result<Option<StoredRequest>, DatabaseError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM service_requests WHERE request_id = ?1");
        let mut rows = self
            .conn()
            .query(&sql, params![request_id])
            .await
            .map_err(|e| DatabaseError::Query(format!("get_request: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_request(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_request: {e}"))),
        }
    }

    async fn list_requests_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<StoredRequest>, DatabaseError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests WHERE user_id = ?1
             ORDER BY submitted_at DESC"
        );
        let mut rows = self
            .conn()
            .query(&sql, params![user_id])
            .await
            .map_err(|e| DatabaseError::Query(format!("list_requests_for_user: {e}")))?;

        let mut requests = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_requests_for_user: {e}")))?
        {
            requests.push(row_to_request(&row)?);
        }
        Ok(requests)
    }

    // ── Settings ────────────────────────────────────────────────────

    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row.get(0).unwrap_or_else(|_| "null".to_string());
                let value: serde_json::Value =
                    serde_json::from_str(&value_str).unwrap_or(serde_json::Value::Null);
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_setting: {e}"))),
        }
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![user_id, key, value_str, now],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("set_setting: {e}")))?;

        Ok(())
    }

    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError> {
        let conn = self.conn();
        let count = conn
            .execute(
                "DELETE FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_setting: {e}")))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::{LocationSource, PhoneSource, ServiceType};

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn make_record(user_id: &str, submitted_at: DateTime<Utc>) -> RequestRecord {
        RequestRecord {
            user_id: user_id.into(),
            service_type: ServiceType::Permanent,
            services: "House Cleaning, Cooking Service".into(),
            name: "Abebe Kebede".into(),
            phone: Phone::from_canonical("+251911223344".into()),
            phone_source: PhoneSource::SharedContact,
            location: Some("Bole, Addis Ababa".into()),
            location_source: Some(LocationSource::ManualEntry),
            submitted_at,
        }
    }

    // ── User tests ──────────────────────────────────────────────────

    #[tokio::test]
    async fn save_identity_upserts() {
        let db = test_db().await;
        let identity = IdentityContext::new("1001", "Abebe").with_username("abebe_k");
        db.save_identity(&identity).await.unwrap();

        let user = db.get_user("1001").await.unwrap().unwrap();
        assert_eq!(user.first_name, "Abebe");
        assert_eq!(user.username.as_deref(), Some("abebe_k"));
        assert_eq!(user.last_name, None);

        let renamed = IdentityContext::new("1001", "Abebe").with_last_name("Kebede");
        db.save_identity(&renamed).await.unwrap();
        let user = db.get_user("1001").await.unwrap().unwrap();
        assert_eq!(user.last_name.as_deref(), Some("Kebede"));
        assert_eq!(user.username, None);

        assert!(db.get_user("missing").await.unwrap().is_none());
    }

    // ── Request tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn save_and_get_request() {
        let db = test_db().await;
        let record = make_record("1001", Utc::now());
        let id = db.save_request(&record).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let stored = db.get_request(&id).await.unwrap().unwrap();
        assert_eq!(stored.request_id, id);
        assert_eq!(stored.record.services, record.services);
        assert_eq!(stored.record.phone, record.phone);
        assert_eq!(stored.record.phone_source, PhoneSource::SharedContact);
        assert_eq!(stored.record.location_source, Some(LocationSource::ManualEntry));
        assert_eq!(
            stored.record.submitted_at.timestamp(),
            record.submitted_at.timestamp()
        );
    }

    #[tokio::test]
    async fn request_without_location() {
        let db = test_db().await;
        let mut record = make_record("1001", Utc::now());
        record.location = None;
        record.location_source = None;
        record.service_type = ServiceType::Temporary;

        let id = db.save_request(&record).await.unwrap();
        let stored = db.get_request(&id).await.unwrap().unwrap();
        assert_eq!(stored.record.location, None);
        assert_eq!(stored.record.location_source, None);
        assert_eq!(stored.record.service_type, ServiceType::Temporary);
    }

    #[tokio::test]
    async fn list_requests_newest_first() {
        let db = test_db().await;
        let earlier = Utc::now() - chrono::Duration::hours(2);
        let later = Utc::now();
        let first = db.save_request(&make_record("1001", earlier)).await.unwrap();
        let second = db.save_request(&make_record("1001", later)).await.unwrap();
        db.save_request(&make_record("2002", later)).await.unwrap();

        let requests = db.list_requests_for_user("1001").await.unwrap();
        let ids: Vec<&str> = requests.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);

        assert!(db.list_requests_for_user("nobody").await.unwrap().is_empty());
        assert!(db.get_request("missing").await.unwrap().is_none());
    }

    // ── Settings tests ──────────────────────────────────────────────

    #[tokio::test]
    async fn settings_crud() {
        let db = test_db().await;
        let value = serde_json::json!({"name": "Abebe Kebede", "phone": {"number": "+251911223344"}});

        db.set_setting("1001", "contact_profile", &value)
            .await
            .unwrap();
        let fetched = db
            .get_setting("1001", "contact_profile")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched["name"], "Abebe Kebede");

        // Update (upsert)
        db.set_setting("1001", "contact_profile", &serde_json::json!({"name": "Meron"}))
            .await
            .unwrap();
        let fetched = db
            .get_setting("1001", "contact_profile")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched["name"], "Meron");

        // Scoped per user
        assert!(db.get_setting("2002", "contact_profile").await.unwrap().is_none());

        let deleted = db.delete_setting("1001", "contact_profile").await.unwrap();
        assert!(deleted);
        assert!(db.get_setting("1001", "contact_profile").await.unwrap().is_none());

        let deleted_again = db.delete_setting("1001", "contact_profile").await.unwrap();
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn local_file_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("liyu.db");

        let id = {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.set_setting("1001", "language", &serde_json::json!("amharic"))
                .await
                .unwrap();
            db.save_request(&make_record("1001", Utc::now())).await.unwrap()
        };

        let db = LibSqlBackend::new_local(&path).await.unwrap();
        assert_eq!(
            db.get_setting("1001", "language").await.unwrap(),
            Some(serde_json::json!("amharic"))
        );
        assert!(db.get_request(&id).await.unwrap().is_some());
    }
}
