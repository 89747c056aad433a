//! Turns a reviewed draft into a persisted request record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::model::{Draft, IdentityContext, PhoneEntry, Profile, RequestRecord};
use super::session::{ProfileStore, Session};
use crate::error::BookingError;
use crate::store::Database;

/// A successfully persisted request.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub request_id: String,
    pub record: RequestRecord,
}

/// Build the immutable record from a complete draft.
pub fn build_record(
    draft: &Draft,
    identity: &IdentityContext,
    require_location: bool,
    submitted_at: DateTime<Utc>,
) -> Result<RequestRecord, BookingError> {
    let service_type = draft
        .service_type
        .ok_or(BookingError::IncompleteDraft { field: "service_type" })?;
    if draft.services.is_empty() {
        return Err(BookingError::IncompleteDraft { field: "services" });
    }
    let name = draft
        .name
        .clone()
        .ok_or(BookingError::IncompleteDraft { field: "name" })?;
    let phone = draft
        .phone
        .clone()
        .ok_or(BookingError::IncompleteDraft { field: "phone" })?;
    if require_location && draft.location.is_none() {
        return Err(BookingError::IncompleteDraft { field: "location" });
    }

    Ok(RequestRecord {
        user_id: identity.user_id.clone(),
        service_type,
        services: draft.services.joined(),
        name,
        phone: phone.number,
        phone_source: phone.source,
        location: draft.location.as_ref().map(|l| l.value.clone()),
        location_source: draft.location.as_ref().map(|l| l.source),
        submitted_at,
    })
}

/// Persists submissions and updates the returning-customer profile.
pub struct Finalizer {
    db: Arc<dyn Database>,
    profiles: Arc<ProfileStore>,
    require_location: bool,
}

impl Finalizer {
    pub fn new(db: Arc<dyn Database>, profiles: Arc<ProfileStore>, require_location: bool) -> Self {
        Self {
            db,
            profiles,
            require_location,
        }
    }

    /// Submit the session's draft.
    ///
    /// The request is written first; the profile is overwritten and the draft
    /// reset only once that succeeds. On any error the draft is untouched.
    pub async fn submit(&self, session: &mut Session) -> Result<Submission, BookingError> {
        let now = Utc::now();
        let record = build_record(&session.draft, &session.identity, self.require_location, now)?;

        if let Err(e) = self.db.save_identity(&session.identity).await {
            warn!(user_id = %session.identity.user_id, error = %e, "Failed to save identity");
        }

        let request_id = match self.db.save_request(&record).await {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    user_id = %record.user_id,
                    error = %e,
                    "Failed to persist service request"
                );
                return Err(BookingError::PersistenceFailure(e.to_string()));
            }
        };

        let location_source = record
            .location_source
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".into());
        info!(
            request_id = %request_id,
            user_id = %record.user_id,
            service_type = %record.service_type,
            services = %record.services,
            phone_source = %record.phone_source,
            location_source = %location_source,
            "Service request submitted"
        );

        let profile = Profile {
            name: record.name.clone(),
            phone: PhoneEntry {
                number: record.phone.clone(),
                source: record.phone_source,
            },
            location: session.draft.location.clone(),
            updated_at: now,
        };
        self.profiles.put(&record.user_id, profile).await;
        session.reset_draft();

        Ok(Submission { request_id, record })
    }
}
