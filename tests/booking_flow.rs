//! End-to-end booking conversations.
//!
//! Each test drives a [`Dispatcher`] the way a Telegram user would: typing
//! commands, pressing the rendered keyboard buttons, sharing a contact, and
//! typing free text. State is checked through the shared session store and
//! the in-memory database.

use std::sync::Arc;

use async_trait::async_trait;

use liyu_intake::booking::event::MenuAction;
use liyu_intake::booking::{
    BookingEngine, BookingState, ConversationId, EditField, EngineConfig, IdentityContext,
    PhoneSource, ProfileStore, RequestRecord, ServiceId, ServiceType, Session, SessionStore,
};
use liyu_intake::channels::{ChannelManager, InboundPayload, IncomingMessage, OutgoingResponse};
use liyu_intake::dispatcher::{Dispatcher, DispatcherDeps};
use liyu_intake::error::DatabaseError;
use liyu_intake::i18n::{Catalog, Keyboard, Language, Localizer};
use liyu_intake::store::{Database, LibSqlBackend, StoredRequest, StoredUser};

const USER: &str = "1001";

/// Delegates to an in-memory backend but refuses to store requests.
struct RejectingRequests {
    inner: LibSqlBackend,
}

#[async_trait]
impl Database for RejectingRequests {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.inner.run_migrations().await
    }
    async fn save_identity(&self, identity: &IdentityContext) -> Result<(), DatabaseError> {
        self.inner.save_identity(identity).await
    }
    async fn get_user(&self, user_id: &str) -> Result<Option<StoredUser>, DatabaseError> {
        self.inner.get_user(user_id).await
    }
    async fn save_request(&self, _record: &RequestRecord) -> Result<String, DatabaseError> {
        Err(DatabaseError::Query("disk full".into()))
    }
    async fn get_request(&self, request_id: &str) -> Result<Option<StoredRequest>, DatabaseError> {
        self.inner.get_request(request_id).await
    }
    async fn list_requests_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<StoredRequest>, DatabaseError> {
        self.inner.list_requests_for_user(user_id).await
    }
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        self.inner.get_setting(user_id, key).await
    }
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        self.inner.set_setting(user_id, key, value).await
    }
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError> {
        self.inner.delete_setting(user_id, key).await
    }
}

struct Harness {
    dispatcher: Dispatcher,
    db: Arc<dyn Database>,
    profiles: Arc<ProfileStore>,
    sessions: Arc<SessionStore>,
    catalog: Catalog,
    last: OutgoingResponse,
}

impl Harness {
    async fn new(collect_location: bool) -> Self {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        Self::with_db(db, collect_location)
    }

    fn with_db(db: Arc<dyn Database>, collect_location: bool) -> Self {
        let profiles = Arc::new(ProfileStore::new(Arc::clone(&db)));
        let sessions = Arc::new(SessionStore::new(chrono::Duration::hours(24)));
        let engine = Arc::new(BookingEngine::new(
            EngineConfig { collect_location },
            Arc::clone(&db),
            Arc::clone(&profiles),
        ));
        let dispatcher = Dispatcher::new(
            DispatcherDeps {
                engine,
                localizer: Arc::new(Catalog::new()),
                sessions: Arc::clone(&sessions),
                db: Arc::clone(&db),
                default_language: Language::English,
                sweep_interval: std::time::Duration::from_secs(600),
            },
            ChannelManager::new(),
        );
        Self {
            dispatcher,
            db,
            profiles,
            sessions,
            catalog: Catalog::new(),
            last: OutgoingResponse::text(""),
        }
    }

    fn message(&self, content: &str) -> IncomingMessage {
        IncomingMessage::new("telegram", USER, content)
            .with_first_name("Abebe")
            .with_metadata(serde_json::json!({ "chat_id": USER }))
    }

    async fn send(&mut self, msg: IncomingMessage) -> &OutgoingResponse {
        self.last = self.dispatcher.process(&msg).await;
        &self.last
    }

    async fn type_text(&mut self, text: &str) -> &OutgoingResponse {
        let msg = self.message(text);
        self.send(msg).await
    }

    /// Press the on-screen button that maps to `action`.
    async fn press(&mut self, action: MenuAction) -> &OutgoingResponse {
        let label = self
            .last
            .keyboard
            .labels()
            .into_iter()
            .find(|l| self.catalog.match_label(Language::English, l) == Some(action))
            .unwrap_or_else(|| panic!("no button for {action:?} in {:?}", self.last.keyboard))
            .to_string();
        self.type_text(&label).await
    }

    async fn share_contact(&mut self, phone: &str) -> &OutgoingResponse {
        let msg = self.message("").with_payload(InboundPayload::Contact {
            phone: Some(phone.to_string()),
        });
        self.send(msg).await
    }

    async fn session(&self) -> Session {
        let handle = self
            .sessions
            .get(&ConversationId::new("telegram", USER))
            .await
            .expect("session exists");
        let session = handle.lock().await;
        session.clone()
    }

    async fn state(&self) -> BookingState {
        self.session().await.state
    }

    async fn requests(&self) -> Vec<StoredRequest> {
        self.db.list_requests_for_user(USER).await.unwrap()
    }

    /// Walk a first-time customer up to the review step.
    async fn fill_to_review(&mut self) {
        self.type_text("/start").await;
        self.press(MenuAction::StartBooking).await;
        self.press(MenuAction::ServiceType(ServiceType::Temporary)).await;
        self.press(MenuAction::Service(ServiceId::HouseCleaning)).await;
        self.press(MenuAction::DoneSelecting).await;
        self.press(MenuAction::EnterDifferentName).await;
        self.type_text("Abebe Kebede").await;
        self.share_contact("0911223344").await;
        if self.state().await == BookingState::Location {
            self.type_text("Bole, Addis Ababa, near Edna Mall").await;
        }
        assert_eq!(self.state().await, BookingState::Review);
    }
}

#[tokio::test]
async fn first_time_customer_books_a_temporary_cleaner() {
    let mut h = Harness::new(true).await;

    let welcome = h.type_text("/start").await;
    assert!(welcome.text.contains("Abebe"));

    h.press(MenuAction::StartBooking).await;
    assert_eq!(h.state().await, BookingState::ServiceType);

    h.press(MenuAction::ServiceType(ServiceType::Temporary)).await;
    let selected = h.press(MenuAction::Service(ServiceId::HouseCleaning)).await;
    assert!(
        selected.keyboard.labels().iter().any(|l| l.starts_with("✓ ")),
        "selected service is marked"
    );

    let name_step = h.press(MenuAction::DoneSelecting).await.clone();
    assert_eq!(h.state().await, BookingState::NameConfirm);
    assert!(name_step.text.contains("Abebe"));

    h.press(MenuAction::EnterDifferentName).await;
    assert_eq!(h.last.keyboard, Keyboard::Remove);
    h.type_text("Abebe Kebede").await;
    assert_eq!(h.state().await, BookingState::Phone);

    h.share_contact("0911223344").await;
    assert_eq!(h.state().await, BookingState::Location);

    let review = h.type_text("Bole, Addis Ababa, near Edna Mall").await.clone();
    assert_eq!(h.state().await, BookingState::Review);
    assert!(review.text.contains("Abebe Kebede"));
    assert!(review.text.contains("+251911223344"));
    assert!(review.text.contains("Bole, Addis Ababa, near Edna Mall"));

    let done = h.press(MenuAction::ConfirmSubmit).await.clone();
    assert_eq!(h.state().await, BookingState::PostSubmission);
    assert!(done.text.contains("+251911223344"));

    let requests = h.requests().await;
    assert_eq!(requests.len(), 1);
    let record = &requests[0].record;
    assert_eq!(record.service_type, ServiceType::Temporary);
    assert_eq!(record.services, "House Cleaning");
    assert_eq!(record.name, "Abebe Kebede");
    assert_eq!(record.phone.as_str(), "+251911223344");
    assert_eq!(record.phone_source, PhoneSource::SharedContact);
    assert_eq!(
        record.location.as_deref(),
        Some("Bole, Addis Ababa, near Edna Mall")
    );
    assert!(done.text.contains(&requests[0].request_id[..8]));
}

#[tokio::test]
async fn editing_the_name_returns_to_review() {
    let mut h = Harness::new(true).await;
    h.fill_to_review().await;
    let before = h.session().await.draft;

    h.press(MenuAction::Edit(EditField::Name)).await;
    assert_eq!(h.state().await, BookingState::NameConfirm);

    // An invalid name keeps the user on the step with the return still pending.
    h.type_text("M").await;
    assert_eq!(h.state().await, BookingState::NameConfirm);

    let review = h.type_text("Meron Tekle").await.clone();
    assert_eq!(h.state().await, BookingState::Review);
    assert!(review.text.contains("Meron Tekle"));

    let after = h.session().await.draft;
    assert_eq!(after.name.as_deref(), Some("Meron Tekle"));
    assert!(!after.edit_return());
    assert_eq!(after.service_type, before.service_type);
    assert_eq!(after.services, before.services);
    assert_eq!(after.phone, before.phone);
    assert_eq!(after.location, before.location);
}

#[tokio::test]
async fn submission_resets_draft_but_keeps_profile_and_language() {
    let mut h = Harness::new(false).await;

    h.type_text("/start").await;
    h.press(MenuAction::OpenSettings).await;
    h.press(MenuAction::ChangeLanguage).await;
    h.press(MenuAction::PickLanguage(Language::Amharic)).await;
    assert_eq!(h.session().await.language, Language::Amharic);

    h.fill_to_review().await;
    h.press(MenuAction::ConfirmSubmit).await;

    let session = h.session().await;
    assert_eq!(session.state, BookingState::PostSubmission);
    assert_eq!(session.draft.service_type, None);
    assert!(session.draft.services.is_empty());
    assert_eq!(session.language, Language::Amharic);

    let profile = h.profiles.get(USER).await.expect("profile saved");
    assert_eq!(profile.name, "Abebe Kebede");
    assert_eq!(profile.phone.number.as_str(), "+251911223344");
    assert_eq!(profile.location, None);
}

#[tokio::test]
async fn returning_customer_reuses_saved_contact() {
    let mut h = Harness::new(true).await;
    h.fill_to_review().await;
    h.press(MenuAction::ConfirmSubmit).await;

    h.press(MenuAction::NewRequest).await;
    h.press(MenuAction::ServiceType(ServiceType::Permanent)).await;
    h.press(MenuAction::Service(ServiceId::FullHouseWork)).await;
    let check = h.press(MenuAction::DoneSelecting).await.clone();
    assert_eq!(h.state().await, BookingState::ContactCheck);
    assert!(check.text.contains("Abebe Kebede"));

    h.press(MenuAction::UseSavedInfo).await;
    assert_eq!(h.state().await, BookingState::Review);
    h.press(MenuAction::ConfirmSubmit).await;

    let requests = h.requests().await;
    assert_eq!(requests.len(), 2);
    // Newest first.
    assert_eq!(requests[0].record.service_type, ServiceType::Permanent);
    assert_eq!(requests[0].record.services, "Full House Work");
    assert_eq!(requests[0].record.phone.as_str(), "+251911223344");
}

#[tokio::test]
async fn failed_persistence_keeps_the_draft_in_review() {
    let inner = LibSqlBackend::new_memory().await.unwrap();
    let db: Arc<dyn Database> = Arc::new(RejectingRequests { inner });
    let mut h = Harness::with_db(db, true);
    h.fill_to_review().await;
    let before = h.session().await.draft;

    let reply = h.press(MenuAction::ConfirmSubmit).await.clone();
    assert_eq!(h.state().await, BookingState::Review);
    assert_eq!(h.session().await.draft, before);
    assert!(reply.keyboard.labels().len() > 1, "review keyboard is shown again");
    assert!(h.profiles.get(USER).await.is_none());
}

#[tokio::test]
async fn cancel_ends_the_conversation_until_restart() {
    let mut h = Harness::new(true).await;
    h.type_text("/start").await;
    h.press(MenuAction::StartBooking).await;
    h.press(MenuAction::ServiceType(ServiceType::Permanent)).await;

    let cancelled = h.type_text("/cancel").await;
    assert_eq!(cancelled.keyboard, Keyboard::Remove);
    assert_eq!(h.state().await, BookingState::Ended);
    assert_eq!(h.session().await.draft.service_type, None);

    h.type_text("hello?").await;
    assert_eq!(h.state().await, BookingState::Ended);

    h.type_text("/start").await;
    assert_eq!(h.state().await, BookingState::MainMenu);
}

#[tokio::test]
async fn help_does_not_move_the_conversation() {
    let mut h = Harness::new(true).await;
    h.type_text("/start").await;
    h.press(MenuAction::StartBooking).await;
    h.press(MenuAction::ServiceType(ServiceType::Temporary)).await;
    h.press(MenuAction::Service(ServiceId::Cooking)).await;

    h.type_text("/help").await;
    let session = h.session().await;
    assert_eq!(session.state, BookingState::Selection);
    assert!(session.draft.services.contains_service(ServiceId::Cooking));
}

#[tokio::test]
async fn typed_phone_is_marked_manual() {
    let mut h = Harness::new(false).await;
    h.type_text("/start").await;
    h.press(MenuAction::StartBooking).await;
    h.press(MenuAction::ServiceType(ServiceType::Temporary)).await;
    h.press(MenuAction::Service(ServiceId::Laundry)).await;
    h.press(MenuAction::DoneSelecting).await;
    h.press(MenuAction::UseDetectedName).await;

    h.type_text("0812345678").await;
    assert_eq!(h.state().await, BookingState::Phone);

    h.type_text("+251 912 345 678").await;
    assert_eq!(h.state().await, BookingState::Review);
    h.press(MenuAction::ConfirmSubmit).await;

    let record = &h.requests().await[0].record;
    assert_eq!(record.name, "Abebe");
    assert_eq!(record.phone.as_str(), "+251912345678");
    assert_eq!(record.phone_source, PhoneSource::ManualEntry);
    assert_eq!(record.location, None);
}
