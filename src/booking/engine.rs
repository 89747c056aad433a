//! BookingEngine applies one inbound event to a session and answers with
//! the next prompt.
//!
//! Every state has one handler. A handler validates the event, mutates the
//! draft, picks the next state, and returns a [`Reply`]. Recoverable errors
//! never leave the state: the user gets a corrective message followed by the
//! state's prompt again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::event::{Command, EditField, InboundEvent, MenuAction};
use super::finalize::Finalizer;
use super::model::{PhoneEntry, PhoneSource, Resume, ServiceItem};
use super::prompt::{MenuRef, Param, PromptRef, Reply};
use super::selection::SelectionChange;
use super::session::{save_language, ProfileStore, Session};
use super::state::BookingState;
use super::validate;
use crate::error::BookingError;
use crate::i18n::PromptKey;
use crate::store::Database;

/// Engine behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Ask for an address or shared location before review.
    pub collect_location: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collect_location: true,
        }
    }
}

/// The conversation state machine.
pub struct BookingEngine {
    config: EngineConfig,
    db: Arc<dyn Database>,
    profiles: Arc<ProfileStore>,
    finalizer: Finalizer,
}

impl BookingEngine {
    pub fn new(config: EngineConfig, db: Arc<dyn Database>, profiles: Arc<ProfileStore>) -> Self {
        let finalizer = Finalizer::new(
            Arc::clone(&db),
            Arc::clone(&profiles),
            config.collect_location,
        );
        Self {
            config,
            db,
            profiles,
            finalizer,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Apply one event to the session.
    pub async fn handle(&self, session: &mut Session, event: InboundEvent) -> Reply {
        session.touch();
        let from = session.state;
        let kind = event.kind();

        let reply = match event {
            InboundEvent::Command(command) => self.on_command(session, command).await,
            event => match session.state {
                BookingState::MainMenu => self.on_main_menu(session, event).await,
                BookingState::Info => self.on_info(session, event).await,
                BookingState::Settings => self.on_settings(session, event).await,
                BookingState::LanguageSelect => self.on_language(session, event).await,
                BookingState::ServiceType => self.on_service_type(session, event).await,
                BookingState::Selection => self.on_selection(session, event).await,
                BookingState::OtherService => self.on_other_service(session, event).await,
                BookingState::ContactCheck => self.on_contact_check(session, event).await,
                BookingState::NameConfirm => self.on_name(session, event).await,
                BookingState::Phone => self.on_phone(session, event).await,
                BookingState::Location => self.on_location(session, event).await,
                BookingState::Review => self.on_review(session, event).await,
                BookingState::PostSubmission => self.on_post_submission(session, event).await,
                BookingState::Ended => self.on_ended(session),
            },
        };

        let to = session.state;
        if !from.can_transition_to(to) {
            warn!(conversation = %session.id, %from, %to, "Unexpected state transition");
        }
        debug!(conversation = %session.id, event = kind, %from, %to, "Handled event");
        reply
    }

    // ── Commands ────────────────────────────────────────────────────

    async fn on_command(&self, session: &mut Session, command: Command) -> Reply {
        match command {
            Command::Start => {
                if session.state.is_terminal() {
                    debug!(conversation = %session.id, "Conversation restarted");
                }
                session.reset_draft();
                session.state = BookingState::MainMenu;
                Reply::single(
                    PromptRef::new(PromptKey::Welcome)
                        .text("user_name", session.identity.greeting_name()),
                    MenuRef::Main,
                )
            }
            Command::Cancel => self.cancel(session),
            Command::Help => Reply::single(PromptKey::Help, MenuRef::Main),
        }
    }

    fn cancel(&self, session: &mut Session) -> Reply {
        if session.state.is_booking_step() {
            info!(
                conversation = %session.id,
                state = %session.state,
                services = %session.draft.services.joined(),
                "Booking abandoned"
            );
        }
        session.reset_draft();
        session.state = BookingState::Ended;
        Reply::single(PromptKey::Cancelled, MenuRef::Remove)
    }

    // ── Menus ───────────────────────────────────────────────────────

    async fn on_main_menu(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::StartBooking) => {
                session.reset_draft();
                self.enter(session, BookingState::ServiceType).await
            }
            Some(MenuAction::ShowInfo) => self.enter(session, BookingState::Info).await,
            Some(MenuAction::OpenSettings) => self.enter(session, BookingState::Settings).await,
            Some(MenuAction::MainMenu) => self.enter(session, BookingState::MainMenu).await,
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn on_info(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::MainMenu) => self.enter(session, BookingState::MainMenu).await,
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn on_settings(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::ChangeLanguage) => {
                self.enter(session, BookingState::LanguageSelect).await
            }
            Some(MenuAction::MainMenu) => self.enter(session, BookingState::MainMenu).await,
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn on_language(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::PickLanguage(language)) => {
                session.language = language;
                save_language(self.db.as_ref(), &session.identity.user_id, language).await;
                self.enter(session, BookingState::MainMenu).await.prepend(
                    PromptRef::new(PromptKey::LanguageChanged)
                        .with("language", Param::Language(language)),
                )
            }
            Some(MenuAction::MainMenu) => self.enter(session, BookingState::MainMenu).await,
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn on_post_submission(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::NewRequest) => {
                session.reset_draft();
                self.enter(session, BookingState::ServiceType).await
            }
            Some(MenuAction::MainMenu) => self.enter(session, BookingState::MainMenu).await,
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    fn on_ended(&self, session: &mut Session) -> Reply {
        Reply::single(
            PromptRef::new(PromptKey::Fallback).text("user_name", session.identity.greeting_name()),
            MenuRef::Remove,
        )
    }

    // ── Service type and selection ──────────────────────────────────

    async fn on_service_type(&self, session: &mut Session, event: InboundEvent) -> Reply {
        let Some(MenuAction::ServiceType(service_type)) = action_of(&event) else {
            return self.reprompt(session, BookingError::UnmatchedMenuChoice).await;
        };

        session.draft.service_type = Some(service_type);
        let next = match session.draft.take_resume() {
            Resume::Review => BookingState::Review,
            Resume::Advance => BookingState::Selection,
        };
        self.enter(session, next).await.prepend(
            PromptRef::new(PromptKey::ServiceTypeSelected)
                .with("service_type", Param::ServiceType(service_type)),
        )
    }

    async fn on_selection(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::Service(id)) => {
                let change = session.draft.services.toggle(id);
                let key = match change {
                    SelectionChange::Added | SelectionChange::Unchanged => PromptKey::ServiceAdded,
                    SelectionChange::Removed => PromptKey::ServiceRemoved,
                    SelectionChange::Exclusive => PromptKey::ServiceExclusive,
                };
                let mut reply = Reply::single(
                    PromptRef::new(key).with("service", Param::Service(ServiceItem::Catalog(id))),
                    services_menu(session),
                );
                if let Some(summary) = selection_summary(session) {
                    reply.push(summary);
                }
                reply
            }
            Some(MenuAction::OtherService) => self.enter(session, BookingState::OtherService).await,
            Some(MenuAction::DoneSelecting) => {
                if let Err(e) = session.draft.services.finish() {
                    return self.reprompt(session, e).await;
                }
                if session.draft.take_resume() == Resume::Review {
                    return self.enter(session, BookingState::Review).await;
                }
                if self.profiles.get(&session.identity.user_id).await.is_some() {
                    self.enter(session, BookingState::ContactCheck).await
                } else {
                    self.enter(session, BookingState::NameConfirm).await
                }
            }
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn on_other_service(&self, session: &mut Session, event: InboundEvent) -> Reply {
        let Some(raw) = text_of(&event) else {
            return self.reprompt(session, BookingError::UnmatchedMenuChoice).await;
        };
        let description = match validate::normalize_other_service(raw) {
            Ok(d) => d,
            Err(e) => return self.reprompt(session, e).await,
        };

        let item = ServiceItem::Other(description.clone());
        let key = match session.draft.services.add_other(description) {
            SelectionChange::Unchanged => PromptKey::OtherServiceAlreadyListed,
            _ => PromptKey::ServiceAdded,
        };
        session.state = BookingState::Selection;
        let mut reply = Reply::single(
            PromptRef::new(key).with("service", Param::Service(item)),
            services_menu(session),
        );
        if let Some(summary) = selection_summary(session) {
            reply.push(summary);
        }
        reply
    }

    // ── Contact details ─────────────────────────────────────────────

    async fn on_contact_check(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::UseSavedInfo) => {
                let Some(profile) = self.profiles.get(&session.identity.user_id).await else {
                    return self.enter(session, BookingState::NameConfirm).await;
                };
                session.draft.apply_profile(&profile);
                if self.config.collect_location && session.draft.location.is_none() {
                    self.enter(session, BookingState::Location).await
                } else {
                    self.enter(session, BookingState::Review).await
                }
            }
            Some(MenuAction::UpdateInfo) => self.enter(session, BookingState::NameConfirm).await,
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn on_name(&self, session: &mut Session, event: InboundEvent) -> Reply {
        let raw = match (&event, action_of(&event)) {
            (_, Some(MenuAction::UseDetectedName)) => session.identity.detected_name(),
            (_, Some(MenuAction::EnterDifferentName)) => {
                return Reply::single(PromptKey::NameManualPrompt, MenuRef::Remove);
            }
            (event, _) => match text_of(event) {
                Some(text) => text.to_string(),
                None => return self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
            },
        };

        let name = match validate::normalize_name(&raw) {
            Ok(name) => name,
            Err(e) => {
                let mut reply = Reply::single(e.prompt_key(), MenuRef::Remove);
                reply.push(PromptKey::NameManualPrompt);
                return reply;
            }
        };

        session.draft.name = Some(name.clone());
        let next = match session.draft.take_resume() {
            Resume::Review => BookingState::Review,
            Resume::Advance => BookingState::Phone,
        };
        self.enter(session, next)
            .await
            .prepend(PromptRef::new(PromptKey::NameConfirmed).text("name", name))
    }

    async fn on_phone(&self, session: &mut Session, event: InboundEvent) -> Reply {
        let entry = match &event {
            InboundEvent::Contact { phone } => {
                match phone.as_deref().and_then(validate::canonical_contact_phone) {
                    Some(number) => PhoneEntry {
                        number,
                        source: PhoneSource::SharedContact,
                    },
                    None => return self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
                }
            }
            InboundEvent::Choice {
                action: MenuAction::SharePhone,
                ..
            } => return Reply::single(PromptKey::PhoneShareHint, MenuRef::Phone),
            InboundEvent::Choice {
                action: MenuAction::EnterPhoneManually,
                ..
            } => return Reply::single(PromptKey::PhoneManualPrompt, MenuRef::Remove),
            event => {
                let Some(raw) = text_of(event) else {
                    return self.reprompt(session, BookingError::UnmatchedMenuChoice).await;
                };
                match validate::normalize_phone(raw) {
                    Ok(number) => PhoneEntry {
                        number,
                        source: PhoneSource::ManualEntry,
                    },
                    Err(e) => return Reply::single(e.prompt_key(), MenuRef::Phone),
                }
            }
        };

        let saved = PromptRef::new(PromptKey::PhoneSaved)
            .text("phone", entry.number.as_str())
            .with("phone_source", Param::PhoneSource(entry.source));
        session.draft.phone = Some(entry);

        let next = match session.draft.take_resume() {
            Resume::Review => BookingState::Review,
            Resume::Advance => BookingState::after_phone(self.config.collect_location),
        };
        self.enter(session, next).await.prepend(saved)
    }

    async fn on_location(&self, session: &mut Session, event: InboundEvent) -> Reply {
        let location = match &event {
            InboundEvent::Coordinates {
                latitude,
                longitude,
            } => match validate::gps_location(*latitude, *longitude) {
                Some(location) => location,
                None => return self.reprompt(session, BookingError::InvalidLocation).await,
            },
            InboundEvent::Choice {
                action: MenuAction::ShareLocation,
                ..
            } => return Reply::single(PromptKey::LocationShareHint, MenuRef::Location),
            InboundEvent::Choice {
                action: MenuAction::EnterLocationManually,
                ..
            } => return Reply::single(PromptKey::LocationManualPrompt, MenuRef::Remove),
            event => {
                let Some(raw) = text_of(event) else {
                    return self.reprompt(session, BookingError::UnmatchedMenuChoice).await;
                };
                match validate::normalize_location(raw) {
                    Ok(location) => location,
                    Err(e) => return Reply::single(e.prompt_key(), MenuRef::Location),
                }
            }
        };

        session.draft.location = Some(location);
        // Location is the last step either way; this only clears the flag.
        session.draft.take_resume();
        self.enter(session, BookingState::Review).await
    }

    // ── Review ──────────────────────────────────────────────────────

    async fn on_review(&self, session: &mut Session, event: InboundEvent) -> Reply {
        match action_of(&event) {
            Some(MenuAction::ConfirmSubmit) => self.submit(session).await,
            Some(MenuAction::Edit(field)) => {
                let target = match field {
                    EditField::ServiceType => BookingState::ServiceType,
                    EditField::Services => BookingState::Selection,
                    EditField::Name => BookingState::NameConfirm,
                    EditField::Phone => BookingState::Phone,
                    EditField::Location if self.config.collect_location => BookingState::Location,
                    EditField::Location => {
                        return self.reprompt(session, BookingError::UnmatchedMenuChoice).await;
                    }
                };
                session.draft.begin_edit();
                self.enter(session, target).await
            }
            Some(MenuAction::CancelRequest) => self.cancel(session),
            _ => self.reprompt(session, BookingError::UnmatchedMenuChoice).await,
        }
    }

    async fn submit(&self, session: &mut Session) -> Reply {
        let services = session.draft.services.items().to_vec();
        match self.finalizer.submit(session).await {
            Ok(submission) => {
                session.state = BookingState::PostSubmission;
                let record = &submission.record;
                let reference: String = submission.request_id.chars().take(8).collect();
                let mut reply = Reply::single(
                    PromptRef::new(PromptKey::Submitted)
                        .text("name", record.name.as_str())
                        .with("service_type", Param::ServiceType(record.service_type))
                        .with("services", Param::Services(services))
                        .text("phone", record.phone.as_str())
                        .text("reference", reference),
                    MenuRef::PostSubmission,
                );
                reply.push(PromptKey::PostSubmission);
                reply
            }
            Err(e) => self.reprompt(session, e).await,
        }
    }

    // ── Prompts ─────────────────────────────────────────────────────

    /// Move to `state` and return its prompt.
    async fn enter(&self, session: &mut Session, state: BookingState) -> Reply {
        session.state = state;
        self.current_prompt(session).await
    }

    /// Corrective message followed by the current state's prompt.
    async fn reprompt(&self, session: &mut Session, error: BookingError) -> Reply {
        debug!(conversation = %session.id, state = %session.state, %error, "Re-prompting");
        self.current_prompt(session).await.prepend(error.prompt_key())
    }

    /// The standard prompt of the current state.
    async fn current_prompt(&self, session: &mut Session) -> Reply {
        match session.state {
            BookingState::MainMenu => Reply::single(PromptKey::MainMenu, MenuRef::Main),
            BookingState::Info => Reply::single(PromptKey::Info, MenuRef::BackToMain),
            BookingState::Settings => Reply::single(
                PromptRef::new(PromptKey::Settings)
                    .with("current_language", Param::Language(session.language)),
                MenuRef::Settings,
            ),
            BookingState::LanguageSelect => {
                Reply::single(PromptKey::LanguagePrompt, MenuRef::Language)
            }
            BookingState::ServiceType => Reply::single(
                PromptRef::new(PromptKey::ServiceTypePrompt)
                    .text("user_name", session.identity.greeting_name()),
                MenuRef::ServiceType,
            ),
            BookingState::Selection => {
                let mut reply = Reply::single(PromptKey::ServicesPrompt, services_menu(session));
                if let Some(summary) = selection_summary(session) {
                    reply.push(summary);
                }
                reply
            }
            BookingState::OtherService => {
                Reply::single(PromptKey::OtherServicePrompt, MenuRef::Remove)
            }
            BookingState::ContactCheck => {
                match self.profiles.get(&session.identity.user_id).await {
                    Some(profile) => Reply::single(
                        PromptRef::new(PromptKey::ContactCheck)
                            .text("name", profile.name.as_str())
                            .text("phone", profile.phone.number.as_str())
                            .with("phone_source", Param::PhoneSource(profile.phone.source))
                            .with("location_line", Param::Location(profile.location.clone())),
                        MenuRef::ContactCheck,
                    ),
                    None => {
                        session.state = BookingState::NameConfirm;
                        name_prompt(session)
                    }
                }
            }
            BookingState::NameConfirm => name_prompt(session),
            BookingState::Phone => Reply::single(PromptKey::PhonePrompt, MenuRef::Phone),
            BookingState::Location => Reply::single(PromptKey::LocationPrompt, MenuRef::Location),
            BookingState::Review => self.review_prompt(session),
            BookingState::PostSubmission => {
                Reply::single(PromptKey::PostSubmission, MenuRef::PostSubmission)
            }
            BookingState::Ended => self.on_ended(session),
        }
    }

    fn review_prompt(&self, session: &Session) -> Reply {
        let draft = &session.draft;
        let service_type = match draft.service_type {
            Some(ty) => Param::ServiceType(ty),
            None => Param::Text("-".into()),
        };
        let (phone, phone_source) = match &draft.phone {
            Some(entry) => (
                entry.number.as_str().to_string(),
                Param::PhoneSource(entry.source),
            ),
            None => ("-".to_string(), Param::Text(String::new())),
        };

        Reply::single(
            PromptRef::new(PromptKey::ReviewSummary)
                .text("name", draft.name.clone().unwrap_or_else(|| "-".into()))
                .text("phone", phone)
                .with("phone_source", phone_source)
                .with("service_type", service_type)
                .with("services", Param::Services(draft.services.items().to_vec()))
                .with("location_line", Param::Location(draft.location.clone())),
            MenuRef::Review {
                with_location: self.config.collect_location,
            },
        )
    }
}

/// The menu action of a choice event.
fn action_of(event: &InboundEvent) -> Option<MenuAction> {
    match event {
        InboundEvent::Choice { action, .. } => Some(*action),
        _ => None,
    }
}

/// Free text carried by an event. A menu label that the current step did not
/// expect counts as typed text.
fn text_of(event: &InboundEvent) -> Option<&str> {
    match event {
        InboundEvent::Text(text) => Some(text),
        InboundEvent::Choice { raw, .. } => Some(raw),
        _ => None,
    }
}

fn services_menu(session: &Session) -> MenuRef {
    let selected = session
        .draft
        .services
        .items()
        .iter()
        .filter_map(|item| match item {
            ServiceItem::Catalog(id) => Some(*id),
            ServiceItem::Other(_) => None,
        })
        .collect();
    MenuRef::Services { selected }
}

fn selection_summary(session: &Session) -> Option<PromptRef> {
    if session.draft.services.is_empty() {
        return None;
    }
    Some(PromptRef::new(PromptKey::SelectionSummary).with(
        "services",
        Param::Services(session.draft.services.items().to_vec()),
    ))
}

/// Offer the detected name, or ask for one if it would not validate.
fn name_prompt(session: &Session) -> Reply {
    let detected = session.identity.detected_name();
    if validate::normalize_name(&detected).is_ok() {
        Reply::single(
            PromptRef::new(PromptKey::NamePrompt).text("detected_name", detected),
            MenuRef::NameConfirm,
        )
    } else {
        Reply::single(PromptKey::NameManualPrompt, MenuRef::Remove)
    }
}
