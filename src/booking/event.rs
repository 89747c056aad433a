//! Inbound events as the engine sees them.
//!
//! Transports deliver raw text, contacts and coordinates. Before dispatch the
//! text is classified as a command, a localized menu label (mapped to a
//! [`MenuAction`] by the localizer) or free text.

use serde::{Deserialize, Serialize};

use super::model::{ServiceId, ServiceType};
use crate::i18n::Language;

/// Slash commands understood in every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Clear the draft and show the main menu.
    Start,
    /// Discard the draft and end the conversation.
    Cancel,
    /// Show usage help without changing state.
    Help,
}

impl Command {
    /// Parse a slash command.
    ///
    /// Accepts a bot-addressed form (`/start@liyu_bot`) and ignores trailing
    /// arguments. Unknown commands return `None` and fall through as text.
    pub fn parse(content: &str) -> Option<Command> {
        let trimmed = content.trim();
        let word = trimmed.strip_prefix('/')?.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        match name.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "cancel" => Some(Self::Cancel),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// A review-step field that can be reopened for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    ServiceType,
    Services,
    Name,
    Phone,
    Location,
}

impl EditField {
    pub const ALL: [EditField; 5] = [
        Self::ServiceType,
        Self::Services,
        Self::Name,
        Self::Phone,
        Self::Location,
    ];
}

/// A logical menu choice, independent of the language it was rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "value")]
pub enum MenuAction {
    StartBooking,
    ShowInfo,
    OpenSettings,
    MainMenu,
    ChangeLanguage,
    PickLanguage(Language),
    ServiceType(ServiceType),
    Service(ServiceId),
    OtherService,
    DoneSelecting,
    UseSavedInfo,
    UpdateInfo,
    UseDetectedName,
    EnterDifferentName,
    SharePhone,
    EnterPhoneManually,
    ShareLocation,
    EnterLocationManually,
    ConfirmSubmit,
    Edit(EditField),
    CancelRequest,
    NewRequest,
}

impl MenuAction {
    /// Every action that can appear on a keyboard.
    pub fn all() -> Vec<MenuAction> {
        let mut actions = vec![
            Self::StartBooking,
            Self::ShowInfo,
            Self::OpenSettings,
            Self::MainMenu,
            Self::ChangeLanguage,
        ];
        actions.extend(Language::ALL.into_iter().map(Self::PickLanguage));
        actions.extend([ServiceType::Permanent, ServiceType::Temporary].map(Self::ServiceType));
        actions.extend(ServiceId::ALL.into_iter().map(Self::Service));
        actions.extend([
            Self::OtherService,
            Self::DoneSelecting,
            Self::UseSavedInfo,
            Self::UpdateInfo,
            Self::UseDetectedName,
            Self::EnterDifferentName,
            Self::SharePhone,
            Self::EnterPhoneManually,
            Self::ShareLocation,
            Self::EnterLocationManually,
            Self::ConfirmSubmit,
        ]);
        actions.extend(EditField::ALL.into_iter().map(Self::Edit));
        actions.extend([Self::CancelRequest, Self::NewRequest]);
        actions
    }
}

/// One user action, after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Command(Command),
    /// A recognized menu label. `raw` keeps the original text for states
    /// that accept free text and did not expect this choice.
    Choice { action: MenuAction, raw: String },
    Text(String),
    /// A shared contact card. `phone` is `None` when the transport delivered
    /// a contact without a number.
    Contact { phone: Option<String> },
    Coordinates { latitude: f64, longitude: f64 },
}

impl InboundEvent {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn choice(action: MenuAction) -> Self {
        Self::Choice {
            action,
            raw: String::new(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Choice { .. } => "choice",
            Self::Text(_) => "text",
            Self::Contact { .. } => "contact",
            Self::Coordinates { .. } => "coordinates",
        }
    }
}
