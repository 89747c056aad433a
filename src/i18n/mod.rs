//! Localization: languages, message keys, keyboards, and the [`Localizer`]
//! seam between the engine's prompt descriptors and what users see.

mod catalog;

pub use catalog::Catalog;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::booking::event::MenuAction;
use crate::booking::prompt::{MenuRef, PromptRef, Reply};

/// Prefix marking a selected entry on a multi-select keyboard.
pub const SELECTED_MARK: &str = "✓ ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Amharic,
}

impl Language {
    pub const ALL: [Language; 2] = [Self::English, Self::Amharic];

    /// Name of the language in itself, for the settings screen.
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Amharic => "አማርኛ (Amharic)",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::English => write!(f, "english"),
            Self::Amharic => write!(f, "amharic"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "amharic" | "am" => Ok(Self::Amharic),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Every message the engine can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromptKey {
    Welcome,
    MainMenu,
    Info,
    Settings,
    LanguagePrompt,
    LanguageChanged,
    Help,
    Cancelled,
    /// Greeting for messages outside any conversation.
    Fallback,
    ServiceTypePrompt,
    ServiceTypeSelected,
    ServicesPrompt,
    ServiceAdded,
    ServiceRemoved,
    ServiceExclusive,
    SelectionSummary,
    OtherServicePrompt,
    OtherServiceAlreadyListed,
    ContactCheck,
    NamePrompt,
    NameManualPrompt,
    NameConfirmed,
    PhonePrompt,
    PhoneShareHint,
    PhoneManualPrompt,
    PhoneSaved,
    LocationPrompt,
    LocationShareHint,
    LocationManualPrompt,
    ReviewSummary,
    Submitted,
    PostSubmission,
    NameInvalid,
    PhoneInvalid,
    LocationInvalid,
    OtherServiceInvalid,
    SelectionEmpty,
    UnmatchedChoice,
    DraftIncomplete,
    SubmissionFailed,
}

/// Special capability attached to a keyboard button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonRequest {
    Contact,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ButtonRequest>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            request: None,
        }
    }

    pub fn requesting(label: impl Into<String>, request: ButtonRequest) -> Self {
        Self {
            label: label.into(),
            request: Some(request),
        }
    }
}

/// A rendered reply keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
    /// Leave whatever the client currently shows.
    #[default]
    Unchanged,
    Rows(Vec<Vec<Button>>),
    Remove,
}

impl Keyboard {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Rows(rows) => rows.iter().flatten().map(|b| b.label.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// A reply rendered for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReply {
    pub text: String,
    pub keyboard: Keyboard,
}

/// Renders prompt descriptors and maps labels back to actions.
pub trait Localizer: Send + Sync {
    /// Render one message with its parameters substituted.
    fn resolve(&self, language: Language, prompt: &PromptRef) -> String;

    /// Render the keyboard for a menu.
    fn resolve_menu(&self, language: Language, menu: &MenuRef) -> Keyboard;

    /// Map a button label back to its action. The user's language is tried
    /// first, then every other language.
    fn match_label(&self, language: Language, label: &str) -> Option<MenuAction>;

    /// Render a whole reply: messages separated by blank lines.
    fn render(&self, language: Language, reply: &Reply) -> RenderedReply {
        let text = reply
            .prompts
            .iter()
            .map(|p| self.resolve(language, p))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        RenderedReply {
            text,
            keyboard: self.resolve_menu(language, &reply.menu),
        }
    }
}
