//! Outbound prompt descriptors.
//!
//! The engine never produces display text. It answers each event with a
//! [`Reply`]: message keys with typed parameters plus the keyboard to show.
//! The localizer turns these into text and buttons in the user's language.

use super::model::{Location, LocationSource, PhoneSource, ServiceId, ServiceItem, ServiceType};
use crate::i18n::{Language, PromptKey};

/// A typed prompt parameter, rendered per language.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    ServiceType(ServiceType),
    Service(ServiceItem),
    Services(Vec<ServiceItem>),
    PhoneSource(PhoneSource),
    /// Rendered as an optional summary line; empty when absent.
    Location(Option<Location>),
    LocationSource(LocationSource),
    Language(Language),
}

/// One message to show.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRef {
    pub key: PromptKey,
    pub params: Vec<(&'static str, Param)>,
}

impl PromptRef {
    pub fn new(key: PromptKey) -> Self {
        Self {
            key,
            params: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: Param) -> Self {
        self.params.push((name, value));
        self
    }

    pub fn text(self, name: &'static str, value: impl Into<String>) -> Self {
        self.with(name, Param::Text(value.into()))
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }
}

impl From<PromptKey> for PromptRef {
    fn from(key: PromptKey) -> Self {
        Self::new(key)
    }
}

/// Which keyboard accompanies a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRef {
    Main,
    /// A single "back to main menu" button.
    BackToMain,
    Settings,
    Language,
    ServiceType,
    /// Catalog services with the selected ones marked.
    Services { selected: Vec<ServiceId> },
    ContactCheck,
    NameConfirm,
    /// Includes the request-contact button.
    Phone,
    /// Includes the request-location button.
    Location,
    Review { with_location: bool },
    PostSubmission,
    /// Hide any keyboard, for free-text steps.
    Remove,
}

/// The engine's answer to one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub prompts: Vec<PromptRef>,
    pub menu: MenuRef,
}

impl Reply {
    pub fn new(menu: MenuRef) -> Self {
        Self {
            prompts: Vec::new(),
            menu,
        }
    }

    pub fn single(prompt: impl Into<PromptRef>, menu: MenuRef) -> Self {
        Self {
            prompts: vec![prompt.into()],
            menu,
        }
    }

    pub fn push(&mut self, prompt: impl Into<PromptRef>) {
        self.prompts.push(prompt.into());
    }

    /// Put a message ahead of the ones already queued.
    pub fn prepend(mut self, prompt: impl Into<PromptRef>) -> Self {
        self.prompts.insert(0, prompt.into());
        self
    }

    pub fn keys(&self) -> Vec<PromptKey> {
        self.prompts.iter().map(|p| p.key).collect()
    }

    pub fn has(&self, key: PromptKey) -> bool {
        self.prompts.iter().any(|p| p.key == key)
    }
}
