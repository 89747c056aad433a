//! Error types for the intake bot.
//!
//! One enum per layer. The binary aggregates them with `anyhow`.

use crate::i18n::PromptKey;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("No channel registered under {name}")]
    UnknownChannel { name: String },
}

/// Recoverable failures of a single conversation step.
///
/// None of these end the conversation: the engine re-prompts in the same
/// state with the corrective message from [`BookingError::prompt_key`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("name must have at least 2 characters")]
    InvalidName,

    #[error("phone number is not a valid local mobile number")]
    InvalidPhone,

    #[error("location must have at least 5 characters")]
    InvalidLocation,

    #[error("custom service description must have at least 3 characters")]
    InvalidOtherService,

    #[error("no service selected")]
    EmptySelection,

    #[error("input does not match any option in this step")]
    UnmatchedMenuChoice,

    #[error("draft is missing {field}")]
    IncompleteDraft { field: &'static str },

    #[error("failed to persist request: {0}")]
    PersistenceFailure(String),
}

impl BookingError {
    /// The localized corrective message shown before re-prompting.
    pub fn prompt_key(&self) -> PromptKey {
        match self {
            Self::InvalidName => PromptKey::NameInvalid,
            Self::InvalidPhone => PromptKey::PhoneInvalid,
            Self::InvalidLocation => PromptKey::LocationInvalid,
            Self::InvalidOtherService => PromptKey::OtherServiceInvalid,
            Self::EmptySelection => PromptKey::SelectionEmpty,
            Self::UnmatchedMenuChoice => PromptKey::UnmatchedChoice,
            Self::IncompleteDraft { .. } => PromptKey::DraftIncomplete,
            Self::PersistenceFailure(_) => PromptKey::SubmissionFailed,
        }
    }
}
