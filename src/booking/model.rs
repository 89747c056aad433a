//! Booking data model: the per-conversation draft, the durable contact
//! profile, and the immutable request record produced on submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::selection::Selection;

/// Whether the customer wants ongoing or short-term help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Permanent,
    Temporary,
}

impl ServiceType {
    /// Language-independent label stored on request records.
    pub fn canonical_label(&self) -> &'static str {
        match self {
            Self::Permanent => "Permanent",
            Self::Temporary => "Temporary",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Temporary => write!(f, "temporary"),
        }
    }
}

/// The catalog of bookable services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceId {
    /// Covers every other service; mutually exclusive with them.
    FullHouseWork,
    HouseCleaning,
    Laundry,
    Cooking,
    ChildCare,
    ElderCare,
    PetCare,
    Gardening,
}

impl ServiceId {
    /// Catalog order, as rendered on the selection keyboard.
    pub const ALL: [ServiceId; 8] = [
        Self::FullHouseWork,
        Self::HouseCleaning,
        Self::Laundry,
        Self::Cooking,
        Self::ChildCare,
        Self::ElderCare,
        Self::PetCare,
        Self::Gardening,
    ];

    /// The service that includes all the others.
    pub const COVERS_EVERYTHING: ServiceId = Self::FullHouseWork;

    pub fn covers_everything(&self) -> bool {
        *self == Self::COVERS_EVERYTHING
    }

    pub fn canonical_label(&self) -> &'static str {
        match self {
            Self::FullHouseWork => "Full House Work",
            Self::HouseCleaning => "House Cleaning",
            Self::Laundry => "Laundry Service",
            Self::Cooking => "Cooking Service",
            Self::ChildCare => "Child Care",
            Self::ElderCare => "Elder Care",
            Self::PetCare => "Pet Care",
            Self::Gardening => "Gardening",
        }
    }
}

/// One entry of the service selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ServiceItem {
    Catalog(ServiceId),
    /// Free-text description typed by the customer.
    Other(String),
}

impl ServiceItem {
    pub fn covers_everything(&self) -> bool {
        matches!(self, Self::Catalog(id) if id.covers_everything())
    }

    pub fn canonical_label(&self) -> String {
        match self {
            Self::Catalog(id) => id.canonical_label().to_string(),
            Self::Other(text) => format!("Other: {text}"),
        }
    }
}

/// A phone number in canonical international form (`+251` + 9 digits for
/// local numbers). Only the validators construct it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Phone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneSource {
    SharedContact,
    ManualEntry,
}

impl std::fmt::Display for PhoneSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SharedContact => write!(f, "shared_contact"),
            Self::ManualEntry => write!(f, "manual_entry"),
        }
    }
}

/// A phone number together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub number: Phone,
    pub source: PhoneSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Gps,
    ManualEntry,
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gps => write!(f, "gps"),
            Self::ManualEntry => write!(f, "manual_entry"),
        }
    }
}

/// Free-text address or an encoded coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub value: String,
    pub source: LocationSource,
}

/// Where a step handler should go once its field is filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resume {
    /// Continue along the linear flow.
    #[default]
    Advance,
    /// The field was opened from the review step; go straight back to it.
    Review,
}

/// The in-progress booking for one conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub service_type: Option<ServiceType>,
    pub services: Selection,
    pub name: Option<String>,
    pub phone: Option<PhoneEntry>,
    pub location: Option<Location>,
    resume: Resume,
}

impl Draft {
    /// Whether the current step was entered from the review step.
    pub fn edit_return(&self) -> bool {
        self.resume == Resume::Review
    }

    /// Mark the next completed step as an edit that returns to review.
    pub fn begin_edit(&mut self) {
        self.resume = Resume::Review;
    }

    /// Consume the pending resume target, resetting it to `Advance`.
    pub fn take_resume(&mut self) -> Resume {
        std::mem::take(&mut self.resume)
    }

    /// Fill contact fields from a saved profile.
    pub fn apply_profile(&mut self, profile: &Profile) {
        self.name = Some(profile.name.clone());
        self.phone = Some(profile.phone.clone());
        if profile.location.is_some() {
            self.location = profile.location.clone();
        }
    }
}

/// Last-submitted contact details for a returning customer.
///
/// Stored in the `settings` table as JSON under key `"contact_profile"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub phone: PhoneEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub updated_at: DateTime<Utc>,
}

/// Who is on the other end of the conversation, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    /// Stable transport-level identifier.
    pub user_id: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl IdentityContext {
    pub fn new(user_id: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: first_name.into(),
            username: None,
            last_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Name suggested on the name step: first name plus surname if known.
    pub fn detected_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name.trim(), last),
            _ => self.first_name.trim().to_string(),
        }
    }

    /// Name used in greetings.
    pub fn greeting_name(&self) -> &str {
        let first = self.first_name.trim();
        if first.is_empty() {
            self.username.as_deref().unwrap_or("there")
        } else {
            first
        }
    }
}

/// A submitted service request. Built once by the finalizer and never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub user_id: String,
    pub service_type: ServiceType,
    /// Canonical service labels joined with `", "`.
    pub services: String,
    pub name: String,
    pub phone: Phone,
    pub phone_source: PhoneSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_source: Option<LocationSource>,
    pub submitted_at: DateTime<Utc>,
}

/// Settings keys used for per-user persistence.
pub mod settings_keys {
    /// Key for the `Profile` JSON blob.
    pub const CONTACT_PROFILE: &str = "contact_profile";
    /// Key for the language preference.
    pub const LANGUAGE: &str = "language";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(value: &str) -> PhoneEntry {
        PhoneEntry {
            number: Phone::from_canonical(value.to_string()),
            source: PhoneSource::ManualEntry,
        }
    }

    #[test]
    fn detected_name_joins_surname() {
        let identity = IdentityContext::new("42", "Abebe").with_last_name("Kebede");
        assert_eq!(identity.detected_name(), "Abebe Kebede");

        let bare = IdentityContext::new("42", "Abebe").with_last_name("  ");
        assert_eq!(bare.detected_name(), "Abebe");
    }

    #[test]
    fn greeting_name_falls_back_to_username() {
        let identity = IdentityContext::new("42", "").with_username("abebe_k");
        assert_eq!(identity.greeting_name(), "abebe_k");
        assert_eq!(IdentityContext::new("42", " ").greeting_name(), "there");
    }

    #[test]
    fn take_resume_clears_edit_flag() {
        let mut draft = Draft::default();
        assert!(!draft.edit_return());

        draft.begin_edit();
        assert!(draft.edit_return());
        assert_eq!(draft.take_resume(), Resume::Review);
        assert!(!draft.edit_return());
        assert_eq!(draft.take_resume(), Resume::Advance);
    }

    #[test]
    fn apply_profile_keeps_existing_location_when_profile_has_none() {
        let mut draft = Draft {
            location: Some(Location {
                value: "Bole, Addis Ababa".into(),
                source: LocationSource::ManualEntry,
            }),
            ..Default::default()
        };
        let profile = Profile {
            name: "Meron Tekle".into(),
            phone: phone("+251911000000"),
            location: None,
            updated_at: Utc::now(),
        };

        draft.apply_profile(&profile);
        assert_eq!(draft.name.as_deref(), Some("Meron Tekle"));
        assert_eq!(draft.phone, Some(phone("+251911000000")));
        assert_eq!(draft.location.unwrap().value, "Bole, Addis Ababa");
    }

    #[test]
    fn canonical_labels() {
        assert_eq!(ServiceType::Temporary.canonical_label(), "Temporary");
        assert_eq!(
            ServiceItem::Catalog(ServiceId::HouseCleaning).canonical_label(),
            "House Cleaning"
        );
        assert_eq!(
            ServiceItem::Other("Window washing".into()).canonical_label(),
            "Other: Window washing"
        );
        assert!(ServiceItem::Catalog(ServiceId::FullHouseWork).covers_everything());
        assert!(!ServiceItem::Other("Full House Work".into()).covers_everything());
    }

    #[test]
    fn display_matches_serde() {
        for source in [PhoneSource::SharedContact, PhoneSource::ManualEntry] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(format!("\"{source}\""), json);
        }
        for source in [LocationSource::Gps, LocationSource::ManualEntry] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(format!("\"{source}\""), json);
        }
        for ty in [ServiceType::Permanent, ServiceType::Temporary] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(format!("\"{ty}\""), json);
        }
    }

    #[test]
    fn profile_serde_roundtrip() {
        let profile = Profile {
            name: "Abebe Kebede".into(),
            phone: PhoneEntry {
                number: Phone::from_canonical("+251911223344".into()),
                source: PhoneSource::SharedContact,
            },
            location: Some(Location {
                value: "9.005401,38.763611".into(),
                source: LocationSource::Gps,
            }),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["phone"]["number"], "+251911223344");
        assert_eq!(json["phone"]["source"], "shared_contact");

        let parsed: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, profile);
    }
}
