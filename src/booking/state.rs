//! Booking conversation states and the transitions allowed between them.

use serde::{Deserialize, Serialize};

/// Where a conversation currently is.
///
/// The booking path is MainMenu → ServiceType → Selection → (ContactCheck) →
/// NameConfirm → Phone → (Location) → Review → PostSubmission. Info,
/// Settings and LanguageSelect branch off the main menu and return to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    MainMenu,
    Info,
    Settings,
    LanguageSelect,
    ServiceType,
    Selection,
    /// Waiting for the description of a service not in the catalog.
    OtherService,
    /// Returning customer: reuse or update the saved contact details.
    ContactCheck,
    NameConfirm,
    Phone,
    Location,
    Review,
    PostSubmission,
    /// Cancelled; only commands lead out.
    Ended,
}

impl BookingState {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Re-prompting (staying put) is always valid, and the `/start` and
    /// `/cancel` commands may leave any state.
    pub fn can_transition_to(&self, target: BookingState) -> bool {
        use BookingState::*;
        if *self == target || matches!(target, MainMenu | Ended) {
            return true;
        }
        matches!(
            (self, target),
            (MainMenu, ServiceType)
                | (MainMenu, Info)
                | (MainMenu, Settings)
                | (Settings, LanguageSelect)
                | (ServiceType, Selection)
                | (ServiceType, Review)
                | (Selection, OtherService)
                | (Selection, ContactCheck)
                | (Selection, NameConfirm)
                | (Selection, Review)
                | (OtherService, Selection)
                | (ContactCheck, NameConfirm)
                | (ContactCheck, Location)
                | (ContactCheck, Review)
                | (NameConfirm, Phone)
                | (NameConfirm, Review)
                | (Phone, Location)
                | (Phone, Review)
                | (Location, Review)
                | (Review, ServiceType)
                | (Review, Selection)
                | (Review, NameConfirm)
                | (Review, Phone)
                | (Review, Location)
                | (Review, PostSubmission)
                | (PostSubmission, ServiceType)
        )
    }

    /// Whether this state ends the conversation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Whether this state is part of an in-progress booking (a draft exists).
    pub fn is_booking_step(&self) -> bool {
        matches!(
            self,
            Self::ServiceType
                | Self::Selection
                | Self::OtherService
                | Self::ContactCheck
                | Self::NameConfirm
                | Self::Phone
                | Self::Location
                | Self::Review
        )
    }

    /// The state after the phone step along the linear path.
    pub fn after_phone(collect_location: bool) -> BookingState {
        if collect_location {
            Self::Location
        } else {
            Self::Review
        }
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::MainMenu
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MainMenu => "main_menu",
            Self::Info => "info",
            Self::Settings => "settings",
            Self::LanguageSelect => "language_select",
            Self::ServiceType => "service_type",
            Self::Selection => "selection",
            Self::OtherService => "other_service",
            Self::ContactCheck => "contact_check",
            Self::NameConfirm => "name_confirm",
            Self::Phone => "phone",
            Self::Location => "location",
            Self::Review => "review",
            Self::PostSubmission => "post_submission",
            Self::Ended => "ended",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BookingState; 14] = [
        BookingState::MainMenu,
        BookingState::Info,
        BookingState::Settings,
        BookingState::LanguageSelect,
        BookingState::ServiceType,
        BookingState::Selection,
        BookingState::OtherService,
        BookingState::ContactCheck,
        BookingState::NameConfirm,
        BookingState::Phone,
        BookingState::Location,
        BookingState::Review,
        BookingState::PostSubmission,
        BookingState::Ended,
    ];

    #[test]
    fn linear_path_is_valid() {
        use BookingState::*;
        let path = [
            MainMenu,
            ServiceType,
            Selection,
            NameConfirm,
            Phone,
            Location,
            Review,
            PostSubmission,
            ServiceType,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} should transition to {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn edit_targets_reachable_from_review_and_back() {
        use BookingState::*;
        for field in [ServiceType, Selection, NameConfirm, Phone, Location] {
            assert!(Review.can_transition_to(field));
            assert!(field.can_transition_to(Review), "{field} must return to review");
        }
    }

    #[test]
    fn invalid_transitions() {
        use BookingState::*;
        // Skipping steps
        assert!(!ServiceType.can_transition_to(Phone));
        assert!(!MainMenu.can_transition_to(Review));
        // Submission only from review
        assert!(!Location.can_transition_to(PostSubmission));
        // Backwards outside of edits
        assert!(!Phone.can_transition_to(NameConfirm));
        // Ended only leaves through commands
        assert!(!Ended.can_transition_to(ServiceType));
    }

    #[test]
    fn commands_leave_any_state() {
        for state in ALL {
            assert!(state.can_transition_to(BookingState::MainMenu));
            assert!(state.can_transition_to(BookingState::Ended));
            assert!(state.can_transition_to(state));
        }
    }

    #[test]
    fn only_ended_is_terminal() {
        for state in ALL {
            assert_eq!(state.is_terminal(), state == BookingState::Ended);
        }
    }

    #[test]
    fn location_step_is_optional() {
        assert_eq!(BookingState::after_phone(true), BookingState::Location);
        assert_eq!(BookingState::after_phone(false), BookingState::Review);
    }

    #[test]
    fn display_matches_serde() {
        for state in ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(format!("\"{state}\""), json, "mismatch for {state:?}");
        }
    }
}
