//! Service-booking conversation: the per-user state machine that walks a
//! customer from the main menu to a submitted request.

pub mod engine;
pub mod event;
pub mod finalize;
pub mod model;
pub mod prompt;
pub mod selection;
pub mod session;
pub mod state;
pub mod validate;

pub use engine::{BookingEngine, EngineConfig};
pub use event::{Command, EditField, InboundEvent, MenuAction};
pub use finalize::{Finalizer, Submission};
pub use model::{
    Draft, IdentityContext, Location, LocationSource, Phone, PhoneEntry, PhoneSource, Profile,
    RequestRecord, ServiceId, ServiceItem, ServiceType,
};
pub use prompt::{MenuRef, Param, PromptRef, Reply};
pub use session::{ConversationId, ProfileStore, Session, SessionStore};
pub use state::BookingState;
