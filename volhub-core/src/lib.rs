//! VolHub Core Library
//!
//! Domain model for the volunteer-coordination mini-app client:
//! - User profiles as a role-tagged union
//! - The multi-step, role-conditional registration workflow
//! - Event and event-registration read models
//! - The role-gated screen map

pub mod event;
pub mod profile;
pub mod registration;
pub mod routing;
pub mod validate;

pub use event::{Event, EventCategory, EventRegistration, EventStatus, RegistrationStatus};
pub use profile::{OrganizerDetails, Role, RoleDetails, UserProfile, VolunteerDetails};
pub use registration::{DraftFields, RegistrationDraft, RegistrationPayload, GENERAL_ERROR_KEY};
pub use routing::{screens_for, Screen};
