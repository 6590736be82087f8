//! Multi-step registration workflow
//!
//! A role-conditional form state machine: the step set depends on the
//! selected role, each step validates only its own required fields, and
//! the draft survives submission failures so the user can retry.
//!
//! The draft is in-memory only; it is discarded on completion, skip, or
//! cancellation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::profile::Role;
use crate::validate::{is_valid_email, is_valid_phone};

/// Key under which submission (non-field) errors are reported
pub const GENERAL_ERROR_KEY: &str = "general";

/// All candidate field values for whichever role is currently selected.
///
/// Everything is stored flat so that fields shared between role shapes
/// (email, phone, bio, location) survive a role switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftFields {
    // Common
    pub email: String,
    pub phone: String,
    pub bio: String,
    pub location: String,

    // Volunteer: personal data
    pub middle_name: String,
    pub birth_date: String,
    pub gender: String,

    // Volunteer: emergency contact
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: String,

    // Volunteer: experience and preferences
    pub education: String,
    pub occupation: String,
    pub organization: String,
    pub experience_description: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub preferred_activities: Vec<String>,
    pub travel_willingness: bool,
    pub max_travel_distance: Option<u32>,

    // Organizer
    pub organization_name: String,
    pub inn: String,
    pub ogrn: String,
    pub org_contact_name: String,
    pub org_phone: String,
    pub org_email: String,
    pub org_address: String,
}

/// Body of the complete-registration request. Empty-string fields are
/// normalized to absent, and only the active role's fields are included.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPayload {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preferred_activities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_willingness: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_travel_distance: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_address: Option<String>,
}

/// Registration draft state machine
#[derive(Debug, Clone)]
pub struct RegistrationDraft {
    role: Role,
    /// 1-based, clamped to `1..=step_count()`
    current_step: usize,
    pub fields: DraftFields,
    validation_errors: BTreeMap<String, String>,
}

impl RegistrationDraft {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            current_step: 1,
            fields: DraftFields::default(),
            validation_errors: BTreeMap::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Number of steps for the active role
    pub fn step_count(&self) -> usize {
        match self.role {
            Role::Volunteer => 4,
            Role::Organizer => 1,
            Role::Admin => 1,
        }
    }

    pub fn step_title(&self, step: usize) -> &'static str {
        match (self.role, step) {
            (Role::Volunteer, 1) => "Contact info",
            (Role::Volunteer, 2) => "Personal data",
            (Role::Volunteer, 3) => "Emergency contact",
            (Role::Volunteer, 4) => "Experience and preferences",
            (Role::Organizer, _) => "Organization details",
            (Role::Admin, _) => "Account confirmation",
            _ => "",
        }
    }

    pub fn progress_percentage(&self) -> u8 {
        (self.current_step * 100 / self.step_count()) as u8
    }

    pub fn on_final_step(&self) -> bool {
        self.current_step >= self.step_count()
    }

    pub fn validation_errors(&self) -> &BTreeMap<String, String> {
        &self.validation_errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.validation_errors.get(field).map(String::as_str)
    }

    /// Record a submission error without losing the draft
    pub fn set_general_error(&mut self, message: impl Into<String>) {
        self.validation_errors
            .insert(GENERAL_ERROR_KEY.to_string(), message.into());
    }

    /// Switching role restarts the flow: step back to 1, stale errors
    /// dropped, entered fields kept.
    pub fn set_role(&mut self, role: Role) {
        if self.role == role {
            return;
        }
        self.role = role;
        self.current_step = 1;
        self.validation_errors.clear();
    }

    /// Validate only the required fields belonging to `step` for the
    /// active role. Replaces the error map with the findings.
    pub fn validate_step(&mut self, step: usize) -> bool {
        let mut errors = BTreeMap::new();
        let f = &self.fields;

        let require = |errors: &mut BTreeMap<String, String>, field: &str, value: &str, msg: &str| {
            if value.trim().is_empty() {
                errors.insert(field.to_string(), msg.to_string());
            }
        };

        match (self.role, step) {
            (Role::Volunteer, 1) => {
                if f.email.trim().is_empty() {
                    errors.insert("email".to_string(), "Email is required".to_string());
                } else if !is_valid_email(&f.email) {
                    errors.insert("email".to_string(), "Invalid email address".to_string());
                }
                require(&mut errors, "phone", &f.phone, "Phone is required");
            }
            (Role::Volunteer, 2) => {
                require(&mut errors, "birth_date", &f.birth_date, "Birth date is required");
            }
            (Role::Volunteer, 3) => {
                require(
                    &mut errors,
                    "emergency_contact_name",
                    &f.emergency_contact_name,
                    "Emergency contact name is required",
                );
                require(
                    &mut errors,
                    "emergency_contact_phone",
                    &f.emergency_contact_phone,
                    "Emergency contact phone is required",
                );
            }
            (Role::Volunteer, 4) => {
                // Experience and preferences: nothing required
            }
            (Role::Organizer, _) => {
                require(
                    &mut errors,
                    "organization_name",
                    &f.organization_name,
                    "Organization name is required",
                );
                require(&mut errors, "inn", &f.inn, "Tax id is required");
                require(
                    &mut errors,
                    "org_contact_name",
                    &f.org_contact_name,
                    "Contact name is required",
                );
                require(&mut errors, "org_phone", &f.org_phone, "Contact phone is required");
                if f.org_email.trim().is_empty() {
                    errors.insert("org_email".to_string(), "Contact email is required".to_string());
                } else if !is_valid_email(&f.org_email) {
                    errors.insert("org_email".to_string(), "Invalid email address".to_string());
                }
            }
            (Role::Admin, _) => {
                // Informational step only
            }
            (Role::Volunteer, _) => {
                // Out-of-range step: nothing to check
            }
        }

        let ok = errors.is_empty();
        self.validation_errors = errors;
        ok
    }

    /// Advance to the next step if the current one validates. Returns
    /// whether the step changed.
    pub fn next(&mut self) -> bool {
        if self.current_step >= self.step_count() {
            return false;
        }
        if !self.validate_step(self.current_step) {
            return false;
        }
        self.current_step += 1;
        true
    }

    /// Go back one step; never validates.
    pub fn back(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Gate for submission: the volunteer flow submits from its final
    /// step, single-step roles submit from their only step. Failures
    /// populate the error map.
    pub fn validate_for_submit(&mut self) -> bool {
        match self.role {
            Role::Volunteer => self.on_final_step() && self.validate_step(self.current_step),
            Role::Organizer | Role::Admin => self.validate_step(self.current_step),
        }
    }

    /// Phone format hint for step 1; a questionable format does not
    /// block submission
    pub fn phone_looks_valid(&self) -> bool {
        self.fields.phone.trim().is_empty() || is_valid_phone(&self.fields.phone)
    }

    /// Build the completion request body. Empty strings become absent
    /// fields; only the active role's field set is included.
    pub fn payload(&self) -> RegistrationPayload {
        fn opt(value: &str) -> Option<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }

        let f = &self.fields;
        let volunteer = self.role == Role::Volunteer;
        let organizer = self.role == Role::Organizer;

        RegistrationPayload {
            role: self.role,
            email: opt(&f.email),
            phone: opt(&f.phone),
            bio: opt(&f.bio),
            location: opt(&f.location),

            middle_name: if volunteer { opt(&f.middle_name) } else { None },
            birth_date: if volunteer { opt(&f.birth_date) } else { None },
            gender: if volunteer { opt(&f.gender) } else { None },
            emergency_contact_name: if volunteer {
                opt(&f.emergency_contact_name)
            } else {
                None
            },
            emergency_contact_phone: if volunteer {
                opt(&f.emergency_contact_phone)
            } else {
                None
            },
            emergency_contact_relation: if volunteer {
                opt(&f.emergency_contact_relation)
            } else {
                None
            },
            education: if volunteer { opt(&f.education) } else { None },
            occupation: if volunteer { opt(&f.occupation) } else { None },
            organization: if volunteer { opt(&f.organization) } else { None },
            experience_description: if volunteer {
                opt(&f.experience_description)
            } else {
                None
            },
            skills: if volunteer { f.skills.clone() } else { Vec::new() },
            interests: if volunteer { f.interests.clone() } else { Vec::new() },
            preferred_activities: if volunteer {
                f.preferred_activities.clone()
            } else {
                Vec::new()
            },
            travel_willingness: volunteer.then_some(f.travel_willingness),
            max_travel_distance: if volunteer { f.max_travel_distance } else { None },

            organization_name: if organizer { opt(&f.organization_name) } else { None },
            inn: if organizer { opt(&f.inn) } else { None },
            ogrn: if organizer { opt(&f.ogrn) } else { None },
            org_contact_name: if organizer { opt(&f.org_contact_name) } else { None },
            org_phone: if organizer { opt(&f.org_phone) } else { None },
            org_email: if organizer { opt(&f.org_email) } else { None },
            org_address: if organizer { opt(&f.org_address) } else { None },
        }
    }
}
