//! User profile model
//!
//! Profiles are discriminated by role. Role-specific fields live in the
//! tagged [`RoleDetails`] union so that adding a role is a compile-time
//! checked change everywhere the role is matched.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Volunteer,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volunteer" => Ok(Role::Volunteer),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Role-specific profile data, tagged by `role` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleDetails {
    Volunteer(VolunteerDetails),
    Organizer(OrganizerDetails),
    Admin,
}

/// Volunteer-specific fields collected during registration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolunteerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_description: Option<String>,
    #[serde(default)]
    pub travel_willingness: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_travel_distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_activities: Vec<String>,
}

/// Organizer legal/contact fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Tax identification number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    /// State registration number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_address: Option<String>,
}

/// A user profile as returned by the backend (or fabricated locally
/// for guest mode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend id; 0 for a locally fabricated guest profile
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_user_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Derived by the backend; 0 for guests
    #[serde(default)]
    pub completion_percentage: u8,
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl UserProfile {
    /// The synthetic low-trust profile used whenever identity cannot be
    /// established or verified. This is the single definition of "guest";
    /// callers layer display identity on top when an assertion was
    /// available but could not be verified.
    pub fn guest() -> Self {
        Self {
            id: 0,
            telegram_user_id: None,
            first_name: "Guest".to_string(),
            last_name: None,
            username: None,
            email: None,
            phone: None,
            bio: None,
            location: None,
            completion_percentage: 0,
            details: RoleDetails::Volunteer(VolunteerDetails::default()),
        }
    }

    pub fn role(&self) -> Role {
        match &self.details {
            RoleDetails::Volunteer(_) => Role::Volunteer,
            RoleDetails::Organizer(_) => Role::Organizer,
            RoleDetails::Admin => Role::Admin,
        }
    }

    /// Whether this profile was fabricated locally rather than verified
    /// by the backend
    pub fn is_guest(&self) -> bool {
        self.id == 0
    }

    /// Both contact fields present and non-empty
    pub fn has_contact_info(&self) -> bool {
        let filled = |f: &Option<String>| f.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.email) && filled(&self.phone)
    }

    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_json() {
        let profile = UserProfile {
            id: 7,
            details: RoleDetails::Organizer(OrganizerDetails {
                organization_name: Some("Helping Hands".to_string()),
                inn: Some("7707083893".to_string()),
                ..Default::default()
            }),
            ..UserProfile::guest()
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "organizer");
        assert_eq!(json["inn"], "7707083893");

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back.role(), Role::Organizer);
        assert_eq!(back, profile);
    }

    #[test]
    fn test_guest_profile_shape() {
        let guest = UserProfile::guest();
        assert!(guest.is_guest());
        assert_eq!(guest.role(), Role::Volunteer);
        assert_eq!(guest.completion_percentage, 0);
        assert!(!guest.has_contact_info());
    }

    #[test]
    fn test_has_contact_info_requires_both_fields() {
        let mut user = UserProfile::guest();
        user.email = Some("a@b.com".to_string());
        assert!(!user.has_contact_info());
        user.phone = Some("+79990001122".to_string());
        assert!(user.has_contact_info());
        user.phone = Some("   ".to_string());
        assert!(!user.has_contact_info());
    }

    #[test]
    fn test_admin_tag_deserializes_without_extra_fields() {
        let user: UserProfile = serde_json::from_str(
            r#"{"id": 1, "first_name": "Root", "role": "admin", "completion_percentage": 100}"#,
        )
        .unwrap();
        assert_eq!(user.role(), Role::Admin);
    }
}
