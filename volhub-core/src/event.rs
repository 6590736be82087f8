//! Event and event-registration read models
//!
//! These are external entities owned by the backend; the client treats
//! responses as authoritative and only submits requests against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Social,
    Environmental,
    Education,
    Health,
    Community,
    Emergency,
    Sports,
    Culture,
    Other,
}

impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
    Completed,
}

/// A volunteer event as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub creator_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub min_volunteers: u32,
    #[serde(default)]
    pub max_volunteers: u32,
    #[serde(default)]
    pub current_volunteers_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Remaining capacity; unlimited events (max 0) report `None`
    pub fn available_slots(&self) -> Option<u32> {
        if self.max_volunteers == 0 {
            None
        } else {
            Some(self.max_volunteers.saturating_sub(self.current_volunteers_count))
        }
    }

    /// Fill level against the max capacity, clamped to 100
    pub fn progress_percentage(&self) -> u8 {
        if self.max_volunteers == 0 {
            return 0;
        }
        let pct = self.current_volunteers_count as u64 * 100 / self.max_volunteers as u64;
        pct.min(100) as u8
    }

    pub fn is_full(&self) -> bool {
        self.available_slots() == Some(0)
    }

    /// Published, not started, before the deadline (if any), with room
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        if self.status != EventStatus::Published || self.is_full() {
            return false;
        }
        if now >= self.start_date {
            return false;
        }
        match self.registration_deadline {
            Some(deadline) => now < deadline,
            None => true,
        }
    }
}

/// A user's registration for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: RegistrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
