//! Identity bootstrap: host runtime detection and init-data parsing
//!
//! The host (Telegram) hands the app a url-encoded init payload once per
//! launch. The payload is untrusted until the backend verifies it; the
//! client only peeks at the `user` field for display identity and sends
//! the raw string on the wire unchanged.

use serde::Deserialize;

use volhub_core::profile::UserProfile;

use crate::error::{ClientError, Result};

/// Capability provided by the surrounding mini-app container
pub trait HostEnvironment: Send + Sync {
    /// Raw init payload; `None` when not running inside the host.
    /// Absence is a supported mode (guest), not an error.
    fn init_data(&self) -> Option<String>;
}

/// Browser mode: no host runtime present
pub struct NoHost;

impl HostEnvironment for NoHost {
    fn init_data(&self) -> Option<String> {
        None
    }
}

/// A fixed init payload, as supplied by an embedding shell (or a test)
pub struct StaticHost(pub String);

impl HostEnvironment for StaticHost {
    fn init_data(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// The `user` field of the init payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Opaque signed identity payload from the host, created once per app
/// launch and discarded after the exchange
#[derive(Debug, Clone)]
pub struct IdentityAssertion {
    /// The payload exactly as the host produced it; this is what goes
    /// into the verification header
    pub raw: String,
    /// Best-effort extraction of the asserted user
    pub user: Option<TelegramUser>,
    pub auth_date: Option<i64>,
}

impl IdentityAssertion {
    /// Parse a url-encoded init payload (`key=value&key=value`)
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(ClientError::InvalidInitData("empty payload".to_string()));
        }

        let mut user = None;
        let mut auth_date = None;

        for pair in raw.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };
            let decoded = urlencoding::decode(value)
                .map_err(|e| ClientError::InvalidInitData(e.to_string()))?;
            match key {
                "user" => {
                    let parsed: TelegramUser = serde_json::from_str(&decoded)
                        .map_err(|e| ClientError::InvalidInitData(format!("user field: {e}")))?;
                    user = Some(parsed);
                }
                "auth_date" => {
                    auth_date = decoded.parse::<i64>().ok();
                }
                _ => {}
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            user,
            auth_date,
        })
    }
}

/// The single definition of "guest": a synthetic low-trust volunteer
/// profile, carrying whatever display identity the assertion asserted.
/// Every identity-bootstrap failure path goes through here.
pub fn make_guest_profile(assertion: Option<&IdentityAssertion>) -> UserProfile {
    let mut profile = UserProfile::guest();
    if let Some(user) = assertion.and_then(|a| a.user.as_ref()) {
        profile.telegram_user_id = Some(user.id);
        if !user.first_name.is_empty() {
            profile.first_name = user.first_name.clone();
        }
        profile.last_name = user.last_name.clone();
        profile.username = user.username.clone();
    }
    profile
}
