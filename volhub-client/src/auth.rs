//! Session controller
//!
//! Orchestrates the startup sequence: stored-session fast path, host
//! assertion exchange, guest fallback, and registration hand-off. Every
//! failure path resolves to a renderable state; the rest of the app
//! always observes a usable user object.

use volhub_core::profile::{Role, UserProfile};
use volhub_core::registration::RegistrationDraft;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::store::{Session, SessionStore, SqliteBackend};
use crate::telegram::{make_guest_profile, HostEnvironment, IdentityAssertion};

/// Profiles below this completion level still need registration
const COMPLETION_THRESHOLD: u8 = 70;

/// Authentication state exposed to the application
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Initializing,
    /// Backend-verified user
    Ready {
        user: UserProfile,
        registration_required: bool,
    },
    /// Synthetic or unverified user; the app stays usable
    GuestReady {
        user: UserProfile,
        registration_required: bool,
    },
    /// Defensive: no user object could be produced at all. Should not
    /// occur in normal operation; surfaced with a manual retry action.
    Failed { error: String },
}

impl AuthState {
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Ready { user, .. } | AuthState::GuestReady { user, .. } => Some(user),
            AuthState::Initializing | AuthState::Failed { .. } => None,
        }
    }

    pub fn registration_required(&self) -> bool {
        match self {
            AuthState::Ready {
                registration_required,
                ..
            }
            | AuthState::GuestReady {
                registration_required,
                ..
            } => *registration_required,
            AuthState::Initializing | AuthState::Failed { .. } => false,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, AuthState::GuestReady { .. })
    }
}

/// Outcome of an identity exchange; always carries a user
#[derive(Debug, Clone)]
pub struct ExchangeResult {
    pub user: UserProfile,
    pub is_new_user: bool,
    pub requires_registration: bool,
    /// False when the result was synthesized by the guest fallback
    pub verified: bool,
}

pub struct SessionController {
    api: ApiClient,
    store: SessionStore,
    host: Box<dyn HostEnvironment>,
    state: AuthState,
    /// Startup guard: the hosting UI lifecycle may fire the bootstrap
    /// effect more than once
    in_flight: bool,
}

impl SessionController {
    pub fn new(api: ApiClient, store: SessionStore, host: Box<dyn HostEnvironment>) -> Self {
        Self {
            api,
            store,
            host,
            state: AuthState::Initializing,
            in_flight: false,
        }
    }

    /// Build a controller from configuration: sqlite-backed sessions
    /// when a storage path is configured, memory-only otherwise
    pub fn from_config(config: &Config, host: Box<dyn HostEnvironment>) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url.clone());
        let store = match &config.storage_path {
            Some(path) => SessionStore::new(Box::new(SqliteBackend::open(path)?)),
            None => SessionStore::in_memory(),
        };
        let store = store.with_ttl(chrono::Duration::hours(config.session_ttl_hours));
        Ok(Self::new(api, store, host))
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.state.user()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run the startup sequence. Idempotent: once a terminal state is
    /// reached (or while a run is in flight), further calls return the
    /// current state without side effects.
    pub async fn initialize(&mut self) -> AuthState {
        if self.in_flight || !matches!(self.state, AuthState::Initializing) {
            return self.state.clone();
        }
        self.in_flight = true;

        // The assertion authorizes every later request, so it goes on
        // the client before either path, not just the exchange.
        let assertion = self.read_assertion();
        self.api
            .set_init_data(assertion.as_ref().map(|a| a.raw.clone()));

        // Fast path: a valid stored session skips the network entirely,
        // trading a small staleness window for instant startup.
        if let Some(session) = self.store.load() {
            tracing::debug!("Restored session from storage");
            let verified = !session.user.is_guest();
            self.state = classify(session.user, false, false, verified);
            self.in_flight = false;
            return self.state.clone();
        }

        let result = self.exchange(assertion.as_ref()).await;
        self.state = classify(
            result.user.clone(),
            result.requires_registration,
            result.is_new_user,
            result.verified,
        );
        self.store.save(&Session::new(result.user));

        self.in_flight = false;
        self.state.clone()
    }

    /// Manual retry action for the (defensive) failed state
    pub async fn retry(&mut self) -> AuthState {
        self.state = AuthState::Initializing;
        self.in_flight = false;
        self.initialize().await
    }

    /// Read the host assertion. A missing host is guest mode, not an
    /// error; a malformed payload is downgraded to the same path.
    fn read_assertion(&self) -> Option<IdentityAssertion> {
        let raw = self.host.init_data()?;
        match IdentityAssertion::parse(&raw) {
            Ok(assertion) => Some(assertion),
            Err(e) => {
                tracing::warn!(error = %e, "Unusable init payload, continuing without assertion");
                None
            }
        }
    }

    /// Exchange the assertion for a verified session. Always resolves:
    /// transport, decode and backend failures are converted into a
    /// synthesized guest result, never propagated.
    pub async fn exchange(&self, assertion: Option<&IdentityAssertion>) -> ExchangeResult {
        let init_data = assertion.map(|a| a.raw.as_str());
        match self.api.verify(init_data).await {
            Ok(resp) if resp.success => ExchangeResult {
                user: resp.user,
                is_new_user: resp.is_new_user,
                requires_registration: resp.requires_registration,
                verified: true,
            },
            Ok(_) => {
                tracing::warn!("Identity verification rejected, degrading to guest");
                guest_result(assertion)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Identity exchange failed, degrading to guest");
                guest_result(assertion)
            }
        }
    }

    /// Completion hook: leaves the registration-required state,
    /// re-persists the session, then refreshes the profile best-effort
    /// (the locally known profile remains valid on failure).
    pub async fn on_registration_complete(&mut self, user: UserProfile) {
        self.store.save(&Session::new(user.clone()));
        self.state = AuthState::Ready {
            user,
            registration_required: false,
        };

        match self.api.me().await {
            Ok(fresh) => {
                self.store.save(&Session::new(fresh.clone()));
                self.state = AuthState::Ready {
                    user: fresh,
                    registration_required: false,
                };
            }
            Err(e) => {
                tracing::debug!(error = %e, "Profile refresh after registration failed");
            }
        }
    }

    /// Submit the registration draft. Local validation failures never
    /// reach the network and leave field errors in the draft; backend
    /// failures land under the `general` key with the draft retained
    /// for retry.
    pub async fn submit_registration(
        &mut self,
        draft: &mut RegistrationDraft,
    ) -> Result<UserProfile> {
        if !draft.validate_for_submit() {
            return Err(ClientError::Validation);
        }

        match self.api.complete_registration(&draft.payload()).await {
            Ok(user) => {
                self.on_registration_complete(user.clone()).await;
                Ok(user)
            }
            Err(e) => {
                draft.set_general_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Alternate exit from the volunteer flow (step 1 only): the draft
    /// is discarded, registration stays required, but the main app
    /// becomes navigable. Returns whether the skip was taken.
    pub fn skip_registration(&mut self, draft: RegistrationDraft) -> bool {
        if draft.role() != Role::Volunteer || draft.current_step() != 1 {
            return false;
        }
        true
    }

    /// Best-effort profile refresh; failures are tolerated and the
    /// last-known profile is kept
    pub async fn refresh_profile(&mut self) -> Option<UserProfile> {
        match self.api.me().await {
            Ok(user) => {
                self.store.save(&Session::new(user.clone()));
                self.state = classify(user.clone(), false, false, true);
                Some(user)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Profile refresh failed, keeping last-known profile");
                None
            }
        }
    }

    /// Delete the account. Errors propagate (the caller shows a
    /// blocking alert); success clears all local session state.
    pub async fn delete_profile(&mut self) -> Result<()> {
        self.api.delete_profile().await?;
        self.reset();
        Ok(())
    }

    /// Log out: clear the stored session and return to the initial state
    pub fn reset(&mut self) {
        self.store.clear();
        self.state = AuthState::Initializing;
        self.in_flight = false;
    }
}

/// Map a user (plus exchange flags) to the corresponding auth state
fn classify(
    user: UserProfile,
    requires_registration: bool,
    is_new_user: bool,
    verified: bool,
) -> AuthState {
    let registration_required = requires_registration
        || is_new_user
        || !user.has_contact_info()
        || user.completion_percentage < COMPLETION_THRESHOLD;

    if verified && !user.is_guest() {
        AuthState::Ready {
            user,
            registration_required,
        }
    } else {
        AuthState::GuestReady {
            user,
            registration_required,
        }
    }
}

fn guest_result(assertion: Option<&IdentityAssertion>) -> ExchangeResult {
    ExchangeResult {
        user: make_guest_profile(assertion),
        is_new_user: true,
        requires_registration: true,
        verified: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volhub_core::profile::{RoleDetails, VolunteerDetails};

    fn complete_user() -> UserProfile {
        UserProfile {
            id: 5,
            email: Some("user@example.com".to_string()),
            phone: Some("+79990001122".to_string()),
            completion_percentage: 85,
            details: RoleDetails::Volunteer(VolunteerDetails::default()),
            ..UserProfile::guest()
        }
    }

    #[test]
    fn test_classify_complete_verified_user() {
        let state = classify(complete_user(), false, false, true);
        assert!(matches!(
            state,
            AuthState::Ready {
                registration_required: false,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_flags_force_registration() {
        let state = classify(complete_user(), false, true, true);
        assert!(state.registration_required());

        let state = classify(complete_user(), true, false, true);
        assert!(state.registration_required());
    }

    #[test]
    fn test_classify_incomplete_profile_requires_registration() {
        let mut user = complete_user();
        user.completion_percentage = 40;
        assert!(classify(user, false, false, true).registration_required());

        let mut user = complete_user();
        user.phone = None;
        assert!(classify(user, false, false, true).registration_required());
    }

    #[test]
    fn test_classify_guest_goes_to_guest_ready() {
        let state = classify(UserProfile::guest(), true, true, false);
        assert!(state.is_guest());
        assert!(state.registration_required());
    }
}
