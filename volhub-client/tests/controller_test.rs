//! Startup sequence tests: verified bootstrap, guest fallback, stored
//! session fast path, and the duplicate-initialize guard.

mod common;

use volhub_client::{
    ApiClient, AuthState, HostEnvironment, NoHost, Session, SessionController, SessionStore,
    StaticHost,
};
use volhub_core::profile::UserProfile;

fn controller(base_url: &str, host: Box<dyn HostEnvironment>) -> SessionController {
    SessionController::new(ApiClient::new(base_url), SessionStore::in_memory(), host)
}

#[tokio::test]
async fn test_verified_bootstrap_reaches_ready() {
    let backend = common::spawn(common::MockOptions::default()).await;
    let mut controller = controller(
        &backend.base_url,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );

    let state = controller.initialize().await;

    match state {
        AuthState::Ready {
            user,
            registration_required,
        } => {
            assert_eq!(user.id, 42);
            assert!(!registration_required);
        }
        other => panic!("expected Ready, got {other:?}"),
    }
    assert_eq!(backend.hits.verify_count(), 1);

    // The session is persisted for the next launch
    let session = controller.store().load().expect("session saved");
    assert_eq!(session.user.id, 42);
}

#[tokio::test]
async fn test_unreachable_backend_degrades_to_guest() {
    let mut controller = controller(common::UNREACHABLE_URL, Box::new(NoHost));

    let state = controller.initialize().await;

    assert!(state.is_guest());
    assert!(state.registration_required());
    let user = state.user().unwrap();
    assert!(user.is_guest());
    assert_eq!(user.completion_percentage, 0);
}

#[tokio::test]
async fn test_guest_fallback_keeps_asserted_identity() {
    let mut controller = controller(
        common::UNREACHABLE_URL,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );

    let state = controller.initialize().await;

    assert!(state.is_guest());
    let user = state.user().unwrap();
    assert_eq!(user.telegram_user_id, Some(777));
    assert_eq!(user.first_name, "Ivan");
}

#[tokio::test]
async fn test_fresh_stored_session_skips_network() {
    let store = SessionStore::in_memory();
    let user: UserProfile = serde_json::from_value(common::verified_user()).unwrap();
    store.save(&Session::new(user));

    // No backend is listening; the fast path must not need one
    let mut controller =
        SessionController::new(ApiClient::new(common::UNREACHABLE_URL), store, Box::new(NoHost));

    let state = controller.initialize().await;

    match state {
        AuthState::Ready {
            user,
            registration_required,
        } => {
            assert_eq!(user.id, 42);
            assert!(!registration_required);
        }
        other => panic!("expected Ready, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fast_path_restore_keeps_auth_header() {
    let store = SessionStore::in_memory();
    let user: UserProfile = serde_json::from_value(common::verified_user()).unwrap();
    store.save(&Session::new(user));

    let backend = common::spawn(common::MockOptions::default()).await;
    let mut controller = SessionController::new(
        ApiClient::new(&backend.base_url),
        store,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );

    controller.initialize().await;
    assert_eq!(backend.hits.verify_count(), 0);

    // Requests after a restored session still carry the host assertion
    controller.refresh_profile().await.expect("refresh succeeds");
    assert_eq!(backend.hits.me_count(), 1);
    assert_eq!(backend.hits.me_with_init_data_count(), 1);
}

#[tokio::test]
async fn test_expired_stored_session_triggers_full_bootstrap() {
    let store = SessionStore::in_memory();
    let user: UserProfile = serde_json::from_value(common::verified_user()).unwrap();
    store.save(&Session {
        user,
        issued_at: chrono::Utc::now() - chrono::Duration::hours(25),
    });

    let backend = common::spawn(common::MockOptions::default()).await;
    let mut controller = SessionController::new(
        ApiClient::new(&backend.base_url),
        store,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );

    let state = controller.initialize().await;

    assert!(matches!(state, AuthState::Ready { .. }));
    assert_eq!(backend.hits.verify_count(), 1);

    // A fresh session replaced the expired one
    assert!(controller.store().load().is_some());
}

#[tokio::test]
async fn test_initialize_runs_once() {
    let backend = common::spawn(common::MockOptions::default()).await;
    let mut controller = controller(
        &backend.base_url,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );

    let first = controller.initialize().await;
    let second = controller.initialize().await;

    assert_eq!(first, second);
    assert_eq!(backend.hits.verify_count(), 1);
}

#[tokio::test]
async fn test_incomplete_user_requires_registration() {
    let backend = common::spawn(common::MockOptions {
        incomplete_user: true,
        is_new_user: true,
        ..Default::default()
    })
    .await;
    let mut controller = controller(
        &backend.base_url,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );

    let state = controller.initialize().await;

    // Verified, so Ready, but the profile still needs registration
    assert!(matches!(state, AuthState::Ready { .. }));
    assert!(state.registration_required());
}

#[tokio::test]
async fn test_delete_profile_clears_session() {
    let backend = common::spawn(common::MockOptions::default()).await;
    let mut controller = controller(
        &backend.base_url,
        Box::new(StaticHost(common::INIT_DATA.to_string())),
    );
    controller.initialize().await;
    assert!(controller.store().load().is_some());

    controller.delete_profile().await.unwrap();

    assert_eq!(backend.hits.delete_profile_count(), 1);
    assert!(controller.store().load().is_none());
    assert!(matches!(controller.state(), AuthState::Initializing));
}
