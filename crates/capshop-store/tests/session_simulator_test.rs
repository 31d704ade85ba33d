//! Integration tests for the session simulator through the public API.

use std::sync::Arc;
use std::time::Duration;

use capshop_store::{
    AuthError, AuthErrorKind, AuthEvent, AuthResponse, Clock, FileTokenStorage, ManualClock,
    MemoryTokenStorage, SessionConfig, SessionSimulator, TokenStorage,
};

const EMAIL: &str = "fan@capshop.test";
const PASSWORD: &str = "snapback!";

fn simulator(clock: &ManualClock) -> (SessionSimulator, Arc<MemoryTokenStorage>) {
    let storage = Arc::new(MemoryTokenStorage::new());
    let sim = SessionSimulator::new(
        SessionConfig::default().fast_hashing(),
        storage.clone(),
        Arc::new(clock.clone()),
    )
    .unwrap();
    (sim, storage)
}

#[tokio::test(start_paused = true)]
async fn full_session_lifecycle() {
    let clock = ManualClock::default();
    let (sim, storage) = simulator(&clock);
    let mut events = sim.subscribe();

    let registered = sim.sign_up(EMAIL, PASSWORD).await.unwrap();
    let signed_in = sim.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(signed_in.user.id, registered.id);

    match events.recv().await {
        Some(AuthEvent::SignedIn { user }) => assert_eq!(user.email, EMAIL),
        other => panic!("expected SignedIn, got {:?}", other),
    }

    let session = sim.session().await.unwrap();
    assert_eq!(session.token, signed_in.session.token);
    assert_eq!(
        storage.get("mockAuthSession").unwrap().as_deref(),
        Some(session.token.as_str())
    );

    sim.sign_out().await.unwrap();
    assert_eq!(events.recv().await, Some(AuthEvent::SignedOut));
    assert!(sim.current_user().await.is_none());

    // The account survives sign-out.
    assert_eq!(sim.user_count().await, 1);
    assert!(sim.sign_in(EMAIL, PASSWORD).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn session_valid_until_exactly_one_hour() {
    let clock = ManualClock::default();
    let (sim, _) = simulator(&clock);
    sim.sign_up(EMAIL, PASSWORD).await.unwrap();

    let started = clock.now();
    sim.sign_in(EMAIL, PASSWORD).await.unwrap();

    clock.set(started + chrono::Duration::seconds(3599));
    assert!(sim.current_user().await.is_some());

    clock.set(started + chrono::Duration::seconds(3600));
    assert!(sim.current_user().await.is_none());
    assert!(sim.session().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn latency_is_simulated() {
    let clock = ManualClock::default();
    let (sim, _) = simulator(&clock);

    let before = tokio::time::Instant::now();
    sim.sign_up(EMAIL, PASSWORD).await.unwrap();
    assert!(before.elapsed() >= Duration::from_millis(800));

    let before = tokio::time::Instant::now();
    sim.sign_out().await.unwrap();
    let elapsed = before.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn concurrent_sign_ins_for_different_users() {
    let clock = ManualClock::default();
    let (sim, _) = simulator(&clock);
    sim.sign_up("a@capshop.test", PASSWORD).await.unwrap();
    sim.sign_up("b@capshop.test", PASSWORD).await.unwrap();

    let (a, b) = tokio::join!(
        sim.sign_in("a@capshop.test", PASSWORD),
        sim.sign_in("b@capshop.test", PASSWORD),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.session.token, b.session.token);

    // Only the last remembered token counts as "current".
    let current = sim.session().await.unwrap();
    assert!(current.token == a.session.token || current.token == b.session.token);
}

#[tokio::test(start_paused = true)]
async fn errors_map_to_response_envelope() {
    let clock = ManualClock::default();
    let (sim, _) = simulator(&clock);

    let response: AuthResponse<_> = sim.sign_in(EMAIL, PASSWORD).await.into();
    let error = response.error.unwrap();
    assert_eq!(error.kind, AuthErrorKind::InvalidCredentials);
    assert_eq!(error.message, "Invalid login credentials");
    assert_eq!(error.status, 400);

    let response: AuthResponse<_> = sim.sign_up("not-an-email", PASSWORD).await.into();
    assert_eq!(response.error.unwrap().kind, AuthErrorKind::InvalidInput);

    let response: AuthResponse<_> = sim.update_password("whatever").await.into();
    assert_eq!(response.error.unwrap().kind, AuthErrorKind::NotAuthenticated);
}

#[tokio::test(start_paused = true)]
async fn update_password_enforces_policy() {
    let clock = ManualClock::default();
    let (sim, _) = simulator(&clock);
    sim.sign_up(EMAIL, PASSWORD).await.unwrap();
    sim.sign_in(EMAIL, PASSWORD).await.unwrap();

    let err = sim.update_password("short").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));
    // Old password still works.
    assert!(sim.sign_in(EMAIL, PASSWORD).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn remembered_token_from_previous_run_is_discarded() {
    let path = std::env::temp_dir()
        .join(format!("capshop-it-{}", uuid::Uuid::new_v4()))
        .join("session.json");
    let clock = ManualClock::default();
    let config = SessionConfig::default().fast_hashing();

    let first = SessionSimulator::new(
        config.clone(),
        Arc::new(FileTokenStorage::new(&path)),
        Arc::new(clock.clone()),
    )
    .unwrap();
    first.sign_up(EMAIL, PASSWORD).await.unwrap();
    first.sign_in(EMAIL, PASSWORD).await.unwrap();
    drop(first);

    // The directory and session table were in memory; only the token remains.
    let storage = Arc::new(FileTokenStorage::new(&path));
    assert!(storage.get("mockAuthSession").unwrap().is_some());

    let second = SessionSimulator::new(config, storage.clone(), Arc::new(clock)).unwrap();
    assert!(second.current_user().await.is_none());
    assert!(storage.get("mockAuthSession").unwrap().is_none());

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}
