use inkwell_account::domain::repository::SessionStore as _;
use inkwell_account::error::ApiError;
use inkwell_account::usecase::session::{WebLoginUseCase, WebLogoutUseCase};

use crate::helpers::{MockSessionStore, MockStore, TEST_PASSWORD};

const SESSION_TTL: u64 = 600;

#[tokio::test]
async fn should_open_session_on_web_login() {
    let store = MockStore::new();
    let sessions = MockSessionStore::default();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);

    let usecase = WebLoginUseCase {
        credentials: store.credential_repo(),
        sessions: sessions.clone(),
        session_ttl_secs: SESSION_TTL,
    };
    let session_id = usecase.execute("a@b.com", TEST_PASSWORD).await.unwrap();

    assert_eq!(sessions.get(&session_id).await.unwrap(), Some(user.id));
}

#[tokio::test]
async fn should_not_open_session_for_wrong_password() {
    let store = MockStore::new();
    let sessions = MockSessionStore::default();
    store.seed_email_user("a@b.com", TEST_PASSWORD);

    let usecase = WebLoginUseCase {
        credentials: store.credential_repo(),
        sessions: sessions.clone(),
        session_ttl_secs: SESSION_TTL,
    };
    let result = usecase.execute("a@b.com", "Wr0ngpass").await;

    assert!(
        matches!(result, Err(ApiError::AuthFail)),
        "expected AuthFail, got {result:?}"
    );
    assert!(sessions.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fail_web_login_for_unknown_email() {
    let store = MockStore::new();
    let usecase = WebLoginUseCase {
        credentials: store.credential_repo(),
        sessions: MockSessionStore::default(),
        session_ttl_secs: SESSION_TTL,
    };
    let result = usecase.execute("nobody@example.com", TEST_PASSWORD).await;
    assert!(
        matches!(result, Err(ApiError::UserNotExist)),
        "expected UserNotExist, got {result:?}"
    );
}

#[tokio::test]
async fn should_drop_session_on_logout_idempotently() {
    let store = MockStore::new();
    let sessions = MockSessionStore::default();
    store.seed_email_user("a@b.com", TEST_PASSWORD);

    let login = WebLoginUseCase {
        credentials: store.credential_repo(),
        sessions: sessions.clone(),
        session_ttl_secs: SESSION_TTL,
    };
    let session_id = login.execute("a@b.com", TEST_PASSWORD).await.unwrap();

    let logout = WebLogoutUseCase {
        sessions: sessions.clone(),
    };
    logout.execute(&session_id).await.unwrap();
    assert_eq!(sessions.get(&session_id).await.unwrap(), None);

    // Logging out an already dead session is a no-op.
    logout.execute(&session_id).await.unwrap();
}
