use inkwell_account::domain::types::{CHANGE_CODE_LEN, CodeKind};
use inkwell_account::error::ApiError;
use inkwell_account::password::verify_secret;
use inkwell_account::usecase::user::{
    ChangePasswordCodeUseCase, ConfirmCodeUseCase, NewPasswordInput, NewPasswordUseCase,
};

use crate::helpers::{MockStore, TEST_PASSWORD};

// ── ChangePasswordCodeUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_short_code_and_queue_email() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);

    let usecase = ChangePasswordCodeUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };
    usecase.execute("a@b.com").await.unwrap();

    let codes = store.codes.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].user_id, user.id);
    assert_eq!(codes[0].kind, CodeKind::ChangePassword);
    assert_eq!(codes[0].code.len(), CHANGE_CODE_LEN);
    assert!(!codes[0].consumed);

    let events = store.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "password_change_code");
    assert_eq!(events[0].payload["code"], codes[0].code.as_str());
}

#[tokio::test]
async fn should_fail_issue_for_unknown_email() {
    let store = MockStore::new();
    let usecase = ChangePasswordCodeUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };

    let result = usecase.execute("nobody@example.com").await;
    assert!(
        matches!(result, Err(ApiError::ModelNotExist)),
        "expected ModelNotExist, got {result:?}"
    );
    assert!(store.codes.lock().unwrap().is_empty());
}

// ── ConfirmCodeUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_consume_matching_code_exactly_once() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    store.seed_code(user.id, "A1B2", CodeKind::ChangePassword, false);

    let usecase = ConfirmCodeUseCase {
        codes: store.code_repo(),
    };
    usecase.execute(user.id, "A1B2").await.unwrap();
    assert!(store.codes.lock().unwrap()[0].consumed);

    // A consumed code no longer matches.
    let result = usecase.execute(user.id, "A1B2").await;
    assert!(
        matches!(result, Err(ApiError::CodeFail)),
        "expected CodeFail, got {result:?}"
    );
}

#[tokio::test]
async fn should_fail_confirm_with_wrong_code() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    store.seed_code(user.id, "A1B2", CodeKind::ChangePassword, false);

    let usecase = ConfirmCodeUseCase {
        codes: store.code_repo(),
    };
    let result = usecase.execute(user.id, "ZZZZ").await;
    assert!(
        matches!(result, Err(ApiError::CodeFail)),
        "expected CodeFail, got {result:?}"
    );
    assert!(!store.codes.lock().unwrap()[0].consumed);
}

#[tokio::test]
async fn should_consume_activation_code_from_register_flow() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    let code = store.seed_code(user.id, "deadbeef", CodeKind::ActivateAccount, false);

    let usecase = ConfirmCodeUseCase {
        codes: store.code_repo(),
    };
    usecase.execute(user.id, &code.code).await.unwrap();
    assert!(store.codes.lock().unwrap()[0].consumed);
}

// ── NewPasswordUseCase (two-phase) ───────────────────────────────────────────

fn new_password_input(code: &str) -> NewPasswordInput {
    NewPasswordInput {
        email: "a@b.com".to_owned(),
        password: TEST_PASSWORD.to_owned(),
        new_password: "N3wpassWord".to_owned(),
        code: code.to_owned(),
    }
}

#[tokio::test]
async fn should_reject_new_password_before_code_is_armed() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    store.seed_code(user.id, "A1B2", CodeKind::ChangePassword, false);

    let usecase = NewPasswordUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };
    let result = usecase.execute(new_password_input("A1B2")).await;
    assert!(
        matches!(result, Err(ApiError::CodeFail)),
        "expected CodeFail, got {result:?}"
    );
}

#[tokio::test]
async fn should_change_password_with_armed_code() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    store.seed_code(user.id, "A1B2", CodeKind::ChangePassword, true);

    let usecase = NewPasswordUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };
    usecase.execute(new_password_input("A1B2")).await.unwrap();

    let auths = store.auths.lock().unwrap();
    assert!(verify_secret("N3wpassWord", &auths[0].credential).unwrap());
    assert!(!verify_secret(TEST_PASSWORD, &auths[0].credential).unwrap());
}

#[tokio::test]
async fn should_reject_new_password_with_wrong_current_password() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    store.seed_code(user.id, "A1B2", CodeKind::ChangePassword, true);

    let usecase = NewPasswordUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };
    let mut input = new_password_input("A1B2");
    input.password = "Wr0ngpass".to_owned();

    let result = usecase.execute(input).await;
    assert!(
        matches!(result, Err(ApiError::AuthFail)),
        "expected AuthFail, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_weak_new_password() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    store.seed_code(user.id, "A1B2", CodeKind::ChangePassword, true);

    let usecase = NewPasswordUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };
    let mut input = new_password_input("A1B2");
    input.new_password = "weak".to_owned();

    let result = usecase.execute(input).await;
    assert!(
        matches!(result, Err(ApiError::PasswordInvalid)),
        "expected PasswordInvalid, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_new_password_for_unknown_email() {
    let store = MockStore::new();
    let usecase = NewPasswordUseCase {
        credentials: store.credential_repo(),
        codes: store.code_repo(),
    };
    let result = usecase.execute(new_password_input("A1B2")).await;
    assert!(
        matches!(result, Err(ApiError::ModelNotExist)),
        "expected ModelNotExist, got {result:?}"
    );
}
