use chrono::Utc;
use uuid::Uuid;

use inkwell_account::domain::repository::TokenRepository as _;
use inkwell_account::error::ApiError;
use inkwell_account::usecase::token::{RefreshTokenUseCase, RevokeTokensUseCase, issue_pair};

use crate::helpers::{MockStore, TEST_PASSWORD};

const ACCESS_TTL: i64 = 3600;

// ── issue_pair ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_distinct_tokens_with_one_hour_expiry() {
    let store = MockStore::new();
    let user_id = Uuid::now_v7();

    let before = Utc::now().timestamp();
    let pair = issue_pair(&store.token_repo(), user_id, ACCESS_TTL, None)
        .await
        .unwrap();
    let after = Utc::now().timestamp();

    assert_ne!(pair.access_token, pair.refresh_token);
    assert!(pair.expires_in >= before + ACCESS_TTL);
    assert!(pair.expires_in <= after + ACCESS_TTL);

    // Unset refresh TTL means a non-expiring refresh token.
    let stored = store
        .token_repo()
        .find_refresh(&pair.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.expires_at.is_none());
}

#[tokio::test]
async fn should_invalidate_previous_pair_on_reissue() {
    let store = MockStore::new();
    let user_id = Uuid::now_v7();
    let repo = store.token_repo();

    let first = issue_pair(&repo, user_id, ACCESS_TTL, None).await.unwrap();
    let second = issue_pair(&repo, user_id, ACCESS_TTL, None).await.unwrap();

    // The first pair is gone: the bearer extractor would no longer find it.
    assert!(repo.find_access(&first.access_token).await.unwrap().is_none());
    assert!(repo.find_refresh(&first.refresh_token).await.unwrap().is_none());
    assert!(repo.find_access(&second.access_token).await.unwrap().is_some());
}

#[tokio::test]
async fn should_keep_other_users_tokens_on_reissue() {
    let store = MockStore::new();
    let repo = store.token_repo();
    let alice = Uuid::now_v7();
    let bob = Uuid::now_v7();

    let alice_pair = issue_pair(&repo, alice, ACCESS_TTL, None).await.unwrap();
    issue_pair(&repo, bob, ACCESS_TTL, None).await.unwrap();

    assert!(
        repo.find_access(&alice_pair.access_token)
            .await
            .unwrap()
            .is_some()
    );
}

// ── RefreshTokenUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_rotate_pair_on_refresh() {
    let store = MockStore::new();
    let user_id = Uuid::now_v7();

    let first = issue_pair(&store.token_repo(), user_id, ACCESS_TTL, None)
        .await
        .unwrap();

    let usecase = RefreshTokenUseCase {
        tokens: store.token_repo(),
        access_ttl_secs: ACCESS_TTL,
        refresh_ttl_secs: None,
    };
    let second = usecase.execute(&first.refresh_token).await.unwrap();

    assert_ne!(second.refresh_token, first.refresh_token);
    assert_ne!(second.access_token, first.access_token);

    // The pre-refresh access token is dead.
    let repo = store.token_repo();
    assert!(repo.find_access(&first.access_token).await.unwrap().is_none());
    assert!(repo.find_access(&second.access_token).await.unwrap().is_some());
}

#[tokio::test]
async fn should_fail_refresh_for_unknown_token() {
    let store = MockStore::new();
    let usecase = RefreshTokenUseCase {
        tokens: store.token_repo(),
        access_ttl_secs: ACCESS_TTL,
        refresh_ttl_secs: None,
    };

    let result = usecase.execute("no-such-token").await;
    assert!(
        matches!(result, Err(ApiError::RefreshTokenNotExist)),
        "expected RefreshTokenNotExist, got {result:?}"
    );
}

#[tokio::test]
async fn should_fail_refresh_for_expired_refresh_token() {
    let store = MockStore::new();
    let user_id = Uuid::now_v7();

    // Negative TTL puts the refresh expiry in the past.
    let pair = issue_pair(&store.token_repo(), user_id, ACCESS_TTL, Some(-10))
        .await
        .unwrap();

    let usecase = RefreshTokenUseCase {
        tokens: store.token_repo(),
        access_ttl_secs: ACCESS_TTL,
        refresh_ttl_secs: Some(-10),
    };
    let result = usecase.execute(&pair.refresh_token).await;
    assert!(
        matches!(result, Err(ApiError::RefreshTokenNotExist)),
        "expected RefreshTokenNotExist, got {result:?}"
    );
}

// ── RevokeTokensUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_revoke_all_tokens_idempotently() {
    let store = MockStore::new();
    let user = store.seed_email_user("a@b.com", TEST_PASSWORD);
    let pair = issue_pair(&store.token_repo(), user.id, ACCESS_TTL, None)
        .await
        .unwrap();

    let usecase = RevokeTokensUseCase {
        users: store.user_repo(),
        tokens: store.token_repo(),
    };
    usecase.execute("a@b.com").await.unwrap();

    let repo = store.token_repo();
    assert!(repo.find_access(&pair.access_token).await.unwrap().is_none());
    assert!(repo.find_refresh(&pair.refresh_token).await.unwrap().is_none());

    // Second revoke is a no-op, not an error.
    usecase.execute("a@b.com").await.unwrap();
}

#[tokio::test]
async fn should_ignore_revoke_for_unknown_email() {
    let store = MockStore::new();
    let usecase = RevokeTokensUseCase {
        users: store.user_repo(),
        tokens: store.token_repo(),
    };
    usecase.execute("nobody@example.com").await.unwrap();
}
