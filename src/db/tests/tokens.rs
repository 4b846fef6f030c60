use crate::db::tokens::token_digest;
use crate::test_helpers::seed_fixture;

#[tokio::test]
async fn test_issued_token_resolves_to_member() {
    let fixture = seed_fixture().await;

    let principal = fixture
        .db
        .resolve_api_token(&fixture.token)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(principal.member_id, fixture.member1);
    assert_eq!(principal.organization_id, fixture.organization.id);
    assert_eq!(principal.username, "Alice");
}

#[tokio::test]
async fn test_tokens_are_random_and_hex() {
    let fixture = seed_fixture().await;

    let second = fixture.db.issue_api_token(fixture.member1).await.unwrap();

    assert_ne!(second, fixture.token);
    assert_eq!(second.len(), 64);
    assert!(second.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_only_digest_is_stored() {
    let fixture = seed_fixture().await;

    let stored: Vec<String> = sqlx::query_scalar("SELECT token_hash FROM api_tokens")
        .fetch_all(fixture.db.pool())
        .await
        .unwrap();

    assert!(!stored.contains(&fixture.token));
    assert!(stored.contains(&token_digest(&fixture.token)));
}

#[tokio::test]
async fn test_unknown_token_resolves_to_none() {
    let fixture = seed_fixture().await;

    assert!(
        fixture
            .db
            .resolve_api_token("unknown")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_inactive_member_token_resolves_to_none() {
    let fixture = seed_fixture().await;
    let token = fixture
        .db
        .issue_api_token(fixture.inactive_member)
        .await
        .unwrap();

    assert!(fixture.db.resolve_api_token(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_revoke_tokens() {
    let fixture = seed_fixture().await;

    let revoked = fixture.db.revoke_api_tokens(fixture.member1).await.unwrap();

    assert_eq!(revoked, 1);
    assert!(
        fixture
            .db
            .resolve_api_token(&fixture.token)
            .await
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_token_digest_is_lowercase_sha256_hex() {
    assert_eq!(
        token_digest("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
