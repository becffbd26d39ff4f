//! Confirmation code integration tests: issue/decode against the
//! in-memory repository with a real cipher.

use std::sync::Arc;

use chrono::{Duration, Utc};

use gatehouse_identity::{
    AesGcmTokenCipher, ConfirmationCodec, LoginRepository, MemoryLoginRepository, TokenCipher,
    UserLogin,
};

struct Harness {
    repository: Arc<MemoryLoginRepository>,
    cipher: Arc<AesGcmTokenCipher>,
    codec: ConfirmationCodec,
}

fn harness() -> Harness {
    let repository = Arc::new(MemoryLoginRepository::new());
    let cipher = Arc::new(AesGcmTokenCipher::new(&AesGcmTokenCipher::generate_key()).unwrap());
    let codec = ConfirmationCodec::new(cipher.clone(), repository.clone());
    Harness {
        repository,
        cipher,
        codec,
    }
}

async fn seeded_login(h: &Harness) -> UserLogin {
    let login = UserLogin::new("alice", "database");
    h.repository.insert(&login, None).await.unwrap();
    login
}

/// Encrypt an arbitrary payload with the codec's own cipher, bypassing
/// `issue`.
fn forge(h: &Harness, payload: &str) -> String {
    h.cipher.encrypt(payload).unwrap()
}

fn payload_at(login: &UserLogin, issued: chrono::DateTime<Utc>) -> String {
    format!(
        "ROCK|{}|{}|{}",
        login.public_key,
        login.username,
        issued.timestamp()
    )
}

#[tokio::test]
async fn test_issue_then_decode_resolves_login() {
    let h = harness();
    let login = seeded_login(&h).await;

    let code = h.codec.issue(&login).unwrap();
    let resolved = h.codec.decode(&code).await.unwrap().unwrap();
    assert_eq!(resolved.id, login.id);
}

#[tokio::test]
async fn test_fresh_code_within_window() {
    let h = harness();
    let login = seeded_login(&h).await;

    let code = forge(&h, &payload_at(&login, Utc::now() - Duration::minutes(30)));
    assert!(h.codec.decode(&code).await.unwrap().is_some());
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let h = harness();
    let login = seeded_login(&h).await;

    // 90 minutes old still truncates to one whole hour, so it passes
    let code = forge(&h, &payload_at(&login, Utc::now() - Duration::minutes(90)));
    assert!(h.codec.decode(&code).await.unwrap().is_some());

    // past two whole hours it does not
    let code = forge(&h, &payload_at(&login, Utc::now() - Duration::minutes(121)));
    assert!(h.codec.decode(&code).await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_code_is_rejected() {
    let h = harness();
    seeded_login(&h).await;
    assert!(h.codec.decode("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_undecryptable_code_is_rejected_not_an_error() {
    let h = harness();
    seeded_login(&h).await;
    assert!(h.codec.decode("not-a-real-token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_wrong_prefix_is_rejected() {
    let h = harness();
    let login = seeded_login(&h).await;

    let payload = format!(
        "PAPER|{}|{}|{}",
        login.public_key,
        login.username,
        Utc::now().timestamp()
    );
    assert!(h.codec.decode(&forge(&h, &payload)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_wrong_field_count_is_rejected() {
    let h = harness();
    let login = seeded_login(&h).await;

    let three_fields = format!("ROCK|{}|{}", login.public_key, login.username);
    assert!(h
        .codec
        .decode(&forge(&h, &three_fields))
        .await
        .unwrap()
        .is_none());

    let five_fields = format!(
        "ROCK|{}|{}|{}|extra",
        login.public_key,
        login.username,
        Utc::now().timestamp()
    );
    assert!(h
        .codec
        .decode(&forge(&h, &five_fields))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_unparseable_ticks_always_expired() {
    let h = harness();
    let login = seeded_login(&h).await;

    let payload = format!("ROCK|{}|{}|not-a-number", login.public_key, login.username);
    assert!(h.codec.decode(&forge(&h, &payload)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_username_mismatch_is_rejected() {
    let h = harness();
    let login = seeded_login(&h).await;

    let payload = format!(
        "ROCK|{}|mallory|{}",
        login.public_key,
        Utc::now().timestamp()
    );
    assert!(h.codec.decode(&forge(&h, &payload)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_public_key_is_rejected() {
    let h = harness();
    seeded_login(&h).await;

    let payload = format!("ROCK|NOPE|alice|{}", Utc::now().timestamp());
    assert!(h.codec.decode(&forge(&h, &payload)).await.unwrap().is_none());
}
