//! Bearer token validation with a shared HS256 secret.
//!
//! Tokens are minted locally with the same secret the server would be
//! configured with, so no identity provider or database is needed.
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use gleamy_backend::auth::jwt::{Claims, TokenVerifier, validate_token};

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims_for(sub: &str, email: Option<&str>, exp_offset: i64) -> Claims {
    let now = Utc::now().timestamp();

    Claims {
        sub: sub.to_string(),
        exp: (now + exp_offset) as usize,
        iat: Some(now as usize),
        iss: Some("https://identity.example.com".to_string()),
        aud: Some("gleamy".to_string()),
        email: email.map(str::to_string),
        email_verified: Some(true),
        name: Some("Alice Smith".to_string()),
        picture: Some("https://example.com/avatar.png".to_string()),
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_valid_token_decodes_correctly() {
    let sub = Uuid::new_v4().to_string();
    let token = mint(&claims_for(&sub, Some("alice@example.com"), 3600), TEST_SECRET);

    let claims = validate_token(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.auth_uid(), sub);
    assert_eq!(claims.user_email().unwrap(), "alice@example.com");
    assert_eq!(claims.display_name().unwrap(), "Alice Smith");
    assert_eq!(claims.photo_url().unwrap(), "https://example.com/avatar.png");
}

#[test]
fn test_expired_token_is_rejected() {
    // Well past the 60s default leeway.
    let token = mint(
        &claims_for("expired-user", Some("expired@example.com"), -300),
        TEST_SECRET,
    );

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = mint(&claims_for("bob", Some("bob@example.com"), 3600), TEST_SECRET);

    let result = validate_token(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(validate_token("not.a.valid.jwt", TEST_SECRET).is_err());
}

#[test]
fn test_token_without_email_still_validates() {
    let token = mint(&claims_for("no-email", None, 3600), TEST_SECRET);

    let claims = validate_token(&token, TEST_SECRET).unwrap();
    assert!(claims.user_email().is_none());
}

#[tokio::test]
async fn test_shared_secret_verifier_matches_validate_token() {
    let verifier = TokenVerifier::SharedSecret(TEST_SECRET.to_string());
    let token = mint(&claims_for("carol", Some("carol@example.com"), 3600), TEST_SECRET);

    let claims = verifier.verify(&token).await.unwrap();
    assert_eq!(claims.auth_uid(), "carol");

    let forged = mint(&claims_for("carol", Some("carol@example.com"), 3600), "another-secret");
    assert!(verifier.verify(&forged).await.is_err());
}
