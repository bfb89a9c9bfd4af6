use chrono::{Duration, Utc};
use uuid::Uuid;

use dahlia::auth::jwt::{self, Claims, TokenError};
use dahlia::auth::{password, tokens};

const SECRET: &str = "unit-test-secret";

#[test]
fn access_token_round_trips_user_id() {
    let user_id = Uuid::now_v7();
    let token = jwt::issue_access(user_id, SECRET).unwrap();

    let claims = jwt::verify(&token, SECRET).unwrap();
    assert_eq!(claims.id, user_id);
    assert_eq!(claims.exp - claims.iat, jwt::ACCESS_TOKEN_TTL_SECS);
}

#[test]
fn refresh_token_lives_thirty_days() {
    let token = jwt::issue_refresh(Uuid::now_v7(), SECRET).unwrap();
    let claims = jwt::verify(&token, SECRET).unwrap();
    assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
}

#[test]
fn wrong_secret_is_invalid_signature() {
    let token = jwt::issue_access(Uuid::now_v7(), SECRET).unwrap();
    assert_eq!(
        jwt::verify(&token, "another-secret").unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn malformed_token_is_invalid_signature() {
    assert_eq!(
        jwt::verify("definitely.not.jwt", SECRET).unwrap_err(),
        TokenError::InvalidSignature
    );
}

#[test]
fn expired_token_is_reported_as_expired() {
    let mut claims = Claims::new(Uuid::now_v7(), Duration::hours(1));
    claims.exp = (Utc::now() - Duration::minutes(5)).timestamp();
    let token = jwt::encode_token(&claims, SECRET).unwrap();

    assert_eq!(jwt::verify(&token, SECRET).unwrap_err(), TokenError::Expired);
}

#[test]
fn tokens_issued_back_to_back_differ() {
    let user_id = Uuid::now_v7();
    let a = jwt::issue_refresh(user_id, SECRET).unwrap();
    let b = jwt::issue_refresh(user_id, SECRET).unwrap();
    assert_ne!(a, b);
}

#[test]
fn pair_uses_independent_secrets() {
    let pair = jwt::issue_pair(Uuid::now_v7(), "access-secret", "refresh-secret").unwrap();
    assert!(jwt::verify(&pair.access_token, "access-secret").is_ok());
    assert!(jwt::verify(&pair.access_token, "refresh-secret").is_err());
    assert!(jwt::verify(&pair.refresh_token, "refresh-secret").is_ok());
}

#[test]
fn password_hash_verifies_and_is_salted() {
    let a = password::hash("pw123").unwrap();
    let b = password::hash("pw123").unwrap();
    assert_ne!(a, b);
    assert!(password::verify("pw123", &a).unwrap());
    assert!(!password::verify("pw124", &a).unwrap());
}

#[test]
fn hash_records_configured_cost() {
    let stored = password::hash("pw123").unwrap();
    let expected = format!(
        "$argon2id$v=19$m={},t={},p={}$",
        password::MEMORY_COST_KIB,
        password::TIME_COST,
        password::PARALLELISM
    );
    assert!(stored.starts_with(&expected), "unexpected hash prefix: {stored}");
}

#[test]
fn verify_accepts_hash_with_other_cost() {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::{Algorithm, Argon2, Params, Version};

    let params = Params::new(8 * 1024, 1, 1, None).unwrap();
    let cheap = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(b"pw123", &SaltString::generate(&mut OsRng))
        .unwrap()
        .to_string();

    assert!(password::verify("pw123", &cheap).unwrap());
    assert!(!password::verify("pw124", &cheap).unwrap());
}

#[test]
fn verify_rejects_unparsable_hash() {
    assert!(password::verify("pw123", "not-a-phc-string").is_err());
}

#[test]
fn opaque_tokens_are_hex_and_hashed_deterministically() {
    let token = tokens::generate_opaque_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(token, tokens::generate_opaque_token());

    assert_eq!(tokens::hash_token(&token), tokens::hash_token(&token));
    assert_ne!(tokens::hash_token(&token), token);
}
