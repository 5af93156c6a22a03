use bastion::bastion_core::{AuthError, PasswordHasher};

fn hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

#[test]
fn test_hash_is_not_plaintext() {
    let hash = hasher().hash("testpassword123").unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, "testpassword123");
    assert!(hash.starts_with("$2b$04$"));
}

#[test]
fn test_verify_round_trip() {
    let hasher = hasher();
    let hash = hasher.hash("correctpassword").unwrap();

    assert!(hasher.verify(&hash, "correctpassword").is_ok());
    assert!(matches!(
        hasher.verify(&hash, "wrongpassword"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn test_verify_invalid_hash_is_a_mismatch() {
    assert!(matches!(
        hasher().verify("not_a_valid_bcrypt_hash", "testpassword"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn test_hash_generates_unique_hashes() {
    let hasher = hasher();
    let first = hasher.hash("samepassword").unwrap();
    let second = hasher.hash("samepassword").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify(&first, "samepassword").is_ok());
    assert!(hasher.verify(&second, "samepassword").is_ok());
}

#[test]
fn test_cost_from_another_hasher_still_verifies() {
    let hash = PasswordHasher::new(5).hash("portable-password").unwrap();
    assert!(hasher().verify(&hash, "portable-password").is_ok());
}
