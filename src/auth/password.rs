//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};

/// Hash a password using scrypt with a random per-call salt
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt.hash_password(plain.as_bytes(), &salt)?.to_string();
    Ok(hash)
}

/// Verify a password against a hash. A malformed hash fails closed.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("Abc123!@").unwrap();
        assert!(verify_password(&hash, "Abc123!@"));
        assert!(!verify_password(&hash, "Abc123!#"));
    }

    #[test]
    fn test_salt_is_random_per_call() {
        let h1 = hash_password("Abc123!@").unwrap();
        let h2 = hash_password("Abc123!@").unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password(&h1, "Abc123!@"));
        assert!(verify_password(&h2, "Abc123!@"));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "Abc123!@"));
        assert!(!verify_password("", "Abc123!@"));
    }
}
