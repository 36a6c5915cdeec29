//! Argon2id password hashes stored as PHC strings.

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// False for a wrong password and for a stored value that is not a PHC string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("correct horse").expect("hash should succeed");
        let second = hash_password("correct horse").expect("hash should succeed");

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("correct horse"));
        assert!(verify_password("correct horse", &first));
        assert!(verify_password("correct horse", &second));
        assert!(!verify_password("battery staple", &first));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "no-separator"));
        assert!(!verify_password("anything", "salt$deadbeef"));
    }
}
