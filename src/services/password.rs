//! Password hashing module
//!
//! Secure password hashing and verification using Argon2id.
//!
//! # Security
//!
//! - Argon2id variant (hybrid of Argon2i and Argon2d)
//! - Fixed cost parameters, see [`MEMORY_COST_KIB`], [`TIME_COST`], [`PARALLELISM`]
//! - A fresh random salt for each password hash, drawn from the OS RNG
//!
//! Verification never fails with an error: a wrong password and a malformed
//! stored hash both come back as `false`.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use once_cell::sync::Lazy;

/// Argon2 memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 19 * 1024;

/// Argon2 iteration count
pub const TIME_COST: u32 = 2;

/// Argon2 lanes
pub const PARALLELISM: u32 = 1;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Hash compared against when the account does not exist, so that the
/// unknown-user path costs the same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("snulog-dummy-password").ok());

fn hasher() -> Result<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {}", e))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id.
///
/// Returns the PHC string (algorithm, parameters, salt and hash).
///
/// # Errors
///
/// Returns an error if the OS random source cannot produce a salt.
///
/// # Example
///
/// ```ignore
/// use snulog::services::password::hash_password;
///
/// let hash = hash_password("my_secure_password")?;
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| anyhow::anyhow!("Random source unavailable: {}", e))
        .context("Failed to generate password salt")?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow::anyhow!("Failed to encode salt: {}", e))?;

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// The cost parameters are read from the hash itself, so hashes produced
/// with other Argon2 settings still verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            tracing::warn!("Password verification failed: {}", e);
            false
        }
    }
}

/// Burn one verification's worth of work against a fixed hash.
///
/// Always returns `false`.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_argon2id_hash() {
        let hash = hash_password("test_password_123").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"), "Hash should use Argon2id");
        assert!(hash.contains("m=19456,t=2,p=1"), "Hash should carry the fixed cost: {}", hash);
    }

    #[test]
    fn test_hash_password_produces_different_hashes() {
        let hash1 = hash_password("same_password").expect("Failed to hash password");
        let hash2 = hash_password("same_password").expect("Failed to hash password");

        assert_ne!(hash1, hash2, "Same password should produce different hashes due to random salt");
        assert!(verify_password("same_password", &hash1));
        assert!(verify_password("same_password", &hash2));
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("Failed to hash password");
        assert!(verify_password("correct_password", &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password").expect("Failed to hash password");
        assert!(!verify_password("wrong_password", &hash));
    }

    #[test]
    fn test_verify_password_malformed_hash_is_false() {
        assert!(!verify_password("password", "invalid_hash_format"));
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "$2a$10$notanargonhashatall"));
    }

    #[test]
    fn test_hash_password_empty_password() {
        let hash = hash_password("").expect("Failed to hash empty password");
        assert!(verify_password("", &hash));
        assert!(!verify_password(" ", &hash));
    }

    #[test]
    fn test_hash_password_unicode() {
        let password = "パスワード🔐";
        let hash = hash_password(password).expect("Failed to hash unicode password");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn test_password_hash_not_equal_to_password() {
        let password = "my_secret_password";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(!hash.contains(password));
    }

    #[test]
    fn test_verify_dummy_is_always_false() {
        assert!(!verify_dummy("snulog-dummy-password"));
        assert!(!verify_dummy("anything"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Argon2 is deliberately slow; keep the case count small.
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn property_hash_then_verify(password in ".{0,64}") {
            let hash = hash_password(&password).unwrap();
            prop_assert!(verify_password(&password, &hash));
        }

        #[test]
        fn property_distinct_passwords_do_not_verify(
            p1 in "[a-zA-Z0-9]{1,32}",
            p2 in "[a-zA-Z0-9]{1,32}",
        ) {
            prop_assume!(p1 != p2);
            let hash = hash_password(&p2).unwrap();
            prop_assert!(!verify_password(&p1, &hash));
        }
    }
}
