// src/auth.rs

//! Credentials: password digests, password policy and API token keys
//!
//! Digests are stored as `sha256$<iterations>$<salt>$<digest>` so the
//! iteration count can be raised without invalidating existing accounts.

use crate::validation::FieldErrors;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Default number of SHA-256 rounds for new digests
pub const DEFAULT_HASH_ITERATIONS: u32 = 100_000;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SCHEME: &str = "sha256";
const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 20;

/// Produce a salted, iterated digest for `password`
pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let digest = digest(password, &salt, iterations);
    format!("{SCHEME}${iterations}${salt}${digest}")
}

/// Check `password` against a stored digest
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(4, '$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };

    let actual = digest(password, salt, iterations);
    actual.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn digest(password: &str, salt: &str, iterations: u32) -> String {
    let mut state: [u8; 32] = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize()
        .into();

    for _ in 1..iterations.max(1) {
        state = Sha256::new()
            .chain_update(state)
            .chain_update(password.as_bytes())
            .finalize()
            .into();
    }

    hex::encode(state)
}

/// Record password policy violations against `field`
///
/// `identities` are values the password must not equal (email, username).
pub fn check_password(errors: &mut FieldErrors, field: &str, password: &str, identities: &[&str]) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
    if identities
        .iter()
        .any(|identity| !identity.is_empty() && identity.eq_ignore_ascii_case(password))
    {
        errors.add(field, "The password is too similar to the account details.");
    }
}

/// Fresh 40-character API token key
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
