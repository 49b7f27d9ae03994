use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, NaiveDate, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::errors::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

const RESET_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const RESET_CODE_LENGTH: usize = 8;

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::internal(format!("failed to hash password: {err}")))
}

/// Verifies against an argon2 PHC string, or against the unsalted SHA-256
/// hex digests found in older data files.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    if !password_hash.starts_with('$') {
        let digest = hex::encode(Sha256::digest(password.as_bytes()));
        return Ok(digest.eq_ignore_ascii_case(password_hash));
    }

    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|err| AppError::internal(format!("invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 256 bits from the OS CSPRNG, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn generate_reset_code() -> String {
    let mut bytes = [0u8; RESET_CODE_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| RESET_CODE_ALPHABET[*b as usize % RESET_CODE_ALPHABET.len()] as char)
        .collect()
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    utc_now().date_naive()
}
