use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand::thread_rng;

use crate::error::AppError;

/// Stored form is the PHC string, e.g.
/// `$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::Password(err.to_string()))?;
    Ok(hash.to_string())
}

/// Anything that is not a PBKDF2 PHC string never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Opaque value for the session cookie.
pub fn new_session_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
