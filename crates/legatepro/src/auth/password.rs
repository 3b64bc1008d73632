use bcrypt::{hash, verify, DEFAULT_COST};

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed")]
pub struct PasswordHashError(#[source] bcrypt::BcryptError);

pub fn hash_password(plain: &str) -> Result<String, PasswordHashError> {
    hash(plain, DEFAULT_COST).map_err(PasswordHashError)
}

/// Verify a candidate against a stored hash. Malformed hashes count as a
/// failed match rather than an error so login stays fail-closed.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    verify(plain, stored_hash).unwrap_or(false)
}
