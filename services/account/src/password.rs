use crate::error::ApiError;

/// Hash a secret (password or WeChat session key) with bcrypt at the
/// library default cost.
pub fn hash_secret(secret: &str) -> Result<String, ApiError> {
    bcrypt::hash(secret, bcrypt::DEFAULT_COST).map_err(|e| ApiError::Internal(e.into()))
}

/// Verify a secret against a stored bcrypt hash. A mismatch is `Ok(false)`;
/// only a malformed hash is an error.
pub fn verify_secret(secret: &str, hashed: &str) -> Result<bool, ApiError> {
    bcrypt::verify(secret, hashed).map_err(|e| ApiError::Internal(e.into()))
}
