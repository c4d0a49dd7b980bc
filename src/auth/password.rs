/// Password hashing
///
/// bcrypt is CPU-bound, so both hashing and verification run on the blocking pool.
use crate::error::{AppError, AppResult};

/// bcrypt cost factor for stored hashes
pub const PASSWORD_HASH_COST: u32 = 8;

/// Hash a plaintext password with a fresh random salt
pub async fn hash_password(plaintext: &str) -> AppResult<String> {
    let plaintext = plaintext.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))
}

/// Compare a plaintext password with a stored hash
///
/// A stored value that is not a bcrypt hash never matches.
pub async fn verify_password(plaintext: &str, stored_hash: &str) -> AppResult<bool> {
    let plaintext = plaintext.to_owned();
    let stored_hash = stored_hash.to_owned();

    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("pw123456").await.unwrap();
        assert!(hash.starts_with("$2"));
        assert_ne!(hash, "pw123456");

        assert!(verify_password("pw123456", &hash).await.unwrap());
        assert!(!verify_password("pw1234567", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_different_salts() {
        let first = hash_password("secret").await.unwrap();
        let second = hash_password("secret").await.unwrap();
        assert_ne!(first, second);
        assert!(first.contains("$08$"));
    }

    #[tokio::test]
    async fn test_plaintext_stored_value_never_matches() {
        assert!(!verify_password("pw123456", "pw123456").await.unwrap());
    }
}
